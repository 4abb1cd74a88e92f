//! Plaintext table codec for the record blob.
//!
//! # Invariants
//! - Header row is exactly `start_date,end_date,flow,symptoms`.
//! - Dates are written as `YYYY-MM-DD`; no time component is introduced.
//! - Every decoded row passes `PeriodRecord::validate()`.

use super::{StoreError, StoreResult};
use crate::model::period::{parse_record_date, Flow, PeriodRecord, DATE_FORMAT};

/// Column order of the persisted table.
pub const HEADER: [&str; 4] = ["start_date", "end_date", "flow", "symptoms"];

/// Serializes records into the UTF-8 table payload.
pub fn encode_records(records: &[PeriodRecord]) -> StoreResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER).map_err(encode_error)?;
    for record in records {
        writer
            .write_record([
                record.start_date.format(DATE_FORMAT).to_string().as_str(),
                record.end_date.format(DATE_FORMAT).to_string().as_str(),
                record.flow.label(),
                record.symptoms.as_str(),
            ])
            .map_err(encode_error)?;
    }

    writer
        .into_inner()
        .map_err(|err| StoreError::CorruptPayload(format!("failed to flush table: {err}")))
}

/// Parses the UTF-8 table payload back into records, in stored order.
///
/// An empty payload decodes to an empty sequence.
pub fn decode_records(payload: &[u8]) -> StoreResult<Vec<PeriodRecord>> {
    let text = std::str::from_utf8(payload)
        .map_err(|err| StoreError::CorruptPayload(format!("payload is not UTF-8: {err}")))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(decode_error)?;
    if headers.iter().map(str::trim).ne(HEADER.iter().copied()) {
        return Err(StoreError::CorruptPayload(format!(
            "unexpected header `{}`",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(decode_error)?;
        let line = index + 2;
        let field = |column: usize| row.get(column).unwrap_or_default();

        let start_date = parse_record_date("start_date", field(0))
            .map_err(|err| row_error(line, &err.to_string()))?;
        let end_date = parse_record_date("end_date", field(1))
            .map_err(|err| row_error(line, &err.to_string()))?;
        let record = PeriodRecord::new(start_date, end_date, Flow::parse(field(2)), field(3))
            .map_err(|err| row_error(line, &err.to_string()))?;
        records.push(record);
    }

    Ok(records)
}

fn encode_error(err: csv::Error) -> StoreError {
    StoreError::CorruptPayload(format!("failed to encode table: {err}"))
}

fn decode_error(err: csv::Error) -> StoreError {
    StoreError::CorruptPayload(format!("failed to read table: {err}"))
}

fn row_error(line: usize, message: &str) -> StoreError {
    StoreError::CorruptPayload(format!("line {line}: {message}"))
}
