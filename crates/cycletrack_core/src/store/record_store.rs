//! Encrypted-at-rest record store.
//!
//! # Responsibility
//! - Load and decrypt the persisted blob into an ordered record sequence.
//! - Apply mutations and rewrite the whole blob after each one.
//! - Expose a read-only view for analysis/reporting.
//!
//! # Invariants
//! - `records` is sorted ascending by `start_date`, ties in insertion order.
//! - A failed save leaves both the previous blob and `records` untouched.
//!
//! # See also
//! - `store::codec` for the plaintext table format.

use super::atomic::write_atomically;
use super::codec::{decode_records, encode_records};
use super::{StoreError, StoreResult};
use crate::crypto::{KeyMaterial, RecordCipher};
use crate::model::period::PeriodRecord;
use log::{error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Owner of the tracked period sequence and its encrypted data file.
pub struct RecordStore {
    data_file: PathBuf,
    cipher: RecordCipher,
    records: Vec<PeriodRecord>,
}

impl RecordStore {
    /// Opens the store backed by `data_file`, decrypting it with `key`.
    ///
    /// A missing data file yields an empty store.
    ///
    /// # Errors
    /// - `Decryption` for a wrong key or damaged blob.
    /// - `CorruptPayload` when the decrypted table is malformed.
    /// - `Persistence` when the file exists but cannot be read.
    pub fn open(data_file: impl Into<PathBuf>, key: &KeyMaterial) -> StoreResult<Self> {
        let cipher = RecordCipher::new(key).map_err(StoreError::Decryption)?;
        let mut store = Self {
            data_file: data_file.into(),
            cipher,
            records: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-reads the data file, replacing the in-memory sequence on success.
    ///
    /// On error the current in-memory sequence is kept.
    pub fn reload(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.read_blob() {
            Ok(Some(records)) => {
                info!(
                    "event=store_load module=store status=ok source=file records={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                self.records = records;
                Ok(())
            }
            Ok(None) => {
                info!("event=store_load module=store status=ok source=empty records=0");
                self.records.clear();
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Parses raw input into a record, inserts it and persists the store.
    ///
    /// Empty `flow` defaults to `Medium`; `symptoms` is stored as given.
    ///
    /// # Errors
    /// - `InvalidRecord` for unparseable or reversed dates; nothing changes.
    /// - `Encryption` / `Persistence` when the save fails; nothing changes.
    pub fn add_record(
        &mut self,
        start: &str,
        end: &str,
        flow: &str,
        symptoms: &str,
    ) -> StoreResult<&PeriodRecord> {
        let record = PeriodRecord::from_input(start, end, flow, symptoms).map_err(|err| {
            warn!("event=record_add module=store status=rejected error_code=invalid_record");
            StoreError::from(err)
        })?;
        self.insert(record)
    }

    /// Inserts an already-built record and persists the store.
    ///
    /// The record is canonicalized first so memory matches what a reload
    /// of the written blob yields.
    pub fn insert(&mut self, record: PeriodRecord) -> StoreResult<&PeriodRecord> {
        let record = record.into_canonical();
        record.validate()?;

        let mut next = self.records.clone();
        let start_date = record.start_date;
        // Insert after any equal start dates so ties keep insertion order.
        let position = next.partition_point(|existing| existing.start_date <= start_date);
        next.insert(position, record);

        self.write_blob(&next)?;
        self.records = next;
        info!(
            "event=record_add module=store status=ok records={}",
            self.records.len()
        );
        Ok(&self.records[position])
    }

    /// Encrypts and rewrites the full current sequence.
    pub fn save(&self) -> StoreResult<()> {
        self.write_blob(&self.records)
    }

    /// Current ordered sequence.
    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    fn read_blob(&self) -> StoreResult<Option<Vec<PeriodRecord>>> {
        let blob = match std::fs::read(&self.data_file) {
            Ok(blob) => blob,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Persistence {
                    path: self.data_file.clone(),
                    source,
                })
            }
        };

        let payload = self.cipher.open(&blob).map_err(StoreError::Decryption)?;
        let mut records = decode_records(&payload)?;
        // Files written by other tools may not be sorted.
        records.sort_by_key(|record| record.start_date);
        Ok(Some(records))
    }

    fn write_blob(&self, records: &[PeriodRecord]) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = encode_records(records)
            .and_then(|payload| self.cipher.seal(&payload).map_err(StoreError::Encryption))
            .and_then(|blob| {
                write_atomically(&self.data_file, &blob).map_err(|source| {
                    StoreError::Persistence {
                        path: self.data_file.clone(),
                        source,
                    }
                })
            });

        match &result {
            Ok(()) => info!(
                "event=store_save module=store status=ok records={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error records={} duration_ms={} error_code={}",
                records.len(),
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }
}
