//! Period record domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted by `RecordStore`.
//! - Parse raw user input (dates, flow label, symptom text) into that record.
//!
//! # Invariants
//! - `end_date >= start_date` for every constructed record.
//! - Empty flow input maps to `Flow::Medium`.
//! - Symptom text is kept verbatim (trimmed); tags are derived on demand.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Canonical on-disk and display format for record dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$")
        .expect("valid iso date regex")
});

/// Validation error for period record input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A date field is not an ISO-like `YYYY-MM-DD` calendar date.
    InvalidDateFormat { field: &'static str, value: String },
    /// The period ends before it starts.
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateFormat { field, value } => write!(
                f,
                "invalid date format for {field}: `{value}` (expected YYYY-MM-DD)"
            ),
            Self::EndBeforeStart { start, end } => write!(
                f,
                "end_date ({}) must be >= start_date ({})",
                end.format(DATE_FORMAT),
                start.format(DATE_FORMAT)
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// Qualitative flow intensity.
///
/// The three conventional labels are recognised case-insensitively; any
/// other text is kept as `Other` so older or hand-edited data still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flow {
    Light,
    Medium,
    Heavy,
    Other(String),
}

impl Flow {
    /// Parses a raw flow label. Blank input yields the `Medium` default.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "medium" => Self::Medium,
            "light" => Self::Light,
            "heavy" => Self::Heavy,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Returns the display/persistence label.
    pub fn label(&self) -> &str {
        match self {
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Heavy => "Heavy",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::Medium
    }
}

impl Display for Flow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Flow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Flow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One tracked period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriodRecord")]
pub struct PeriodRecord {
    pub start_date: NaiveDate,
    /// Inclusive last day; never earlier than `start_date`.
    pub end_date: NaiveDate,
    pub flow: Flow,
    /// Comma-joined free-text tags.
    pub symptoms: String,
}

#[derive(Deserialize)]
struct RawPeriodRecord {
    start_date: NaiveDate,
    end_date: NaiveDate,
    flow: Flow,
    #[serde(default)]
    symptoms: String,
}

impl TryFrom<RawPeriodRecord> for PeriodRecord {
    type Error = RecordValidationError;

    fn try_from(value: RawPeriodRecord) -> Result<Self, Self::Error> {
        Self::new(value.start_date, value.end_date, value.flow, value.symptoms)
    }
}

impl PeriodRecord {
    /// Creates a validated record from already-parsed fields.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        flow: Flow,
        symptoms: impl Into<String>,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            start_date,
            end_date,
            flow,
            symptoms: symptoms.into(),
        }
        .into_canonical();
        record.validate()?;
        Ok(record)
    }

    /// Normalizes fields to the form the persisted table reads back.
    ///
    /// `Flow::Other` holding a known or blank label becomes that label's
    /// variant; symptom text is trimmed.
    pub fn into_canonical(self) -> Self {
        let symptoms = match self.symptoms.trim() {
            trimmed if trimmed.len() == self.symptoms.len() => self.symptoms,
            trimmed => trimmed.to_string(),
        };
        Self {
            flow: Flow::parse(self.flow.label()),
            symptoms,
            ..self
        }
    }

    /// Builds a record from raw CLI-style strings.
    ///
    /// # Errors
    /// - `InvalidDateFormat` when `start` or `end` is not an ISO-like date.
    /// - `EndBeforeStart` when the parsed end precedes the start.
    pub fn from_input(
        start: &str,
        end: &str,
        flow: &str,
        symptoms: &str,
    ) -> Result<Self, RecordValidationError> {
        let start_date = parse_record_date("start_date", start)?;
        let end_date = parse_record_date("end_date", end)?;
        Self::new(start_date, end_date, Flow::parse(flow), symptoms)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.end_date < self.start_date {
            return Err(RecordValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Inclusive day count; a same-day period lasts 1 day.
    pub fn duration_days(&self) -> i64 {
        self.end_date.signed_duration_since(self.start_date).num_days() + 1
    }

    /// Split, trimmed, non-empty symptom tags in stored order.
    pub fn symptom_tags(&self) -> impl Iterator<Item = &str> {
        self.symptoms
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

/// Parses an ISO-like date string into a calendar date.
///
/// Accepts `YYYY-MM-DD` with an optional `T`/space separated time suffix,
/// which is discarded.
pub fn parse_record_date(field: &'static str, raw: &str) -> Result<NaiveDate, RecordValidationError> {
    let invalid = || RecordValidationError::InvalidDateFormat {
        field,
        value: raw.to_string(),
    };

    let captures = ISO_DATE_RE.captures(raw.trim()).ok_or_else(invalid)?;
    let date_part = captures.get(1).ok_or_else(invalid)?.as_str();
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| invalid())
}
