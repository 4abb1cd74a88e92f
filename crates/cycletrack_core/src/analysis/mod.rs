//! Cycle statistics over an ordered record sequence.
//!
//! # Responsibility
//! - Derive cycle lengths and period durations from records.
//! - Build every report (statistics, prediction, anomalies, dashboard
//!   series) from those two primitives.
//!
//! # Invariants
//! - Inputs are sorted ascending by `start_date`; nothing here mutates them.
//! - Reports needing cycles return `None`/empty below
//!   `MIN_RECORDS_FOR_ANALYSIS` records.

pub mod cycle;
pub mod dashboard;
