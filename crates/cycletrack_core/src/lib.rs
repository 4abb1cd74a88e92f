//! Core domain logic for cycletrack.
//! This crate is the single source of truth for record, storage and cycle
//! analysis rules.

pub mod analysis;
pub mod config;
pub mod crypto;
pub mod logging;
pub mod model;
pub mod store;

pub use analysis::cycle::{
    check_anomalies, cycle_lengths, durations, predict_next, statistics, symptom_frequency,
    AnomalyKind, CycleAnomaly, CyclePrediction, CycleStatistics, LONG_CYCLE_DAYS,
    MIN_RECORDS_FOR_ANALYSIS, SHORT_CYCLE_DAYS,
};
pub use analysis::dashboard::{
    cycle_trend, dashboard, flow_counts, CyclePoint, Dashboard, DurationBar,
};
pub use config::StorePaths;
pub use crypto::{CryptoError, KeyError, KeyMaterial};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::period::{parse_record_date, Flow, PeriodRecord, RecordValidationError};
pub use store::{RecordStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
