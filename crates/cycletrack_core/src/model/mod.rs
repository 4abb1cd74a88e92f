//! Domain model for tracked periods.
//!
//! # Responsibility
//! - Define canonical record structures used by store and analysis code.
//! - Own input parsing/validation so every entry point shares one rule set.
//!
//! # Invariants
//! - A `PeriodRecord` never has `end_date < start_date`.
//! - Dates are calendar dates without a time-of-day component.

pub mod period;
