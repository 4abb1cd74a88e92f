//! Cycle-length, duration, anomaly and prediction logic.

use crate::model::period::PeriodRecord;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fewest records that define at least one cycle.
pub const MIN_RECORDS_FOR_ANALYSIS: usize = 2;
/// Cycles shorter than this many days are flagged.
pub const SHORT_CYCLE_DAYS: i64 = 21;
/// Cycles longer than this many days are flagged.
pub const LONG_CYCLE_DAYS: i64 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Short,
    Long,
}

/// One cycle outside `[SHORT_CYCLE_DAYS, LONG_CYCLE_DAYS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleAnomaly {
    /// 1-based position of the cycle in the sequence.
    pub cycle_number: usize,
    pub length_days: i64,
    pub kind: AnomalyKind,
}

/// Aggregate report over all recorded periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStatistics {
    pub count: usize,
    pub avg_cycle: f64,
    pub cycle_min: i64,
    pub cycle_max: i64,
    pub avg_duration: f64,
    pub anomalies: Vec<CycleAnomaly>,
}

/// Naive next-start estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CyclePrediction {
    pub predicted_date: NaiveDate,
    /// Mean cycle length the prediction was derived from.
    pub avg_cycle: f64,
    /// Number of cycles averaged.
    pub based_on: usize,
}

/// Whole-day gaps between consecutive start dates.
///
/// Returns `records.len() - 1` values, or none for fewer than two records.
pub fn cycle_lengths(records: &[PeriodRecord]) -> Vec<i64> {
    records
        .windows(2)
        .map(|pair| days_between(pair[0].start_date, pair[1].start_date))
        .collect()
}

/// Inclusive period length for every record.
pub fn durations(records: &[PeriodRecord]) -> Vec<i64> {
    records.iter().map(PeriodRecord::duration_days).collect()
}

/// Flags cycles outside the reference bounds.
pub fn check_anomalies(records: &[PeriodRecord]) -> Vec<CycleAnomaly> {
    anomalies_in(&cycle_lengths(records))
}

/// Count, mean/min/max cycle, mean duration and anomalies.
///
/// `None` when there are fewer than `MIN_RECORDS_FOR_ANALYSIS` records.
pub fn statistics(records: &[PeriodRecord]) -> Option<CycleStatistics> {
    if records.len() < MIN_RECORDS_FOR_ANALYSIS {
        return None;
    }

    let cycles = cycle_lengths(records);
    let durations = durations(records);

    Some(CycleStatistics {
        count: records.len(),
        avg_cycle: mean(&cycles)?,
        cycle_min: *cycles.iter().min()?,
        cycle_max: *cycles.iter().max()?,
        avg_duration: mean(&durations)?,
        anomalies: anomalies_in(&cycles),
    })
}

/// Predicts the next start as last start + truncated mean cycle.
///
/// The mean is truncated, not rounded: a 27.5 day average adds 27 days.
pub fn predict_next(records: &[PeriodRecord]) -> Option<CyclePrediction> {
    if records.len() < MIN_RECORDS_FOR_ANALYSIS {
        return None;
    }

    let cycles = cycle_lengths(records);
    let avg_cycle = mean(&cycles)?;
    let last_start = records.last()?.start_date;
    let offset = u64::try_from(avg_cycle.trunc() as i64).ok()?;

    Some(CyclePrediction {
        predicted_date: last_start.checked_add_days(Days::new(offset))?,
        avg_cycle,
        based_on: cycles.len(),
    })
}

/// Occurrence count per symptom tag across all records.
pub fn symptom_frequency(records: &[PeriodRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in records.iter().flat_map(PeriodRecord::symptom_tags) {
        *counts.entry(tag.to_string()).or_insert(0) += 1;
    }
    counts
}

fn anomalies_in(cycles: &[i64]) -> Vec<CycleAnomaly> {
    cycles
        .iter()
        .enumerate()
        .filter_map(|(index, &length_days)| {
            let kind = if length_days < SHORT_CYCLE_DAYS {
                AnomalyKind::Short
            } else if length_days > LONG_CYCLE_DAYS {
                AnomalyKind::Long
            } else {
                return None;
            };
            Some(CycleAnomaly {
                cycle_number: index + 1,
                length_days,
                kind,
            })
        })
        .collect()
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

pub(crate) fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: i64 = values.iter().sum();
    Some(total as f64 / values.len() as f64)
}
