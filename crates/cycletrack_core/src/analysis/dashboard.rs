//! Chart-ready series for dashboard renderers.
//!
//! Pure data: renderers consume these series and never feed back into the
//! core.

use super::cycle::{cycle_lengths, mean, symptom_frequency, MIN_RECORDS_FOR_ANALYSIS};
use crate::model::period::PeriodRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Label format for per-period bars, e.g. `Jan 2024`.
const MONTH_LABEL_FORMAT: &str = "%b %Y";

/// One cycle length, dated by the start that closes the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CyclePoint {
    pub date: NaiveDate,
    pub length_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationBar {
    pub label: String,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub cycle_trend: Vec<CyclePoint>,
    pub avg_cycle: f64,
    pub durations: Vec<DurationBar>,
    pub flow_counts: Vec<(String, usize)>,
    pub symptoms: BTreeMap<String, usize>,
}

pub fn cycle_trend(records: &[PeriodRecord]) -> Vec<CyclePoint> {
    records
        .iter()
        .skip(1)
        .zip(cycle_lengths(records))
        .map(|(record, length_days)| CyclePoint {
            date: record.start_date,
            length_days,
        })
        .collect()
}

/// Records per flow label, most frequent first, ties by label.
pub fn flow_counts(records: &[PeriodRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.flow.label()).or_insert(0) += 1;
    }

    let mut ordered: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
}

/// Bundles all dashboard series; `None` below two records.
pub fn dashboard(records: &[PeriodRecord]) -> Option<Dashboard> {
    if records.len() < MIN_RECORDS_FOR_ANALYSIS {
        return None;
    }

    let cycle_trend = cycle_trend(records);
    let lengths: Vec<i64> = cycle_trend.iter().map(|point| point.length_days).collect();
    let avg_cycle = mean(&lengths)?;

    Some(Dashboard {
        cycle_trend,
        avg_cycle,
        durations: records
            .iter()
            .map(|record| DurationBar {
                label: record.start_date.format(MONTH_LABEL_FORMAT).to_string(),
                days: record.duration_days(),
            })
            .collect(),
        flow_counts: flow_counts(records),
        symptoms: symptom_frequency(records),
    })
}
