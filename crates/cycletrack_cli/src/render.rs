//! Plain-text output for CLI reports.

use cycletrack_core::{
    AnomalyKind, CyclePrediction, CycleStatistics, Dashboard, PeriodRecord,
    MIN_RECORDS_FOR_ANALYSIS,
};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn header(title: &str) {
    println!("{}", rule());
    println!("{title}");
    println!("{}", rule());
}

pub fn print_insufficient(what: &str) {
    println!("Need at least {MIN_RECORDS_FOR_ANALYSIS} periods for {what}");
}

pub fn print_records(records: &[PeriodRecord]) {
    if records.is_empty() {
        println!("No data available");
        return;
    }

    header("PERIOD RECORDS");
    println!("{:<12} {:<12} {:<10} symptoms", "start_date", "end_date", "flow");
    for record in records {
        println!(
            "{:<12} {:<12} {:<10} {}",
            record.start_date.to_string(),
            record.end_date.to_string(),
            record.flow.label(),
            record.symptoms
        );
    }
    println!("{}", rule());
}

pub fn print_statistics(stats: &CycleStatistics) {
    header("STATISTICS");
    println!("Total Periods: {}", stats.count);
    println!("Average Cycle: {:.1} days", stats.avg_cycle);
    println!("Cycle Range: {} - {} days", stats.cycle_min, stats.cycle_max);
    println!("Average Duration: {:.1} days", stats.avg_duration);
    println!("{}", rule());

    for anomaly in &stats.anomalies {
        let kind = match anomaly.kind {
            AnomalyKind::Short => "short",
            AnomalyKind::Long => "long",
        };
        println!(
            "ALERT: Cycle {} is unusually {kind} ({} days)",
            anomaly.cycle_number, anomaly.length_days
        );
        println!("   Consider consulting a healthcare provider.");
    }
}

pub fn print_prediction(prediction: &CyclePrediction) {
    header("NEXT PERIOD PREDICTION");
    println!("Predicted Date: {}", prediction.predicted_date);
    println!("Based on {:.1} day average cycle", prediction.avg_cycle);
    println!("{}", rule());
}

pub fn print_dashboard(board: &Dashboard) {
    header("DASHBOARD");

    println!("Cycle length over time (avg {:.1}d):", board.avg_cycle);
    for point in &board.cycle_trend {
        println!("  {}  {:>3}d  {}", point.date, point.length_days, bar(point.length_days));
    }

    println!("Period duration:");
    for duration in &board.durations {
        println!("  {:<9} {:>3}d  {}", duration.label, duration.days, bar(duration.days));
    }

    println!("Flow intensity:");
    for (label, count) in &board.flow_counts {
        println!("  {label:<9} {count:>3}");
    }

    println!("Symptom distribution:");
    if board.symptoms.is_empty() {
        println!("  No symptoms recorded");
    } else {
        let total: usize = board.symptoms.values().sum();
        for (tag, count) in &board.symptoms {
            let share = *count as f64 * 100.0 / total as f64;
            println!("  {tag:<16} {count:>3}  {share:.1}%");
        }
    }
    println!("{}", rule());
}

/// One `#` per day, clipped to the rule width.
fn bar(days: i64) -> String {
    let width = usize::try_from(days).unwrap_or(0).min(RULE_WIDTH);
    "#".repeat(width)
}
