use crate::error::MetricsError;
use crate::model::metrics::{DaysRemaining, DerivedMetrics};
use crate::model::reading::DailyReading;

/// Readings in the rolling window; eight readings give seven day-to-day deltas.
pub const DEFAULT_AVERAGE_WINDOW: usize = 8;

// All functions here take readings oldest first.

pub fn current_balance(readings: &[DailyReading]) -> Result<f64, MetricsError> {
    readings
        .last()
        .map(|r| r.balance)
        .ok_or(MetricsError::EmptyDataset)
}

/// Consumption between the two most recent readings. A recharge counts as zero.
pub fn yesterday_usage(readings: &[DailyReading]) -> f64 {
    match readings {
        [.., previous, latest] => (previous.balance - latest.balance).max(0.0),
        _ => 0.0,
    }
}

/// Mean daily consumption over the last `window` readings.
///
/// Days where the balance rose or stayed flat are left out of both the sum
/// and the count, so a recharge does not drag the average down.
pub fn average_usage(readings: &[DailyReading], window: usize) -> f64 {
    let start = readings.len().saturating_sub(window);
    let (total, days) = readings[start..]
        .windows(2)
        .map(|pair| pair[0].balance - pair[1].balance)
        .filter(|usage| *usage > 0.0)
        .fold((0.0, 0u32), |(total, days), usage| (total + usage, days + 1));

    if days > 0 {
        total / days as f64
    } else {
        0.0
    }
}

pub fn estimated_days_remaining(current_balance: f64, average_usage: f64) -> DaysRemaining {
    if average_usage > 0.0 {
        DaysRemaining::Days((current_balance / average_usage).floor() as i64)
    } else {
        DaysRemaining::Unbounded
    }
}

pub fn derive_metrics(readings: &[DailyReading], window: usize) -> Result<DerivedMetrics, MetricsError> {
    let current_balance = current_balance(readings)?;
    let average_usage = average_usage(readings, window);
    Ok(DerivedMetrics {
        current_balance,
        yesterday_usage: yesterday_usage(readings),
        average_usage,
        estimated_days_remaining: estimated_days_remaining(current_balance, average_usage),
    })
}
