//! Linear balance forecast from recent activity

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{ForecastPoint, Transaction};

/// Days of history used for the daily average
pub const HISTORY_DAYS: i64 = 30;

/// Largest forecast window accepted by the API
pub const MAX_FORECAST_DAYS: u32 = 365;

/// Average signed daily movement over the last [`HISTORY_DAYS`] days.
///
/// The sum is always divided by the full window, so a single deposit
/// yesterday counts as 1/30th of its value per day.
pub fn daily_average(transactions: &[Transaction], now: DateTime<Utc>) -> f64 {
    let since = now - Duration::days(HISTORY_DAYS);
    let total: f64 = transactions
        .iter()
        .filter(|t| t.created_at >= since && t.created_at <= now)
        .map(Transaction::signed_amount)
        .sum();
    total / HISTORY_DAYS as f64
}

/// Build `days` points starting at `today` (offset 0 is the current balance)
pub fn linear_forecast(
    current: f64,
    daily_average: f64,
    today: NaiveDate,
    days: u32,
) -> Vec<ForecastPoint> {
    (0..days)
        .map(|d| ForecastPoint {
            date: today + Duration::days(i64::from(d)),
            predicted_amount: ((current + daily_average * f64::from(d)) * 100.0).round() / 100.0,
        })
        .collect()
}
