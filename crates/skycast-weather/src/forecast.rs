//! Folding raw three-hour samples into daily summaries.
//!
//! Days are keyed by their UTC calendar date. Provider timestamps are
//! Unix epoch seconds, so grouping does not depend on the host timezone.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};

use crate::types::{DailySummary, ForecastResult, WeatherSample};

/// Number of days shown in the forecast
pub const MAX_FORECAST_DAYS: usize = 5;

/// UTC calendar date for a Unix timestamp.
///
/// Timestamps chrono cannot represent map to 1970-01-01.
pub fn day_key(timestamp: i64) -> NaiveDate {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// Group samples by calendar day and fold each group into a summary.
///
/// Days come out in the order their first sample appears in `samples`;
/// only the first [`MAX_FORECAST_DAYS`] days are kept. The first sample of a
/// day supplies its date, description and icon; later samples only widen
/// the min/max range.
pub fn aggregate(samples: &[WeatherSample]) -> ForecastResult {
    let mut days: Vec<DailySummary> = Vec::with_capacity(MAX_FORECAST_DAYS);
    let mut slots: HashMap<NaiveDate, usize> = HashMap::with_capacity(MAX_FORECAST_DAYS);

    for sample in samples {
        let key = day_key(sample.timestamp);
        match slots.get(&key) {
            Some(&slot) => days[slot].absorb(sample),
            // Days past the cap can never be returned, so they are not tracked.
            None if days.len() < MAX_FORECAST_DAYS => {
                slots.insert(key, days.len());
                days.push(DailySummary::seed(sample));
            }
            None => {}
        }
    }

    tracing::debug!(
        "Aggregated {} samples into {} days",
        samples.len(),
        days.len()
    );
    days
}
