//! Collapsing 3-hourly forecast readings into per-day and chart views.

use std::collections::HashSet;

use chrono::TimeZone;

use crate::model::{DailyForecast, ForecastEntry, TemperaturePoint};

/// Eight 3-hour steps: the next 24 hours.
pub const CHART_POINTS: usize = 8;

/// One entry per calendar date in `tz`, in first-occurrence order.
///
/// The first entry seen for a date represents the whole day; later readings
/// for the same date are skipped, not averaged.
pub fn aggregate_daily<Tz: TimeZone>(entries: &[ForecastEntry], tz: &Tz) -> Vec<DailyForecast>
where
    Tz::Offset: std::fmt::Display,
{
    let mut seen = HashSet::new();
    let mut days = Vec::new();

    for entry in entries {
        let local = entry.timestamp.with_timezone(tz);
        let date = local.date_naive();

        if seen.insert(date) {
            days.push(DailyForecast {
                date,
                weekday: local.format("%A").to_string(),
                entry: entry.clone(),
            });
        }
    }

    days
}

/// The first `limit` readings as labelled chart samples.
pub fn temperature_series<Tz: TimeZone>(
    entries: &[ForecastEntry],
    tz: &Tz,
    limit: usize,
) -> Vec<TemperaturePoint>
where
    Tz::Offset: std::fmt::Display,
{
    entries
        .iter()
        .take(limit)
        .map(|e| TemperaturePoint {
            label: e.timestamp.with_timezone(tz).format("%m/%d %H:%M").to_string(),
            temperature_c: e.temperature_c,
        })
        .collect()
}
