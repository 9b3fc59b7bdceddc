use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for a city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    /// `weather[0].description`, localized by the provider's `lang` hint.
    pub description: String,
    /// `weather[0].main`, always English (e.g. "Clouds").
    pub main: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn sunrise_hhmm<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        hhmm(self.sunrise, tz)
    }

    pub fn sunset_hhmm<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        hhmm(self.sunset, tz)
    }
}

fn hhmm<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%H:%M").to_string()
}

/// One 3-hourly forecast reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub description: String,
}

/// The representative forecast entry for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// English weekday name, e.g. "Monday".
    pub weekday: String,
    pub entry: ForecastEntry,
}

/// A single sample of the upcoming-temperature chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    /// `%m/%d %H:%M` in local time.
    pub label: String,
    pub temperature_c: f64,
}
