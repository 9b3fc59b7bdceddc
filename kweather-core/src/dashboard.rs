//! One dashboard request: pick the city, then fetch each section in turn.
//!
//! Sections fail independently. A failed section is recorded in
//! [`DashboardReport::errors`] and the remaining sections are still fetched.

use chrono::{Local, TimeZone};
use thiserror::Error;

use crate::{
    city::{CityQuery, CityTable, Resolution},
    forecast::{CHART_POINTS, aggregate_daily, temperature_series},
    geolocate::CityLocator,
    model::{DailyForecast, TemperaturePoint, WeatherSnapshot},
    provider::WeatherProvider,
};

/// Where the city name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitySource {
    Input,
    Detected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("날씨 데이터를 불러올 수 없습니다. (Unable to load current weather.)")]
    CurrentUnavailable,

    #[error("주간 예보 데이터를 처리할 수 없습니다. (Unable to process weekly forecast data.)")]
    ForecastUnavailable,

    #[error("미세먼지 정보를 불러올 수 없습니다. (Air quality data unavailable.)")]
    AirQualityUnavailable,
}

#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub city: CityQuery,
    pub source: CitySource,
    pub current: Option<WeatherSnapshot>,
    /// PM2.5 in µg/m³.
    pub pm25: Option<f64>,
    pub daily: Option<Vec<DailyForecast>>,
    pub chart: Option<Vec<TemperaturePoint>>,
    pub errors: Vec<SectionError>,
}

#[derive(Debug, Clone)]
pub enum DashboardOutcome {
    Report(DashboardReport),
    /// The city is not in the table. No weather requests were made.
    Unsupported { input: String, source: CitySource, supported: String },
    /// Nothing was entered and no supported city could be detected.
    NoCity,
}

enum Rejected {
    Unsupported { input: String, source: CitySource },
    NoCity,
}

#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    locator: Box<dyn CityLocator>,
    cities: &'static CityTable,
}

impl Dashboard {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        locator: Box<dyn CityLocator>,
        cities: &'static CityTable,
    ) -> Self {
        Self { provider, locator, cities }
    }

    pub fn cities(&self) -> &'static CityTable {
        self.cities
    }

    /// Build the dashboard with forecast dates in host local time.
    pub async fn build(&self, input: Option<&str>) -> DashboardOutcome {
        self.build_in(input, &Local).await
    }

    pub async fn build_in<Tz>(&self, input: Option<&str>, tz: &Tz) -> DashboardOutcome
    where
        Tz: TimeZone + Sync,
        Tz::Offset: std::fmt::Display,
    {
        let (city, source) = match self.select_city(input).await {
            Ok(selected) => selected,
            Err(Rejected::NoCity) => return DashboardOutcome::NoCity,
            Err(Rejected::Unsupported { input, source }) => {
                return DashboardOutcome::Unsupported {
                    input,
                    source,
                    supported: self.cities.supported_list(),
                };
            }
        };

        tracing::debug!(city = %city.canonical, input = %city.input, "building dashboard");

        let mut errors = Vec::new();

        let current = self.provider.current(&city).await;
        if current.is_none() {
            errors.push(SectionError::CurrentUnavailable);
        }

        let pm25 = self.provider.pm25(&city).await;
        if pm25.is_none() {
            errors.push(SectionError::AirQualityUnavailable);
        }

        let entries = self.provider.forecast(&city).await;
        if entries.is_none() {
            errors.push(SectionError::ForecastUnavailable);
        }
        let daily = entries.as_deref().map(|e| aggregate_daily(e, tz));
        let chart = entries.as_deref().map(|e| temperature_series(e, tz, CHART_POINTS));

        DashboardOutcome::Report(DashboardReport { city, source, current, pm25, daily, chart, errors })
    }

    async fn select_city(
        &self,
        input: Option<&str>,
    ) -> Result<(CityQuery, CitySource), Rejected> {
        let (text, source) = match input.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => (text.to_string(), CitySource::Input),
            None => match self.locator.detect_city().await {
                Some(detected) => (detected, CitySource::Detected),
                None => return Err(Rejected::NoCity),
            },
        };

        match self.cities.resolve(&text) {
            Resolution::Resolved(city) => Ok((city, source)),
            Resolution::Unresolved => Err(Rejected::Unsupported { input: text, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastEntry;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct FakeProvider {
        calls: Arc<AtomicUsize>,
        queried: Arc<Mutex<Vec<CityQuery>>>,
        fail_current: bool,
        fail_forecast: bool,
    }

    impl FakeProvider {
        fn record(&self, city: &CityQuery) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queried.lock().unwrap().push(city.clone());
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current(&self, city: &CityQuery) -> Option<WeatherSnapshot> {
            self.record(city);
            let ts = DateTime::<Utc>::from_timestamp(1_705_276_800, 0)?;
            (!self.fail_current).then(|| WeatherSnapshot {
                temperature_c: -2.5,
                humidity_pct: 40,
                wind_speed_mps: 3.2,
                description: "맑음".into(),
                main: "Clear".into(),
                sunrise: ts,
                sunset: ts,
            })
        }

        async fn forecast(&self, city: &CityQuery) -> Option<Vec<ForecastEntry>> {
            self.record(city);
            if self.fail_forecast {
                return None;
            }
            let entries = (0..16)
                .filter_map(|i| {
                    Some(ForecastEntry {
                        timestamp: DateTime::<Utc>::from_timestamp(1_705_276_800 + i * 3 * 3600, 0)?,
                        temperature_c: i as f64,
                        description: "clear sky".into(),
                    })
                })
                .collect();
            Some(entries)
        }

        async fn pm25(&self, city: &CityQuery) -> Option<f64> {
            self.record(city);
            Some(12.5)
        }
    }

    #[derive(Debug)]
    struct FixedLocator(Option<&'static str>);

    #[async_trait]
    impl CityLocator for FixedLocator {
        async fn detect_city(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn dashboard(provider: FakeProvider, detected: Option<&'static str>) -> Dashboard {
        Dashboard::new(Box::new(provider), Box::new(FixedLocator(detected)), CityTable::builtin())
    }

    fn report(outcome: DashboardOutcome) -> DashboardReport {
        match outcome {
            DashboardOutcome::Report(r) => r,
            other => panic!("expected report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn korean_input_builds_full_report() {
        let provider = FakeProvider::default();
        let queried = provider.queried.clone();
        let dash = dashboard(provider, None);

        let r = report(dash.build_in(Some("서울"), &Utc).await);

        assert_eq!(r.city, CityQuery::new("Seoul", "서울"));
        assert_eq!(r.source, CitySource::Input);
        assert_eq!(r.current.as_ref().map(|c| c.temperature_c), Some(-2.5));
        assert_eq!(r.pm25, Some(12.5));
        assert_eq!(r.daily.as_ref().map(Vec::len), Some(2));
        assert_eq!(r.chart.as_ref().map(Vec::len), Some(CHART_POINTS));
        assert!(r.errors.is_empty());
        assert!(queried.lock().unwrap().iter().all(|q| q.input == "서울"));
    }

    #[tokio::test]
    async fn unsupported_input_makes_no_requests() {
        let provider = FakeProvider::default();
        let calls = provider.calls.clone();
        let dash = dashboard(provider, Some("Seoul"));

        match dash.build_in(Some("Nonexistent City"), &Utc).await {
            DashboardOutcome::Unsupported { input, source, supported } => {
                assert_eq!(input, "Nonexistent City");
                assert_eq!(source, CitySource::Input);
                assert!(supported.contains("서울(Seoul)"));
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_sections_are_skipped_independently() {
        let provider = FakeProvider { fail_current: true, fail_forecast: true, ..Default::default() };
        let dash = dashboard(provider, None);

        let r = report(dash.build_in(Some("Busan"), &Utc).await);

        assert!(r.current.is_none());
        assert!(r.daily.is_none());
        assert!(r.chart.is_none());
        assert_eq!(r.pm25, Some(12.5));
        assert_eq!(
            r.errors,
            vec![SectionError::CurrentUnavailable, SectionError::ForecastUnavailable]
        );
    }

    #[tokio::test]
    async fn blank_input_uses_detected_city() {
        let dash = dashboard(FakeProvider::default(), Some("Jeju"));

        let r = report(dash.build_in(Some("  "), &Utc).await);

        assert_eq!(r.city.canonical, "Jeju");
        assert_eq!(r.source, CitySource::Detected);
    }

    #[tokio::test]
    async fn unsupported_detected_city_is_reported() {
        let provider = FakeProvider::default();
        let calls = provider.calls.clone();
        let dash = dashboard(provider, Some("Tokyo"));

        match dash.build_in(None, &Utc).await {
            DashboardOutcome::Unsupported { source, .. } => assert_eq!(source, CitySource::Detected),
            other => panic!("expected unsupported, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_input_and_no_detection_asks_for_city() {
        let dash = dashboard(FakeProvider::default(), None);
        assert!(matches!(dash.build_in(None, &Utc).await, DashboardOutcome::NoCity));
    }
}
