use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    CityQuery, Config,
    model::{ForecastEntry, WeatherSnapshot},
};

use super::{FetchError, WeatherProvider, first_success};

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const GEOCODE_PATH: &str = "/geo/1.0/direct";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    lang: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            lang: config.settings.lang.clone(),
            base_url: config.settings.weather_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(&[("appid", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_current(&self, q: String) -> Result<WeatherSnapshot, FetchError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                CURRENT_PATH,
                &[("q", q.as_str()), ("units", "metric"), ("lang", self.lang.as_str())],
            )
            .await?;

        let weather = parsed.weather.into_iter().next().ok_or(FetchError::Malformed("weather[0]"))?;

        Ok(WeatherSnapshot {
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            description: weather.description,
            main: weather.main,
            sunrise: unix_to_utc(parsed.sys.sunrise)?,
            sunset: unix_to_utc(parsed.sys.sunset)?,
        })
    }

    async fn fetch_forecast(&self, q: String) -> Result<Vec<ForecastEntry>, FetchError> {
        let parsed: OwForecastResponse = self
            .get_json(
                FORECAST_PATH,
                &[("q", q.as_str()), ("units", "metric"), ("lang", self.lang.as_str())],
            )
            .await?;

        parsed
            .list
            .into_iter()
            .map(|entry| {
                let weather =
                    entry.weather.into_iter().next().ok_or(FetchError::Malformed("list[].weather[0]"))?;

                Ok(ForecastEntry {
                    timestamp: unix_to_utc(entry.dt)?,
                    temperature_c: entry.main.temp,
                    description: weather.description,
                })
            })
            .collect()
    }

    /// Geocode `q`, then read PM2.5 from the most recent pollution sample.
    async fn fetch_pm25(&self, q: String) -> Result<f64, FetchError> {
        let places: Vec<OwGeoPlace> =
            self.get_json(GEOCODE_PATH, &[("q", q.as_str()), ("limit", "1")]).await?;
        let place = places.first().ok_or(FetchError::Malformed("geocoding result"))?;

        let lat = place.lat.to_string();
        let lon = place.lon.to_string();
        let parsed: OwPollutionResponse = self
            .get_json(AIR_POLLUTION_PATH, &[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await?;

        parsed
            .list
            .first()
            .map(|sample| sample.components.pm2_5)
            .ok_or(FetchError::Malformed("list[0]"))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoPlace {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwComponents {
    pm2_5: f64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionSample {
    components: OwComponents,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    #[serde(default)]
    list: Vec<OwPollutionSample>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &CityQuery) -> Option<WeatherSnapshot> {
        first_success(city, "current weather", move |q| self.fetch_current(q)).await
    }

    async fn forecast(&self, city: &CityQuery) -> Option<Vec<ForecastEntry>> {
        first_success(city, "forecast", move |q| self.fetch_forecast(q)).await
    }

    async fn pm25(&self, city: &CityQuery) -> Option<f64> {
        first_success(city, "air quality", move |q| self.fetch_pm25(q)).await
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, FetchError> {
    DateTime::from_timestamp(ts, 0).ok_or(FetchError::Malformed("valid timestamp"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
