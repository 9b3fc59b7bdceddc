use crate::{
    Config, CityQuery,
    model::{ForecastEntry, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, future::Future};
use thiserror::Error;

pub mod openweather;

/// Which query string to send to the provider for a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStrategy {
    /// The canonical English name from the city table.
    Canonical,
    /// The text exactly as the user entered it (possibly Korean).
    RawInput,
}

impl QueryStrategy {
    /// Strategies are tried in this order, stopping at the first success.
    pub const ORDER: [QueryStrategy; 2] = [QueryStrategy::Canonical, QueryStrategy::RawInput];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStrategy::Canonical => "canonical",
            QueryStrategy::RawInput => "raw-input",
        }
    }

    pub fn query<'a>(&self, city: &'a CityQuery) -> &'a str {
        match self {
            QueryStrategy::Canonical => &city.canonical,
            QueryStrategy::RawInput => &city.input,
        }
    }
}

impl std::fmt::Display for QueryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query strings for `city` in strategy order. A raw input identical to the
/// canonical name is not sent twice.
pub fn query_candidates(city: &CityQuery) -> Vec<(QueryStrategy, &str)> {
    let mut out: Vec<(QueryStrategy, &str)> = Vec::with_capacity(QueryStrategy::ORDER.len());
    for strategy in QueryStrategy::ORDER {
        let q = strategy.query(city);
        if !q.is_empty() && out.iter().all(|(_, prev)| *prev != q) {
            out.push((strategy, q));
        }
    }
    out
}

/// Why a single provider request produced no usable data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing {0}")]
    Malformed(&'static str),
}

/// Run `attempt` for each query candidate in order and return the first success.
///
/// Failures are logged and swallowed; `None` means every strategy failed.
pub async fn first_success<T, F, Fut>(city: &CityQuery, what: &str, mut attempt: F) -> Option<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    for (strategy, q) in query_candidates(city) {
        match attempt(q.to_string()).await {
            Ok(value) => {
                tracing::debug!(%strategy, query = q, "{what}: ok");
                return Some(value);
            }
            Err(err) => {
                tracing::debug!(%strategy, query = q, error = %err, "{what}: attempt failed");
            }
        }
    }

    tracing::warn!(city = %city.canonical, input = %city.input, "{what}: no data");
    None
}

/// Source of weather data for a resolved city.
///
/// Every method returns `None` when the provider could not deliver usable
/// data after exhausting the query strategies; none of them fail harder.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &CityQuery) -> Option<WeatherSnapshot>;

    async fn forecast(&self, city: &CityQuery) -> Option<Vec<ForecastEntry>>;

    /// Latest PM2.5 concentration (µg/m³).
    async fn pm25(&self, city: &CityQuery) -> Option<f64>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::new(config)?;
    Ok(Box::new(provider))
}
