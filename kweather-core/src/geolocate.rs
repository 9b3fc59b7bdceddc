//! Best-guess city from the caller's public IP address.
//! Uses ipinfo.io - no API key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::Config;

/// Source of an automatically detected city name.
#[async_trait]
pub trait CityLocator: Send + Sync + Debug {
    /// Returns `None` on any failure; the caller should ask for manual input.
    async fn detect_city(&self) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { url: url.into(), http })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(config.settings.geolocation_url.clone(), config.timeout())
    }
}

#[async_trait]
impl CityLocator for IpGeolocator {
    async fn detect_city(&self) -> Option<String> {
        let response = match self.http.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("IP geolocation request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("IP geolocation returned status {}", response.status());
            return None;
        }

        let body: IpInfoResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("IP geolocation parse error: {}", e);
                return None;
            }
        };

        let city = body.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())?;

        tracing::info!("Auto-detected city: {}", city);
        Some(city)
    }
}
