//! Core library for the `kweather` dashboard.
//!
//! This crate defines:
//! - The table of supported Korean cities and input resolution
//! - The OpenWeather client with its ordered query fallback
//! - Per-day forecast aggregation and chart series
//! - Dashboard assembly, where each section may fail on its own
//!
//! It is used by `kweather-cli`, but can also back other front ends.

pub mod city;
pub mod config;
pub mod dashboard;
pub mod forecast;
pub mod geolocate;
pub mod model;
pub mod provider;
pub mod translate;

pub use city::{CityEntry, CityQuery, CityTable, Resolution};
pub use config::{Config, Settings};
pub use dashboard::{CitySource, Dashboard, DashboardOutcome, DashboardReport, SectionError};
pub use geolocate::{CityLocator, IpGeolocator};
pub use model::{DailyForecast, ForecastEntry, TemperaturePoint, WeatherSnapshot};
pub use provider::{QueryStrategy, WeatherProvider, openweather::OpenWeatherProvider};
