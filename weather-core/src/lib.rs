//! Core library for the `weather-station` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The Open-Meteo geocoding/forecast client behind the [`WeatherProvider`] trait
//! - Weather code descriptions and plain-text report formatting
//! - The [`Station`] session that ties a selected location to those reports
//!
//! It is used by `weather-station`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;
pub mod station;
pub mod weather_code;

pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentConditions, DailyForecastEntry, HourlyForecastEntry, Location};
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use report::Report;
pub use station::Station;
