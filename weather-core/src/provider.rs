use crate::{
    WeatherError,
    model::{CurrentConditions, DailyForecastEntry, HourlyForecastEntry, Location},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Source of geocoding and forecast data.
///
/// Every method is a single, stateless request/response round trip.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a place name to its best match.
    async fn geocode(&self, city_name: &str) -> Result<Location, WeatherError>;

    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError>;

    /// Daily entries ordered by date, `days` of them when the upstream honours the request.
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError>;

    /// Hourly entries ordered by time. May return more than `hours`; callers truncate.
    async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        hours: u16,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherError>;
}
