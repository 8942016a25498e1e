//! Session state: the currently selected location and the views built on it.

use tracing::{info, instrument};

use crate::{
    Config, WeatherError,
    model::Location,
    provider::WeatherProvider,
    report::{self, Report},
};

/// Holds at most one active [`Location`] and renders reports for it.
#[derive(Debug)]
pub struct Station<P> {
    provider: P,
    location: Option<Location>,
    forecast_days: u8,
    forecast_hours: u16,
}

impl<P: WeatherProvider> Station<P> {
    /// A session with no location, a 7-day forecast and a 24-hour timeline.
    pub fn new(provider: P) -> Self {
        let defaults = Config::default();
        Self::with_config(provider, &defaults)
    }

    pub fn with_config(provider: P, config: &Config) -> Self {
        Self {
            provider,
            location: None,
            forecast_days: config.forecast_days,
            forecast_hours: config.forecast_hours,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Geocode `city_name` and make it the active location.
    ///
    /// On any error the previously active location is kept.
    #[instrument(skip(self))]
    pub async fn set_location(&mut self, city_name: &str) -> Result<&Location, WeatherError> {
        let city_name = city_name.trim();
        if city_name.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        let found = self.provider.geocode(city_name).await?;
        info!(location = %found, "location set");

        Ok(&*self.location.insert(found))
    }

    pub async fn render_current(&self) -> Result<Report, WeatherError> {
        let location = self.require_location()?;
        let now = self
            .provider
            .fetch_current(location.latitude, location.longitude)
            .await?;

        Ok(report::current(location, &now))
    }

    pub async fn render_weekly(&self) -> Result<Report, WeatherError> {
        let location = self.require_location()?;
        let days = self
            .provider
            .fetch_daily(location.latitude, location.longitude, self.forecast_days)
            .await?;

        Ok(report::weekly(location, &days))
    }

    pub async fn render_hourly(&self) -> Result<Report, WeatherError> {
        let location = self.require_location()?;
        let hours = self
            .provider
            .fetch_hourly(location.latitude, location.longitude, self.forecast_hours)
            .await?;

        Ok(report::hourly(location, &hours, usize::from(self.forecast_hours)))
    }

    /// Current conditions for two cities side by side. Does not touch the active location.
    ///
    /// Requests run strictly one after another: both lookups, then both fetches.
    #[instrument(skip(self))]
    pub async fn render_comparison(
        &self,
        city_a: &str,
        city_b: &str,
    ) -> Result<Report, WeatherError> {
        let first = self.lookup(city_a).await?;
        let second = self.lookup(city_b).await?;

        let first_now = self
            .provider
            .fetch_current(first.latitude, first.longitude)
            .await?;
        let second_now = self
            .provider
            .fetch_current(second.latitude, second.longitude)
            .await?;

        Ok(report::comparison((&first, &first_now), (&second, &second_now)))
    }

    async fn lookup(&self, city_name: &str) -> Result<Location, WeatherError> {
        let city_name = city_name.trim();
        if city_name.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }
        self.provider.geocode(city_name).await
    }

    fn require_location(&self) -> Result<&Location, WeatherError> {
        self.location.as_ref().ok_or(WeatherError::NoLocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, DailyForecastEntry, HourlyForecastEntry};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory provider that records every call in order.
    #[derive(Debug, Default)]
    struct FakeProvider {
        places: HashMap<String, Location>,
        current: HashMap<String, CurrentConditions>,
        daily: Vec<DailyForecastEntry>,
        hourly: Vec<HourlyForecastEntry>,
        fail_network: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn with_place(mut self, name: &str, lat: f64, lon: f64) -> Self {
            let location = Location { name: name.to_string(), latitude: lat, longitude: lon };
            self.places.insert(name.to_string(), location);
            self
        }

        fn with_current(mut self, name: &str, temperature_c: f64) -> Self {
            let now = CurrentConditions {
                temperature_c: Some(temperature_c),
                humidity_pct: Some(50.0),
                wind_speed_kmh: Some(10.0),
                ..CurrentConditions::default()
            };
            self.current.insert(name.to_string(), now);
            self
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn name_at(&self, latitude: f64, longitude: f64) -> Option<&str> {
            self.places
                .values()
                .find(|p| p.latitude == latitude && p.longitude == longitude)
                .map(|p| p.name.as_str())
        }

        fn check_network(&self) -> Result<(), WeatherError> {
            if self.fail_network {
                Err(WeatherError::Network("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn geocode(&self, city_name: &str) -> Result<Location, WeatherError> {
            self.record(format!("geocode:{city_name}"));
            self.check_network()?;
            self.places
                .get(city_name)
                .cloned()
                .ok_or_else(|| WeatherError::NotFound(city_name.to_string()))
        }

        async fn fetch_current(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<CurrentConditions, WeatherError> {
            let name = self.name_at(latitude, longitude).unwrap_or("?").to_string();
            self.record(format!("current:{name}"));
            self.check_network()?;
            Ok(self.current.get(&name).cloned().unwrap_or_default())
        }

        async fn fetch_daily(
            &self,
            _latitude: f64,
            _longitude: f64,
            days: u8,
        ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
            self.record(format!("daily:{days}"));
            self.check_network()?;
            Ok(self.daily.clone())
        }

        async fn fetch_hourly(
            &self,
            _latitude: f64,
            _longitude: f64,
            hours: u16,
        ) -> Result<Vec<HourlyForecastEntry>, WeatherError> {
            self.record(format!("hourly:{hours}"));
            self.check_network()?;
            Ok(self.hourly.clone())
        }
    }

    fn daily_entries(count: usize) -> Vec<DailyForecastEntry> {
        (0..count)
            .map(|i| DailyForecastEntry {
                date: format!("2025-06-{:02}", i + 1),
                temp_max_c: Some(25.0),
                temp_min_c: Some(15.0),
                precipitation_mm: Some(0.0),
                wind_max_kmh: Some(12.0),
                weather_code: Some(1),
            })
            .collect()
    }

    fn hourly_entries(count: usize) -> Vec<HourlyForecastEntry> {
        (0..count)
            .map(|i| HourlyForecastEntry {
                time: format!("2025-06-{:02}T{:02}:00", 1 + i / 24, i % 24),
                temperature_c: Some(20.0),
                humidity_pct: Some(40.0),
                weather_code: Some(0),
            })
            .collect()
    }

    #[tokio::test]
    async fn set_location_stores_resolved_place() {
        let provider = FakeProvider::default().with_place("Paris", 48.85, 2.35);
        let mut station = Station::new(provider);

        let location = station.set_location("  Paris ").await.unwrap();
        assert_eq!(location.name, "Paris");
        assert_eq!(station.location().map(|l| l.latitude), Some(48.85));
    }

    #[tokio::test]
    async fn failed_lookup_keeps_previous_location() {
        let provider = FakeProvider::default().with_place("Paris", 48.85, 2.35);
        let mut station = Station::new(provider);
        station.set_location("Paris").await.unwrap();

        let err = station.set_location("Nowhereville").await.unwrap_err();

        assert_eq!(err, WeatherError::NotFound("Nowhereville".into()));
        assert_eq!(station.location().map(|l| l.name.as_str()), Some("Paris"));
    }

    #[tokio::test]
    async fn network_failure_keeps_previous_location() {
        let provider = FakeProvider::default().with_place("Paris", 48.85, 2.35);
        let mut station = Station::new(provider);
        station.set_location("Paris").await.unwrap();
        station.provider.fail_network = true;

        let err = station.set_location("Paris").await.unwrap_err();

        assert!(matches!(err, WeatherError::Network(_)));
        assert!(station.location().is_some());
    }

    #[tokio::test]
    async fn blank_city_is_rejected_without_a_request() {
        let mut station = Station::new(FakeProvider::default());

        let err = station.set_location("   ").await.unwrap_err();

        assert_eq!(err, WeatherError::EmptyQuery);
        assert!(station.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn zero_coordinates_are_a_valid_location() {
        let provider = FakeProvider::default()
            .with_place("Null Island", 0.0, 0.0)
            .with_current("Null Island", 27.0);
        let mut station = Station::new(provider);

        station.set_location("Null Island").await.unwrap();
        let report = station.render_current().await.unwrap();

        assert!(report.blocks().iter().any(|l| l == "Temperature: 27°C"));
    }

    #[tokio::test]
    async fn views_require_a_location() {
        let station = Station::new(FakeProvider::default());

        assert_eq!(station.render_current().await.unwrap_err(), WeatherError::NoLocation);
        assert_eq!(station.render_weekly().await.unwrap_err(), WeatherError::NoLocation);
        assert_eq!(station.render_hourly().await.unwrap_err(), WeatherError::NoLocation);
        assert!(station.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn weekly_renders_one_block_per_day_in_order() {
        let provider = FakeProvider {
            daily: daily_entries(7),
            ..FakeProvider::default()
        }
        .with_place("Rome", 41.9, 12.5);
        let mut station = Station::new(provider);
        station.set_location("Rome").await.unwrap();

        let report = station.render_weekly().await.unwrap();

        assert_eq!(report.blocks().len(), 7);
        for (i, block) in report.blocks().iter().enumerate() {
            assert!(block.starts_with(&format!("2025-06-{:02}:", i + 1)));
            assert!(block.contains("Mainly clear"));
        }
        assert_eq!(station.provider.calls(), ["geocode:Rome", "daily:7"]);
    }

    #[tokio::test]
    async fn hourly_renders_only_first_24_entries() {
        let provider = FakeProvider {
            hourly: hourly_entries(30),
            ..FakeProvider::default()
        }
        .with_place("Oslo", 59.91, 10.75);
        let mut station = Station::new(provider);
        station.set_location("Oslo").await.unwrap();

        let report = station.render_hourly().await.unwrap();

        assert_eq!(report.blocks().len(), 24);
        assert!(report.blocks()[0].starts_with("00:00: "));
        assert!(report.blocks()[23].starts_with("23:00: "));
        assert_eq!(station.provider.calls().last().map(String::as_str), Some("hourly:24"));
    }

    #[tokio::test]
    async fn configured_ranges_are_passed_to_the_provider() {
        let config = Config { forecast_days: 3, forecast_hours: 6, ..Config::default() };
        let provider = FakeProvider {
            hourly: hourly_entries(10),
            ..FakeProvider::default()
        }
        .with_place("Oslo", 59.91, 10.75);
        let mut station = Station::with_config(provider, &config);
        station.set_location("Oslo").await.unwrap();

        station.render_weekly().await.unwrap();
        let hourly = station.render_hourly().await.unwrap();

        assert_eq!(hourly.blocks().len(), 6);
        assert_eq!(station.provider.calls(), ["geocode:Oslo", "daily:3", "hourly:6"]);
    }

    #[tokio::test]
    async fn network_error_surfaces_from_render() {
        let provider = FakeProvider::default().with_place("Oslo", 59.91, 10.75);
        let mut station = Station::new(provider);
        station.set_location("Oslo").await.unwrap();
        station.provider.fail_network = true;

        let err = station.render_current().await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
    }

    #[tokio::test]
    async fn comparison_columns_follow_argument_order() {
        let provider = FakeProvider::default()
            .with_place("CityA", 10.0, 20.0)
            .with_place("CityB", -10.0, -20.0)
            .with_current("CityA", 5.0)
            .with_current("CityB", 30.0);
        let station = Station::new(provider);

        let report = station.render_comparison("CityA", "CityB").await.unwrap();
        let rows = report.blocks();

        let (left, right) = rows[0].split_once(" | ").unwrap();
        assert_eq!(left.trim(), "CityA");
        assert_eq!(right.trim(), "CityB");
        assert!(rows[2].contains("5°C") && rows[2].ends_with("30°C"));
        assert_eq!(
            station.provider.calls(),
            ["geocode:CityA", "geocode:CityB", "current:CityA", "current:CityB"]
        );
        assert!(station.location().is_none());
    }

    #[tokio::test]
    async fn comparison_reports_which_city_was_not_found() {
        let provider = FakeProvider::default()
            .with_place("CityA", 10.0, 20.0)
            .with_current("CityA", 5.0);
        let station = Station::new(provider);

        let err = station.render_comparison("CityA", "Atlantis").await.unwrap_err();
        assert_eq!(err, WeatherError::NotFound("Atlantis".into()));

        let err = station.render_comparison("Atlantis", "CityA").await.unwrap_err();
        assert_eq!(err, WeatherError::NotFound("Atlantis".into()));
        assert!(!station.provider.calls().iter().any(|c| c.starts_with("current:")));
    }
}
