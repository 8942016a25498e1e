use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved place: the name the geocoder returned plus its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}, {:.2})", self.name, self.latitude, self.longitude)
    }
}

/// Conditions at the current instant. Fields the upstream omitted are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub time: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub weather_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    /// Local calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub temp_max_c: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_max_kmh: Option<f64>,
    pub weather_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    /// Local ISO-8601 timestamp, e.g. `2025-03-01T14:00`.
    pub time: String,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub weather_code: Option<i32>,
}
