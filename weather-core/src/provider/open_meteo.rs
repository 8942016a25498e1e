use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    Config, WeatherError,
    model::{CurrentConditions, DailyForecastEntry, HourlyForecastEntry, Location},
};

use super::WeatherProvider;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m,wind_direction_10m";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,weather_code,precipitation_sum,wind_speed_10m_max";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code";

const USER_AGENT: &str = concat!("weather-station/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo geocoding + forecast client. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
    language: String,
}

impl OpenMeteoProvider {
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            language: config.language.clone(),
        })
    }

    /// Send a GET with `query` and decode the JSON body.
    ///
    /// Transport failures and non-2xx statuses become [`WeatherError::Network`];
    /// a 2xx body that does not decode becomes [`WeatherError::InvalidResponse`].
    async fn get_json<T, Q>(&self, url: &str, query: &Q) -> Result<T, WeatherError>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync,
    {
        debug!(url, "sending request");

        let res = self.http.get(url).query(query).send().await.map_err(|err| {
            warn!(url, error = %err, "request failed");
            WeatherError::from(err)
        })?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(url, %status, "request returned non-success status");
            return Err(WeatherError::Network(format!(
                "{url} returned status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|err| WeatherError::InvalidResponse(format!("{url}: {err}")))
    }

    async fn get_forecast<T: DeserializeOwned>(
        &self,
        query: &ForecastQuery<'_>,
    ) -> Result<T, WeatherError> {
        self.get_json(&self.forecast_url, query).await
    }
}

#[derive(Debug, Serialize)]
struct GeocodeQuery<'a> {
    name: &'a str,
    count: u8,
    language: &'a str,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    timezone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    daily: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hourly: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast_days: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast_hours: Option<u16>,
}

impl ForecastQuery<'_> {
    fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timezone: "auto",
            current: None,
            daily: None,
            hourly: None,
            forecast_days: None,
            forecast_hours: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: Option<String>,
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    weather_code: Option<i32>,
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
}

impl From<CurrentBlock> for CurrentConditions {
    fn from(block: CurrentBlock) -> Self {
        Self {
            time: block.time,
            temperature_c: block.temperature_2m,
            humidity_pct: block.relative_humidity_2m,
            wind_speed_kmh: block.wind_speed_10m,
            wind_direction_deg: block.wind_direction_10m,
            weather_code: block.weather_code,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: Option<DailyBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
    precipitation_sum: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
}

impl DailyBlock {
    /// Zip the parallel arrays into entries; `time` decides the length.
    fn into_entries(self) -> Vec<DailyForecastEntry> {
        let len = self.time.len();
        if [
            self.temperature_2m_max.len(),
            self.temperature_2m_min.len(),
            self.weather_code.len(),
            self.precipitation_sum.len(),
            self.wind_speed_10m_max.len(),
        ]
        .iter()
        .any(|&n| n != len)
        {
            warn!(len, "daily arrays are not aligned with daily.time");
        }

        self.time
            .into_iter()
            .enumerate()
            .map(|(i, date)| DailyForecastEntry {
                date,
                temp_max_c: cell(&self.temperature_2m_max, i),
                temp_min_c: cell(&self.temperature_2m_min, i),
                precipitation_mm: cell(&self.precipitation_sum, i),
                wind_max_kmh: cell(&self.wind_speed_10m_max, i),
                weather_code: cell(&self.weather_code, i),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

impl HourlyBlock {
    fn into_entries(self) -> Vec<HourlyForecastEntry> {
        self.time
            .into_iter()
            .enumerate()
            .map(|(i, time)| HourlyForecastEntry {
                time,
                temperature_c: cell(&self.temperature_2m, i),
                humidity_pct: cell(&self.relative_humidity_2m, i),
                weather_code: cell(&self.weather_code, i),
            })
            .collect()
    }
}

fn cell<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

fn missing_block(name: &str) -> WeatherError {
    WeatherError::InvalidResponse(format!("forecast payload has no '{name}' block"))
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    #[instrument(skip(self), level = "debug")]
    async fn geocode(&self, city_name: &str) -> Result<Location, WeatherError> {
        let query = GeocodeQuery {
            name: city_name,
            count: 1,
            language: &self.language,
            format: "json",
        };

        let parsed: GeocodeResponse = self.get_json(&self.geocoding_url, &query).await?;

        let first = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(city_name.to_string()))?;

        debug!(
            name = %first.name,
            latitude = first.latitude,
            longitude = first.longitude,
            "geocoded"
        );

        Ok(Location {
            name: first.name,
            latitude: first.latitude,
            longitude: first.longitude,
        })
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        let query = ForecastQuery {
            current: Some(CURRENT_FIELDS),
            ..ForecastQuery::at(latitude, longitude)
        };

        let parsed: CurrentResponse = self.get_forecast(&query).await?;
        let block = parsed.current.ok_or_else(|| missing_block("current"))?;

        Ok(block.into())
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
    ) -> Result<Vec<DailyForecastEntry>, WeatherError> {
        let query = ForecastQuery {
            daily: Some(DAILY_FIELDS),
            forecast_days: Some(days),
            ..ForecastQuery::at(latitude, longitude)
        };

        let parsed: DailyResponse = self.get_forecast(&query).await?;
        let block = parsed.daily.ok_or_else(|| missing_block("daily"))?;

        Ok(block.into_entries())
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        hours: u16,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherError> {
        let query = ForecastQuery {
            hourly: Some(HOURLY_FIELDS),
            forecast_hours: Some(hours),
            ..ForecastQuery::at(latitude, longitude)
        };

        let parsed: HourlyResponse = self.get_forecast(&query).await?;
        let block = parsed.hourly.ok_or_else(|| missing_block("hourly"))?;

        Ok(block.into_entries())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
