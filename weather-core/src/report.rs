//! Plain-text rendering of fetched weather data.
//!
//! Every function here is pure: it takes already-fetched data and returns a
//! [`Report`]. Missing values render as `N/A`.

use chrono::{DateTime, NaiveDateTime};
use std::fmt;

use crate::{
    model::{CurrentConditions, DailyForecastEntry, HourlyForecastEntry, Location},
    weather_code,
};

pub const PLACEHOLDER: &str = "N/A";

const COLUMN_WIDTH: usize = 25;

/// A titled sequence of text blocks, rendered via [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    title: String,
    blocks: Vec<String>,
    /// Separate blocks with a blank line.
    spaced: bool,
}

impl Report {
    fn new(title: impl Into<String>, blocks: Vec<String>, spaced: bool) -> Self {
        Self { title: title.into(), blocks, spaced }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--- {} ---", self.title)?;
        for block in &self.blocks {
            if self.spaced {
                writeln!(f)?;
            }
            write!(f, "\n{block}")?;
        }
        Ok(())
    }
}

pub fn current(location: &Location, conditions: &CurrentConditions) -> Report {
    let mut lines = vec![
        format!("Time: {}", conditions.time.as_deref().unwrap_or(PLACEHOLDER)),
        format!("Temperature: {}°C", value(conditions.temperature_c)),
        format!("Humidity: {}%", value(conditions.humidity_pct)),
        format!("Wind Speed: {} km/h", value(conditions.wind_speed_kmh)),
        format!("Wind Direction: {}°", value(conditions.wind_direction_deg)),
    ];

    if let Some(code) = conditions.weather_code {
        lines.push(format!("Conditions: {}", weather_code::describe(code)));
    }

    Report::new(format!("Current Weather in {}", location.name), lines, false)
}

/// One block per day, in the order given.
pub fn weekly(location: &Location, days: &[DailyForecastEntry]) -> Report {
    let blocks = days
        .iter()
        .map(|day| {
            [
                format!("{}:", day.date),
                format!("  High: {}°C", value(day.temp_max_c)),
                format!("  Low: {}°C", value(day.temp_min_c)),
                format!("  Precipitation: {}mm", value(day.precipitation_mm)),
                format!("  Max Wind: {}km/h", value(day.wind_max_kmh)),
                format!("  Conditions: {}", conditions(day.weather_code)),
            ]
            .join("\n")
        })
        .collect();

    Report::new(
        format!("{}-Day Forecast for {}", days.len(), location.name),
        blocks,
        true,
    )
}

/// One line per hour, keeping only the first `limit` entries.
pub fn hourly(location: &Location, hours: &[HourlyForecastEntry], limit: usize) -> Report {
    let lines: Vec<String> = hours
        .iter()
        .take(limit)
        .map(|hour| {
            format!(
                "{}: {}°C, Humidity: {}%",
                clock_time(&hour.time),
                value(hour.temperature_c),
                value(hour.humidity_pct),
            )
        })
        .collect();

    Report::new(
        format!("{}-Hour Timeline for {}", lines.len(), location.name),
        lines,
        false,
    )
}

/// Side-by-side table; `left` is the first column.
pub fn comparison(
    left: (&Location, &CurrentConditions),
    right: (&Location, &CurrentConditions),
) -> Report {
    let (left_loc, left_now) = left;
    let (right_loc, right_now) = right;
    let w = COLUMN_WIDTH;

    let rows = vec![
        format!("{:^w$} | {:^w$}", left_loc.name, right_loc.name),
        "-".repeat(2 * w + 3),
        format!(
            "Temperature: {:>8}°C      | {:>8}°C",
            value(left_now.temperature_c),
            value(right_now.temperature_c),
        ),
        format!(
            "Humidity:    {:>8}%       | {:>8}%",
            value(left_now.humidity_pct),
            value(right_now.humidity_pct),
        ),
        format!(
            "Wind Speed:  {:>8}km/h    | {:>8}km/h",
            value(left_now.wind_speed_kmh),
            value(right_now.wind_speed_kmh),
        ),
    ];

    Report::new("City Weather Comparison", rows, false)
}

/// `HH:MM` from an ISO-8601 timestamp; anything unparseable is shown as-is.
pub fn clock_time(timestamp: &str) -> String {
    let naive = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(timestamp)
                .ok()
                .map(|dt| dt.naive_local())
        });

    match naive {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

fn value(v: Option<f64>) -> String {
    v.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

fn conditions(code: Option<i32>) -> String {
    code.map_or_else(|| PLACEHOLDER.to_string(), weather_code::describe)
}
