//! Interactive menu loop.

use inquire::{InquireError, Select, Text};
use std::fmt;
use weather_core::{Report, Station, WeatherError, WeatherProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    SetLocation,
    CurrentWeather,
    WeeklyForecast,
    HourlyTimeline,
    CompareCities,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 6] = [
        MenuItem::SetLocation,
        MenuItem::CurrentWeather,
        MenuItem::WeeklyForecast,
        MenuItem::HourlyTimeline,
        MenuItem::CompareCities,
        MenuItem::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuItem::SetLocation => "Set Location",
            MenuItem::CurrentWeather => "Current Weather",
            MenuItem::WeeklyForecast => "Weekly Forecast",
            MenuItem::HourlyTimeline => "Hourly Timeline",
            MenuItem::CompareCities => "Compare Cities",
            MenuItem::Exit => "Exit",
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run the menu until the user exits. Weather failures are printed, never fatal.
pub async fn run<P: WeatherProvider>(station: &mut Station<P>) -> anyhow::Result<()> {
    println!("Welcome to Personal Weather Station!");
    println!("Powered by Open-Meteo API");

    loop {
        let title = match station.location() {
            Some(location) => format!("Select an option (location: {})", location.name),
            None => "Select an option".to_string(),
        };

        let choice = match Select::new(&title, MenuItem::ALL.to_vec()).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                MenuItem::Exit
            }
            Err(err) => return Err(err.into()),
        };

        match choice {
            MenuItem::SetLocation => {
                if let Some(city) = prompt_city("Enter city name:")? {
                    println!("Looking up coordinates for {city}...");
                    match station.set_location(&city).await {
                        Ok(location) => {
                            println!("Location set to: {}", location.name);
                            println!(
                                "Coordinates: {:.2}, {:.2}",
                                location.latitude, location.longitude
                            );
                        }
                        Err(err) => print_error(&err),
                    }
                }
            }
            MenuItem::CurrentWeather => show(station.render_current().await),
            MenuItem::WeeklyForecast => show(station.render_weekly().await),
            MenuItem::HourlyTimeline => show(station.render_hourly().await),
            MenuItem::CompareCities => {
                let Some(first) = prompt_city("Enter first city:")? else {
                    continue;
                };
                let Some(second) = prompt_city("Enter second city:")? else {
                    continue;
                };
                show(station.render_comparison(&first, &second).await);
            }
            MenuItem::Exit => {
                println!("Thank you for using Personal Weather Station!");
                return Ok(());
            }
        }
    }
}

/// `None` when the prompt is cancelled, so the caller can go back to the menu.
fn prompt_city(message: &str) -> anyhow::Result<Option<String>> {
    match Text::new(message).prompt() {
        Ok(city) => Ok(Some(city)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn show(result: Result<Report, WeatherError>) {
    match result {
        Ok(report) => println!("\n{report}"),
        Err(err) => print_error(&err),
    }
}

fn print_error(err: &WeatherError) {
    tracing::debug!(error = %err, "request failed");
    eprintln!("{}", err.user_message());
}
