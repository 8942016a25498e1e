use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use weather_core::{Config, OpenMeteoProvider, Station, config};

use crate::menu;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-station",
    version,
    about = "Personal weather station powered by Open-Meteo"
)]
pub struct Cli {
    /// Defaults to the interactive menu.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive menu.
    Menu,

    /// Show current conditions for a city.
    Current {
        /// City or place name.
        city: String,
    },

    /// Show the multi-day forecast for a city.
    Weekly { city: String },

    /// Show the hourly timeline for a city.
    Hourly { city: String },

    /// Compare current conditions of two cities side by side.
    Compare { first: String, second: String },

    /// Interactively edit and save settings.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Menu);

        match command {
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                return Ok(());
            }
            Command::Configure => return configure(),
            _ => {}
        }

        let config = Config::load()?;
        let provider = OpenMeteoProvider::new(&config)?;
        let mut station = Station::with_config(provider, &config);

        match command {
            Command::Current { city } => {
                station.set_location(&city).await?;
                println!("{}", station.render_current().await?);
            }
            Command::Weekly { city } => {
                station.set_location(&city).await?;
                println!("{}", station.render_weekly().await?);
            }
            Command::Hourly { city } => {
                station.set_location(&city).await?;
                println!("{}", station.render_hourly().await?);
            }
            Command::Compare { first, second } => {
                println!("{}", station.render_comparison(&first, &second).await?);
            }
            Command::Menu | Command::Configure | Command::ConfigPath => {
                menu::run(&mut station).await?;
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    cfg.language = Text::new("Language for place names:")
        .with_default(&cfg.language)
        .prompt()
        .context("Configuration aborted")?;

    cfg.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(cfg.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Configuration aborted")?;

    cfg.forecast_days = CustomType::<u8>::new("Forecast days:")
        .with_default(cfg.forecast_days)
        .with_help_message(&format!("1 to {}", config::MAX_FORECAST_DAYS))
        .prompt()
        .context("Configuration aborted")?;

    cfg.forecast_hours = CustomType::<u16>::new("Hourly timeline length (hours):")
        .with_default(cfg.forecast_hours)
        .with_help_message(&format!("1 to {}", config::MAX_FORECAST_HOURS))
        .prompt()
        .context("Configuration aborted")?;

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
