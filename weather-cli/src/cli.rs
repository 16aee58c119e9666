use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use weather_core::{
    App, Config, GeolocationMode,
    config::{DEFAULT_BASE_URL, ENV_API_KEY},
};

use crate::screen;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the weather screen (default).
    Run,

    /// Store the API key, base URL and geolocation mode.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let config = Config::load()?;
                let app = App::from_config(&config)?;
                screen::run(app).await
            }
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_default(config.api.api_key.as_deref().unwrap_or_default())
        .with_help_message(&format!("Can also be supplied through {ENV_API_KEY}"))
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let base_url = Text::new("API base URL:")
        .with_default(config.api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
        .prompt()
        .context("Failed to read base URL")?;
    config.api.base_url = Some(base_url.trim().to_string());

    let mode = Select::new("Device location source:", GeolocationMode::all().to_vec())
        .prompt()
        .context("Failed to read geolocation mode")?;
    config.geolocation.mode = mode;

    if mode == GeolocationMode::Fixed {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a decimal number")
            .prompt()
            .context("Failed to read latitude")?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a decimal number")
            .prompt()
            .context("Failed to read longitude")?;
        config.geolocation.latitude = Some(lat);
        config.geolocation.longitude = Some(lon);
    }

    // Fail early on a bad base URL or missing key.
    config.endpoint()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
