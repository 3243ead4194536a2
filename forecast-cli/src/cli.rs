use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use forecast_core::{Config, Coordinates, Forecast, provider};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast CLI")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for the forecast service.
    Configure {
        /// API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Fetch and show the forecast for a location.
    #[command(allow_negative_numbers = true)]
    Show {
        latitude: f64,
        longitude: f64,

        /// Print the decoded document re-encoded as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Decode a saved forecast response without going to the network.
    Decode {
        file: PathBuf,

        /// Print the decoded document re-encoded as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { latitude, longitude, json } => {
                let coordinates = Coordinates::new(latitude, longitude)?;
                let config = Config::load()?;
                let provider = provider::provider_from_config(&config)?;

                let forecast = provider
                    .get_forecast(coordinates)
                    .await
                    .with_context(|| format!("Failed to fetch forecast for {coordinates}"))?;

                print_forecast(&forecast, json)
            }
            Command::Decode { file, json } => {
                let bytes = std::fs::read(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let forecast = Forecast::from_slice(&bytes)
                    .with_context(|| format!("Failed to decode {}", file.display()))?;

                print_forecast(&forecast, json)
            }
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("API key:")
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    let path = config.save()?;
    tracing::info!(path = %path.display(), "saved configuration");
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn print_forecast(forecast: &Forecast, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", forecast.to_json_pretty()?);
    } else {
        println!("{}", render::outline(forecast));
    }
    Ok(())
}
