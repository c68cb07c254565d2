use anyhow::{Context, bail};
use atmosync_core::{Config, Orchestrator};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::render::Dashboard;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "atmosync", version, about = "Current weather and air quality for a city")]
pub struct Cli {
    /// Without a subcommand, prompts for a city and shows its dashboard.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key.
    Configure,

    /// Show the dashboard for a city.
    Show {
        /// City name, e.g. "London" or "New York".
        city: String,

        /// Print the record and its classifications as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(config),
            Some(Command::Show { city, json }) => show(&config, &city, json).await,
            None => {
                let city = Text::new("Enter city name")
                    .with_placeholder("e.g., Wolverhampton, New York, London")
                    .prompt()
                    .context("Failed to read city name")?;
                show(&config, &city, false).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, city: &str, json: bool) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config)?;

    let record = match orchestrator.fetch(city).await {
        Ok(record) => record,
        // The reason code is already logged; the user sees one message for all failures.
        Err(err) => bail!("{}", err.user_message()),
    };

    let dashboard = Dashboard::new(&record);
    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{dashboard}");
    }

    Ok(())
}
