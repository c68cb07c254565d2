//! Binary crate for the `atmosync` command-line dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and prompting for a city
//! - Interactive configuration
//! - Rendering weather and air-quality cards as text

use atmosync_core::Config;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level())))
        .init();

    tracing::debug!(endpoint = config.endpoint(), "configuration loaded");

    cmd.run(config).await
}
