use crate::{Config, normalize::MalformedPayload, provider::weatherapi::WeatherApiClient};
use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

pub mod weatherapi;

/// Shown to the user for every kind of lookup failure.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "City not found or error fetching data. Please check the spelling or try another city.";

/// Reason code attached to a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    Network,
    NotFound,
    Upstream,
    Malformed,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Network => "network",
            FailureReason::NotFound => "not-found",
            FailureReason::Upstream => "upstream",
            FailureReason::Malformed => "malformed",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no city given")]
    EmptyCity,

    #[error("request to weather provider failed: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("no matching location for '{city}'")]
    NotFound { city: String },

    #[error("weather provider returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error(transparent)]
    Malformed(#[from] MalformedPayload),
}

impl FetchError {
    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        FetchError::Network(Box::new(err))
    }

    pub fn reason(&self) -> FailureReason {
        match self {
            FetchError::Network(_) => FailureReason::Network,
            FetchError::EmptyCity | FetchError::NotFound { .. } => FailureReason::NotFound,
            FetchError::Upstream { .. } => FailureReason::Upstream,
            FetchError::Malformed(_) => FailureReason::Malformed,
        }
    }

    /// Same text regardless of reason.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

/// A source of raw current-weather payloads (with air quality) for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_raw(&self, city: &str) -> Result<Value, FetchError>;
}

/// Construct the WeatherAPI.com source from config, resolving the API key.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    client_from_config(config, config.resolve_api_key()?)
}

fn client_from_config(config: &Config, api_key: String) -> anyhow::Result<Box<dyn WeatherSource>> {
    let mut client = WeatherApiClient::new(api_key).with_endpoint(config.endpoint());
    if let Some(secs) = config.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs))?;
    }

    Ok(Box::new(client))
}
