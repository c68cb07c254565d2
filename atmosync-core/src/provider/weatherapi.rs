use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::normalize::MalformedPayload;

use super::{FetchError, WeatherSource};

pub const DEFAULT_ENDPOINT: &str = "http://api.weatherapi.com/v1";

/// WeatherAPI.com error code for "No matching location found."
const NO_MATCHING_LOCATION: u32 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key, endpoint: DEFAULT_ENDPOINT.to_string(), http: Client::new() }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.endpoint.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    code: u32,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorDetail,
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn fetch_raw(&self, city: &str) -> Result<Value, FetchError> {
        let url = self.current_url();
        debug!(city, url = %url, "requesting current weather with air quality");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "yes")])
            .send()
            .await
            .map_err(FetchError::network)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::network)?;

        decode_response(city, status, &body)
    }
}

/// Map a provider response onto a raw payload or a reason-coded failure.
fn decode_response(city: &str, status: StatusCode, body: &str) -> Result<Value, FetchError> {
    if status.is_success() {
        return serde_json::from_str(body)
            .map_err(|e| FetchError::Malformed(MalformedPayload::Shape(e)));
    }

    let unknown_location = status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST
            && serde_json::from_str::<WaErrorResponse>(body)
                .is_ok_and(|e| e.error.code == NO_MATCHING_LOCATION));

    if unknown_location {
        return Err(FetchError::NotFound { city: city.to_string() });
    }

    Err(FetchError::Upstream { status: status.as_u16(), body: truncate_body(body) })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
