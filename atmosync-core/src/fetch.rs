//! One lookup per user action: fetch, normalize, and report a reason-coded result.

use tracing::{debug, warn};

use crate::{
    Config,
    model::NormalizedWeatherRecord,
    normalize::normalize,
    provider::{FetchError, WeatherSource, source_from_config},
};

#[derive(Debug)]
pub struct Orchestrator {
    source: Box<dyn WeatherSource>,
}

impl Orchestrator {
    pub fn new(source: Box<dyn WeatherSource>) -> Self {
        Self { source }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(source_from_config(config)?))
    }

    /// Fetch and normalize current weather for `city`.
    ///
    /// No retries and no caching. A blank city fails without a request.
    pub async fn fetch(&self, city: &str) -> Result<NormalizedWeatherRecord, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::EmptyCity);
        }

        let result = match self.source.fetch_raw(city).await {
            Ok(raw) => normalize(raw).map_err(FetchError::from),
            Err(err) => Err(err),
        };

        match &result {
            Ok(record) => debug!(
                city = %record.city,
                country = %record.country,
                air_quality = record.air_quality.is_some(),
                "normalized weather record"
            ),
            Err(err) => warn!(city, reason = %err.reason(), error = %err, "weather lookup failed"),
        }

        result
    }

    /// Every failure collapses to `None`.
    pub async fn fetch_or_absent(&self, city: &str) -> Option<NormalizedWeatherRecord> {
        self.fetch(city).await.ok()
    }
}
