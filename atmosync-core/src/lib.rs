//! Core library for the `atmosync` dashboard.
//!
//! This crate defines:
//! - The canonical weather/air-quality record and its normalizer
//! - Condition and pollutant classifiers feeding the presentation layer
//! - The WeatherAPI.com source and the fetch orchestrator
//! - Configuration & credentials handling
//!
//! It is used by `atmosync-cli`, but any other front end can consume the same surface.

pub mod classify;
pub mod config;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod provider;

pub use classify::{
    AqiReading, AqiTier, MoodKey, Pollutant, PollutantReading, SafetyTier, SoundKey, aqi_reading,
    aqi_tier, classify_mood, classify_sound, has_chart_data, pollutant_series, pollutant_tier,
};
pub use config::Config;
pub use fetch::Orchestrator;
pub use model::{AirQuality, NormalizedWeatherRecord};
pub use normalize::{MalformedPayload, normalize};
pub use provider::{FailureReason, FetchError, WeatherSource};
