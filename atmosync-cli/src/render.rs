//! Plain-text presentation of a normalized record.

use atmosync_core::{
    AqiReading, MoodKey, NormalizedWeatherRecord, PollutantReading, SoundKey, aqi_reading,
    classify_mood, classify_sound, has_chart_data, pollutant_series,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

const GAUGE_WIDTH: usize = 20;
const NOT_AVAILABLE: &str = "N/A";

/// Everything the dashboard shows, derived once from a record.
#[derive(Debug, Serialize)]
pub struct Dashboard<'a> {
    pub record: &'a NormalizedWeatherRecord,
    pub mood: MoodKey,
    pub quote: &'static str,
    pub sound: Option<SoundKey>,
    pub aqi: Option<AqiReading>,
    pub pollutants: Vec<PollutantReading>,
}

impl<'a> Dashboard<'a> {
    pub fn new(record: &'a NormalizedWeatherRecord) -> Self {
        let mood = classify_mood(&record.condition_text);
        let aq = record.air_quality.as_ref();

        Self {
            record,
            mood,
            quote: mood.quote(),
            sound: classify_sound(&record.condition_text),
            aqi: aq.map(aqi_reading),
            pollutants: aq.map(pollutant_series).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dashboard(out, self)
    }
}

fn write_dashboard(out: &mut fmt::Formatter<'_>, d: &Dashboard<'_>) -> fmt::Result {
    let r = d.record;

    writeln!(out, "📍 Weather in {}, {}", r.city, r.country)?;
    writeln!(out, "   {}°C  {}", r.temperature_c, r.condition_text)?;
    writeln!(out, "   Humidity     {}%", r.humidity_pct)?;
    writeln!(out, "   Wind speed   {} kph", r.wind_kph)?;
    writeln!(out, "   Cloud cover  {}%", r.cloud_pct)?;
    if let Some(at) = r.observed_at {
        writeln!(out, "   Updated      {}", format_observed(at))?;
    }

    if let (Some(aq), Some(reading)) = (&r.air_quality, d.aqi) {
        writeln!(out)?;
        match reading.index {
            Some(index) => {
                writeln!(out, "🌫️ Air quality: {} (AQI: {index}/6)", reading.tier.label())?
            }
            None => writeln!(out, "🌫️ Air quality: {}", reading.tier.label())?,
        }

        for (label, value) in [
            ("PM2.5", aq.pm2_5),
            ("PM10", aq.pm10),
            ("CO", aq.co_ug_m3()),
            ("NO₂", aq.no2),
            ("O₃", aq.o3),
            ("SO₂", aq.so2),
        ] {
            writeln!(out, "   {label:<6} {:>10} µg/m³", format_reading(value))?;
        }

        writeln!(out)?;
        writeln!(out, "📊 Pollutant analysis")?;
        if has_chart_data(&d.pollutants) {
            for reading in &d.pollutants {
                let value = if reading.value > 0.0 {
                    format!("{:.1}", reading.value)
                } else {
                    NOT_AVAILABLE.to_string()
                };
                writeln!(
                    out,
                    "   {:<6} {:>10}  {}",
                    reading.pollutant.label(),
                    value,
                    reading.tier.label()
                )?;
            }
        } else {
            writeln!(out, "   Air quality data not available for visualization")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "📈 Weather metrics")?;
    writeln!(out, "   Humidity     {}", gauge(r.humidity_pct, 100.0))?;
    writeln!(out, "   Wind speed   {}", gauge(r.wind_kph, 50.0))?;
    writeln!(out, "   Cloud cover  {}", gauge(r.cloud_pct, 100.0))?;

    writeln!(out)?;
    writeln!(out, "{}", d.quote)?;
    if let Some(sound) = d.sound {
        writeln!(out, "🔊 Ambient: {}", sound.asset())?;
    }

    Ok(())
}

fn format_observed(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn format_reading(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Text gauge clamped to `0..=max`.
fn gauge(value: f64, max: f64) -> String {
    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = (ratio * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}] {value}", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}
