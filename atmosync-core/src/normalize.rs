//! Turns a raw WeatherAPI.com `current.json` payload into a [`NormalizedWeatherRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::model::{AirQuality, NormalizedWeatherRecord};

#[derive(Debug, Error)]
pub enum MalformedPayload {
    #[error("payload does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    text: String,
    icon: String,
}

/// Optional readings are read leniently: a value of the wrong type is absent,
/// never a shape error for the whole payload.
#[derive(Debug, Deserialize)]
struct RawAirQuality {
    #[serde(default, deserialize_with = "lenient_number")]
    co: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    no2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    o3: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    so2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pm2_5: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pm10: Option<f64>,
    #[serde(rename = "us-epa-index", default, deserialize_with = "lenient_index")]
    us_epa_index: Option<u8>,
    #[serde(rename = "gb-defra-index", default, deserialize_with = "lenient_index")]
    gb_defra_index: Option<u8>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64).filter(|v| v.is_finite()))
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_u64).and_then(|n| u8::try_from(n).ok()))
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    temp_c: f64,
    condition: RawCondition,
    humidity: f64,
    wind_kph: f64,
    cloud: f64,
    last_updated_epoch: Option<i64>,
    air_quality: Option<RawAirQuality>,
}

#[derive(Debug, Deserialize)]
struct RawWeatherPayload {
    location: RawLocation,
    current: RawCurrent,
}

/// Build a record from the provider JSON.
///
/// Temperature, humidity, wind and cloud are copied as-is. CO arrives in ppb and
/// gains a derived µg/m³ value; every other pollutant and both indices pass
/// through unchanged, with missing keys left absent.
pub fn normalize(raw: Value) -> Result<NormalizedWeatherRecord, MalformedPayload> {
    let raw: RawWeatherPayload = serde_json::from_value(raw)?;
    let current = raw.current;

    check_percent("humidity", current.humidity)?;
    check_percent("cloud", current.cloud)?;
    if current.wind_kph < 0.0 {
        return Err(MalformedPayload::OutOfRange { field: "wind_kph", value: current.wind_kph });
    }

    let observed_at = current.last_updated_epoch.and_then(unix_to_utc);
    let air_quality = current.air_quality.map(normalize_air_quality);

    Ok(NormalizedWeatherRecord {
        city: raw.location.name,
        country: raw.location.country,
        temperature_c: current.temp_c,
        condition_text: current.condition.text,
        condition_icon_ref: current.condition.icon,
        humidity_pct: current.humidity,
        wind_kph: current.wind_kph,
        cloud_pct: current.cloud,
        observed_at,
        air_quality,
    })
}

fn normalize_air_quality(raw: RawAirQuality) -> AirQuality {
    let mut aq = AirQuality::default().with_co_ppb(raw.co);
    aq.epa_index = raw.us_epa_index;
    aq.defra_index = raw.gb_defra_index;
    aq.no2 = raw.no2;
    aq.o3 = raw.o3;
    aq.so2 = raw.so2;
    aq.pm2_5 = raw.pm2_5;
    aq.pm10 = raw.pm10;
    aq
}

fn check_percent(field: &'static str, value: f64) -> Result<(), MalformedPayload> {
    if !(0.0..=100.0).contains(&value) {
        return Err(MalformedPayload::OutOfRange { field, value });
    }
    Ok(())
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london() -> Value {
        json!({
            "location": { "name": "London", "country": "UK" },
            "current": {
                "temp_c": 15.0,
                "condition": { "text": "Light rain", "icon": "//cdn.weatherapi.com/weather/64x64/day/296.png" },
                "humidity": 80,
                "wind_kph": 10.0,
                "cloud": 90,
                "last_updated_epoch": 1_700_000_000,
                "air_quality": { "co": 200.0, "us-epa-index": 2, "no2": 15.0 }
            }
        })
    }

    #[test]
    fn copies_scalars_and_converts_co() {
        let record = normalize(london()).expect("payload is well formed");

        assert_eq!(record.city, "London");
        assert_eq!(record.country, "UK");
        assert_eq!(record.temperature_c, 15.0);
        assert_eq!(record.condition_text, "Light rain");
        assert_eq!(record.humidity_pct, 80.0);
        assert_eq!(record.wind_kph, 10.0);
        assert_eq!(record.cloud_pct, 90.0);
        assert_eq!(record.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));

        let aq = record.air_quality.expect("air quality section present");
        assert_eq!(aq.co_ppb(), Some(200.0));
        assert_eq!(aq.co_ug_m3(), Some(229.0));
        assert_eq!(aq.epa_index, Some(2));
        assert_eq!(aq.no2, Some(15.0));
    }

    #[test]
    fn missing_pollutants_stay_absent() {
        let record = normalize(london()).unwrap();
        let aq = record.air_quality.unwrap();

        assert_eq!(aq.defra_index, None);
        assert_eq!(aq.o3, None);
        assert_eq!(aq.so2, None);
        assert_eq!(aq.pm2_5, None);
        assert_eq!(aq.pm10, None);
    }

    #[test]
    fn null_values_are_absent_not_zero() {
        let mut raw = london();
        raw["current"]["air_quality"] = json!({ "co": null, "pm2_5": 40.0, "so2": null });

        let aq = normalize(raw).unwrap().air_quality.unwrap();
        assert_eq!(aq.co_ppb(), None);
        assert_eq!(aq.co_ug_m3(), None);
        assert_eq!(aq.so2, None);
        assert_eq!(aq.pm2_5, Some(40.0));
    }

    #[test]
    fn wrongly_typed_readings_are_absent() {
        let mut raw = london();
        raw["current"]["air_quality"] = json!({ "co": 200.0, "pm2_5": "N/A", "us-epa-index": -1 });

        let record = normalize(raw).expect("optional readings never fail the record");
        assert_eq!(record.city, "London");

        let aq = record.air_quality.unwrap();
        assert_eq!(aq.pm2_5, None);
        assert_eq!(aq.epa_index, None);
        assert_eq!(aq.co_ug_m3(), Some(229.0));
        assert_eq!(crate::classify::aqi_reading(&aq).tier, crate::classify::AqiTier::Unknown);
    }

    #[test]
    fn indices_that_do_not_fit_are_absent() {
        let mut raw = london();
        raw["current"]["air_quality"] =
            json!({ "us-epa-index": 300, "gb-defra-index": "high", "no2": [1, 2] });

        let aq = normalize(raw).unwrap().air_quality.unwrap();
        assert_eq!(aq.epa_index, None);
        assert_eq!(aq.defra_index, None);
        assert_eq!(aq.no2, None);
    }

    #[test]
    fn fractional_percentages_are_accepted() {
        let mut raw = london();
        raw["current"]["humidity"] = json!(80.5);
        raw["current"]["cloud"] = json!(12.25);

        let record = normalize(raw).unwrap();
        assert_eq!(record.humidity_pct, 80.5);
        assert_eq!(record.cloud_pct, 12.25);
    }

    #[test]
    fn negative_percentages_are_rejected() {
        let mut raw = london();
        raw["current"]["cloud"] = json!(-1);

        assert!(matches!(
            normalize(raw).unwrap_err(),
            MalformedPayload::OutOfRange { field: "cloud", .. }
        ));
    }

    #[test]
    fn no_air_quality_section_means_no_record() {
        let mut raw = london();
        raw["current"].as_object_mut().unwrap().remove("air_quality");

        let record = normalize(raw).unwrap();
        assert!(record.air_quality.is_none());
    }

    #[test]
    fn empty_air_quality_section_is_a_record_of_absences() {
        let mut raw = london();
        raw["current"]["air_quality"] = json!({});

        let aq = normalize(raw).unwrap().air_quality.expect("section present");
        assert_eq!(aq, AirQuality::default());
    }

    #[test]
    fn missing_observation_time_is_tolerated() {
        let mut raw = london();
        raw["current"].as_object_mut().unwrap().remove("last_updated_epoch");

        assert!(normalize(raw).unwrap().observed_at.is_none());
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        for path in [("location", "name"), ("location", "country"), ("current", "temp_c")] {
            let mut raw = london();
            raw[path.0].as_object_mut().unwrap().remove(path.1);

            let err = normalize(raw).unwrap_err();
            assert!(matches!(err, MalformedPayload::Shape(_)), "{path:?}: {err}");
        }

        let mut raw = london();
        raw["current"]["condition"].as_object_mut().unwrap().remove("text");
        assert!(matches!(normalize(raw).unwrap_err(), MalformedPayload::Shape(_)));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let mut raw = london();
        raw["current"]["temp_c"] = json!("warm");
        assert!(normalize(raw).is_err());

        assert!(normalize(json!({ "error": { "code": 1006 } })).is_err());
        assert!(normalize(json!([])).is_err());
    }

    #[test]
    fn percentages_above_hundred_are_rejected() {
        let mut raw = london();
        raw["current"]["humidity"] = json!(140);

        let err = normalize(raw).unwrap_err();
        assert!(err.to_string().contains("humidity"));
    }

    #[test]
    fn negative_wind_is_rejected() {
        let mut raw = london();
        raw["current"]["wind_kph"] = json!(-3.0);

        assert!(matches!(
            normalize(raw).unwrap_err(),
            MalformedPayload::OutOfRange { field: "wind_kph", .. }
        ));
    }
}
