use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ppb to µg/m³ factor for carbon monoxide, valid at 25 °C and 1 atm.
///
/// Not corrected for the actual temperature or pressure at the station.
pub const CO_PPB_TO_UG_M3: f64 = 1.145;

/// Canonical weather record built from one provider response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedWeatherRecord {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub condition_text: String,
    pub condition_icon_ref: String,
    pub humidity_pct: f64,
    pub wind_kph: f64,
    pub cloud_pct: f64,
    pub observed_at: Option<DateTime<Utc>>,
    /// `None` when the provider sent no air-quality section at all.
    pub air_quality: Option<AirQuality>,
}

/// Air-quality readings. Every field is independently optional; absent is not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AirQuality {
    pub epa_index: Option<u8>,
    pub defra_index: Option<u8>,
    co_ppb: Option<f64>,
    co_ug_m3: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
}

impl AirQuality {
    /// Set the CO reading in ppb; the µg/m³ value is derived from it.
    pub fn with_co_ppb(mut self, co_ppb: Option<f64>) -> Self {
        self.co_ppb = co_ppb;
        self.co_ug_m3 = co_ppb.map(co_ppb_to_ug_m3);
        self
    }

    pub fn co_ppb(&self) -> Option<f64> {
        self.co_ppb
    }

    pub fn co_ug_m3(&self) -> Option<f64> {
        self.co_ug_m3
    }
}

/// `round(ppb * 1.145, 2)`.
pub fn co_ppb_to_ug_m3(co_ppb: f64) -> f64 {
    round2(co_ppb * CO_PPB_TO_UG_M3)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn co_conversion_rounds_to_two_places() {
        assert_eq!(co_ppb_to_ug_m3(200.0), 229.0);
        assert_eq!(co_ppb_to_ug_m3(0.0), 0.0);
        assert_eq!(co_ppb_to_ug_m3(333.8), 382.2);
    }

    #[test]
    fn co_ug_m3_follows_co_ppb() {
        let aq = AirQuality::default().with_co_ppb(Some(200.0));
        assert_eq!(aq.co_ppb(), Some(200.0));
        assert_eq!(aq.co_ug_m3(), Some(229.0));

        let aq = aq.with_co_ppb(None);
        assert_eq!(aq.co_ppb(), None);
        assert_eq!(aq.co_ug_m3(), None);
    }
}
