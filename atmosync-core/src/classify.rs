//! Maps condition text and pollutant levels onto display categories.
//!
//! All tables here are process-wide constants. Condition matching is a
//! case-insensitive substring test with no word boundaries ("windy" matches
//! "wind"), and the first rule in declaration order wins.

use serde::Serialize;

use crate::model::AirQuality;

/// Colour used wherever a tier cannot be determined.
pub const NEUTRAL_COLOR: &str = "#666666";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodKey {
    Rain,
    Clear,
    Cloud,
    Wind,
    Overcast,
    Mist,
    Snow,
    /// No rule matched.
    Unique,
}

/// Ordered mood rules; reordering changes the result for multi-keyword conditions.
pub const MOOD_RULES: &[(&str, MoodKey)] = &[
    ("rain", MoodKey::Rain),
    ("clear", MoodKey::Clear),
    ("cloud", MoodKey::Cloud),
    ("wind", MoodKey::Wind),
    ("overcast", MoodKey::Overcast),
    ("mist", MoodKey::Mist),
    ("snow", MoodKey::Snow),
];

impl MoodKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodKey::Rain => "rain",
            MoodKey::Clear => "clear",
            MoodKey::Cloud => "cloud",
            MoodKey::Wind => "wind",
            MoodKey::Overcast => "overcast",
            MoodKey::Mist => "mist",
            MoodKey::Snow => "snow",
            MoodKey::Unique => "unique",
        }
    }

    pub fn quote(&self) -> &'static str {
        match self {
            MoodKey::Rain => "☔ Cozy weather ideal for staying in with a hot drink.",
            MoodKey::Clear => "🌞 Optimal conditions for productivity and clarity.",
            MoodKey::Cloud => "☁️ Balanced atmosphere for focused work.",
            MoodKey::Wind => "🍃 Dynamic conditions bringing fresh perspectives.",
            MoodKey::Overcast => "☁️ Stable atmospheric pressure for sustained focus.",
            MoodKey::Mist => "🌫️ Reduced visibility suggests inward reflection.",
            MoodKey::Snow => "❄️ Crystalline structures indicate precision opportunities.",
            MoodKey::Unique => "Unique atmospheric conditions present special opportunities.",
        }
    }
}

impl std::fmt::Display for MoodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_mood(condition: &str) -> MoodKey {
    first_match(condition, MOOD_RULES).unwrap_or(MoodKey::Unique)
}

/// Ambient sound loop picked for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundKey {
    Rainy,
    Sunny,
    Breezy,
    Cloudy,
}

/// Sound rules have their own order: wind is checked before cloud here.
pub const SOUND_RULES: &[(&str, SoundKey)] = &[
    ("rain", SoundKey::Rainy),
    ("clear", SoundKey::Sunny),
    ("wind", SoundKey::Breezy),
    ("cloud", SoundKey::Cloudy),
    ("overcast", SoundKey::Cloudy),
];

impl SoundKey {
    pub fn asset(&self) -> &'static str {
        match self {
            SoundKey::Rainy => "rainy.mp3",
            SoundKey::Sunny => "sunny.mp3",
            SoundKey::Breezy => "breezy.mp3",
            SoundKey::Cloudy => "cloudy.mp3",
        }
    }
}

/// `None` means silence.
pub fn classify_sound(condition: &str) -> Option<SoundKey> {
    first_match(condition, SOUND_RULES)
}

fn first_match<T: Copy>(condition: &str, rules: &[(&str, T)]) -> Option<T> {
    let condition = condition.to_lowercase();
    rules
        .iter()
        .find(|(keyword, _)| condition.contains(*keyword))
        .map(|(_, category)| *category)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AqiTier {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    Unknown,
}

/// Index 1..=6 maps to `AQI_TIERS[index - 1]`.
pub const AQI_TIERS: [AqiTier; 6] = [
    AqiTier::Good,
    AqiTier::Moderate,
    AqiTier::UnhealthyForSensitive,
    AqiTier::Unhealthy,
    AqiTier::VeryUnhealthy,
    AqiTier::Hazardous,
];

impl AqiTier {
    /// Total over every input: absent or out-of-range indices are `Unknown`.
    pub fn from_index(index: Option<u8>) -> Self {
        index
            .and_then(|i| usize::from(i).checked_sub(1))
            .and_then(|i| AQI_TIERS.get(i).copied())
            .unwrap_or(AqiTier::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiTier::Good => "Good",
            AqiTier::Moderate => "Moderate",
            AqiTier::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            AqiTier::Unhealthy => "Unhealthy",
            AqiTier::VeryUnhealthy => "Very Unhealthy",
            AqiTier::Hazardous => "Hazardous",
            AqiTier::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AqiTier::Good => "#00E400",
            AqiTier::Moderate => "#FFFF00",
            AqiTier::UnhealthyForSensitive => "#FF7E00",
            AqiTier::Unhealthy => "#FF0000",
            AqiTier::VeryUnhealthy => "#8F3F97",
            AqiTier::Hazardous => "#7E0023",
            AqiTier::Unknown => NEUTRAL_COLOR,
        }
    }
}

/// EPA index when present, DEFRA otherwise.
pub fn aqi_tier(epa_index: Option<u8>, defra_index: Option<u8>) -> AqiTier {
    AqiTier::from_index(epa_index.or(defra_index))
}

/// The index actually used for the tier, kept for "(AQI: n/6)" style display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AqiReading {
    pub index: Option<u8>,
    pub tier: AqiTier,
}

pub fn aqi_reading(aq: &AirQuality) -> AqiReading {
    let index = aq.epa_index.or(aq.defra_index);
    AqiReading { index, tier: AqiTier::from_index(index) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    /// Carbon monoxide in µg/m³, not the raw ppb reading.
    Co,
    No2,
    O3,
    So2,
}

impl Pollutant {
    /// Chart order.
    pub const fn all() -> &'static [Pollutant] {
        &[
            Pollutant::Pm2_5,
            Pollutant::Pm10,
            Pollutant::Co,
            Pollutant::No2,
            Pollutant::O3,
            Pollutant::So2,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO₂",
            Pollutant::O3 => "O₃",
            Pollutant::So2 => "SO₂",
        }
    }

    /// `(low, high)` cut points in µg/m³.
    pub const fn thresholds(&self) -> (f64, f64) {
        match self {
            Pollutant::Pm2_5 => (12.0, 35.0),
            Pollutant::Pm10 => (20.0, 50.0),
            Pollutant::Co => (4000.0, 10000.0),
            Pollutant::No2 => (25.0, 100.0),
            Pollutant::O3 => (50.0, 100.0),
            Pollutant::So2 => (20.0, 80.0),
        }
    }

    /// Accepts display labels ("PM2.5", "NO₂") and field names ("pm2_5", "co_ug_m3").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "pm2.5" | "pm2_5" | "pm25" => Some(Pollutant::Pm2_5),
            "pm10" => Some(Pollutant::Pm10),
            "co" | "co_ug_m3" => Some(Pollutant::Co),
            "no2" | "no₂" => Some(Pollutant::No2),
            "o3" | "o₃" => Some(Pollutant::O3),
            "so2" | "so₂" => Some(Pollutant::So2),
            _ => None,
        }
    }

    /// Concentration used for charting, with CO taken in µg/m³.
    pub fn value_in(&self, aq: &AirQuality) -> Option<f64> {
        match self {
            Pollutant::Pm2_5 => aq.pm2_5,
            Pollutant::Pm10 => aq.pm10,
            Pollutant::Co => aq.co_ug_m3(),
            Pollutant::No2 => aq.no2,
            Pollutant::O3 => aq.o3,
            Pollutant::So2 => aq.so2,
        }
    }

    /// Good below `low`, Moderate in `[low, high)`, Unhealthy from `high` up.
    pub fn tier(&self, value: f64) -> SafetyTier {
        if value.is_nan() {
            return SafetyTier::Undetermined;
        }
        let (low, high) = self.thresholds();
        if value < low {
            SafetyTier::Good
        } else if value < high {
            SafetyTier::Moderate
        } else {
            SafetyTier::Unhealthy
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SafetyTier {
    Good,
    Moderate,
    Unhealthy,
    Undetermined,
}

impl SafetyTier {
    pub fn label(&self) -> &'static str {
        match self {
            SafetyTier::Good => "Good",
            SafetyTier::Moderate => "Moderate",
            SafetyTier::Unhealthy => "Unhealthy",
            SafetyTier::Undetermined => "Undetermined",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SafetyTier::Good => "#00E400",
            SafetyTier::Moderate => "#FFFF00",
            SafetyTier::Unhealthy => "#FF0000",
            SafetyTier::Undetermined => NEUTRAL_COLOR,
        }
    }
}

/// Tier for a pollutant given by name; unknown names are `Undetermined`.
pub fn pollutant_tier(name: &str, value: f64) -> SafetyTier {
    Pollutant::from_name(name).map_or(SafetyTier::Undetermined, |p| p.tier(value))
}

/// One bar of the pollutant chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    /// 0.0 when the reading is missing. A charting convenience, not a measurement.
    pub value: f64,
    pub measured: bool,
    pub tier: SafetyTier,
}

pub fn pollutant_series(aq: &AirQuality) -> Vec<PollutantReading> {
    Pollutant::all()
        .iter()
        .map(|&pollutant| match pollutant.value_in(aq) {
            Some(value) => PollutantReading {
                pollutant,
                value,
                measured: true,
                tier: pollutant.tier(value),
            },
            None => PollutantReading {
                pollutant,
                value: 0.0,
                measured: false,
                tier: SafetyTier::Undetermined,
            },
        })
        .collect()
}

/// A chart is only worth drawing when some bar is non-zero.
pub fn has_chart_data(series: &[PollutantReading]) -> bool {
    series.iter().any(|r| r.value != 0.0)
}
