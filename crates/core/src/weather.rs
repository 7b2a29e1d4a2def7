use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Coarse weather label derived from a WMO weather code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Foggy,
    Rainy,
    Stormy,
}

/// WMO code ranges, first match wins
const CONDITION_TABLE: &[(RangeInclusive<i64>, WeatherCondition)] = &[
    (1..=3, WeatherCondition::PartlyCloudy),
    (45..=45, WeatherCondition::Foggy),
    (48..=48, WeatherCondition::Foggy),
    (51..=51, WeatherCondition::Rainy),
    (53..=53, WeatherCondition::Rainy),
    (55..=55, WeatherCondition::Rainy),
    (61..=61, WeatherCondition::Rainy),
    (63..=63, WeatherCondition::Rainy),
    (65..=65, WeatherCondition::Rainy),
    (80..=i64::MAX, WeatherCondition::Stormy),
];

impl WeatherCondition {
    pub fn from_wmo_code(code: i64) -> Self {
        CONDITION_TABLE
            .iter()
            .find(|(range, _)| range.contains(&code))
            .map(|(_, condition)| *condition)
            .unwrap_or(WeatherCondition::Clear)
    }
}

/// Current conditions at a coordinate, formatted for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub temperature: String,
    pub humidity: String,
    pub condition: WeatherCondition,
    pub wind_speed: String,
}

impl WeatherSnapshot {
    /// Build a snapshot from raw readings (°C, %, km/h).
    pub fn from_readings(
        temperature: impl std::fmt::Display,
        humidity: impl std::fmt::Display,
        weather_code: i64,
        wind_speed: impl std::fmt::Display,
    ) -> Self {
        Self {
            temperature: format!("{temperature}°C"),
            humidity: format!("{humidity}%"),
            condition: WeatherCondition::from_wmo_code(weather_code),
            wind_speed: format!("{wind_speed} km/h"),
        }
    }
}
