use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Number of forecast days reported after "today".
pub const FORECAST_DAYS: usize = 5;

/// Resolved location, as returned by a geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// Formatted address with the postal code removed.
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    /// Lenient parsing for front-end hints: only an explicit Fahrenheit hint
    /// selects Fahrenheit, anything else falls back to Celsius.
    pub fn from_hint(hint: Option<&str>) -> Self {
        hint.and_then(|h| h.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("celsius"),
            TemperatureUnit::Fahrenheit => f.write_str("fahrenheit"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "celsius" | "c" | "si" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" | "us" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Current conditions plus today's daily summary, already rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: i64,
    pub apparent_temperature: i64,
    pub high: i64,
    pub low: i64,
    pub precip_probability: i64,
    pub humidity: i64,
    pub wind_speed: i64,
    pub summary: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyConditions {
    pub apparent_high: i64,
    pub high: i64,
    pub low: i64,
    pub precip_probability: i64,
    pub humidity: i64,
    pub summary: String,
    pub icon: String,
    /// Unix timestamp (seconds) of the day as reported by the provider.
    pub time: i64,
}

/// Everything the weather stage extracts from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherFields {
    pub temp_unit: TemperatureUnit,
    pub today: CurrentConditions,
    pub week_summary: String,
    pub days: [DailyConditions; FORECAST_DAYS],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayForecast {
    #[serde(flatten)]
    pub conditions: CurrentConditions,
    pub current_time: String,
    pub current_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayForecast {
    pub apparent_high: i64,
    pub high: i64,
    pub low: i64,
    pub precip_probability: i64,
    pub humidity: i64,
    pub summary: String,
    pub icon: String,
    #[serde(skip)]
    pub time: i64,
    pub day_of_week: String,
    pub date: String,
}

/// Display-ready forecast for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// "C" or "F".
    pub temp_unit: &'static str,
    pub week_summary: String,
    pub today: TodayForecast,
    pub days: [DayForecast; FORECAST_DAYS],
}
