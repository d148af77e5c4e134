use crate::{
    Config, ForecastError,
    model::{Coordinates, TemperatureUnit, WeatherFields},
    provider::{darksky::DarkSkyProvider, google::GoogleGeocoder},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod darksky;
pub mod google;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Google,
    DarkSky,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Google => "google",
            ProviderId::DarkSky => "darksky",
        }
    }

    /// What the provider is used for in the pipeline.
    pub fn role(&self) -> &'static str {
        match self {
            ProviderId::Google => "geocoding",
            ProviderId::DarkSky => "weather",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::Google => "FORECAST_GOOGLE_API_KEY",
            ProviderId::DarkSky => "FORECAST_DARKSKY_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Google, ProviderId::DarkSky]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "google" => Ok(ProviderId::Google),
            "darksky" => Ok(ProviderId::DarkSky),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: google, darksky."
            )),
        }
    }
}

/// Turns free-text locations into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, query: &str) -> Result<Coordinates, ForecastError>;
}

/// Fetches current conditions and the daily forecast for coordinates.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(
        &self,
        coords: &Coordinates,
        unit: TemperatureUnit,
    ) -> Result<WeatherFields, ForecastError>;
}

pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Arc<dyn Geocoder>> {
    let api_key = config.require_api_key(ProviderId::Google)?;

    let geocoder = match config.provider_base_url(ProviderId::Google) {
        Some(base) => GoogleGeocoder::with_base_url(api_key.to_owned(), base.to_owned()),
        None => GoogleGeocoder::new(api_key.to_owned()),
    };

    Ok(Arc::new(geocoder))
}

pub fn weather_source_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherSource>> {
    let api_key = config.require_api_key(ProviderId::DarkSky)?;

    let source = match config.provider_base_url(ProviderId::DarkSky) {
        Some(base) => DarkSkyProvider::with_base_url(api_key.to_owned(), base.to_owned()),
        None => DarkSkyProvider::new(api_key.to_owned()),
    };

    Ok(Arc::new(source))
}

/// Round half up: `2.5 → 3`, `-2.5 → -2`.
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// A 0–1 fraction as a rounded percentage.
pub(crate) fn percent(fraction: f64) -> i64 {
    round_half_up(fraction * 100.0)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
