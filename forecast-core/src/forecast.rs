//! The forecast pipeline: geocode, fetch weather, annotate.

use chrono::{DateTime, Local, TimeZone};
use std::{fmt::Display, sync::Arc};
use tracing::{debug, error, info, instrument};

use crate::{
    Config, ForecastError,
    error::Stage,
    model::{ForecastResult, TemperatureUnit},
    provider::{Geocoder, WeatherSource, geocoder_from_config, weather_source_from_config},
    temporal,
};

/// Runs the three pipeline stages in order for each request.
///
/// Holds no per-request state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ForecastService {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
}

impl ForecastService {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherSource>) -> Self {
        Self { geocoder, weather }
    }

    /// Build the service from configured Google and Dark Sky credentials.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            geocoder_from_config(config)?,
            weather_source_from_config(config)?,
        ))
    }

    /// Forecast for `query`, with time labels from the local clock.
    pub async fn forecast(
        &self,
        query: &str,
        unit: TemperatureUnit,
    ) -> Result<ForecastResult, ForecastError> {
        self.run(query, unit, Local::now).await
    }

    /// Forecast for `query`, with time labels derived from `now`.
    pub async fn forecast_at<Tz>(
        &self,
        query: &str,
        unit: TemperatureUnit,
        now: DateTime<Tz>,
    ) -> Result<ForecastResult, ForecastError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Display + Send + Sync,
    {
        self.run(query, unit, move || now).await
    }

    #[instrument(skip(self, clock))]
    async fn run<Tz, F>(
        &self,
        query: &str,
        unit: TemperatureUnit,
        clock: F,
    ) -> Result<ForecastResult, ForecastError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
        F: FnOnce() -> DateTime<Tz> + Send,
    {
        let result = self.stages(query, unit, clock).await;

        match &result {
            Ok(forecast) => info!(place = %forecast.place_name, "Forecast completed"),
            Err(e) => error!(stage = %e.stage(), error = ?e, "Forecast pipeline failed"),
        }

        result
    }

    async fn stages<Tz, F>(
        &self,
        query: &str,
        unit: TemperatureUnit,
        clock: F,
    ) -> Result<ForecastResult, ForecastError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
        F: FnOnce() -> DateTime<Tz>,
    {
        debug!(stage = %Stage::ResolvingCoordinates);
        let coords = self.geocoder.resolve(query).await?;

        debug!(stage = %Stage::FetchingWeather, place = %coords.display_name);
        let weather = self.weather.fetch(&coords, unit).await?;

        debug!(stage = %Stage::Annotating);
        temporal::annotate(coords, weather, &clock())
    }
}
