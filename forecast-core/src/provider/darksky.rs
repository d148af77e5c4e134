use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    ForecastError,
    model::{
        Coordinates, CurrentConditions, DailyConditions, FORECAST_DAYS, TemperatureUnit,
        WeatherFields,
    },
};

use super::{WeatherSource, percent, round_half_up, truncate_body};

const FORECAST_URL: &str = "https://api.darksky.net/forecast";

/// Dark Sky forecast API client.
#[derive(Debug, Clone)]
pub struct DarkSkyProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl DarkSkyProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, FORECAST_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn forecast_url(&self, coords: &Coordinates) -> String {
        format!(
            "{}/{}/{},{}",
            self.base_url, self.api_key, coords.latitude, coords.longitude
        )
    }

    async fn fetch_forecast(
        &self,
        coords: &Coordinates,
        unit: TemperatureUnit,
    ) -> Result<WeatherFields> {
        let mut request = self.http.get(self.forecast_url(coords));

        // Dark Sky defaults to imperial units.
        if unit == TemperatureUnit::Celsius {
            request = request.query(&[("units", "si")]);
        }

        debug!(lat = coords.latitude, lng = coords.longitude, %unit, "Requesting forecast");

        let res = request
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to Dark Sky")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read Dark Sky response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Dark Sky request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: DsResponse =
            serde_json::from_str(&body).context("Failed to parse Dark Sky forecast JSON")?;

        extract_fields(parsed, unit)
    }
}

fn extract_fields(parsed: DsResponse, unit: TemperatureUnit) -> Result<WeatherFields> {
    let data = &parsed.daily.data;
    if data.len() <= FORECAST_DAYS {
        return Err(anyhow!(
            "Dark Sky returned {} daily entries, need at least {}",
            data.len(),
            FORECAST_DAYS + 1
        ));
    }

    let today = &data[0];
    let current = &parsed.currently;

    Ok(WeatherFields {
        temp_unit: unit,
        today: CurrentConditions {
            temperature: round_half_up(current.temperature),
            apparent_temperature: round_half_up(current.apparent_temperature),
            high: round_half_up(today.temperature_high),
            low: round_half_up(today.temperature_low),
            precip_probability: percent(current.precip_probability),
            humidity: percent(current.humidity),
            wind_speed: round_half_up(current.wind_speed),
            summary: today.summary.clone(),
            icon: current.icon.clone(),
        },
        week_summary: parsed.daily.summary.clone(),
        days: std::array::from_fn(|i| DailyConditions::from(&data[i + 1])),
    })
}

impl From<&DsDay> for DailyConditions {
    fn from(day: &DsDay) -> Self {
        Self {
            apparent_high: round_half_up(day.apparent_temperature_high),
            high: round_half_up(day.temperature_high),
            low: round_half_up(day.temperature_low),
            precip_probability: percent(day.precip_probability),
            humidity: percent(day.humidity),
            summary: day.summary.clone(),
            icon: day.icon.clone(),
            time: day.time,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DsCurrently {
    temperature: f64,
    apparent_temperature: f64,
    precip_probability: f64,
    humidity: f64,
    wind_speed: f64,
    icon: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DsDay {
    time: i64,
    summary: String,
    icon: String,
    temperature_high: f64,
    temperature_low: f64,
    apparent_temperature_high: f64,
    precip_probability: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct DsDaily {
    summary: String,
    data: Vec<DsDay>,
}

#[derive(Debug, Deserialize)]
struct DsResponse {
    currently: DsCurrently,
    daily: DsDaily,
}

#[async_trait]
impl WeatherSource for DarkSkyProvider {
    async fn fetch(
        &self,
        coords: &Coordinates,
        unit: TemperatureUnit,
    ) -> Result<WeatherFields, ForecastError> {
        self.fetch_forecast(coords, unit).await.map_err(|e| {
            warn!(
                lat = coords.latitude,
                lng = coords.longitude,
                error = %format!("{e:#}"),
                "Forecast retrieval failed"
            );
            ForecastError::ForecastUnavailable
        })
    }
}
