use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{ForecastError, model::Coordinates, postal::strip_postal_code};

use super::{Geocoder, truncate_body};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google Maps Geocoding API client.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GoogleGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEOCODE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn lookup(&self, query: &str) -> Result<Coordinates> {
        debug!(query, "Requesting geocode");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to Google geocoding")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read Google geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Google geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).context("Failed to parse Google geocoding JSON")?;

        let first = parsed.results.into_iter().next().ok_or_else(|| {
            anyhow!(
                "Google geocoding returned no results (status {}{})",
                parsed.status,
                parsed
                    .error_message
                    .map(|m| format!(": {m}"))
                    .unwrap_or_default()
            )
        })?;

        Ok(Coordinates {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
            display_name: strip_postal_code(&first.formatted_address),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, query: &str) -> Result<Coordinates, ForecastError> {
        self.lookup(query).await.map_err(|e| {
            warn!(query, error = %format!("{e:#}"), "Geocoding failed");
            ForecastError::LocationNotFound
        })
    }
}
