//! Core library for the `forecast` app.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The geocoding and weather provider clients behind small traits
//! - The forecast pipeline that chains them into one display-ready result
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod postal;
pub mod provider;
pub mod temporal;

pub use config::{Config, ProviderConfig};
pub use error::{ForecastError, Stage};
pub use forecast::ForecastService;
pub use model::{Coordinates, ForecastResult, TemperatureUnit, WeatherFields};
pub use postal::strip_postal_code;
pub use provider::{Geocoder, ProviderId, WeatherSource};
