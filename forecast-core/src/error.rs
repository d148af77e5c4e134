//! Error type surfaced by the forecast pipeline.
//!
//! Each variant belongs to one pipeline stage and renders a fixed message
//! that front ends show to users verbatim.

use std::fmt;
use thiserror::Error;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingCoordinates,
    FetchingWeather,
    Annotating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingCoordinates => "resolving coordinates",
            Stage::FetchingWeather => "fetching weather",
            Stage::Annotating => "annotating",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    #[error("That location could not be found.")]
    LocationNotFound,

    #[error("The forecast was unable to be retrieved.")]
    ForecastUnavailable,

    /// Faults outside the two provider calls. `message` is for logs only.
    #[error("The forecast could not be assembled.")]
    PipelineFailure { message: String },
}

impl ForecastError {
    pub fn pipeline<S: Into<String>>(message: S) -> Self {
        Self::PipelineFailure {
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            ForecastError::LocationNotFound => Stage::ResolvingCoordinates,
            ForecastError::ForecastUnavailable => Stage::FetchingWeather,
            ForecastError::PipelineFailure { .. } => Stage::Annotating,
        }
    }

    /// Message safe to show to end users.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
