// Error types for cityweather.
// Covers provider/network failures, malformed payloads, config and lookup errors.

use thiserror::Error;

use crate::provider::CityId;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unknown city id {0}")]
    UnknownCity(CityId),

    #[error("Invalid city query '{0}', expected <name>,<country>")]
    InvalidQuery(String),

    #[error("Missing WEATHER_API_TOKEN environment variable")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl WeatherError {
    /// Wrap a payload decoding failure.
    pub fn malformed(err: impl std::fmt::Display) -> Self {
        WeatherError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
