// HTTP request handlers for the weather proxy.
// Startup city payload, weather by id, and weather by "name,country" with deep-link cookie.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, instrument};

use crate::error::WeatherError;
use crate::provider::{City, CityId};
use crate::state::bootstrap_cookie;

use super::AppState;

/// Query string of `GET /weather`.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// Error wrapper that renders as a JSON error response.
pub struct ApiError(pub WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            WeatherError::UnknownCity(_) | WeatherError::NotFound(_) => StatusCode::NOT_FOUND,
            WeatherError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            WeatherError::Network(_) | WeatherError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "weather request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Split `"name,country"` at the last comma.
pub fn parse_city_query(raw: &str) -> Result<(&str, &str), WeatherError> {
    raw.rsplit_once(',')
        .map(|(name, country)| (name.trim(), country.trim()))
        .filter(|(name, country)| !name.is_empty() && !country.is_empty())
        .ok_or_else(|| WeatherError::InvalidQuery(raw.to_string()))
}

/// `GET /cities.json`
pub async fn cities_handler(State(state): State<Arc<AppState>>) -> Json<Vec<City>> {
    Json(state.proxy.registry().cities().to_vec())
}

/// `GET /weather/:id`
#[instrument(skip(state))]
pub async fn weather_by_id_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CityId>,
) -> Result<Json<Value>, ApiError> {
    let weather = state.proxy.get_by_city_id(id).await?;
    Ok(Json(weather))
}

/// `GET /weather?city=<name>,<country>`
///
/// Also the deep-link target: the payload is handed to the viewer once
/// through the `weatherData` cookie.
#[instrument(skip(state))]
pub async fn weather_by_name_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherQuery>,
) -> Result<Response, ApiError> {
    let raw = params
        .city
        .ok_or_else(|| WeatherError::InvalidQuery(String::new()))?;
    let (name, country) = parse_city_query(&raw)?;

    let weather = state.proxy.get_by_city_name(name, country).await?;
    let cookie = bootstrap_cookie(&weather.to_string());
    Ok(([(header::SET_COOKIE, cookie)], Json(weather)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_city_query() {
        assert_eq!(parse_city_query("Paris,FR").unwrap(), ("Paris", "FR"));
        assert_eq!(
            parse_city_query("Washington, D.C.,US").unwrap(),
            ("Washington, D.C.", "US")
        );
        assert!(parse_city_query("Paris").is_err());
        assert!(parse_city_query(",FR").is_err());
        assert!(parse_city_query("Paris,").is_err());
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            ApiError(WeatherError::UnknownCity(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(WeatherError::InvalidQuery("x".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(WeatherError::MalformedResponse("x".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError(WeatherError::MissingToken).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
