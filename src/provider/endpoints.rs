// Weather provider endpoint functions.
// Fetches raw weather payloads by city id or by "name,country" query.

use std::future::Future;

use serde_json::Value;

use crate::error::{Result, WeatherError};

use super::client::ProviderClient;
use super::types::CityId;

/// Source of raw weather payloads. Implemented by the provider client;
/// tests substitute in-memory sources.
pub trait WeatherSource: Send + Sync {
    /// Fetch the payload for a numeric city id.
    fn fetch_by_id(&self, id: CityId) -> impl Future<Output = Result<Value>> + Send;

    /// Fetch the payload for a `"name,country"` query.
    fn fetch_by_query(&self, query: &str) -> impl Future<Output = Result<Value>> + Send;
}

impl ProviderClient {
    /// Get current weather for a city id.
    pub async fn weather_by_id(&self, id: CityId) -> Result<Value> {
        let id = id.to_string();
        let response = self.get_with_params(&[("id", id.as_str())]).await?;
        let text = response.text().await.map_err(WeatherError::Network)?;
        serde_json::from_str(&text).map_err(WeatherError::malformed)
    }

    /// Get current weather for a `"name,country"` query.
    pub async fn weather_by_query(&self, query: &str) -> Result<Value> {
        let response = self.get_with_params(&[("q", query)]).await?;
        let text = response.text().await.map_err(WeatherError::Network)?;
        serde_json::from_str(&text).map_err(WeatherError::malformed)
    }
}

impl WeatherSource for ProviderClient {
    async fn fetch_by_id(&self, id: CityId) -> Result<Value> {
        self.weather_by_id(id).await
    }

    async fn fetch_by_query(&self, query: &str) -> Result<Value> {
        self.weather_by_query(query).await
    }
}

/// Unwrap a provider response into a single weather payload and its city id.
///
/// Forecast-style responses wrap payloads in a `list`; the first element is
/// used. Otherwise the response itself is the payload.
pub fn unwrap_payload(response: Value) -> Result<(Value, Option<CityId>)> {
    let payload = match response {
        Value::Object(mut object) => match object.remove("list") {
            Some(Value::Array(items)) => items.into_iter().next().ok_or_else(|| {
                WeatherError::MalformedResponse("empty list in provider response".to_string())
            })?,
            Some(other) => {
                object.insert("list".to_string(), other);
                Value::Object(object)
            }
            None => Value::Object(object),
        },
        other => {
            return Err(WeatherError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                other
            )));
        }
    };

    let id = payload.get("id").and_then(Value::as_u64);
    Ok((payload, id))
}
