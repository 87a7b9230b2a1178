// Viewer client for the weather proxy service.
// Fetches the city list, weather by id, and deep-link bootstrap payloads.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header::SET_COOKIE};

use crate::error::{Result, WeatherError};
use crate::provider::{City, CityId, WeatherReport};
use crate::state::BootstrapSlot;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client the viewer uses to talk to the proxy service.
#[derive(Debug, Clone)]
pub struct ViewerClient {
    client: Client,
    base_url: String,
}

impl ViewerClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WeatherError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request to the service.
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(WeatherError::Network)?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(WeatherError::NotFound(response.url().to_string())),
            status => Err(WeatherError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }

    /// Startup payload: every city the service knows.
    pub async fn cities(&self) -> Result<Vec<City>> {
        let response = self.get("/cities.json", &[]).await?;
        let text = response.text().await.map_err(WeatherError::Network)?;
        serde_json::from_str(&text).map_err(WeatherError::malformed)
    }

    /// Current weather for a city id.
    pub async fn weather(&self, id: CityId) -> Result<WeatherReport> {
        let response = self.get(&format!("/weather/{}", id), &[]).await?;
        let text = response.text().await.map_err(WeatherError::Network)?;
        serde_json::from_str(&text).map_err(WeatherError::malformed)
    }

    /// Open the deep link for a city and collect the bootstrap cookie it sets.
    pub async fn deep_link(&self, name: &str, country: &str) -> Result<BootstrapSlot> {
        let query = format!("{},{}", name, country);
        let response = self.get("/weather", &[("city", query.as_str())]).await?;

        let slot = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(BootstrapSlot::from_cookie_header)
            .find(|slot| !slot.is_empty())
            .unwrap_or_default();
        Ok(slot)
    }
}
