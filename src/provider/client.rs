// Weather provider HTTP client.
// Handles token injection and response status checks for the external provider.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::config::ProviderConfig;
use crate::error::{Result, WeatherError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the external weather provider.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ProviderClient {
    /// Create a new provider client for the given base URL and API token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WeatherError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// Create a client from the `[provider]` config section.
    /// The `WEATHER_API_TOKEN` environment variable overrides the configured token.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let token = config.resolve_token().ok_or(WeatherError::MissingToken)?;
        Self::new(&config.base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request to the provider with the given query parameters.
    /// The API token is always sent as `appid`.
    pub async fn get_with_params(&self, params: &[(&str, &str)]) -> Result<Response> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("appid", self.token.as_str())])
            .query(params)
            .send()
            .await
            .map_err(WeatherError::Network)?;

        self.check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => {
                // The token is in the query string; report the path only.
                let path = response.url().path().to_string();
                Err(WeatherError::NotFound(path))
            }
            status => Err(WeatherError::Other(format!(
                "Provider HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}
