// Weather proxy HTTP service.
// Builds the axum router and runs it on a TCP listener.

pub mod handlers;
pub mod proxy;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::provider::ProviderClient;
use crate::state::CityRegistry;

pub use proxy::{WeatherKey, WeatherProxy};

/// Shared state for all handlers.
pub struct AppState {
    pub proxy: WeatherProxy<ProviderClient>,
}

impl AppState {
    /// Load the city registry and create the provider client from config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = CityRegistry::load(&config.server.cities_file)?;
        info!(
            cities = registry.len(),
            file = %config.server.cities_file.display(),
            "city registry loaded"
        );
        let client = ProviderClient::from_config(&config.provider)?;
        Ok(Self {
            proxy: WeatherProxy::new(client, Arc::new(registry), config.provider.cache_ttl()),
        })
    }
}

/// Build the router. Unmatched paths fall through to static files.
pub fn router(state: Arc<AppState>, public_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/cities.json", get(handlers::cities_handler))
        .route("/weather", get(handlers::weather_by_name_handler))
        .route("/weather/:id", get(handlers::weather_by_id_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind the configured address and serve.
pub async fn run(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| WeatherError::Config(format!("invalid server address: {}", e)))?;
    let listener = TcpListener::bind(addr).await?;
    info!("Starting server on http://{}", addr);

    serve(listener, router(state, &config.server.public_dir)).await
}
