// Weather provider module.
// Client, endpoints and types for the external weather data service.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ProviderClient;
pub use endpoints::{WeatherSource, unwrap_payload};
pub use types::*;
