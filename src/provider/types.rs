// Weather domain types.
// Cities from the startup payload and the typed view of a weather payload.

use serde::{Deserialize, Serialize};

/// Numeric city identifier, as assigned by the provider.
pub type CityId = u64;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// A city from the startup payload. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub country: String,
    pub coord: Coord,
}

impl City {
    /// Normalized `"name,country"` cache key for this city.
    pub fn name_key(&self) -> String {
        name_key(&self.name, &self.country)
    }

    /// Query text the provider and the server accept for this city.
    pub fn query(&self) -> String {
        format!("{},{}", self.name, self.country)
    }
}

/// Build the lower-cased `"name,country"` key.
pub fn name_key(name: &str, country: &str) -> String {
    format!("{},{}", name, country).to_lowercase()
}

/// Weather condition entry (`weather[n]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub description: String,
}

/// Wind readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

/// Main readings: temperature and humidity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub temp: f64,
    pub humidity: f64,
}

/// The fields of a provider weather payload the viewer displays.
///
/// Unknown fields are ignored. `wind` and `main` are required; a payload
/// without them is malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub id: Option<CityId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub main: Readings,
}

impl WeatherReport {
    /// Description of the first condition, or empty.
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or_default()
    }
}
