// Configuration loading.
// TOML file with [server], [provider] and [viewer] sections; every field has a default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::cache::DEFAULT_TTL;
use crate::error::{Result, WeatherError};

/// Environment variable that overrides `provider.api_token`.
pub const TOKEN_ENV: &str = "WEATHER_API_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON array of cities served as the startup payload.
    pub cities_file: PathBuf,
    /// Static files served for any other path.
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cities_file: PathBuf::from("public/cities.json"),
            public_dir: PathBuf::from("public"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub cache_expiration_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_token: None,
            cache_expiration_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_expiration_secs)
    }

    /// Token from the environment, falling back to the config file.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .or_else(|| self.api_token.clone())
            .filter(|token| !token.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL of the proxy service.
    pub server_url: String,
    /// Map zoom level used when a city is selected.
    pub city_zoom: u8,
    pub cache_expiration_secs: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            city_zoom: 10,
            cache_expiration_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

impl ViewerConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_expiration_secs)
    }
}

impl Config {
    /// Parse a config file. Fails if the file is missing or invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| WeatherError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the given file, or the default location. A missing default file
    /// yields the built-in defaults; an explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "cityweather")
}

/// Default config file location (~/.config/cityweather/config.toml on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Log file used by the terminal viewer.
pub fn browse_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join("browse.log"))
}
