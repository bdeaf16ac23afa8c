use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::str::FromStr;

/// Optional file with server overrides
pub const SERVER_CONFIG_PATH: &str = "config/server.toml";

/// Which document store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(config_error(&format!("Unknown store backend: {}", other))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Document store backend
    pub store_backend: StoreBackend,
    /// Redis connection URL
    pub redis_url: String,
    /// Prefix for every Redis key the store writes
    pub key_prefix: String,
    /// Maximum request body size in bytes
    pub body_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            store_backend: StoreBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "kalenteri".to_string(),
            body_limit_bytes: crate::api::DEFAULT_BODY_LIMIT,
        }
    }
}

/// Overrides read from `config/server.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    host: Option<String>,
    port: Option<u16>,
    store_backend: Option<StoreBackend>,
    redis_url: Option<String>,
    key_prefix: Option<String>,
    body_limit_bytes: Option<usize>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_lookup(|name| env::var(name).ok())?;

        if let Ok(content) = fs::read_to_string(SERVER_CONFIG_PATH) {
            config.apply_file(&content)?;
        }

        Ok(config)
    }

    /// Build a config from a variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| env_error("PORT"))?,
            None => defaults.port,
        };

        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| env_error("BODY_LIMIT_BYTES"))?,
            None => defaults.body_limit_bytes,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse::<StoreBackend>().map_err(|_| env_error("STORE_BACKEND"))?,
            None => defaults.store_backend,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            store_backend,
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: lookup("EVENTS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            body_limit_bytes,
        })
    }

    /// Apply overrides from TOML content
    pub fn apply_file(&mut self, content: &str) -> AppResult<()> {
        let overrides: FileOverrides = toml::from_str(content)?;

        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(backend) = overrides.store_backend {
            self.store_backend = backend;
        }
        if let Some(url) = overrides.redis_url {
            self.redis_url = url;
        }
        if let Some(prefix) = overrides.key_prefix {
            self.key_prefix = prefix;
        }
        if let Some(limit) = overrides.body_limit_bytes {
            self.body_limit_bytes = limit;
        }

        Ok(())
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for the calendar client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL the events collection is resolved against
    pub api_base_url: String,
    /// Locale for user-facing notices
    pub locale: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000/".to_string(),
            locale: "en".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load client configuration from the environment
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the client configuration from a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_base_url: lookup("API_BASE_URL").unwrap_or(defaults.api_base_url),
            locale: lookup("CLIENT_LOCALE").unwrap_or(defaults.locale),
        }
    }
}
