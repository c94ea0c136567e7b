//! Runtime settings.
//!
//! Layered with the `config` crate, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional file (TOML/YAML/JSON) named by `STELLARA_CONFIG`
//! 3. `STELLARA__*` environment variables, `__` separating levels
//!    (`STELLARA__STORE__BACKEND=memory`, `STELLARA__TTL_OVERRIDES__NEWS=120`)

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use stellara_core::{CoreError, TtlRegistry};
use stellara_store::DEFAULT_MEMORY_CAPACITY;
use thiserror::Error;

use crate::feeds::FeedLatency;

/// Environment variable holding the settings file path.
pub const CONFIG_PATH_ENV: &str = "STELLARA_CONFIG";

const ENV_PREFIX: &str = "STELLARA";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid listen address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid ttl override: {0}")]
    TtlOverride(#[from] CoreError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which store adapter to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub redis_url: String,
    pub memory_capacity: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedSettings {
    /// Overrides every simulated feed delay when set.
    #[serde(default)]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    /// Category name to TTL seconds.
    #[serde(default)]
    pub ttl_overrides: HashMap<String, u64>,
    #[serde(default)]
    pub feeds: FeedSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::from_sources(path.as_deref().map(Path::new), None)
    }

    /// Loads settings from an optional file and an environment.
    ///
    /// `env` replaces the process environment when given.
    pub fn from_sources(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("store.backend", "redis")?
            .set_default("store.redis_url", "redis://127.0.0.1:6379")?
            .set_default("store.memory_capacity", DEFAULT_MEMORY_CAPACITY)?
            .set_default("log.filter", "info")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(env);

        let settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        let address = format!("{}:{}", self.server.host, self.server.port);
        address
            .parse()
            .map_err(|e: std::net::AddrParseError| SettingsError::InvalidAddress {
                address,
                reason: e.to_string(),
            })
    }

    /// TTL registry with the configured overrides applied.
    pub fn registry(&self) -> Result<TtlRegistry, SettingsError> {
        Ok(TtlRegistry::with_overrides(&self.ttl_overrides)?)
    }

    pub fn feed_latency(&self) -> FeedLatency {
        match self.feeds.latency_ms {
            Some(ms) => FeedLatency::uniform(Duration::from_millis(ms)),
            None => FeedLatency::default(),
        }
    }
}
