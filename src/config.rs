//! Configuration module for the KPI engine.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Analytics store connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store, e.g. `http://localhost:9200`.
    pub url: String,
    /// Index holding warehouse events.
    #[serde(default = "default_index")]
    pub index: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_index() -> String {
    "warehouse_events".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Guardrails applied to every KPI request before it reaches the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest allowed `to - from` window, in days.
    pub max_window_days: i64,
    pub default_top_n: u32,
    pub max_top_n: u32,
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_window_days: 30,
            default_top_n: 5,
            max_top_n: 25,
            default_limit: 10,
            max_limit: 50,
        }
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (KPI__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("KPI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
