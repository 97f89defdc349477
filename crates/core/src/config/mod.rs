//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (STRIPS_*)
//! 2. TOML config file (if STRIPS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// What to do with an identifier that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDatePolicy {
    /// Reject the request with an error.
    #[default]
    Reject,
    /// Resolve the latest strip instead.
    Latest,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (STRIPS_*)
/// 2. TOML config file (if STRIPS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via STRIPS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL strip dates are appended to. Must end with `/`.
    ///
    /// Set via STRIPS_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Date of the first published strip.
    ///
    /// Set via STRIPS_FIRST_DATE environment variable.
    #[serde(default = "default_first_date")]
    pub first_date: NaiveDate,

    /// Maximum number of cached strips before the oldest are evicted.
    ///
    /// Set via STRIPS_CACHE_LIMIT environment variable.
    #[serde(default = "default_cache_limit")]
    pub cache_limit: usize,

    /// How long a cached strip stays fresh, in seconds.
    ///
    /// Set via STRIPS_CACHE_REFRESH_SECS environment variable.
    #[serde(default = "default_cache_refresh_secs")]
    pub cache_refresh_secs: u64,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via STRIPS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum redirects followed per request. The latest-date probe
    /// relies on redirects, so this must be at least 1.
    ///
    /// Set via STRIPS_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via STRIPS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Policy for identifiers that fail to parse.
    ///
    /// Set via STRIPS_ON_INVALID environment variable (`reject` or `latest`).
    #[serde(default)]
    pub on_invalid: InvalidDatePolicy,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./strips-cache.sqlite")
}

fn default_base_url() -> String {
    "https://dilbert.com/strip/".into()
}

fn default_first_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1989, 4, 16).expect("hardcoded date")
}

fn default_cache_limit() -> usize {
    9000
}

fn default_cache_refresh_secs() -> u64 {
    7200
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agent() -> String {
    "strips-mcp/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            base_url: default_base_url(),
            first_date: default_first_date(),
            cache_limit: default_cache_limit(),
            cache_refresh_secs: default_cache_refresh_secs(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            on_invalid: InvalidDatePolicy::Reject,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Freshness window as a chrono Duration, for comparing timestamps.
    pub fn cache_refresh(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_refresh_secs as i64)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `STRIPS_`
    /// 2. TOML file from `STRIPS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("STRIPS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("STRIPS_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
