//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::dates;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `base_url` is not an http(s) URL ending with `/`
    /// - `first_date` lies in the future
    /// - `cache_limit` is 0
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_redirects` is 0 or exceeds 20
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "base_url".into(),
                reason: "must be an http or https URL".into(),
            });
        }
        if !self.base_url.ends_with('/') {
            return Err(ConfigError::Invalid {
                field: "base_url".into(),
                reason: "must end with '/' so the strip date appends as a path segment".into(),
            });
        }

        if self.first_date > dates::today_utc() {
            return Err(ConfigError::Invalid { field: "first_date".into(), reason: "must not be in the future".into() });
        }

        if self.cache_limit == 0 {
            return Err(ConfigError::Invalid { field: "cache_limit".into(), reason: "must be at least 1".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_redirects == 0 {
            return Err(ConfigError::Invalid {
                field: "max_redirects".into(),
                reason: "must be at least 1; the latest-date probe follows redirects".into(),
            });
        }
        if self.max_redirects > 20 {
            return Err(ConfigError::Invalid { field: "max_redirects".into(), reason: "must not exceed 20".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cache_refresh_secs == 0 {
            tracing::warn!("cache_refresh_secs is 0; every request will refetch from the source");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let config = AppConfig { base_url: "ftp://example.com/strip/".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "base_url"));
    }

    #[test]
    fn test_validate_base_url_trailing_slash() {
        let config = AppConfig { base_url: "https://example.com/strip".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "base_url"));
    }

    #[test]
    fn test_validate_first_date_in_future() {
        let config = AppConfig { first_date: dates::today_utc() + Duration::days(1), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "first_date"));
    }

    #[test]
    fn test_validate_first_date_today_is_fine() {
        let config = AppConfig { first_date: dates::today_utc(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_cache_limit_zero() {
        let config = AppConfig { cache_limit: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_limit"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_max_redirects_zero() {
        let config = AppConfig { max_redirects: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_redirects"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config =
            AppConfig { cache_limit: 1, timeout_ms: 100, max_redirects: 1, cache_refresh_secs: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
