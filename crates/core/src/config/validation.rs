//! Configuration validation rules.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("{field} not set ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if retention limits are zero, expiry
    /// windows are non-positive, the timeout is out of range, or the default
    /// result count is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_max_entries == 0 {
            return Err(invalid("cache_max_entries", "must be greater than 0"));
        }
        if self.max_sessions == 0 {
            return Err(invalid("max_sessions", "must be greater than 0"));
        }
        if self.cache_ttl_hours <= 0 {
            return Err(invalid("cache_ttl_hours", "must be greater than 0"));
        }
        if self.session_expiry_hours <= 0 {
            return Err(invalid("session_expiry_hours", "must be greater than 0"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if let Some(n) = self.defaults.num_results
            && !(1..=100).contains(&n)
        {
            return Err(invalid("defaults.num_results", "must be 1-100"));
        }

        if let Some(t) = self.defaults.search_type.as_deref()
            && !matches!(t, "auto" | "neural" | "keyword")
        {
            return Err(invalid("defaults.search_type", "must be auto, neural, or keyword"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_cache_entries() {
        let config = AppConfig { cache_max_entries: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_max_entries"));
    }

    #[test]
    fn test_validate_zero_sessions() {
        let config = AppConfig { max_sessions: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_sessions"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_num_results_range() {
        let mut config = AppConfig::default();
        config.defaults.num_results = Some(0);
        assert!(config.validate().is_err());

        config.defaults.num_results = Some(101);
        assert!(config.validate().is_err());

        config.defaults.num_results = Some(15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_search_type() {
        let mut config = AppConfig::default();
        config.defaults.search_type = Some("psychic".into());
        assert!(config.validate().is_err());

        config.defaults.search_type = Some("neural".into());
        assert!(config.validate().is_ok());
    }
}
