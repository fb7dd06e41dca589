//! Application configuration with layered loading.
//!
//! Configuration is assembled once at process start and passed into each
//! component; nothing else reads the environment. Loading precedence
//! (highest wins):
//!
//! 1. Environment variables (SCOUT_*)
//! 2. TOML config file (if SCOUT_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! API keys additionally fall back to the per-service env names the
//! providers document (`EXA_API_KEY`, ...) and then to
//! `~/.config/<service>/api_key` files written by `scout setup`.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// The three credentialed services in the pipeline.
pub const SERVICES: [&str; 3] = ["exa", "firecrawl", "gemini"];

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Exa API key for web search.
    #[serde(default)]
    pub exa_api_key: Option<String>,

    /// Firecrawl API key for page extraction.
    #[serde(default)]
    pub firecrawl_api_key: Option<String>,

    /// Gemini API key for content analysis.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Directory for cached extractions.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory for search sessions.
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,

    /// Cache entry time-to-live in hours.
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: i64,

    /// Maximum retained cache entries.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Session expiry window in hours.
    #[serde(default = "default_session_expiry_hours")]
    pub session_expiry_hours: i64,

    /// Maximum retained id-keyed sessions (the latest alias is extra).
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Default search parameters, overridable per invocation.
    #[serde(default)]
    pub defaults: SearchDefaults,
}

/// Default search parameters from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchDefaults {
    #[serde(default)]
    pub num_results: Option<usize>,
    #[serde(default)]
    pub search_type: Option<String>,
    #[serde(default)]
    pub include_domains: Vec<String>,
    #[serde(default)]
    pub exclude_domains: Vec<String>,
}

fn scout_cache_root() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".cache").join("scout")
}

fn default_cache_dir() -> PathBuf {
    scout_cache_root().join("extracts")
}

fn default_session_dir() -> PathBuf {
    scout_cache_root().join("sessions")
}

fn default_cache_ttl_hours() -> i64 {
    24
}

fn default_cache_max_entries() -> usize {
    50
}

fn default_session_expiry_hours() -> i64 {
    2
}

fn default_max_sessions() -> usize {
    10
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exa_api_key: None,
            firecrawl_api_key: None,
            gemini_api_key: None,
            cache_dir: default_cache_dir(),
            session_dir: default_session_dir(),
            cache_ttl_hours: default_cache_ttl_hours(),
            cache_max_entries: default_cache_max_entries(),
            session_expiry_hours: default_session_expiry_hours(),
            max_sessions: default_max_sessions(),
            timeout_ms: default_timeout_ms(),
            defaults: SearchDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL in milliseconds.
    pub fn cache_ttl_ms(&self) -> i64 {
        self.cache_ttl_hours * 60 * 60 * 1000
    }

    /// Session expiry window in milliseconds.
    pub fn session_expiry_ms(&self) -> i64 {
        self.session_expiry_hours * 60 * 60 * 1000
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file or environment cannot be
    /// parsed, or if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SCOUT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let mut config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.resolve_key_fallbacks();
        config.validate()?;

        Ok(config)
    }

    /// Fill unset API keys from service env names and key files.
    fn resolve_key_fallbacks(&mut self) {
        for service in SERVICES {
            let slot = match service {
                "exa" => &mut self.exa_api_key,
                "firecrawl" => &mut self.firecrawl_api_key,
                _ => &mut self.gemini_api_key,
            };
            if slot.is_some() {
                continue;
            }
            *slot = lookup_service_key(service);
        }
    }

    /// Require the Exa key (search stage precondition).
    pub fn require_exa_api_key(&self) -> Result<&str, ConfigError> {
        require_key(&self.exa_api_key, "exa", "run 'scout setup' for instructions")
    }

    /// Require the Firecrawl key (extraction stage precondition).
    pub fn require_firecrawl_api_key(&self) -> Result<&str, ConfigError> {
        require_key(&self.firecrawl_api_key, "firecrawl", "run 'scout setup' for instructions")
    }

    /// Require the Gemini key (analysis stage precondition).
    pub fn require_gemini_api_key(&self) -> Result<&str, ConfigError> {
        require_key(&self.gemini_api_key, "gemini", "use --raw for markdown only")
    }

    /// Configuration status of each service key.
    pub fn key_status(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("exa", self.exa_api_key.is_some()),
            ("firecrawl", self.firecrawl_api_key.is_some()),
            ("gemini", self.gemini_api_key.is_some()),
        ]
    }
}

fn require_key<'a>(key: &'a Option<String>, service: &str, hint: &str) -> Result<&'a str, ConfigError> {
    key.as_deref().ok_or_else(|| ConfigError::Missing {
        field: format!("{service}_api_key"),
        hint: hint.to_string(),
    })
}

/// Path to the on-disk key file for a service.
pub fn key_file_path(service: &str) -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(service)
        .join("api_key")
}

fn lookup_service_key(service: &str) -> Option<String> {
    let env_name = format!("{}_API_KEY", service.to_uppercase());
    if let Ok(value) = std::env::var(&env_name)
        && !value.is_empty()
    {
        return Some(value);
    }

    std::fs::read_to_string(key_file_path(service))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Persist an API key under `~/.config/<service>/api_key` (mode 0600).
pub fn save_api_key(service: &str, key: &str) -> Result<(), std::io::Error> {
    let path = key_file_path(service);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, key.trim())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.cache_max_entries, 50);
        assert_eq!(config.session_expiry_hours, 2);
        assert_eq!(config.max_sessions, 10);
        assert_eq!(config.timeout_ms, 60_000);
        assert!(config.exa_api_key.is_none());
        assert!(config.defaults.num_results.is_none());
    }

    #[test]
    fn test_millisecond_conversions() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl_ms(), 24 * 60 * 60 * 1000);
        assert_eq!(config.session_expiry_ms(), 2 * 60 * 60 * 1000);
        assert_eq!(config.timeout(), Duration::from_millis(60_000));
    }

    #[test]
    fn test_require_key_missing() {
        let config = AppConfig::default();
        let result = config.require_gemini_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
        assert!(result.unwrap_err().to_string().contains("--raw"));
    }

    #[test]
    fn test_require_key_present() {
        let config = AppConfig { exa_api_key: Some("test-key".into()), ..Default::default() };
        assert_eq!(config.require_exa_api_key().unwrap(), "test-key");
    }

    #[test]
    fn test_key_status() {
        let config = AppConfig { firecrawl_api_key: Some("k".into()), ..Default::default() };
        let status = config.key_status();
        assert_eq!(status, vec![("exa", false), ("firecrawl", true), ("gemini", false)]);
    }
}
