//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from multiple sources:
//!
//! 1. Environment variables (GAMESCRAPE_*)
//! 2. TOML config file (if GAMESCRAPE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (GAMESCRAPE_*)
/// 2. TOML config file (if GAMESCRAPE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for HTTP requests.
    ///
    /// The providers answer 403 to the transport's default agent.
    /// Set via GAMESCRAPE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via GAMESCRAPE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to read per page.
    ///
    /// Set via GAMESCRAPE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Base URL of the game-information provider.
    ///
    /// Set via GAMESCRAPE_GAMEFAQS_URL environment variable.
    #[serde(default = "default_gamefaqs_url")]
    pub gamefaqs_url: String,

    /// Base URL of the critic-review provider.
    ///
    /// Set via GAMESCRAPE_GAMERANKINGS_URL environment variable.
    #[serde(default = "default_gamerankings_url")]
    pub gamerankings_url: String,

    /// Upper bound on listing pages walked when enumerating a platform.
    ///
    /// Set via GAMESCRAPE_MAX_LISTING_PAGES environment variable.
    #[serde(default = "default_max_listing_pages")]
    pub max_listing_pages: usize,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; gamescrape/0.1)".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_gamefaqs_url() -> String {
    "http://www.gamefaqs.com".into()
}

fn default_gamerankings_url() -> String {
    "http://www.gamerankings.com".into()
}

fn default_max_listing_pages() -> usize {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            headers: BTreeMap::new(),
            gamefaqs_url: default_gamefaqs_url(),
            gamerankings_url: default_gamerankings_url(),
            max_listing_pages: default_max_listing_pages(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("GAMESCRAPE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::extract(figment.merge(
            Env::prefixed("GAMESCRAPE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        ))
    }

    /// Extract and validate a configuration from an already layered figment.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_bytes, 5_242_880);
        assert!(config.headers.is_empty());
        assert_eq!(config.gamefaqs_url, "http://www.gamefaqs.com");
        assert_eq!(config.gamerankings_url, "http://www.gamerankings.com");
        assert_eq!(config.max_listing_pages, 500);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        let toml = r#"
            timeout_ms = 5000
            gamefaqs_url = "https://gamefaqs.gamespot.com"

            [headers]
            Accept-Language = "en-US"
        "#;
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(toml));
        let config = AppConfig::extract(figment).unwrap();

        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.gamefaqs_url, "https://gamefaqs.gamespot.com");
        assert_eq!(config.headers.get("Accept-Language").map(String::as_str), Some("en-US"));
        assert_eq!(config.max_listing_pages, 500);
    }

    #[test]
    fn test_extract_rejects_invalid_layer() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string("max_bytes = 0"));
        let result = AppConfig::extract(figment);
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }
}
