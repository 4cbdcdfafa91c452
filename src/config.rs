use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_PATH_VAR: &str = "PORTFOLIO_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "site.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct SiteConfig {
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub captcha: CaptchaConfig,
}

impl SiteConfig {
    /// Reads `site.toml` (or `$PORTFOLIO_CONFIG`) if present, then applies
    /// `PORTFOLIO__SECTION__KEY` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        config::Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("PORTFOLIO").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ContentConfig {
    #[serde(default = "defaults::content_project_id")]
    pub project_id: String,
    #[serde(default = "defaults::content_dataset")]
    pub dataset: String,
    #[serde(default = "defaults::content_api_version")]
    pub api_version: String,
    #[serde(default = "defaults::content_use_cdn")]
    pub use_cdn: bool,
    #[serde(default = "defaults::content_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RelayConfig {
    #[serde(default = "defaults::relay_endpoint")]
    pub endpoint: String,
    pub access_key: Option<String>,
    #[serde(default = "defaults::relay_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeoConfig {
    /// `{ip}` is replaced with the requester's address.
    #[serde(default = "defaults::geo_endpoint")]
    pub endpoint: String,
    #[serde(default = "defaults::geo_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CaptchaConfig {
    #[serde(default)]
    pub site_key: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: defaults::content_project_id(),
            dataset: defaults::content_dataset(),
            api_version: defaults::content_api_version(),
            use_cdn: defaults::content_use_cdn(),
            timeout_secs: defaults::content_timeout_secs(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::relay_endpoint(),
            access_key: None,
            timeout_secs: defaults::relay_timeout_secs(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::geo_endpoint(),
            timeout_secs: defaults::geo_timeout_secs(),
        }
    }
}

mod defaults {
    pub fn log_level() -> String {
        "info".to_string()
    }

    pub fn content_project_id() -> String {
        "2a99ehdl".to_string()
    }

    pub fn content_dataset() -> String {
        "production".to_string()
    }

    pub fn content_api_version() -> String {
        "2026-01-10".to_string()
    }

    pub fn content_use_cdn() -> bool {
        true
    }

    pub fn content_timeout_secs() -> u64 {
        10
    }

    pub fn relay_endpoint() -> String {
        "https://api.web3forms.com/submit".to_string()
    }

    pub fn relay_timeout_secs() -> u64 {
        10
    }

    pub fn geo_endpoint() -> String {
        "https://ipapi.co/{ip}/json/".to_string()
    }

    pub fn geo_timeout_secs() -> u64 {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(s: &str) -> SiteConfig {
        config::Config::builder()
            .add_source(File::from_str(s, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.content.dataset, "production");
        assert!(config.content.use_cdn);
        assert_eq!(config.relay.endpoint, "https://api.web3forms.com/submit");
        assert_eq!(config.relay.access_key, None);
        assert_eq!(config.geo.timeout_secs, 3);
        assert!(config.captcha.site_key.is_empty());
    }

    #[test]
    fn test_partial_sections() {
        let config = from_toml(
            r#"
            log_level = "debug"

            [content]
            project_id = "abc123"
            use_cdn = false

            [relay]
            endpoint = "https://relay.example.com/send"
            access_key = "key"

            [captcha]
            site_key = "0x4AAA"
            "#,
        );
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.content.project_id, "abc123");
        assert_eq!(config.content.api_version, "2026-01-10");
        assert!(!config.content.use_cdn);
        assert_eq!(config.relay.endpoint, "https://relay.example.com/send");
        assert_eq!(config.relay.access_key.as_deref(), Some("key"));
        assert_eq!(config.relay.timeout_secs, 10);
        assert_eq!(config.captcha.site_key, "0x4AAA");
    }
}
