//! Configuration for the Clubhouse API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use clubhouse_core::config::ConfigSchema;
use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

/// Default production CMS URL
const DEFAULT_CMS_URL: &str = "https://cms.clubhouse.dev";

/// Default tournament provider URL
const DEFAULT_TOURNAMENT_URL: &str = "https://api.leverade.com";

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (typically a CMS on localhost)
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse from environment variable
    pub fn from_env() -> Self {
        Self::parse(&env::var("CLUBHOUSE_ENV").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the CMS REST API
    pub cms_url: String,
    /// Base URL of the tournament JSON:API backend
    pub tournament_url: String,
    /// Static CMS access token, sent as a bearer token to the CMS only
    pub cms_access_token: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Locale every CMS entry is expected to be translated into
    pub default_locale: String,
    /// Headers added to every outgoing request
    pub extra_headers: BTreeMap<String, String>,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cms_url: DEFAULT_CMS_URL.to_string(),
            tournament_url: DEFAULT_TOURNAMENT_URL.to_string(),
            cms_access_token: None,
            timeout: Duration::from_secs(30),
            default_locale: "en".to_string(),
            extra_headers: BTreeMap::new(),
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `CLUBHOUSE_CMS_URL`: Base URL of the CMS
    /// - `CLUBHOUSE_TOURNAMENT_URL`: Base URL of the tournament provider
    /// - `CLUBHOUSE_CMS_TOKEN`: Static CMS access token
    /// - `CLUBHOUSE_DEFAULT_LOCALE`: Fallback locale for CMS content
    /// - `CLUBHOUSE_ENV`: Environment (development/staging/production)
    /// - `CLUBHOUSE_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let base = match Environment::from_env() {
            Environment::Development => Self::development(),
            Environment::Staging | Environment::Production => Self {
                environment: Environment::from_env(),
                ..Self::default()
            },
        };
        Ok(base.with_env_overrides())
    }

    /// Create configuration from a loaded `clubhouse.toml`, then apply
    /// environment overrides
    pub fn from_schema(schema: &ConfigSchema) -> Self {
        Self {
            cms_url: schema.cms.url.clone(),
            tournament_url: schema.tournament.url.clone(),
            cms_access_token: schema.cms.access_token.clone(),
            timeout: Duration::from_secs(schema.general.timeout_secs),
            default_locale: schema.cms.default_locale.clone(),
            extra_headers: BTreeMap::new(),
            environment: Environment::from_env(),
        }
        .with_env_overrides()
    }

    /// Create development configuration (local CMS)
    #[must_use]
    pub fn development() -> Self {
        Self {
            cms_url: "http://localhost:8055".to_string(),
            tournament_url: DEFAULT_TOURNAMENT_URL.to_string(),
            cms_access_token: env::var("CLUBHOUSE_CMS_TOKEN").ok(),
            timeout: Duration::from_secs(10),
            default_locale: "en".to_string(),
            extra_headers: BTreeMap::new(),
            environment: Environment::Development,
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("CLUBHOUSE_CMS_URL") {
            self.cms_url = url;
        }
        if let Ok(url) = env::var("CLUBHOUSE_TOURNAMENT_URL") {
            self.tournament_url = url;
        }
        if let Ok(token) = env::var("CLUBHOUSE_CMS_TOKEN") {
            self.cms_access_token = Some(token);
        }
        if let Ok(locale) = env::var("CLUBHOUSE_DEFAULT_LOCALE") {
            self.default_locale = locale;
        }
        if let Some(timeout) = env::var("CLUBHOUSE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
        {
            self.timeout = timeout;
        }
        self
    }

    /// Builder-style method to set the CMS URL
    #[must_use]
    pub fn with_cms_url(mut self, url: impl Into<String>) -> Self {
        self.cms_url = url.into();
        self
    }

    /// Builder-style method to set the tournament provider URL
    #[must_use]
    pub fn with_tournament_url(mut self, url: impl Into<String>) -> Self {
        self.tournament_url = url.into();
        self
    }

    /// Builder-style method to set the CMS access token
    #[must_use]
    pub fn with_cms_access_token(mut self, token: impl Into<String>) -> Self {
        self.cms_access_token = Some(token.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the default locale
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Builder-style method to add a header sent with every request
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (key, url) in [("cms_url", &self.cms_url), ("tournament_url", &self.tournament_url)] {
            if url.is_empty() {
                return Err(ApiError::config(format!("{key} cannot be empty")));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config(format!("{key} must start with http:// or https://")));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.default_locale.trim().is_empty() {
            return Err(ApiError::config("default_locale cannot be empty"));
        }

        for name in self.extra_headers.keys() {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::config(format!("invalid header name: {name}")))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.cms_url.starts_with("https://"));
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_development_config() {
        let config = ClientConfig::development();
        assert!(config.cms_url.contains("localhost"));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("DEV"), Environment::Development);
        assert_eq!(Environment::parse("stage"), Environment::Staging);
        assert_eq!(Environment::parse(""), Environment::Production);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_cms_url("https://cms.test")
            .with_tournament_url("https://leverade.test")
            .with_default_locale("de")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.cms_url, "https://cms.test");
        assert_eq!(config.tournament_url, "https://leverade.test");
        assert_eq!(config.default_locale, "de");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_cms_url("").validate().is_err());
        assert!(ClientConfig::default().with_tournament_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_default_locale(" ").validate().is_err());
        assert!(ClientConfig::default().with_timeout(Duration::ZERO).validate().is_err());
        assert!(ClientConfig::default().with_header("bad header", "x").validate().is_err());
    }

    #[test]
    fn test_from_schema_copies_sections() {
        let mut schema = ConfigSchema::default();
        schema.general.timeout_secs = 5;
        schema.cms.access_token = Some("secret".to_string());

        let config = ClientConfig::from_schema(&schema);
        assert!(config.cms_access_token.is_some());
        assert!(config.extra_headers.is_empty());
    }
}
