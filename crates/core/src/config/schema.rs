//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub cms: CmsConfig,

    #[serde(default)]
    pub tournament: TournamentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Site name, used in CLI headers
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Request timeout in seconds, shared by both backends
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_site_name() -> String {
    "Clubhouse".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Headless CMS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Base URL of the CMS REST API
    #[serde(default = "default_cms_url")]
    pub url: String,

    /// Static access token, if the collections are not public
    #[serde(default)]
    pub access_token: Option<String>,

    /// Locale every entry is expected to be translated into
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Locales the site is published in
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            url: default_cms_url(),
            access_token: None,
            default_locale: default_locale(),
            locales: default_locales(),
        }
    }
}

fn default_cms_url() -> String {
    "http://localhost:8055".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_locales() -> Vec<String> {
    vec!["en", "de", "fr", "it"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Tournament data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Base URL of the JSON:API backend
    #[serde(default = "default_tournament_url")]
    pub url: String,

    /// Season used when none is given on the command line
    #[serde(default)]
    pub season_id: Option<String>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            url: default_tournament_url(),
            season_id: None,
        }
    }
}

fn default_tournament_url() -> String {
    "https://api.leverade.com".to_string()
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}
