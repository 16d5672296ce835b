//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "clubhouse.toml";

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when nothing is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = if let Some(p) = &config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content).map_err(|e| Error::config_parse("configuration", e))?;
        Ok(Self { schema, path: None })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(FILE_NAME),
        PathBuf::from(format!(".{FILE_NAME}")),
        PathBuf::from(".config").join(FILE_NAME),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("clubhouse").join(FILE_NAME));
    }

    candidates.into_iter().find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {e}", path.display())).with_source(e))?;

    toml::from_str(&content).map_err(|e| Error::config_parse(&path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.cms.default_locale, "en");
        assert_eq!(config.schema.general.timeout_secs, 30);
    }

    #[test]
    fn test_config_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/clubhouse.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[cms]
url = "https://cms.example.org"
default_locale = "de"

[tournament]
season_id = "2024"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.path.as_deref(), Some(file.path()));
        assert_eq!(config.schema.cms.url, "https://cms.example.org");
        assert_eq!(config.schema.cms.default_locale, "de");
        assert_eq!(config.schema.tournament.season_id.as_deref(), Some("2024"));
        assert_eq!(config.schema.logging.format, LogFormat::Json);
        // untouched sections keep their defaults
        assert_eq!(config.schema.general.site_name, "Clubhouse");
    }

    #[test]
    fn test_config_parse_error() {
        let err = Config::from_toml("[cms\nurl = 1").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }
}
