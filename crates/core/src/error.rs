//! Errors raised before any backend is contacted
//!
//! Each [`Error`] carries an [`ErrorCode`] that groups it for reporting and
//! decides the process exit code, plus an optional hint for the user.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Stable identifier of a failure, printed as `E<number>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ErrorCode {
    Internal = 1000,

    // 3xxx: reading clubhouse.toml
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,

    // 5xxx: response cache
    CacheLockPoisoned = 5001,
}

impl ErrorCode {
    /// Numeric value, e.g. 3001
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Group name derived from the thousands digit
    pub fn category(self) -> &'static str {
        match self.code() / 1000 {
            3 => "Configuration",
            5 => "Cache",
            _ => "General",
        }
    }

    /// Process exit code for an error of this kind
    pub fn exit_code(self) -> u8 {
        match self.category() {
            "Configuration" => exit_codes::CONFIG_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// A coded error with an optional hint and cause
#[derive(Error, Debug)]
pub struct Error {
    /// What went wrong, for programs
    pub code: ErrorCode,
    /// What went wrong, for people
    pub message: String,
    /// How to fix it, if we know
    pub suggestion: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error {
    /// Create an error with no hint or cause
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestion: None,
            source: None,
        }
    }

    /// Attach a hint for the user
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[allow(missing_docs)]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    #[allow(missing_docs)]
    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a clubhouse.toml file or pass --config with an existing path")
    }

    #[allow(missing_docs)]
    pub fn config_parse(origin: &str, err: toml::de::Error) -> Self {
        Self::new(ErrorCode::ConfigParseError, format!("Failed to parse {origin}: {err}")).with_source(err)
    }

    #[allow(missing_docs)]
    pub fn cache_poisoned() -> Self {
        Self::new(
            ErrorCode::CacheLockPoisoned,
            "Response cache lock was poisoned by a panicking writer",
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes of the `clubhouse` binary
#[allow(missing_docs)]
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const NOT_FOUND: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const BACKEND_ERROR: u8 = 4;
}
