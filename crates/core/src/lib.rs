//! Core utilities for the Clubhouse content adapters
//!
//! This crate provides the pieces shared by the CMS and tournament adapters:
//!
//! - **Error handling**: Coded errors with recovery hints and exit codes
//! - **Configuration**: TOML-based configuration with defaults
//! - **Locales**: Ordered locale candidates and a tagged fallback resolution
//! - **Dates**: An injectable clock and date-fns style formatting
//! - **Caching**: An in-memory, path-keyed response cache
//!
//! # Example
//!
//! ```rust
//! use clubhouse_core::locale::{first_match, LocaleCandidates};
//!
//! let candidates = LocaleCandidates::new("fr", "en");
//! let available = ["en", "de"];
//!
//! let chosen = first_match(candidates.iter(), |locale| {
//!     available.contains(&locale).then(|| locale.to_string())
//! });
//! assert_eq!(chosen.as_deref(), Some("en"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod date;
pub mod error;
pub mod locale;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{CacheStats, ResponseCache};
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::date::{format_date, Clock, FixedClock, SystemClock};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::locale::{first_match, LocaleCandidates, LocaleProvider, Resolution, StaticLocales};
}
