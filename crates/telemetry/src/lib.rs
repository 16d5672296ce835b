//! Logging and in-process metrics for the Clubhouse adapters
//!
//! Logs go to stderr through `tracing`, either compact or as JSON lines,
//! so stdout stays clean for command output. `RUST_LOG` overrides the
//! configured level.

use clubhouse_core::config::{LogFormat, LoggingConfig};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

pub mod metrics;

pub use metrics::{names, Metrics, Snapshot, Timer};

static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Metrics shared by the whole process
pub fn metrics() -> &'static Metrics {
    &METRICS
}

/// Random id attached to every log line of this process
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// How the subscriber is assembled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub filter: String,
    /// Compact text lines or one JSON object per line
    pub format: LogFormat,
    /// Include the module path of each event
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Compact,
            with_target: false,
        }
    }
}

impl From<&LoggingConfig> for TelemetryConfig {
    fn from(logging: &LoggingConfig) -> Self {
        Self {
            filter: logging.level.clone(),
            format: logging.format,
            ..Self::default()
        }
    }
}

impl TelemetryConfig {
    /// Replace the filter, e.g. for `--verbose`
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target);

    let installed = match config.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(config.env_filter())
            .with(layer.compact())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(config.env_filter())
            .with(layer.json())
            .try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::debug!(
        session_id = session_id(),
        version = env!("CARGO_PKG_VERSION"),
        filter = %config.filter,
        "Logging ready"
    );
    Ok(())
}
