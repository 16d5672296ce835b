//! Shared command state: configuration, logging and the API client

use anyhow::{Context as _, Result};
use clubhouse_api_client::{ApiError, ClientConfig, ClubhouseClient};
use clubhouse_cli::progress::Spinner;
use clubhouse_cli::OutputFormat;
use clubhouse_core::config::Config;
use clubhouse_core::error::exit_codes;
use clubhouse_telemetry::TelemetryConfig;
use std::path::Path;
use tracing::debug;

/// Everything a command needs
pub struct Context {
    pub client: ClubhouseClient,
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config_path: Option<&Path>, locale: Option<&str>, verbose: bool, format: OutputFormat) -> Result<Self> {
        let config = Config::load(config_path)?;

        let mut telemetry = TelemetryConfig::from(&config.schema.logging);
        if verbose {
            telemetry = telemetry.with_filter("debug");
        }
        clubhouse_telemetry::init_with_config(telemetry)?;

        let client_config = ClientConfig::from_schema(&config.schema);
        let current = locale.map_or_else(|| client_config.default_locale.clone(), str::to_string);
        let client = ClubhouseClient::with_config(client_config)
            .context("Invalid client configuration")?
            .with_locale(current);

        debug!(
            config = ?config.path,
            locale = %client.locales().current_locale(),
            "Client ready"
        );

        Ok(Self { client, config, format })
    }

    /// Show a spinner unless printing JSON
    pub fn spinner(&self, message: &str) -> Spinner {
        Spinner::start(message, !self.format.is_json())
    }
}

fn api_error(error: &anyhow::Error) -> Option<&ApiError> {
    error.chain().find_map(|cause| cause.downcast_ref::<ApiError>())
}

/// Process exit code for a failed command
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(core) = error.downcast_ref::<clubhouse_core::Error>() {
        return core.code.exit_code();
    }
    match api_error(error) {
        Some(e) if e.is_not_found() => exit_codes::NOT_FOUND,
        Some(ApiError::Core(core)) => core.code.exit_code(),
        Some(ApiError::Config(_) | ApiError::InvalidUrl(_)) => exit_codes::CONFIG_ERROR,
        Some(ApiError::Request(_) | ApiError::ApiResponse { .. } | ApiError::MissingData { .. }) => {
            exit_codes::BACKEND_ERROR
        }
        _ => exit_codes::FAILURE,
    }
}

/// A hint to print below the error, if there is one
pub fn suggestion(error: &anyhow::Error) -> Option<String> {
    if let Some(core) = error.downcast_ref::<clubhouse_core::Error>() {
        return core.suggestion.clone();
    }
    match api_error(error)? {
        ApiError::NotAvailableInDefaultLocale { .. } => {
            Some("The entry has no translation in the requested or the default locale".to_string())
        }
        ApiError::Request(_) => Some("Check the backend URLs and your network connection".to_string()),
        _ => None,
    }
}
