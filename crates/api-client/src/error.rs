//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Why an entry could not be flattened into a single locale
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// The entry carries no translation records at all
    #[error("No translations")]
    NoTranslations,

    /// None of the translation records is in the requested locale
    #[error("No {0} translation available")]
    MissingLocale(String),
}

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response had no `data` member
    #[error("Error when retrieving {resource}")]
    MissingData {
        /// What was being fetched
        resource: String,
    },

    /// An entry could not be flattened into the requested locale
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Neither the current nor the default locale is available
    #[error("{resource} {id} not available in default locale {locale}")]
    NotAvailableInDefaultLocale {
        /// Kind of entry
        resource: String,
        /// Entry identifier
        id: String,
        /// The default locale that was tried last
        locale: String,
    },

    /// A lookup that must yield exactly one record yielded none
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of record
        resource: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Error raised by the shared core (cache, configuration)
    #[error(transparent)]
    Core(#[from] clubhouse_core::Error),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a missing-data error
    pub fn missing_data(resource: impl Into<String>) -> Self {
        Self::MissingData {
            resource: resource.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Check if this is a not-found condition
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. }) || matches!(self, Self::ApiResponse { status: 404, .. })
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_messages() {
        assert_eq!(TranslationError::NoTranslations.to_string(), "No translations");
        assert_eq!(
            TranslationError::MissingLocale("fr".to_string()).to_string(),
            "No fr translation available"
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ApiError::not_found("match", 42).is_not_found());
        assert!(ApiError::api_response(404, "gone").is_not_found());
        assert!(!ApiError::missing_data("news").is_not_found());
    }

    #[test]
    fn test_status_classification() {
        assert!(ApiError::api_response(403, "forbidden").is_client_error());
        assert!(ApiError::api_response(502, "bad gateway").is_server_error());
        assert!(!ApiError::config("x").is_server_error());
    }

    #[test]
    fn test_missing_data_message() {
        assert_eq!(ApiError::missing_data("news").to_string(), "Error when retrieving news");
    }
}
