//! Error types for the geocoding client.

use thiserror::Error;

/// Result type for geocoding operations.
pub type Result<T> = std::result::Result<T, GeocodingError>;

/// Geocoding client errors.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Configuration error (missing API key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The query was valid but matched nothing (`ZERO_RESULTS`)
    #[error("No results for: {0}")]
    NoResults(String),

    /// `OVER_QUERY_LIMIT` / `OVER_DAILY_LIMIT`
    #[error("Geocoding quota exceeded: {0}")]
    QuotaExceeded(String),

    /// `REQUEST_DENIED`, usually an invalid or restricted API key
    #[error("Geocoding request denied: {0}")]
    RequestDenied(String),

    /// `INVALID_REQUEST`, e.g. empty address
    #[error("Invalid geocoding request: {0}")]
    InvalidRequest(String),

    /// Non-2xx response or `UNKNOWN_ERROR`
    #[error("Geocoding API error ({status}): {message}")]
    Api { status: String, message: String },

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GeocodingError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded(_) | Self::Network(_) | Self::Api { .. }
        )
    }
}
