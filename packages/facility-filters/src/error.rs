//! Typed errors for the filter library.

use thiserror::Error;

/// Errors raised while validating coordinates or decoding search parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180]
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Unit string was neither miles nor kilometers
    #[error("invalid distance unit: {0}")]
    InvalidUnit(String),

    /// A query parameter could not be parsed
    #[error("invalid value for `{name}`: {value}")]
    InvalidParam { name: &'static str, value: String },
}

/// Result type alias for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
