//! HTTP-facing error type.
//!
//! Models and actions return `anyhow::Result`. Handlers convert into
//! `ApiError`, which downcasts the known error types (validation, not-found,
//! sqlx, filter parsing, ingestion, geocoding) into the right status code and
//! renders `{"error": ..., "details": [...]}`.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use facility_filters::FilterError;
use google_geocoding::GeocodingError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domains::ingestion::IngestError;

/// Input failed a domain rule. Always a 400.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
    pub details: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Error attributed to one input field, e.g. `legend_color: is required`.
    pub fn field(name: &str, problem: impl Into<String>) -> Self {
        Self {
            field: Some(name.to_string()),
            message: format!("{}: {}", name, problem.into()),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// An active record with this id does not exist.
#[derive(Debug, Clone, Error)]
#[error("{0} not found")]
pub struct NotFoundError(pub &'static str);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String, details: Vec<String> },

    #[error("{0}")]
    NotFound(String),

    /// A dependency failed in a way the caller should hear about (500, message shown)
    #[error("{0}")]
    Upstream(String),

    /// Anything else (500, message hidden)
    #[error(transparent)]
    Internal(anyhow::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_sqlx(err: sqlx::Error) -> Self {
        let message = match &err {
            sqlx::Error::RowNotFound => return Self::NotFound("Resource not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Some("duplicate: a record with this value already exists".to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => Some(format!(
                "Value violates constraint {}",
                db.constraint().unwrap_or("check")
            )),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Some("Referenced record does not exist".to_string())
            }
            // invalid_text_representation (e.g. malformed uuid or enum literal)
            sqlx::Error::Database(db) if db.code().as_deref() == Some("22P02") => {
                Some("Invalid identifier or value".to_string())
            }
            _ => None,
        };

        match message {
            Some(message) => Self::bad_request(message),
            None => Self::Internal(err.into()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest {
            message: err.message,
            details: err.details,
        }
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::BadRequest {
            message: err.to_string(),
            details: err.details(),
        }
    }
}

impl From<GeocodingError> for ApiError {
    fn from(err: GeocodingError) -> Self {
        match err {
            GeocodingError::NoResults(query) => {
                Self::bad_request(format!("Could not geocode location: {}", query))
            }
            GeocodingError::InvalidRequest(message) => {
                Self::bad_request(format!("Invalid geocoding request: {}", message))
            }
            GeocodingError::QuotaExceeded(_) => {
                Self::Upstream("Geocoding quota exceeded, try again later".into())
            }
            GeocodingError::RequestDenied(_) | GeocodingError::Config(_) => {
                Self::Upstream("Geocoding service is not configured correctly".into())
            }
            other => Self::Upstream(format!("Geocoding service unavailable: {}", other)),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_sqlx(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::bad_request(format!("Invalid multipart upload: {}", err.body_text()))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ValidationError>() {
            Ok(e) => return e.into(),
            Err(err) => err,
        };
        let err = match err.downcast::<NotFoundError>() {
            Ok(e) => return e.into(),
            Err(err) => err,
        };
        let err = match err.downcast::<FilterError>() {
            Ok(e) => return e.into(),
            Err(err) => err,
        };
        let err = match err.downcast::<IngestError>() {
            Ok(e) => return e.into(),
            Err(err) => err,
        };
        let err = match err.downcast::<GeocodingError>() {
            Ok(e) => return e.into(),
            Err(err) => err,
        };
        match err.downcast::<sqlx::Error>() {
            Ok(e) => Self::from_sqlx(e),
            Err(err) => Self::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, details) = match self {
            Self::BadRequest { message, details } => (message, details),
            Self::NotFound(message) => (message, Vec::new()),
            Self::Upstream(message) => {
                error!(error = %message, "Upstream service failure");
                (message, Vec::new())
            }
            Self::Internal(e) => {
                error!(error = ?e, "Internal server error");
                ("Internal server error".to_string(), Vec::new())
            }
        };

        let mut body = json!({ "error": message });
        if !details.is_empty() {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}
