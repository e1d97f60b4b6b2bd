//! Error types for rolodex operations.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::ValidationErrors;

/// Title used for every validation problem response.
pub const VALIDATION_TITLE: &str = "One or more validation errors occurred.";

/// Errors that can occur during repository operations.
///
/// "Not found" is deliberately absent: lookups return `Ok(None)` and updates of
/// unknown ids return `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// A client with the same id is already stored.
    #[error("client with id {0:?} already exists")]
    AlreadyExists(String),
    /// The backing store failed internally.
    #[error("internal repository error: {0}")]
    Internal(String),
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The submitted client failed validation.
    #[error("{}", VALIDATION_TITLE)]
    Validation(#[from] ValidationErrors),
    /// The requested client does not exist.
    #[error("client not found")]
    NotFound,
    /// The request itself was malformed.
    #[error("{0}")]
    BadRequest(String),
    /// The request conflicts with stored state.
    #[error("{0}")]
    Conflict(String),
    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            RepositoryError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let problem = match self {
            ApiError::Validation(errors) => ProblemDetails {
                title: VALIDATION_TITLE.to_string(),
                status: status.as_u16(),
                errors: errors.into_map(),
            },
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                ProblemDetails::new(status, "internal server error")
            }
            other => ProblemDetails::new(status, other.to_string()),
        };
        (status, Json(problem)).into_response()
    }
}

/// JSON body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Human-readable summary of the problem.
    pub title: String,
    /// The HTTP status code, repeated in the body.
    pub status: u16,
    /// Field-level validation messages; empty unless validation failed.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ProblemDetails {
    /// Creates a problem body without field errors.
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.as_u16(),
            errors: BTreeMap::new(),
        }
    }
}
