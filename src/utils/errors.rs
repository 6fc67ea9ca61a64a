//! Application error taxonomy and the wire-stable error envelope.
//!
//! Every failure in the service funnels through [`AppError`]. Handlers and
//! services return it untouched; the single classification point is
//! [`AppError::classify`], invoked when the error is turned into a response.
//! Clients always receive an [`ErrorResponse`] body, never a raw error
//! message for 500-class failures.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "We encountered an error while processing your request.";
const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
const UNAUTHORIZED_MESSAGE: &str = "You are not authenticated to perform the requested action.";
const FORBIDDEN_MESSAGE: &str = "You are not authorized to perform the requested action.";
const BAD_REQUEST_MESSAGE: &str = "Your request is in a bad format.";
const VALIDATION_MESSAGE: &str = "There is some problem with the data you submitted.";

/// Normalized error body returned to clients.
///
/// `status` always mirrors the HTTP status code of the response. `details`
/// is present only for validation failures and is sorted by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One offending field in a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

/// A typed failure on its way up to the classification boundary.
#[derive(Debug)]
pub enum AppError {
    /// An envelope built upstream, passed through unchanged.
    Envelope(ErrorResponse),
    /// Field-level validation failures.
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound,
    /// Anything else. The cause is logged, never sent to the client.
    Internal(anyhow::Error),
}

impl AppError {
    pub fn bad_request() -> Self {
        Self::BadRequest(BAD_REQUEST_MESSAGE.to_string())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden(FORBIDDEN_MESSAGE.to_string())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// An envelope carrying an arbitrary status and message, for protocol
    /// errors that already know their status code.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        if status == StatusCode::NOT_FOUND {
            return Self::NotFound;
        }
        Self::Envelope(ErrorResponse::new(status, message))
    }

    /// Ordered classification into the wire envelope; first match wins.
    pub fn classify(&self) -> ErrorResponse {
        match self {
            Self::Envelope(res) => res.clone(),
            Self::Validation(errors) => invalid_input(errors),
            Self::BadRequest(message) => ErrorResponse::new(StatusCode::BAD_REQUEST, message),
            Self::Unauthorized(message) => ErrorResponse::new(StatusCode::UNAUTHORIZED, message),
            Self::Forbidden(message) => ErrorResponse::new(StatusCode::FORBIDDEN, message),
            Self::NotFound => ErrorResponse::not_found(),
            Self::Internal(_) => ErrorResponse::internal(),
        }
    }
}

/// Builds the 400 envelope for a validation failure, enumerating every
/// offending field sorted by name.
fn invalid_input(errors: &ValidationErrors) -> ErrorResponse {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .map(|(field, failures)| {
            let messages: Vec<String> = failures
                .iter()
                .map(|failure| {
                    failure
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
                .collect();
            FieldError {
                field: field.to_string(),
                error: messages.join("; "),
            }
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));

    ErrorResponse {
        status: StatusCode::BAD_REQUEST.as_u16(),
        message: VALIDATION_MESSAGE.to_string(),
        details: Some(details),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.classify();
        if body.status == StatusCode::INTERNAL_SERVER_ERROR.as_u16() {
            error!(error = ?self, "encountered internal server error");
        }
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.classify().message)
    }
}

impl std::error::Error for AppError {}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
