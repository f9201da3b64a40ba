use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use quill_types::api::FormErrors;

/// One message for unknown-user and wrong-password alike — callers cannot
/// enumerate usernames through login.
pub const INVALID_CREDENTIALS: &str = "Invalid username/password";
pub const DUPLICATE_USERNAME: &str = "That username already exists";

/// Per-request failures. All of these recover into a response; none are
/// fatal to the process. Two taxonomy members are deliberately absent:
/// invalid-or-expired tokens never surface (the identity middleware degrades
/// them to anonymous), and unauthorized/forbidden are guard outcomes
/// rendered as redirects, not errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// User-input shape/content failures, surfaced as field messages.
    #[error("validation failed")]
    Validation(Vec<String>),

    /// Rendered as a validation-style message, not a server error.
    #[error("username already taken")]
    DuplicateUsername,

    #[error("invalid credentials")]
    InvalidCredentials,

    /// Logged server-side; the client sees a bare 500. Secrets and digests
    /// never reach this payload.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errors = match self {
            ApiError::Validation(errors) => errors,
            ApiError::DuplicateUsername => vec![DUPLICATE_USERNAME.to_string()],
            ApiError::InvalidCredentials => vec![INVALID_CREDENTIALS.to_string()],
            ApiError::Internal(e) => {
                error!("internal error: {:#}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        (StatusCode::UNPROCESSABLE_ENTITY, Json(FormErrors { errors })).into_response()
    }
}
