use http::StatusCode;
use reelhub_core::{ApiError, IntoResponse, Response};
use thiserror::Error;

/// Body message for every rejected protected request
pub const VALIDATION_FAILED_MESSAGE: &str = "CSRF token validation failed";

/// Body message when the issuing endpoint cannot produce a token
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate CSRF token";

/// Reasons a token could not be issued or a request was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsrfError {
    /// The OS random source failed
    #[error("secure random source unavailable: {0}")]
    Generation(String),
    /// Header or cookie absent (or empty) on a protected request
    #[error("CSRF header or cookie missing")]
    MissingCredential,
    /// Header and cookie present but unequal, or not of the token length
    #[error("CSRF header and cookie do not match")]
    Mismatch,
}

impl CsrfError {
    /// Short label for logs
    pub fn reason(&self) -> &'static str {
        match self {
            CsrfError::Generation(_) => "generation_failure",
            CsrfError::MissingCredential => "missing_credential",
            CsrfError::Mismatch => "mismatch",
        }
    }
}

impl From<CsrfError> for ApiError {
    fn from(err: CsrfError) -> Self {
        match err {
            CsrfError::Generation(details) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "csrf_generation_failed",
                GENERATION_FAILED_MESSAGE,
            )
            .with_internal(details),
            // Both rejection causes share one response
            CsrfError::MissingCredential | CsrfError::Mismatch => ApiError::new(
                StatusCode::FORBIDDEN,
                "csrf_forbidden",
                VALIDATION_FAILED_MESSAGE,
            ),
        }
    }
}

impl IntoResponse for CsrfError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
