//! Error types for the web crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rowforge_forms::FormError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum WebError {
    /// Failed to start the server.
    #[error("failed to start server: {0}")]
    StartupFailed(String),

    /// No grid with the given name.
    #[error("unknown grid: {0}")]
    UnknownGrid(String),

    /// Detail-form request failure.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::UnknownGrid(_) => StatusCode::NOT_FOUND,
            WebError::Form(FormError::NotAuthorized) => StatusCode::FORBIDDEN,
            WebError::Form(FormError::NotFound(_)) => StatusCode::NOT_FOUND,
            WebError::Form(FormError::BadSegment(_)) => StatusCode::BAD_REQUEST,
            WebError::Form(FormError::UnknownKind(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
