//! Demo Backend Errors
//!
//! Every error leaves the server as `{"detail": "..."}`, the same body the
//! real backend proxy emits.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorDetail;

#[derive(Error, Debug)]
pub enum DemoError {
    /// Request parameters out of range
    #[error("{0}")]
    Validation(String),

    /// No valid session cookie
    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DemoError {
    pub fn status(&self) -> StatusCode {
        match self {
            DemoError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DemoError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DemoError::Internal(_) | DemoError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DemoError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Demo backend error");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorDetail {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type DemoResult<T> = Result<T, DemoError>;
