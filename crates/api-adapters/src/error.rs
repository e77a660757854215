//! # ApiError
//!
//! Maps domain failures to HTTP status codes and a small JSON body.

use domains::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// JSON body sent with every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(DomainError::NotFound(..)) => 404,
            Self::Domain(DomainError::Validation(_)) => 400,
            Self::Domain(err) if err.is_malformed_batch() => 422,
            Self::Domain(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::NotFound(..)) => "not_found",
            Self::Domain(DomainError::Validation(_)) => "validation",
            Self::Domain(DomainError::DanglingParentReference { .. }) => "dangling_parent",
            Self::Domain(DomainError::DuplicateCommentId(_)) => "duplicate_comment",
            Self::Domain(DomainError::CyclicParentChain(_)) => "cyclic_parent_chain",
            Self::Domain(DomainError::Internal(_)) => "internal",
        }
    }

    pub fn body(&self) -> ErrorBody {
        let message = match self {
            // infrastructure details stay in the logs
            Self::Domain(DomainError::Internal(_)) => "internal service error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            code: self.code(),
            message,
        }
    }
}

#[cfg(feature = "web-axum")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, axum::Json(self.body())).into_response()
    }
}
