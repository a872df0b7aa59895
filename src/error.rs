use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{models::ErrorResponse, repository::StoreError};

/// AppError
///
/// Every failure a request can end with. Each variant maps to exactly one
/// HTTP status. Server-side variants carry their cause for logging only; the
/// response body for them is always generic.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("username already exists")]
    UsernameTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or missing authentication token")]
    Unauthenticated,
    #[error("access denied")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("persistence failure: {0}")]
    Persistence(#[source] StoreError),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::UsernameTaken => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for AppError {
    /// A missing row becomes `NotFound`; everything else is a store failure.
    /// Callers that give `Conflict` a domain meaning match on it first.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(what),
            other => AppError::Persistence(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Persistence(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
