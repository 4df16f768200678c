use crate::models::ErrorBody;
use crate::store::StoreError;
use axum::{http::StatusCode, Json};
use thiserror::Error;
use tracing::error;

/// Failures of the entry log operations, independent of transport.
#[derive(Debug, Error)]
pub enum JarError {
    #[error("not logged in")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Not logged in".to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Logs `err` and hides it behind `message`.
    pub fn internal(message: &str, err: impl std::error::Error) -> Self {
        error!("{message}: {err}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }

    /// Maps a [`JarError`] to its HTTP form, using `failure` as the generic
    /// message for store errors.
    pub fn context(failure: &'static str) -> impl Fn(JarError) -> AppError {
        move |err| match err {
            JarError::Unauthenticated => AppError::unauthorized(),
            JarError::Validation(message) => AppError::bad_request(message),
            JarError::NotFound(message) => AppError::not_found(message),
            JarError::Store(err) => AppError::internal(failure, err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}
