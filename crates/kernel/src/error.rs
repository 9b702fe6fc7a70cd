//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Not found.")]
    NotFound,

    #[error("authentication credentials were not provided or are invalid")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    /// A write rejected by a model rule (singleton guard, invalid field).
    #[error("{0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        };

        let detail = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "internal server error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl AppError {
    /// Classify a failed write.
    ///
    /// Dangling references and out-of-range values are the client's fault;
    /// everything else, unique violations included, stays a server error.
    pub fn from_write(err: anyhow::Error) -> Self {
        if let Some(sqlx::Error::Database(db)) = err.downcast_ref::<sqlx::Error>() {
            if db.is_foreign_key_violation() {
                return AppError::Validation("a referenced object does not exist".to_string());
            }
            if db.is_check_violation() {
                return AppError::Validation("a value is out of range".to_string());
            }
            // string_data_right_truncation
            if db.code().as_deref() == Some("22001") {
                return AppError::Validation("a value is too long".to_string());
            }
        }
        AppError::Internal(err)
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
