//! HTTP error mapping.
//!
//! Every failure leaves the server as
//! `{"status": "error", "message": "..."}` with a status code derived from
//! the store's error taxonomy:
//!
//! ```text
//! DbError::NotFound             → 404 Not Found
//! DbError::UniqueViolation      → 409 Conflict
//! DbError::ReferentialBlock     → 409 Conflict
//! DbError::ConstraintViolation  → 422 Unprocessable Entity
//! anything else                 → 500 Internal Server Error
//! ```
//!
//! Rejected request bodies, paths and query strings keep the status axum
//! assigns them (400, 415 or 422).

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] DbError),

    /// A report found nothing for the requested key.
    #[error("{0}")]
    NotFound(String),

    #[error("{}", .0.body_text())]
    Json(#[from] JsonRejection),

    #[error("{}", .0.body_text())]
    Path(#[from] PathRejection),

    #[error("{}", .0.body_text())]
    Query(#[from] QueryRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Json(rejection) => rejection.status(),
            ApiError::Path(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
            ApiError::Db(err) => match err {
                DbError::NotFound { .. } => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } | DbError::ReferentialBlock { .. } => {
                    StatusCode::CONFLICT
                }
                DbError::ConstraintViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
