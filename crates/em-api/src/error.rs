use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::content::ContentError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("content provider error: {0}")]
    Content(#[from] ContentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Content(ContentError::QuotaExceeded) => StatusCode::TOO_MANY_REQUESTS,
            Self::Content(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
