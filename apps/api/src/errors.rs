use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::orchestrator::SearchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NoResults(String),

    #[error("{0}")]
    Upstream(String),
}

impl AppError {
    /// Machine-readable code and the message shown to the user.
    pub fn code_and_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NoResults(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "NO_RESULTS", msg.clone())
            }
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone()),
        }
    }

    /// JSON body shared by plain responses and streamed `error` events.
    pub fn body(&self) -> serde_json::Value {
        let (_, code, message) = self.code_and_message();
        json!({
            "error": {
                "code": code,
                "message": message
            }
        })
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NoResults => AppError::NoResults(err.to_string()),
            SearchError::Upstream { .. } => AppError::Upstream(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Upstream(msg) = &self {
            tracing::error!("Upstream error: {msg}");
        }

        let (status, _, _) = self.code_and_message();
        (status, Json(self.body())).into_response()
    }
}
