//! Error types for the mandate API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The route exists but the work happens elsewhere
    #[error("{message}")]
    NotImplemented { message: String, hint: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotImplemented { message, hint } => {
                let status = StatusCode::NOT_IMPLEMENTED;
                let body = json!({
                    "error": message,
                    "status": status.as_u16(),
                    "hint": hint,
                });
                (status, body)
            }
        };

        (status, Json(body)).into_response()
    }
}
