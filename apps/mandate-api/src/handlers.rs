//! HTTP handlers for the mandate API

use crate::error::ApiError;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Mandates are composed in the browser; the server only answers 501.
pub async fn generate_pdf() -> Result<(), ApiError> {
    tracing::debug!("rejected server-side mandate generation");
    Err(ApiError::NotImplemented {
        message: "Server-side PDF generation is not available".to_string(),
        hint: "generate the mandate in the browser".to_string(),
    })
}
