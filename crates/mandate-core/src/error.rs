use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced to callers of the composer.
#[derive(Error, Debug)]
pub enum MandateError {
    #[error("Document sink unavailable: {0}")]
    Environment(String),

    #[error("Failed to compose mandate document: {0}")]
    Composition(String),

    #[error("Failed to deliver mandate document: {0}")]
    Sink(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures raised while rendering a single document.
///
/// These never leave the crate unwrapped: the compose entry point folds
/// them into [`MandateError::Composition`].
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("scheme catalog lookup failed for '{scheme}': {reason}")]
    Catalog { scheme: String, reason: String },

    #[error("layout failed: {0}")]
    Layout(String),

    #[error("PDF serialization failed: {0}")]
    Serialization(String),
}

impl From<RenderError> for MandateError {
    fn from(err: RenderError) -> Self {
        MandateError::Composition(err.to_string())
    }
}
