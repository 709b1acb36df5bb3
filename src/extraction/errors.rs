use std::time::Duration;
use thiserror::Error;

// * Failures of a single model invocation.
// * Only `ModelUnavailable` aborts an extraction run; the others fail one batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model runtime unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model process failed: {0}")]
    InvocationError(String),
}

impl ModelError {
    /// Whether no further batch can succeed after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, ModelError::ModelUnavailable(_))
    }
}
