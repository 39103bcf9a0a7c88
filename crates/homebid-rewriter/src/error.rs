//! Error types for document rewriting

use homebid_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during a rewrite
#[derive(Error, Debug)]
pub enum RewriteError {
    /// The backend answered, but with an empty or missing document
    #[error("Failed to generate offer")]
    GenerationFailed,

    /// The backend was unreachable or errored
    #[error("Generative backend error: {0}")]
    Backend(String),
}

impl From<LlmError> for RewriteError {
    fn from(e: LlmError) -> Self {
        RewriteError::Backend(e.to_string())
    }
}
