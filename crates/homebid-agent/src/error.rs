//! Error types for the conversational agent

use homebid_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while running a user turn
#[derive(Error, Debug)]
pub enum AgentError {
    /// A turn is already in flight for this session
    #[error("A turn is already being processed for this session")]
    TurnInFlight,

    /// A model step failed; the turn ends at this terminal error
    #[error("Model step failed: {0}")]
    Model(String),
}

impl From<LlmError> for AgentError {
    fn from(e: LlmError) -> Self {
        AgentError::Model(e.to_string())
    }
}
