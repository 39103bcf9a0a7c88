//! Homebid Conversational Update Agent
//!
//! A multi-turn dialogue in which the model may, at its discretion, invoke
//! one capability - "update the offer given feedback" - any number of times
//! within a turn, bounded by a fixed step budget. Each user turn runs an
//! explicit finite state machine:
//!
//! ```text
//! Idle -> AwaitingModel -> (ToolInvoked -> AwaitingToolResult -> AwaitingModel)* -> Done
//! ```
//!
//! The turn is strictly sequential: one model step at a time, each
//! capability executed synchronously within its step, no fan-out and no
//! cancellation. When several invocations succeed in one turn, only the
//! most recent non-empty result is applied to the authoritative document;
//! the others stay in the transcript unapplied.

#![warn(missing_docs)]

mod agent;
mod error;
mod session;

pub use agent::{
    update_tool_spec, TurnOutcome, TurnPhase, UpdateAgent, MAX_MODEL_STEPS, TOOL_FAILURE_MESSAGE,
    UPDATE_TOOL_NAME,
};
pub use error::AgentError;
pub use session::EditSession;
