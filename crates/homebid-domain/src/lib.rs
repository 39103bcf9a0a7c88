//! Homebid Domain Layer
//!
//! Core types and boundary traits for the offer drafting system.
//! Infrastructure implementations (storage, generative backend, HTTP) live
//! in other crates; this crate defines the concepts they agree on.
//!
//! ## Key Concepts
//!
//! - **Offer**: the persisted record (owner, client identity, markdown
//!   content, timestamps)
//! - **Document**: the in-session markdown string being edited; replaced
//!   wholesale by each rewrite, latest result wins
//! - **UploadedFile**: extracted plain text from a supporting document,
//!   held only in session memory
//! - **Transcript**: the append-only record of one editing conversation,
//!   including tool invocations

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod offer;
pub mod template;
pub mod traits;
pub mod upload;

// Re-exports for convenience
pub use chat::{ChatRole, ToolInvocation, ToolOutcome, TranscriptEntry};
pub use offer::{Offer, OfferId};
pub use template::DEFAULT_OFFER_TEMPLATE;
pub use upload::UploadedFile;
