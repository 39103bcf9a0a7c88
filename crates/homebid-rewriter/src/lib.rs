//! Homebid Document Rewriter
//!
//! A rewrite is one generative call that replaces the offer document
//! wholesale: the current document and an instruction go in, a complete
//! markdown document comes out. There is no post-processing, no schema
//! validation, and no diffing against the input; an empty response is a
//! terminal failure for that call and leaves the caller's document
//! untouched.
//!
//! Two modes share the same mechanics:
//!
//! - feedback mode: the instruction is free-text user feedback
//! - files mode: the instruction is the labeled concatenation of all
//!   uploaded files' extracted text, in upload order

#![warn(missing_docs)]

mod error;
mod prompt;
mod rewriter;

pub use error::RewriteError;
pub use prompt::{PromptBuilder, FILE_DELIMITER};
pub use rewriter::Rewriter;
