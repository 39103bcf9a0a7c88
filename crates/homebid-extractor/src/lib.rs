//! Homebid Text Extraction Layer
//!
//! Converts uploaded supporting documents into plain text for the offer
//! generation pipeline. Five file kinds are accepted: PDF, DOCX, plain
//! text, HTML, and markdown. Everything else is rejected up front.
//!
//! Extraction is side-effect-free: the same bytes always produce the same
//! text or the same error, so a rejected upload can simply be retried.
//!
//! # Examples
//!
//! ```
//! use homebid_extractor::{extract, IncomingFile};
//!
//! let file = IncomingFile::new("notes.txt", "text/plain", b"Purchase Price: $450,000".to_vec());
//! let text = extract(&file).unwrap();
//! assert_eq!(text, "Purchase Price: $450,000");
//! ```

#![warn(missing_docs)]

mod docx;
mod error;
mod extractor;
mod pdf;
mod types;

pub use error::ExtractError;
pub use extractor::{extract, extract_batch, MAX_FILE_SIZE};
pub use types::{BatchOutcome, FileKind, IncomingFile, RejectedFile};
