//! Extraction dispatch
//!
//! Size cap first, then dispatch on declared MIME type with filename
//! suffix as fallback, then an emptiness check on whatever came out.

use crate::docx::extract_docx;
use crate::error::ExtractError;
use crate::pdf::extract_pdf;
use crate::types::{BatchOutcome, FileKind, IncomingFile, RejectedFile};
use homebid_domain::UploadedFile;
use tracing::{debug, warn};

/// Hard cap on uploaded file size: 5 MiB, enforced before any parsing
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Extract plain text from an uploaded file
///
/// # Errors
///
/// - `TooLarge` when the file exceeds [`MAX_FILE_SIZE`]
/// - `UnsupportedType` when neither the declared type nor the suffix is an
///   accepted kind
/// - `EmptyOrCorrupt` when dispatch succeeds but yields only whitespace
/// - `Pdf` / `Docx` / `InvalidUtf8` when the format-specific parse fails
pub fn extract(file: &IncomingFile) -> Result<String, ExtractError> {
    if file.size() > MAX_FILE_SIZE {
        return Err(ExtractError::TooLarge {
            size: file.size(),
            limit: MAX_FILE_SIZE,
        });
    }

    let kind = FileKind::detect(&file.declared_type, &file.name)
        .ok_or_else(|| ExtractError::UnsupportedType(file.declared_type.clone()))?;

    debug!(
        "Extracting '{}' ({} bytes) as {:?}",
        file.name,
        file.size(),
        kind
    );

    let text = match kind {
        FileKind::Pdf => extract_pdf(&file.bytes)?,
        FileKind::Docx => extract_docx(&file.bytes)?,
        // Verbatim UTF-8: no HTML stripping, no markdown parsing
        FileKind::Text => {
            String::from_utf8(file.bytes.clone()).map_err(|_| ExtractError::InvalidUtf8)?
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyOrCorrupt);
    }

    Ok(text)
}

/// Extract a multi-file upload batch
///
/// Each file's outcome is isolated: failures are collected per file and
/// never abort extraction of the others. Accepted files keep upload order.
pub fn extract_batch(files: Vec<IncomingFile>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for file in files {
        match extract(&file) {
            Ok(text) => outcome.accepted.push(UploadedFile::new(file.name, text)),
            Err(error) => {
                warn!("Rejected '{}': {}", file.name, error);
                outcome.rejected.push(RejectedFile {
                    name: file.name,
                    error,
                });
            }
        }
    }

    outcome
}
