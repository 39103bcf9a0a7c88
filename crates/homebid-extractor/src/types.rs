//! Upload and dispatch types

use crate::error::ExtractError;
use homebid_domain::UploadedFile;

/// MIME type of Office Open XML wordprocessing documents
const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// An uploaded file as received from the HTTP surface, before extraction
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Filename as uploaded
    pub name: String,

    /// MIME type declared by the client
    pub declared_type: String,

    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    /// Create an incoming file record
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes,
        }
    }

    /// Size of the file in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The accepted file kinds, after dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Binary PDF document
    Pdf,
    /// Office Open XML wordprocessing package
    Docx,
    /// Plain text, HTML, or markdown read verbatim as UTF-8
    Text,
}

impl FileKind {
    /// Resolve the kind from the declared MIME type, falling back to the
    /// filename suffix.
    ///
    /// Returns `None` when neither matches an accepted kind.
    pub fn detect(declared_type: &str, name: &str) -> Option<Self> {
        let name_lower = name.to_lowercase();

        if declared_type == "application/pdf" || name_lower.ends_with(".pdf") {
            return Some(FileKind::Pdf);
        }

        if declared_type == DOCX_MIME || name_lower.ends_with(".docx") {
            return Some(FileKind::Docx);
        }

        if declared_type == "text/plain"
            || declared_type == "text/html"
            || declared_type == "text/markdown"
            || name_lower.ends_with(".md")
            || name_lower.ends_with(".markdown")
        {
            return Some(FileKind::Text);
        }

        None
    }
}

/// A file the batch rejected, with the reason
#[derive(Debug)]
pub struct RejectedFile {
    /// Filename as uploaded
    pub name: String,

    /// Why extraction failed
    pub error: ExtractError,
}

/// Outcome of extracting a multi-file upload batch
///
/// Files are processed independently: one failure never aborts the rest.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Files that extracted successfully, in upload order
    pub accepted: Vec<UploadedFile>,

    /// Files that were rejected, with per-file errors
    pub rejected: Vec<RejectedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_mime() {
        assert_eq!(
            FileKind::detect("application/pdf", "scan"),
            Some(FileKind::Pdf)
        );
        assert_eq!(FileKind::detect(DOCX_MIME, "contract"), Some(FileKind::Docx));
        assert_eq!(
            FileKind::detect("text/plain", "notes"),
            Some(FileKind::Text)
        );
        assert_eq!(FileKind::detect("text/html", "page"), Some(FileKind::Text));
        assert_eq!(
            FileKind::detect("text/markdown", "readme"),
            Some(FileKind::Text)
        );
    }

    #[test]
    fn test_detect_by_suffix_fallback() {
        assert_eq!(
            FileKind::detect("application/octet-stream", "scan.pdf"),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            FileKind::detect("application/octet-stream", "contract.DOCX"),
            Some(FileKind::Docx)
        );
        assert_eq!(
            FileKind::detect("application/octet-stream", "readme.md"),
            Some(FileKind::Text)
        );
        assert_eq!(
            FileKind::detect("", "notes.markdown"),
            Some(FileKind::Text)
        );
    }

    #[test]
    fn test_detect_rejects_everything_else() {
        assert_eq!(FileKind::detect("image/png", "photo.png"), None);
        assert_eq!(FileKind::detect("application/zip", "archive.zip"), None);
        // A bare .txt suffix with an unknown MIME type is not an accepted
        // fallback; only the declared text types and .md/.markdown are
        assert_eq!(FileKind::detect("application/octet-stream", "notes.txt"), None);
    }

    #[test]
    fn test_mime_takes_precedence_over_suffix() {
        // Declared PDF wins even with a markdown suffix
        assert_eq!(
            FileKind::detect("application/pdf", "notes.md"),
            Some(FileKind::Pdf)
        );
    }
}
