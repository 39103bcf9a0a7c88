//! Error types for text extraction

use thiserror::Error;

/// Errors that can occur while extracting text from an uploaded file
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File exceeds the hard size cap; checked before any parsing
    #[error("File too large: {size} bytes (max: {limit})")]
    TooLarge {
        /// Size of the rejected file in bytes
        size: usize,
        /// The hard cap in bytes
        limit: usize,
    },

    /// Declared type / filename suffix matches none of the accepted kinds
    #[error("Unsupported file type: {0}. Supported types: PDF, DOCX, TXT, HTML, MD")]
    UnsupportedType(String),

    /// Dispatch succeeded but produced no usable text
    #[error("Could not extract text from file. The file may be empty or corrupted.")]
    EmptyOrCorrupt,

    /// PDF parsing failed
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// DOCX package parsing failed
    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    /// Text file is not valid UTF-8
    #[error("File is not valid UTF-8 text")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message_lists_accepted_kinds() {
        let message = ExtractError::UnsupportedType("image/png".to_string()).to_string();
        assert!(message.contains("image/png"));
        for kind in ["PDF", "DOCX", "TXT", "HTML", "MD"] {
            assert!(message.contains(kind), "missing {} in: {}", kind, message);
        }
    }

    #[test]
    fn test_too_large_message() {
        let message = ExtractError::TooLarge {
            size: 6_291_456,
            limit: 5_242_880,
        }
        .to_string();
        assert!(message.contains("6291456"));
        assert!(message.contains("5242880"));
    }
}
