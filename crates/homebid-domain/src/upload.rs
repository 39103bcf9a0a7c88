//! Uploaded file representation

use serde::{Deserialize, Serialize};

/// A supporting document that passed validation and text extraction
///
/// Holds only the extracted plain text, never the original bytes. Lives in
/// session memory for the duration of an editing session; removing the file
/// or leaving the session discards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Original filename as uploaded
    pub name: String,

    /// Extracted plain text content
    pub content: String,
}

impl UploadedFile {
    /// Create a new uploaded file record
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_file_new() {
        let file = UploadedFile::new("notes.txt", "Purchase Price: $450,000");
        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.content, "Purchase Price: $450,000");
    }
}
