//! Editing session state
//!
//! One browser session owns exactly one `EditSession`: the authoritative
//! document, the uploaded files, and the conversation transcript. Sessions
//! are independent values with no shared or ambient state, so they can be
//! created and dropped per tab without interference.

use homebid_domain::chat::{SESSION_GREETING, SESSION_SYSTEM_NOTE};
use homebid_domain::{TranscriptEntry, UploadedFile};

/// In-memory state of one offer editing session
#[derive(Debug, Clone)]
pub struct EditSession {
    document: String,
    files: Vec<UploadedFile>,
    transcript: Vec<TranscriptEntry>,
    processing: bool,
}

impl EditSession {
    /// Start a session on the given document
    ///
    /// The transcript opens with the system framing and the assistant
    /// greeting, matching what the user sees in a fresh chat.
    pub fn new(initial_document: impl Into<String>) -> Self {
        Self {
            document: initial_document.into(),
            files: Vec::new(),
            transcript: vec![
                TranscriptEntry::system(SESSION_SYSTEM_NOTE),
                TranscriptEntry::assistant(SESSION_GREETING),
            ],
            processing: false,
        }
    }

    /// The authoritative document
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Replace the authoritative document (latest result wins)
    pub fn apply_document(&mut self, document: impl Into<String>) {
        self.document = document.into();
    }

    /// The conversation so far, oldest first
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Append an entry to the transcript
    ///
    /// The transcript is append-only; entries are never rewritten or
    /// removed for the lifetime of the session.
    pub fn push_entry(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
    }

    /// Uploaded files, in upload order
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// Add an extracted file to the session
    pub fn add_file(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    /// Remove an uploaded file by name; returns whether anything was removed
    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.name != name);
        self.files.len() != before
    }

    /// Whether a turn is currently in flight
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homebid_domain::ChatRole;

    #[test]
    fn test_new_session_seeds_transcript() {
        let session = EditSession::new("# Offer");
        assert_eq!(session.document(), "# Offer");
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[0].role, ChatRole::System);
        assert_eq!(session.transcript()[1].role, ChatRole::Assistant);
        assert!(!session.is_processing());
    }

    #[test]
    fn test_file_add_remove() {
        let mut session = EditSession::new("# Offer");
        session.add_file(UploadedFile::new("a.txt", "alpha"));
        session.add_file(UploadedFile::new("b.txt", "beta"));
        assert_eq!(session.files().len(), 2);

        assert!(session.remove_file("a.txt"));
        assert_eq!(session.files().len(), 1);
        assert_eq!(session.files()[0].name, "b.txt");

        assert!(!session.remove_file("missing.txt"));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = EditSession::new("# A");
        let b = EditSession::new("# B");

        a.apply_document("# A changed");
        assert_eq!(a.document(), "# A changed");
        assert_eq!(b.document(), "# B");
    }
}
