//! Rewrite prompt construction
//!
//! Both prompts embed the current document verbatim, state the instruction,
//! and demand markdown-only output with no commentary. The trailing
//! "Updated offer:" line anchors where the model's document begins.

use homebid_domain::UploadedFile;

/// Separator between labeled file blocks in files-mode prompts
pub const FILE_DELIMITER: &str = "\n\n---\n\n";

const FEEDBACK_INSTRUCTIONS: &str = "\
You are an AI assistant specializing in updating real estate offers based on user feedback.
Modify the offer to incorporate the user's feedback while maintaining the overall structure and professional tone of the document.
Respond ONLY with the updated offer in markdown format, without any additional commentary.";

const FILES_INSTRUCTIONS: &str = "\
You are an AI assistant specializing in updating real estate offers based on information from uploaded documents.
Analyze the following uploaded files and extract relevant information to update the real estate offer.
Use the information from these files to populate or update the offer letter with accurate details.
Maintain the overall structure and professional tone of the document.
Respond ONLY with the updated offer in markdown format, without any additional commentary.";

/// Builds rewrite prompts around one current document
pub struct PromptBuilder {
    current_document: String,
}

impl PromptBuilder {
    /// Create a builder for the given document
    pub fn new(current_document: impl Into<String>) -> Self {
        Self {
            current_document: current_document.into(),
        }
    }

    /// Prompt for feedback mode: instruction is free-text user feedback
    pub fn for_feedback(&self, feedback: &str) -> String {
        format!(
            "{}\n\nCurrent offer:\n{}\n\nUser feedback:\n{}\n\nUpdated offer:",
            FEEDBACK_INSTRUCTIONS, self.current_document, feedback
        )
    }

    /// Prompt for files mode: instruction is every uploaded file's text,
    /// labeled by filename, in upload order
    pub fn for_uploaded_files(&self, files: &[UploadedFile]) -> String {
        format!(
            "{}\n\nCurrent offer:\n{}\n\nUploaded Files Content:\n{}\n\nUpdated offer:",
            FILES_INSTRUCTIONS,
            self.current_document,
            label_files(files)
        )
    }
}

/// Concatenate extracted file text, each block labeled with its filename,
/// separated by [`FILE_DELIMITER`], in upload order
pub(crate) fn label_files(files: &[UploadedFile]) -> String {
    files
        .iter()
        .map(|f| format!("File: {}\n\n{}", f.name, f.content))
        .collect::<Vec<_>>()
        .join(FILE_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_prompt_embeds_both_inputs_verbatim() {
        let builder = PromptBuilder::new("# Offer\n\nPrice: $400,000");
        let prompt = builder.for_feedback("change closing date to July 1");

        assert!(prompt.contains("# Offer\n\nPrice: $400,000"));
        assert!(prompt.contains("change closing date to July 1"));
        assert!(prompt.contains("Respond ONLY with the updated offer in markdown format"));
        assert!(prompt.ends_with("Updated offer:"));
    }

    #[test]
    fn test_files_prompt_labels_and_orders_files() {
        let files = vec![
            UploadedFile::new("first.txt", "alpha"),
            UploadedFile::new("second.txt", "beta"),
        ];
        let builder = PromptBuilder::new("# Offer");
        let prompt = builder.for_uploaded_files(&files);

        let first = prompt.find("File: first.txt").unwrap();
        let second = prompt.find("File: second.txt").unwrap();
        assert!(first < second);
        assert!(prompt.contains("alpha"));
        assert!(prompt.contains("beta"));
        assert!(prompt.contains(FILE_DELIMITER));
    }

    #[test]
    fn test_label_files_single_file_has_no_delimiter() {
        let files = vec![UploadedFile::new("only.txt", "content")];
        let labeled = label_files(&files);
        assert_eq!(labeled, "File: only.txt\n\ncontent");
    }
}
