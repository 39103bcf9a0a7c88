//! Core Rewriter implementation

use crate::error::RewriteError;
use crate::prompt::PromptBuilder;
use homebid_domain::UploadedFile;
use homebid_llm::TextGenerator;
use std::sync::Arc;
use tracing::{debug, info};

/// Replaces an offer document wholesale via a single generative call
///
/// All-or-nothing: either the backend returns a non-empty document that
/// becomes the result, or the call fails and the caller keeps its current
/// document. One attempt per call, never more.
#[derive(Clone)]
pub struct Rewriter {
    backend: Arc<dyn TextGenerator>,
}

impl Rewriter {
    /// Create a rewriter over the given backend
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// Rewrite the document to incorporate free-text user feedback
    pub async fn apply_feedback(
        &self,
        current_document: &str,
        feedback: &str,
    ) -> Result<String, RewriteError> {
        let prompt = PromptBuilder::new(current_document).for_feedback(feedback);
        self.rewrite(&prompt).await
    }

    /// Rewrite the document using the extracted text of uploaded files
    pub async fn merge_files(
        &self,
        current_document: &str,
        files: &[UploadedFile],
    ) -> Result<String, RewriteError> {
        let prompt = PromptBuilder::new(current_document).for_uploaded_files(files);
        self.rewrite(&prompt).await
    }

    async fn rewrite(&self, prompt: &str) -> Result<String, RewriteError> {
        debug!("Rewrite prompt length: {} chars", prompt.len());

        let updated = self.backend.generate(prompt).await?;

        if updated.trim().is_empty() {
            return Err(RewriteError::GenerationFailed);
        }

        info!("Rewrite produced {} chars", updated.len());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homebid_llm::MockProvider;

    fn rewriter_with(provider: MockProvider) -> Rewriter {
        Rewriter::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_result_is_exactly_the_backend_response() {
        let rewriter = rewriter_with(MockProvider::new("# Updated Offer\n\nPrice: $475,000"));
        let result = rewriter
            .apply_feedback("# Offer", "raise the price")
            .await
            .unwrap();
        assert_eq!(result, "# Updated Offer\n\nPrice: $475,000");
    }

    #[tokio::test]
    async fn test_same_inputs_same_result() {
        let rewriter = rewriter_with(MockProvider::new("# Same"));
        let a = rewriter.apply_feedback("doc", "instr").await.unwrap();
        let b = rewriter.apply_feedback("doc", "instr").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_response_is_generation_failed() {
        let rewriter = rewriter_with(MockProvider::new(""));
        let result = rewriter.apply_feedback("# Offer", "anything").await;
        assert!(matches!(result, Err(RewriteError::GenerationFailed)));
    }

    #[tokio::test]
    async fn test_whitespace_response_is_generation_failed() {
        let rewriter = rewriter_with(MockProvider::new("  \n  "));
        let result = rewriter.apply_feedback("# Offer", "anything").await;
        assert!(matches!(result, Err(RewriteError::GenerationFailed)));
    }

    #[tokio::test]
    async fn test_backend_error_is_surfaced_once() {
        let mut provider = MockProvider::default();
        let prompt = crate::prompt::PromptBuilder::new("# Offer").for_feedback("bad");
        provider.add_error(prompt);
        let count = provider.call_count();
        assert_eq!(count, 0);

        let rewriter = rewriter_with(provider.clone());
        let result = rewriter.apply_feedback("# Offer", "bad").await;

        assert!(matches!(result, Err(RewriteError::Backend(_))));
        // Single attempt, no retry
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_merge_files_feeds_labeled_content() {
        let files = vec![UploadedFile::new(
            "inspection.txt",
            "Purchase Price: $450,000",
        )];
        let prompt = PromptBuilder::new("# Offer").for_uploaded_files(&files);

        let mut provider = MockProvider::new("unexpected prompt");
        provider.add_response(prompt, "# Offer\n\nPurchase Price: $450,000");

        let rewriter = rewriter_with(provider);
        let result = rewriter.merge_files("# Offer", &files).await.unwrap();
        assert!(result.contains("$450,000"));
    }
}
