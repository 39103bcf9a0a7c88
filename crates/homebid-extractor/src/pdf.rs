//! PDF text extraction

use crate::error::ExtractError;

/// Extract text from PDF bytes
pub(crate) fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}
