//! DOCX raw-text extraction
//!
//! A .docx file is a ZIP package of XML; docx-rs parses it into a typed
//! tree. Text lives at Paragraph -> Run -> Text, so we walk those nodes,
//! concatenate runs within a paragraph, and join paragraphs with newlines.
//! Tables, images, and formatting are ignored.

use crate::error::ExtractError;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

/// Extract the raw paragraph text from DOCX bytes
pub(crate) fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(bytes).map_err(|e| ExtractError::Docx(format!("{:?}", e)))?;

    let mut paragraphs: Vec<String> = Vec::new();

    for child in &docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            let text = paragraph_text(para);
            if !text.trim().is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Concatenate the text runs of one paragraph
///
/// Runs are parts of the same sentence, so no separator is inserted.
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut parts = Vec::new();

    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    parts.push(t.text.clone());
                }
            }
        }
    }

    parts.join("")
}
