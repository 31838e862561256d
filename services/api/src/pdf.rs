//! Résumé text extraction.

use anyhow::{Context, Result, bail};

/// Turns an uploaded résumé file into plain text.
pub trait ResumeReader: Send + Sync {
    fn read_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Reads the text layer of PDF uploads.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfResumeReader;

impl ResumeReader for PdfResumeReader {
    fn read_text(&self, bytes: &[u8]) -> Result<String> {
        extract_resume_text(bytes)
    }
}

/// Extracts the plain text of an uploaded PDF.
///
/// Fails if the bytes are not a readable PDF or the document has no text layer.
pub fn extract_resume_text(bytes: &[u8]) -> Result<String> {
    if !bytes.starts_with(b"%PDF") {
        bail!("Uploaded file is not a PDF");
    }
    let text = pdf_extract::extract_text_from_mem(bytes).context("Failed to read PDF")?;
    let text = text.trim();
    if text.is_empty() {
        bail!("No text could be extracted from the PDF");
    }
    Ok(text.to_string())
}
