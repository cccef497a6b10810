//! Text extraction for uploaded documents (plain text, PDF).
//!
//! Pure transformation: bytes in, UTF-8 text out. No I/O, no side effects.
//! PDF parsing is CPU-bound; async callers should run [`extract`] on the
//! blocking pool.

use std::panic::{catch_unwind, AssertUnwindSafe};

use docsum_core::models::{DocumentFormat, ExtractedText};

/// Extraction error. Never a panic; callers map these to rejections.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("text is not valid UTF-8: {0}")]
    Decoding(#[from] std::string::FromUtf8Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Extracts plain text from `bytes` according to `format`.
pub fn extract(format: DocumentFormat, bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    match format {
        DocumentFormat::PlainText => extract_plain_text(bytes),
        DocumentFormat::Pdf => extract_pdf(bytes),
    }
}

fn extract_plain_text(bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    let text = String::from_utf8(bytes.to_vec())?;
    Ok(ExtractedText::new(text))
}

/// Pages are joined with `\n` in document order and the result is trimmed.
///
/// A document whose pages carry no text layer at all (scans, images) is an
/// error here rather than an empty string.
fn extract_pdf(bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|panic| ExtractError::Pdf(panic_message(&*panic)))?
    .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let text = pages.join("\n").trim().to_string();
    if text.is_empty() {
        return Err(ExtractError::Pdf(format!(
            "no extractable text layer in {} page(s)",
            pages.len()
        )));
    }
    Ok(ExtractedText::new(text))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("parser panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("parser panicked: {}", s)
    } else {
        "parser panicked".to_string()
    }
}
