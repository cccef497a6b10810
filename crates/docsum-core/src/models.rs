//! Data types that flow through the summarization pipeline.
//!
//! An [`UploadedDocument`] enters, its [`DocumentFormat`] is derived from the
//! filename, the extractor turns it into [`ExtractedText`], and a
//! [`SummaryResult`] comes out once the summary has been persisted.

use serde::Serialize;

/// A file submitted for summarization. Lives for a single pipeline run.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub raw_bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, raw_bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            raw_bytes: raw_bytes.into(),
        }
    }
}

/// Supported input formats.
///
/// Anything else is rejected up front; there is no "unknown" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
}

impl DocumentFormat {
    /// Derives the format from the text after the final `.` of `filename`,
    /// ignoring ASCII case. Returns `None` for unsupported or missing
    /// extensions.
    ///
    /// ```rust
    /// use docsum_core::models::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_filename("report.PDF"), Some(DocumentFormat::Pdf));
    /// assert_eq!(DocumentFormat::from_filename("notes.docx"), None);
    /// assert_eq!(DocumentFormat::from_filename("README"), None);
    /// ```
    pub fn from_filename(filename: &str) -> Option<Self> {
        file_extension(filename).and_then(Self::from_extension)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(DocumentFormat::PlainText),
            "pdf" => Some(DocumentFormat::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "txt",
            DocumentFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Returns the substring after the final `.`, if there is one.
pub fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Plain text produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub content: String,
}

impl ExtractedText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// True when the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Number of whitespace-delimited tokens.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Outcome of a successful pipeline run.
///
/// Serializes with the field names the upload endpoint returns
/// (`summary`, `filename`, `original_filename`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    #[serde(rename = "summary")]
    pub summary_text: String,
    #[serde(rename = "filename")]
    pub artifact_name: String,
    pub original_filename: String,
}
