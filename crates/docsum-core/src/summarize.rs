//! Summarizer capability and the reference truncation strategy.
//!
//! The pipeline only sees the [`Summarizer`] trait, so any backend that turns
//! text into a summary (or fails explicitly) can be swapped in. The core crate
//! ships [`TruncationSummarizer`]; the app crate adds an LLM-backed one.

use async_trait::async_trait;

use crate::models::ExtractedText;

/// Default number of words kept by [`TruncationSummarizer`].
pub const DEFAULT_MAX_WORDS: usize = 100;

/// First line of a truncated summary.
pub const SUMMARY_HEADER: &str = "RIASSUNTO AUTOMATICO:";

/// Trailing note appended to a truncated summary.
pub const SUMMARY_DISCLAIMER: &str =
    "[Nota: Questa è una versione demo. Integrare OpenAI API per riassunti avanzati.]";

/// Appended after the last kept word.
pub const TRUNCATION_MARKER: &str = "...";

/// Summarization failure. Only non-reference strategies produce this.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("summarization service unavailable: {0}")]
    Unavailable(String),
}

/// Turns extracted text into a summary.
///
/// Callers guarantee `text` is not blank. Implementations may suspend on
/// network I/O and must report failure through [`SummarizeError`] rather
/// than returning a partial summary.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use docsum_core::models::ExtractedText;
/// use docsum_core::summarize::{SummarizeError, Summarizer};
///
/// struct FirstLine;
///
/// #[async_trait]
/// impl Summarizer for FirstLine {
///     async fn summarize(&self, text: &ExtractedText) -> Result<String, SummarizeError> {
///         Ok(text.as_str().lines().next().unwrap_or_default().to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &ExtractedText) -> Result<String, SummarizeError>;
}

/// Keeps the first `max_words` whitespace-delimited words.
///
/// Short inputs come back untouched. Longer ones are cut, joined with single
/// spaces, suffixed with [`TRUNCATION_MARKER`], and framed by
/// [`SUMMARY_HEADER`] and [`SUMMARY_DISCLAIMER`].
#[derive(Debug, Clone)]
pub struct TruncationSummarizer {
    max_words: usize,
}

impl TruncationSummarizer {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Synchronous form of [`Summarizer::summarize`].
    ///
    /// ```rust
    /// use docsum_core::summarize::TruncationSummarizer;
    ///
    /// let s = TruncationSummarizer::new(3);
    /// assert_eq!(s.truncate("one two"), "one two");
    /// assert!(s.truncate("one two three four").contains("one two three..."));
    /// ```
    pub fn truncate(&self, text: &str) -> String {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= self.max_words {
            return text.to_string();
        }

        let kept = words[..self.max_words].join(" ");
        format!(
            "{}\n\n{}{}\n\n{}",
            SUMMARY_HEADER, kept, TRUNCATION_MARKER, SUMMARY_DISCLAIMER
        )
    }
}

impl Default for TruncationSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

#[async_trait]
impl Summarizer for TruncationSummarizer {
    async fn summarize(&self, text: &ExtractedText) -> Result<String, SummarizeError> {
        Ok(self.truncate(text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> String {
        (1..=n)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn short_text_is_returned_verbatim() {
        let text = "  Hello\tworld\n\nsecond   line ";
        assert_eq!(TruncationSummarizer::default().truncate(text), text);
    }

    #[test]
    fn exactly_max_words_is_identity() {
        let text = numbered_words(100);
        assert_eq!(TruncationSummarizer::default().truncate(&text), text);
    }

    #[test]
    fn long_text_keeps_first_hundred_words() {
        let text = numbered_words(150);
        let summary = TruncationSummarizer::default().truncate(&text);

        let expected_body = format!("{}...", numbered_words(100));
        assert_eq!(
            summary,
            format!(
                "RIASSUNTO AUTOMATICO:\n\n{}\n\n[Nota: Questa è una versione demo. Integrare OpenAI API per riassunti avanzati.]",
                expected_body
            )
        );
        assert!(!summary.contains("w101"));
    }

    #[test]
    fn long_text_whitespace_is_collapsed() {
        let text = format!("a\n\nb\t\tc {}", numbered_words(200));
        let summary = TruncationSummarizer::new(3).truncate(&text);
        assert!(summary.contains("\n\na b c...\n\n"));
        assert!(!summary.contains("w1"));
    }

    #[test]
    fn custom_limit_is_respected() {
        let summary = TruncationSummarizer::new(2).truncate("alpha beta gamma");
        assert!(summary.starts_with(SUMMARY_HEADER));
        assert!(summary.contains("alpha beta..."));
        assert!(!summary.contains("gamma"));
        assert!(summary.ends_with(SUMMARY_DISCLAIMER));
    }

    #[tokio::test]
    async fn trait_call_matches_truncate() {
        let s = TruncationSummarizer::default();
        let text = ExtractedText::new(numbered_words(120));
        let via_trait = s.summarize(&text).await.unwrap();
        assert_eq!(via_trait, s.truncate(text.as_str()));
    }
}
