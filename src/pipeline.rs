//! Ingestion pipeline orchestration.
//!
//! Runs one upload start to finish:
//!
//! ```text
//! Received ─▶ FormatChecked ─▶ Extracted ─▶ Validated ─▶ Summarized ─▶ Persisted ─▶ Completed
//!                  │               │             │             │             │
//!                  └───────────────┴─────────────┴─────────────┴─────────────┴──▶ Rejected
//! ```
//!
//! Every failure is a classified [`IngestError`]; nothing is retried and
//! nothing is persisted unless the whole run succeeds.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use docsum_core::models::{file_extension, DocumentFormat, SummaryResult, UploadedDocument};
use docsum_core::store::{ArtifactStore, StoreError};
use docsum_core::summarize::{SummarizeError, Summarizer};

use crate::config::Config;
use crate::extract::{extract, ExtractError};
use crate::fs_store::FsArtifactStore;
use crate::summarizer::create_summarizer;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    FormatChecked,
    Extracted,
    Validated,
    Summarized,
    Persisted,
    Completed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::FormatChecked => "format_checked",
            Stage::Extracted => "extracted",
            Stage::Validated => "validated",
            Stage::Summarized => "summarized",
            Stage::Persisted => "persisted",
            Stage::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Why a pipeline run was rejected.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported file format for '{filename}': only .pdf and .txt are accepted")]
    UnsupportedFormat {
        filename: String,
        extension: Option<String>,
    },

    #[error("text file is not valid UTF-8: {0}")]
    Decoding(String),

    #[error("could not extract text from PDF: {0}")]
    Extraction(String),

    #[error("document contains no readable text")]
    EmptyContent,

    #[error(transparent)]
    SummarizationUnavailable(#[from] SummarizeError),

    /// Not a client error: the summary was produced but could not be stored.
    #[error("failed to persist summary: {0}")]
    Storage(#[from] StoreError),
}

impl From<ExtractError> for IngestError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Decoding(e) => IngestError::Decoding(e.to_string()),
            ExtractError::Pdf(msg) => IngestError::Extraction(msg),
        }
    }
}

impl IngestError {
    /// The stage the run failed to reach.
    pub fn stage(&self) -> Stage {
        match self {
            IngestError::UnsupportedFormat { .. } => Stage::FormatChecked,
            IngestError::Decoding(_) | IngestError::Extraction(_) => Stage::Extracted,
            IngestError::EmptyContent => Stage::Validated,
            IngestError::SummarizationUnavailable(_) => Stage::Summarized,
            IngestError::Storage(_) => Stage::Persisted,
        }
    }

    /// Machine-readable error code used in HTTP responses.
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::UnsupportedFormat { .. } => "unsupported_format",
            IngestError::Decoding(_) => "decoding_error",
            IngestError::Extraction(_) => "extraction_error",
            IngestError::EmptyContent => "empty_content",
            IngestError::SummarizationUnavailable(_) => "summarization_unavailable",
            IngestError::Storage(_) => "internal",
        }
    }

    /// True for rejections caused by the submitted document or the
    /// summarization backend, false for internal faults.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, IngestError::Storage(_))
    }
}

/// Extraction, summarization, and persistence wired together.
///
/// Holds shared handles only; one `Pipeline` serves any number of
/// concurrent runs.
#[derive(Clone)]
pub struct Pipeline {
    summarizer: Arc<dyn Summarizer>,
    store: Arc<dyn ArtifactStore>,
}

impl Pipeline {
    pub fn new(summarizer: Arc<dyn Summarizer>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { summarizer, store }
    }

    /// Builds the configured summarizer and a filesystem store rooted at
    /// `[storage].output_dir`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let summarizer = create_summarizer(&config.summarizer)?;
        let store: Arc<dyn ArtifactStore> = Arc::new(FsArtifactStore::from_config(config));
        Ok(Self::new(summarizer, store))
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Runs `doc` through every stage and returns the stored summary.
    #[tracing::instrument(skip_all, fields(filename = %doc.filename, bytes = doc.raw_bytes.len()))]
    pub async fn process(&self, doc: UploadedDocument) -> Result<SummaryResult, IngestError> {
        match self.run(doc).await {
            Ok(result) => {
                info!(artifact = %result.artifact_name, "summary stored");
                Ok(result)
            }
            Err(e) => {
                warn!(stage = %e.stage(), code = e.code(), error = %e, "upload rejected");
                Err(e)
            }
        }
    }

    async fn run(&self, doc: UploadedDocument) -> Result<SummaryResult, IngestError> {
        let UploadedDocument {
            filename,
            raw_bytes,
        } = doc;
        debug!(stage = %Stage::Received, "stage reached");

        let format = DocumentFormat::from_filename(&filename).ok_or_else(|| {
            IngestError::UnsupportedFormat {
                extension: file_extension(&filename).map(str::to_string),
                filename: filename.clone(),
            }
        })?;
        debug!(stage = %Stage::FormatChecked, %format, "stage reached");

        let text = tokio::task::spawn_blocking(move || extract(format, &raw_bytes))
            .await
            .map_err(|e| IngestError::Extraction(e.to_string()))??;
        debug!(stage = %Stage::Extracted, chars = text.content.len(), "stage reached");

        if text.is_blank() {
            return Err(IngestError::EmptyContent);
        }
        debug!(stage = %Stage::Validated, words = text.word_count(), "stage reached");

        let summary = self.summarizer.summarize(&text).await?;
        debug!(stage = %Stage::Summarized, chars = summary.len(), "stage reached");

        let artifact_name = self.store.persist(&summary).await?;
        debug!(stage = %Stage::Persisted, artifact = %artifact_name, "stage reached");

        let result = SummaryResult {
            summary_text: summary,
            artifact_name,
            original_filename: filename,
        };
        debug!(stage = %Stage::Completed, "stage reached");
        Ok(result)
    }
}
