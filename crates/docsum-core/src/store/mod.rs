//! Storage abstraction for summary artifacts.
//!
//! The [`ArtifactStore`] trait is the only way the pipeline and the HTTP
//! layer touch persisted summaries. Backends own name generation and are
//! responsible for refusing unsafe names before any lookup.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::naming::{check_safe_name, is_artifact_name};

/// Artifact storage failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("invalid artifact name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("no free artifact name left for {0}")]
    NamesExhausted(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Named, write-once text artifacts in a flat namespace.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`persist`](ArtifactStore::persist) | Write a new artifact under a generated name |
/// | [`retrieve`](ArtifactStore::retrieve) | Read an artifact back by exact name |
/// | [`list`](ArtifactStore::list) | All artifact names, oldest first |
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Stores `content` as UTF-8 under a freshly generated name and returns
    /// that name. Never overwrites an existing artifact.
    async fn persist(&self, content: &str) -> Result<String, StoreError>;

    /// Returns the bytes of the artifact called `name`.
    ///
    /// Fails with [`StoreError::InvalidName`] for names containing path
    /// separators or parent references, and [`StoreError::NotFound`] when no
    /// such artifact exists.
    async fn retrieve(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    async fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// Boundary check shared by every backend's `retrieve`.
///
/// Unsafe names are rejected outright. Safe names that could never have
/// been generated are reported as missing without a lookup.
pub fn check_retrievable(name: &str) -> Result<(), StoreError> {
    check_safe_name(name).map_err(|unsafe_name| StoreError::InvalidName {
        name: name.to_string(),
        reason: unsafe_name.reason(),
    })?;
    if !is_artifact_name(name) {
        return Err(StoreError::NotFound(name.to_string()));
    }
    Ok(())
}
