//! Filesystem-backed [`ArtifactStore`].
//!
//! Artifacts are plain UTF-8 `.txt` files in a single flat directory. There
//! is no index; a file's presence is the only record of an artifact. The
//! directory is created on first write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use docsum_core::naming::{candidate_names, is_artifact_name};
use docsum_core::store::{check_retrievable, ArtifactStore, StoreError};

use crate::config::Config;

pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage.output_dir.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Like [`ArtifactStore::persist`] with an explicit creation time.
    ///
    /// Names are claimed with an exclusive create, so two writers landing on
    /// the same second end up in different files.
    pub async fn persist_at(&self, content: &str, ts: NaiveDateTime) -> Result<String, StoreError> {
        fs::create_dir_all(&self.root).await?;

        for name in candidate_names(ts) {
            let path = self.root.join(&name);
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(content.as_bytes()).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                warn!(path = %path.display(), error = %e, "artifact write failed, removing partial file");
                discard_partial(&path).await;
                return Err(e.into());
            }

            debug!(artifact = %name, bytes = content.len(), "artifact persisted");
            return Ok(name);
        }

        Err(StoreError::NamesExhausted(ts.to_string()))
    }
}

/// Removes a half-written artifact. A file that cannot be removed is
/// reported, since it would later be served as a complete summary.
async fn discard_partial(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove partial artifact");
            false
        }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn persist(&self, content: &str) -> Result<String, StoreError> {
        self.persist_at(content, Local::now().naive_local()).await
    }

    async fn retrieve(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        check_retrievable(name)?;
        let path = self.root.join(name);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(StoreError::NotFound(name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        }
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_artifact_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
