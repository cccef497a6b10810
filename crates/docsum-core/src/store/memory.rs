//! In-memory [`ArtifactStore`] for tests and embedding.
//!
//! Uses a `BTreeMap` behind `std::sync::RwLock`, so [`list`](ArtifactStore::list)
//! comes back sorted for free.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

use super::{check_retrievable, ArtifactStore, StoreError};
use crate::naming::candidate_names;

/// In-memory artifact store.
pub struct InMemoryStore {
    artifacts: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            artifacts: RwLock::new(BTreeMap::new()),
        }
    }

    /// Like [`ArtifactStore::persist`] with an explicit creation time.
    pub fn persist_at(&self, content: &str, ts: NaiveDateTime) -> Result<String, StoreError> {
        let mut artifacts = self
            .artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for name in candidate_names(ts) {
            if !artifacts.contains_key(&name) {
                artifacts.insert(name.clone(), content.to_string());
                return Ok(name);
            }
        }
        Err(StoreError::NamesExhausted(ts.to_string()))
    }

    pub fn len(&self) -> usize {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryStore {
    async fn persist(&self, content: &str) -> Result<String, StoreError> {
        self.persist_at(content, Local::now().naive_local())
    }

    async fn retrieve(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        check_retrievable(name)?;
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|content| content.as_bytes().to_vec())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }
}
