//! Read access to the workspace metadata store.
//!
//! The store is owned elsewhere; the resolver only ever asks it for a
//! snapshot of the `{id, flavour}` records.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::error::MetadataError;
use common::{WorkspaceId, WorkspaceMetadata};
use tracing::debug;

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Loads the ordered collection of workspace records.
    async fn load(&self) -> Result<Vec<WorkspaceMetadata>, MetadataError>;
}

/// Metadata held in process, with knobs for simulating a slow or failing load.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: RwLock<Vec<WorkspaceMetadata>>,
    latency: RwLock<Option<Duration>>,
    failure: RwLock<Option<String>>,
    loads: AtomicUsize,
}

impl InMemoryMetadataStore {
    pub fn new(records: Vec<WorkspaceMetadata>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// Appends a record, or replaces the flavour of an existing one in place.
    pub fn insert(&self, record: WorkspaceMetadata) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => existing.flavour = record.flavour,
            None => records.push(record),
        }
    }

    pub fn remove(&self, id: &WorkspaceId) -> Option<WorkspaceMetadata> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let pos = records.iter().position(|r| &r.id == id)?;
        Some(records.remove(pos))
    }

    pub fn set_load_latency(&self, latency: Option<Duration>) {
        *self.latency.write().unwrap_or_else(PoisonError::into_inner) = latency;
    }

    /// Makes every following `load` fail with `MetadataError::Unavailable`.
    pub fn set_failure(&self, reason: Option<String>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = reason;
    }

    /// Number of `load` calls served so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn load(&self) -> Result<Vec<WorkspaceMetadata>, MetadataError> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(reason) = failure {
            return Err(MetadataError::Unavailable(reason));
        }

        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Reads the persisted workspace list: a JSON array of `{"id", "flavour"}`.
#[derive(Debug, Clone)]
pub struct JsonFileMetadataStore {
    path: PathBuf,
}

impl JsonFileMetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the file with `records`.
    pub async fn save(&self, records: &[WorkspaceMetadata]) -> Result<(), MetadataError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(|e| MetadataError::Parse {
            path: self.path.clone(),
            source: Arc::new(e),
        })?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| MetadataError::Io {
                path: self.path.clone(),
                source: Arc::new(e),
            })
    }
}

#[async_trait]
impl MetadataStore for JsonFileMetadataStore {
    async fn load(&self) -> Result<Vec<WorkspaceMetadata>, MetadataError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| MetadataError::Io {
                path: self.path.clone(),
                source: Arc::new(e),
            })?;

        let records: Vec<WorkspaceMetadata> =
            serde_json::from_slice(&bytes).map_err(|e| MetadataError::Parse {
                path: self.path.clone(),
                source: Arc::new(e),
            })?;

        debug!(path = %self.path.display(), count = records.len(), "loaded workspace metadata");
        Ok(records)
    }
}
