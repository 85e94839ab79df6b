use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::workspace::WorkspaceId;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Page not found: {0}")]
    PageNotFound(Uuid),
}

/// Failure of the upstream metadata store.
///
/// Cloneable so a single failed load can be handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone)]
pub enum MetadataError {
    #[error("Workspace metadata I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Malformed workspace metadata in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("Workspace metadata unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The id has no record in the metadata store. The application state is
    /// inconsistent; callers must not try to recover from this.
    #[error("workspace flavour not found for {id}")]
    FlavourNotFound { id: WorkspaceId },

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl ResolveError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResolveError::FlavourNotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum MemberError {
    #[error("Member service request failed: {0}")]
    Request(String),

    #[error("Member not found: {0}")]
    NotFound(String),
}
