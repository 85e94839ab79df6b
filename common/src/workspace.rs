use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::DocumentWorkspace;

/// Opaque identifier of a workspace, as stored in the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkspaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WorkspaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Storage and sync model of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkspaceFlavour {
    /// Lives only on this device.
    #[serde(rename = "local")]
    Local,
    /// Synchronized through the cloud service.
    #[serde(rename = "affine-cloud", alias = "cloud")]
    Cloud,
    /// Published read-only view of a cloud workspace.
    #[serde(rename = "affine-public", alias = "public")]
    Public,
}

impl WorkspaceFlavour {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceFlavour::Local => "local",
            WorkspaceFlavour::Cloud => "affine-cloud",
            WorkspaceFlavour::Public => "affine-public",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, WorkspaceFlavour::Local)
    }
}

impl fmt::Display for WorkspaceFlavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMetadata {
    pub id: WorkspaceId,
    pub flavour: WorkspaceFlavour,
}

impl WorkspaceMetadata {
    pub fn new(id: impl Into<WorkspaceId>, flavour: WorkspaceFlavour) -> Self {
        Self {
            id: id.into(),
            flavour,
        }
    }
}

/// Unified view of a workspace: its identity, flavour and document handle.
///
/// Built once per document handle and never mutated afterwards. Consumers
/// hold it through an `Arc`; two descriptors are "the same" when the `Arc`s
/// are pointer-equal.
#[derive(Debug)]
pub struct WorkspaceDescriptor {
    pub id: WorkspaceId,
    pub flavour: WorkspaceFlavour,
    pub document: Arc<DocumentWorkspace>,
}

impl WorkspaceDescriptor {
    pub fn is_local(&self) -> bool {
        self.flavour.is_local()
    }

    pub fn is_public(&self) -> bool {
        matches!(self.flavour, WorkspaceFlavour::Public)
    }

    /// True when this descriptor was built for exactly this handle instance.
    pub fn is_for(&self, document: &Arc<DocumentWorkspace>) -> bool {
        Arc::ptr_eq(&self.document, document)
    }
}
