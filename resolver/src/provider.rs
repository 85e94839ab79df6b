use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use common::{DocumentWorkspace, WorkspaceId};
use tracing::info;

/// Hands out the live document handle for a workspace id.
pub trait DocumentProvider: Send + Sync {
    /// Returns the open handle for `id`, opening a fresh one if needed.
    fn open(&self, id: &WorkspaceId) -> Arc<DocumentWorkspace>;

    /// Closes the handle for `id`. Returns it if it was open.
    fn close(&self, id: &WorkspaceId) -> Option<Arc<DocumentWorkspace>>;

    fn is_open(&self, id: &WorkspaceId) -> bool;

    /// The currently open handle for `id`, without opening one.
    fn get(&self, id: &WorkspaceId) -> Option<Arc<DocumentWorkspace>>;

    /// Closes `id` only while `handle` is still the open instance.
    fn release(&self, id: &WorkspaceId, handle: &Arc<DocumentWorkspace>) -> bool;
}

/// In-process registry of open document workspaces.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    open: Mutex<HashMap<WorkspaceId, Arc<DocumentWorkspace>>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_count(&self) -> usize {
        self.open.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl DocumentProvider for DocumentRegistry {
    fn open(&self, id: &WorkspaceId) -> Arc<DocumentWorkspace> {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = open.entry(id.clone()).or_insert_with(|| {
            info!(workspace = %id, "opening document workspace");
            Arc::new(DocumentWorkspace::new(id.clone()))
        });
        Arc::clone(handle)
    }

    fn close(&self, id: &WorkspaceId) -> Option<Arc<DocumentWorkspace>> {
        let closed = self
            .open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if closed.is_some() {
            info!(workspace = %id, "closed document workspace");
        }
        closed
    }

    fn is_open(&self, id: &WorkspaceId) -> bool {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    fn get(&self, id: &WorkspaceId) -> Option<Arc<DocumentWorkspace>> {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn release(&self, id: &WorkspaceId, handle: &Arc<DocumentWorkspace>) -> bool {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if !open.get(id).is_some_and(|current| Arc::ptr_eq(current, handle)) {
            return false;
        }
        open.remove(id);
        info!(workspace = %id, "released document workspace");
        true
    }
}
