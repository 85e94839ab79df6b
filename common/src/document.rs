use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DocumentError;
use crate::workspace::WorkspaceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub trashed: bool,
}

/// Handle to the collaborative document store of one workspace.
///
/// Handles are compared by identity (`Arc::ptr_eq`), never by value: closing
/// and reopening a workspace yields a new handle even for the same id.
#[derive(Debug)]
pub struct DocumentWorkspace {
    id: WorkspaceId,

    /// Keyed by page id
    pages: RwLock<HashMap<Uuid, Page>>,

    /// Monotonically increasing version for the entire workspace
    global_version: AtomicU64,
}

impl DocumentWorkspace {
    pub fn new(id: WorkspaceId) -> Self {
        Self {
            id,
            pages: RwLock::new(HashMap::new()),
            global_version: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn global_version(&self) -> u64 {
        self.global_version.load(Ordering::Acquire)
    }

    pub fn create_page(&self, title: impl Into<String>) -> Page {
        let page = Page {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: Utc::now(),
            trashed: false,
        };
        self.write_pages().insert(page.id, page.clone());
        self.bump();
        page
    }

    pub fn page(&self, page_id: Uuid) -> Option<Page> {
        self.read_pages().get(&page_id).cloned()
    }

    /// Live (non-trashed) pages, oldest first.
    pub fn pages(&self) -> Vec<Page> {
        let mut pages: Vec<Page> = self
            .read_pages()
            .values()
            .filter(|page| !page.trashed)
            .cloned()
            .collect();
        pages.sort_by_key(|page| page.created_at);
        pages
    }

    pub fn trashed_pages(&self) -> Vec<Page> {
        let mut pages: Vec<Page> = self
            .read_pages()
            .values()
            .filter(|page| page.trashed)
            .cloned()
            .collect();
        pages.sort_by_key(|page| page.created_at);
        pages
    }

    pub fn trash_page(&self, page_id: Uuid) -> Result<(), DocumentError> {
        self.set_trashed(page_id, true)
    }

    pub fn restore_page(&self, page_id: Uuid) -> Result<(), DocumentError> {
        self.set_trashed(page_id, false)
    }

    fn set_trashed(&self, page_id: Uuid, trashed: bool) -> Result<(), DocumentError> {
        {
            let mut pages = self.write_pages();
            let page = pages
                .get_mut(&page_id)
                .ok_or(DocumentError::PageNotFound(page_id))?;
            if page.trashed == trashed {
                return Ok(());
            }
            page.trashed = trashed;
        }
        self.bump();
        Ok(())
    }

    fn bump(&self) {
        self.global_version.fetch_add(1, Ordering::AcqRel);
    }

    // A poisoned lock only means a writer panicked mid-insert; the map itself is still usable.
    fn read_pages(&self) -> RwLockReadGuard<'_, HashMap<Uuid, Page>> {
        self.pages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_pages(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, Page>> {
        self.pages.write().unwrap_or_else(PoisonError::into_inner)
    }
}
