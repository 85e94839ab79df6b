//! Workspace identity resolution.
//!
//! Maps a workspace id to a [`WorkspaceDescriptor`] by pairing the flavour
//! recorded in the metadata store with the live document handle. Results are
//! memoized per document handle, and concurrent requests for the same handle
//! share one in-flight lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::error::ResolveError;
use common::{DocumentWorkspace, WorkspaceDescriptor, WorkspaceId};
use crossbeam::channel::bounded;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::broadcaster::{Subscribers, broadcast};
use crate::metadata::MetadataStore;
use crate::provider::DocumentProvider;
use crate::subscriber::{ResolveEvent, SubscriberEntry, Subscription};

type Resolution = Shared<BoxFuture<'static, Result<Arc<WorkspaceDescriptor>, ResolveError>>>;

/// Where a workspace stands in the memo table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Unresolved,
    Pending,
    Resolved,
}

struct MemoEntry {
    /// Handle the entry was built for. A different handle for the same id
    /// means the workspace was reopened and the entry is stale.
    document: Arc<DocumentWorkspace>,
    resolution: Resolution,
}

pub struct WorkspaceResolver {
    metadata: Arc<dyn MetadataStore>,
    documents: Arc<dyn DocumentProvider>,
    memo: Mutex<HashMap<WorkspaceId, MemoEntry>>,
    subscribers: Subscribers,
}

impl WorkspaceResolver {
    pub fn new(metadata: Arc<dyn MetadataStore>, documents: Arc<dyn DocumentProvider>) -> Self {
        Self {
            metadata,
            documents,
            memo: Mutex::new(HashMap::new()),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resolves `id` to its descriptor, suspending while the metadata store loads.
    ///
    /// Every caller asking for the same document handle gets the same `Arc`.
    /// An id with no metadata record fails with [`ResolveError::FlavourNotFound`],
    /// which is fatal. Failures are never memoized, and the document handle
    /// opened for a failed resolution is released again. Errors are left to
    /// the caller to report.
    pub async fn resolve(&self, id: &WorkspaceId) -> Result<Arc<WorkspaceDescriptor>, ResolveError> {
        let document = self.documents.open(id);
        let resolution = self.join_or_start(id, &document);

        let result = resolution.clone().await;

        if let Err(e) = &result {
            // Coalesced callers all land here; only the one that drops the entry releases.
            if self.forget(id, &resolution) {
                self.documents.release(id, &document);
            }
            debug!(workspace = %id, fatal = e.is_fatal(), error = %e, "workspace resolution failed");
        }

        result
    }

    /// Current state of `id` in the memo table, without suspending. An entry
    /// whose handle is no longer the provider's open one counts as unresolved.
    pub fn state(&self, id: &WorkspaceId) -> ResolveState {
        match self.memo().get(id) {
            None => ResolveState::Unresolved,
            Some(entry) if !self.is_current(id, entry) => ResolveState::Unresolved,
            Some(entry) => match entry.resolution.peek() {
                None => ResolveState::Pending,
                Some(Ok(_)) => ResolveState::Resolved,
                // About to be dropped by the caller that observed the failure.
                Some(Err(_)) => ResolveState::Unresolved,
            },
        }
    }

    /// The resolved descriptor for `id`, if resolution already finished.
    pub fn peek(&self, id: &WorkspaceId) -> Option<Arc<WorkspaceDescriptor>> {
        let memo = self.memo();
        let entry = memo.get(id)?;
        if !self.is_current(id, entry) {
            return None;
        }
        match entry.resolution.peek() {
            Some(Ok(descriptor)) => Some(Arc::clone(descriptor)),
            _ => None,
        }
    }

    /// Drops the memo entry for `id`. Returns whether there was one.
    pub fn evict(&self, id: &WorkspaceId) -> bool {
        let removed = self.memo().remove(id).is_some();
        if removed {
            info!(workspace = %id, "evicted workspace descriptor");
            broadcast(ResolveEvent::Evicted(id.clone()), &self.subscribers);
        }
        removed
    }

    /// Closes the document handle of `id` and evicts its descriptor.
    pub fn close_workspace(&self, id: &WorkspaceId) -> bool {
        let closed = self.documents.close(id).is_some();
        let evicted = self.evict(id);
        closed || evicted
    }

    /// Evicts every entry whose handle is no longer the provider's open one.
    pub fn prune_closed(&self) -> usize {
        let stale: Vec<WorkspaceId> = self
            .memo()
            .iter()
            .filter(|(id, entry)| !self.is_current(id, entry))
            .map(|(id, _)| id.clone())
            .collect();

        stale.iter().filter(|id| self.evict(id)).count()
    }

    pub fn cached_len(&self) -> usize {
        self.memo().len()
    }

    pub fn subscribe(&self, capacity: usize) -> Subscription {
        let (tx, rx) = bounded(capacity);
        let id = Uuid::new_v4();

        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(SubscriberEntry::new(id, tx)));

        debug!(subscriber = %id, capacity, "subscribed to resolver events");
        Subscription { id, receiver: rx }
    }

    pub fn unsubscribe(&self, subscriber_id: Uuid) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|entry| entry.subscriber_id != subscriber_id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn join_or_start(&self, id: &WorkspaceId, document: &Arc<DocumentWorkspace>) -> Resolution {
        let mut memo = self.memo();

        if let Some(entry) = memo.get(id) {
            if Arc::ptr_eq(&entry.document, document) {
                debug!(workspace = %id, "joining memoized resolution");
                return entry.resolution.clone();
            }
            debug!(workspace = %id, "document handle changed, replacing stale entry");
        }

        let resolution = self.start(id.clone(), Arc::clone(document));
        memo.insert(
            id.clone(),
            MemoEntry {
                document: Arc::clone(document),
                resolution: resolution.clone(),
            },
        );
        resolution
    }

    fn start(&self, id: WorkspaceId, document: Arc<DocumentWorkspace>) -> Resolution {
        let metadata = Arc::clone(&self.metadata);
        let subscribers = Arc::clone(&self.subscribers);

        async move {
            let records = metadata.load().await?;

            let flavour = records
                .iter()
                .find(|record| record.id == id)
                .map(|record| record.flavour)
                .ok_or_else(|| ResolveError::FlavourNotFound { id: id.clone() })?;

            info!(workspace = %id, %flavour, "resolved workspace");

            let descriptor = Arc::new(WorkspaceDescriptor {
                id,
                flavour,
                document,
            });
            broadcast(ResolveEvent::Resolved(Arc::clone(&descriptor)), &subscribers);

            Ok(descriptor)
        }
        .boxed()
        .shared()
    }

    /// Removes the entry for `id` if it still holds `resolution`.
    fn forget(&self, id: &WorkspaceId, resolution: &Resolution) -> bool {
        let mut memo = self.memo();
        if memo
            .get(id)
            .is_some_and(|entry| entry.resolution.ptr_eq(resolution))
        {
            memo.remove(id);
            return true;
        }
        false
    }

    fn is_current(&self, id: &WorkspaceId, entry: &MemoEntry) -> bool {
        self.documents
            .get(id)
            .is_some_and(|open| Arc::ptr_eq(&open, &entry.document))
    }

    fn memo(&self) -> MutexGuard<'_, HashMap<WorkspaceId, MemoEntry>> {
        match self.memo.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("memo table lock was poisoned, continuing with its contents");
                poisoned.into_inner()
            }
        }
    }
}
