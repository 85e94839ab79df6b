use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{WorkspaceDescriptor, WorkspaceId};
use crossbeam::channel::{Receiver, Sender};
use uuid::Uuid;

/// Change notification emitted by the resolver.
#[derive(Debug, Clone)]
pub enum ResolveEvent {
    /// A descriptor finished resolving. Sent once per resolution, not per caller.
    Resolved(Arc<WorkspaceDescriptor>),
    /// The memo entry for this workspace was dropped.
    Evicted(WorkspaceId),
}

/// A registered consumer of resolver events.
#[derive(Clone)]
pub struct SubscriberEntry {
    pub subscriber_id: Uuid,
    pub sender: Sender<ResolveEvent>,
    pub subscribed_at: DateTime<Utc>,
}

impl SubscriberEntry {
    pub fn new(subscriber_id: Uuid, sender: Sender<ResolveEvent>) -> Self {
        Self {
            subscriber_id,
            sender,
            subscribed_at: Utc::now(),
        }
    }
}

/// Receiving half handed back to the consumer by `WorkspaceResolver::subscribe`.
pub struct Subscription {
    pub id: Uuid,
    pub receiver: Receiver<ResolveEvent>,
}

impl Subscription {
    /// Drains every event currently queued without blocking.
    pub fn drain(&self) -> Vec<ResolveEvent> {
        self.receiver.try_iter().collect()
    }
}
