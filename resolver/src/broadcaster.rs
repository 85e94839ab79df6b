use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use crossbeam::channel::TrySendError;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::subscriber::{ResolveEvent, SubscriberEntry};

pub type Subscribers = Arc<Mutex<Vec<Arc<SubscriberEntry>>>>;

/// Fans `event` out to every subscriber. Returns how many received it.
pub fn broadcast(event: ResolveEvent, subscribers: &Subscribers) -> usize {
    let mut failed: HashSet<Uuid> = HashSet::new();
    let snapshot: Vec<Arc<SubscriberEntry>>;
    let mut delivered = 0;

    {
        let guard = subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        snapshot = guard.clone();
    }

    for entry in snapshot {
        match entry.sender.try_send(event.clone()) {
            Ok(()) => delivered += 1,

            // A slow subscriber must not hold up resolution for everyone else;
            // a full channel gets the subscriber dropped.
            Err(TrySendError::Full(_)) => {
                warn!(
                    subscriber = %entry.subscriber_id,
                    subscribed_at = %entry.subscribed_at,
                    "subscriber channel full, dropping"
                );
                failed.insert(entry.subscriber_id);
            }

            Err(TrySendError::Disconnected(_)) => {
                debug!(
                    subscriber = %entry.subscriber_id,
                    subscribed_at = %entry.subscribed_at,
                    "subscriber went away"
                );
                failed.insert(entry.subscriber_id);
            }
        }
    }

    if !failed.is_empty() {
        let mut guard = subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|entry| !failed.contains(&entry.subscriber_id));
    }

    delivered
}
