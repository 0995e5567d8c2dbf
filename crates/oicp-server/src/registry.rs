//! Ordered subscriber registry

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Handle returned by [`SubscriberRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// Append/remove-only list of subscribers kept in registration order
///
/// Dispatch works on a [`snapshot`](Self::snapshot): a subscriber
/// registered after the snapshot was taken does not take part in that
/// dispatch.
pub struct SubscriberRegistry<T: ?Sized> {
    next_id: AtomicU64,
    subscribers: RwLock<Vec<(SubscriberId, Arc<T>)>>,
}

impl<T: ?Sized> Default for SubscriberRegistry<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> SubscriberRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, subscriber: Arc<T>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.subscribers.write().push((id, subscriber));
        id
    }

    /// Returns false when `id` was not registered
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Current subscribers in registration order
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.subscribers
            .read()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }
}
