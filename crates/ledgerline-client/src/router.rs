use std::sync::RwLock;

use tokio::sync::broadcast;

use ledgerline_protocol::{Notification, NotificationKind};

/// Filter for subscribing to a subset of notifications.
#[derive(Clone, Debug, Default)]
pub struct NotificationFilter {
    /// If set, only notifications of these kinds are delivered.
    pub kinds: Option<Vec<NotificationKind>>,
}

impl NotificationFilter {
    /// Match every notification.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match only the given kind.
    pub fn kind(kind: NotificationKind) -> Self {
        Self {
            kinds: Some(vec![kind]),
        }
    }

    /// Returns `true` if the given notification matches this filter.
    pub fn matches(&self, notification: &Notification) -> bool {
        match &self.kinds {
            Some(kinds) => kinds.contains(&notification.kind()),
            None => true,
        }
    }
}

/// A broadcast channel receiver for notifications.
pub type NotificationStream = broadcast::Receiver<Notification>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: NotificationFilter,
    sender: broadcast::Sender<Notification>,
}

/// Fan-out router delivering unsolicited notifications to subscribers.
///
/// Fire-and-forget, many-consumer: delivery never blocks the read loop, and
/// a slow subscriber loses events once its bounded channel fills rather than
/// applying backpressure to the transport.
pub struct NotificationRouter {
    subscribers: RwLock<Vec<Subscriber>>,
    capacity: usize,
}

impl NotificationRouter {
    /// Create a router whose per-subscriber channels hold `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Register a new subscriber with the given filter.
    pub fn subscribe(&self, filter: NotificationFilter) -> NotificationStream {
        let (tx, rx) = broadcast::channel(self.capacity);
        let sub = Subscriber { filter, sender: tx };
        self.subscribers
            .write()
            .expect("router lock poisoned")
            .push(sub);
        rx
    }

    /// Route a notification to all matching subscribers.
    /// Subscribers whose channels are closed are pruned.
    pub fn route(&self, notification: &Notification) {
        let mut subs = self.subscribers.write().expect("router lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(notification) {
                // A send with no receivers left means the stream was dropped.
                sub.sender.send(notification.clone()).is_ok()
            } else {
                // Not a match this time; keep the subscriber while its
                // receiver is still alive.
                sub.sender.receiver_count() > 0
            }
        });
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("router lock poisoned")
            .len()
    }
}

impl Default for NotificationRouter {
    fn default() -> Self {
        Self::new(1024)
    }
}
