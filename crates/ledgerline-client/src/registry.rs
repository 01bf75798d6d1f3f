use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use ledgerline_protocol::ResponseHead;

use crate::error::{ClientError, ClientResult};

/// A single-shot delivery handle for one outstanding command.
///
/// The closure captures the issuing command's concrete result type, so the
/// delivery path can decode the payload into the statically expected shape
/// before signaling the caller. Dropping a waiter without invoking it wakes
/// the caller with a connection-closed error.
pub type Waiter = Box<dyn FnOnce(ResponseHead, Value) + Send>;

/// Maps outstanding command ids to their waiters.
///
/// This map is the only mutable state shared between the issuing callers and
/// the read-side task. The lock is held only for the duration of a map
/// operation, never across the caller's wait or the payload decode.
///
/// Invariant: exactly one of `resolve`/`cancel` removes a given id, so no id
/// is delivered to more than one waiter and no waiter fires twice.
#[derive(Default)]
pub struct CorrelationRegistry {
    waiters: Mutex<HashMap<u64, Waiter>>,
}

impl CorrelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a waiter for `id`. Errors if `id` is already registered;
    /// ids must come only from the generator.
    pub fn register(&self, id: u64, waiter: Waiter) -> ClientResult<()> {
        let mut waiters = self.waiters.lock().expect("registry lock poisoned");
        if waiters.contains_key(&id) {
            return Err(ClientError::DuplicateCommandId(id));
        }
        waiters.insert(id, waiter);
        Ok(())
    }

    /// Remove the waiter for `id` and deliver the response to it.
    ///
    /// Returns `false` when the id is unknown (already resolved, cancelled,
    /// or stale); the payload is dropped as unroutable. The waiter runs
    /// outside the lock.
    pub fn resolve(&self, id: u64, head: ResponseHead, body: Value) -> bool {
        let waiter = {
            let mut waiters = self.waiters.lock().expect("registry lock poisoned");
            waiters.remove(&id)
        };
        match waiter {
            Some(deliver) => {
                deliver(head, body);
                true
            }
            None => false,
        }
    }

    /// Remove the waiter for `id` without delivering, for caller-side
    /// timeout or give-up. Safe to race a concurrent `resolve`: at most one
    /// side wins the removal.
    pub fn cancel(&self, id: u64) -> bool {
        self.waiters
            .lock()
            .expect("registry lock poisoned")
            .remove(&id)
            .is_some()
    }

    /// Drop every outstanding waiter, waking all callers with a
    /// connection-closed error. Returns how many were outstanding.
    pub fn drain(&self) -> usize {
        let mut waiters = self.waiters.lock().expect("registry lock poisoned");
        let count = waiters.len();
        waiters.clear();
        count
    }

    /// Number of outstanding commands.
    pub fn len(&self) -> usize {
        self.waiters.lock().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_waiter(counter: &Arc<AtomicUsize>) -> Waiter {
        let counter = Arc::clone(counter);
        Box::new(move |_head, _body| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn resolve_delivers_exactly_once() {
        let registry = CorrelationRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        registry.register(1, counting_waiter(&delivered)).unwrap();

        assert!(registry.resolve(1, ResponseHead::default(), Value::Null));
        assert_eq!(delivered.load(Ordering::SeqCst), 1);

        // Second delivery for the same id is unroutable.
        assert!(!registry.resolve(1, ResponseHead::default(), Value::Null));
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = CorrelationRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        registry.register(7, counting_waiter(&delivered)).unwrap();
        let err = registry.register(7, counting_waiter(&delivered)).unwrap_err();
        assert!(matches!(err, ClientError::DuplicateCommandId(7)));
    }

    #[test]
    fn cancel_then_resolve_drops_the_payload() {
        let registry = CorrelationRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        registry.register(3, counting_waiter(&delivered)).unwrap();

        assert!(registry.cancel(3));
        assert!(!registry.resolve(3, ResponseHead::default(), Value::Null));
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn resolve_then_cancel_is_a_noop() {
        let registry = CorrelationRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        registry.register(4, counting_waiter(&delivered)).unwrap();

        assert!(registry.resolve(4, ResponseHead::default(), Value::Null));
        assert!(!registry.cancel(4));
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drain_counts_and_clears() {
        let registry = CorrelationRegistry::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        registry.register(1, counting_waiter(&delivered)).unwrap();
        registry.register(2, counting_waiter(&delivered)).unwrap();

        assert_eq!(registry.drain(), 2);
        assert!(registry.is_empty());
        // Drained waiters were dropped, not invoked.
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn concurrent_resolve_and_cancel_single_winner() {
        for _ in 0..100 {
            let registry = Arc::new(CorrelationRegistry::new());
            let delivered = Arc::new(AtomicUsize::new(0));
            registry.register(9, counting_waiter(&delivered)).unwrap();

            let resolver = {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.resolve(9, ResponseHead::default(), Value::Null)
                })
            };
            let canceller = {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.cancel(9))
            };

            let resolved = resolver.join().unwrap();
            let cancelled = canceller.join().unwrap();
            assert!(
                resolved ^ cancelled,
                "exactly one of resolve/cancel must win the removal"
            );
            assert_eq!(delivered.load(Ordering::SeqCst), usize::from(resolved));
        }
    }
}
