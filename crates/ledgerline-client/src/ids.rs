use std::sync::atomic::{AtomicU64, Ordering};

/// Source of process-unique, strictly increasing command ids.
///
/// Each client instance owns its own generator, so independent clients in
/// one process neither collide nor contend on a shared counter. Safe to call
/// from any number of threads; never returns the same value twice for the
/// generator's lifetime.
#[derive(Debug, Default)]
pub struct CommandIdGenerator {
    counter: AtomicU64,
}

impl CommandIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next id. Ids start at 1; 0 is never issued.
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}
