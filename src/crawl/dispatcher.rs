// src/crawl/dispatcher.rs
// =============================================================================
// Bounded dispatcher: a fixed number of fetch slots shared by all tasks.
//
// The crawl can spawn any number of tasks, but a task must hold a Slot
// while its fetch is in flight. With N slots, at most N fetches run at once
// no matter how wide the link tree gets.
//
// How it works:
// - A tokio Semaphore with N permits is the slot pool
// - acquire() waits for a permit OR for the crawl deadline, whichever comes
//   first, using tokio::select!
// - A Slot owns its permit. Dropping the Slot (or calling release()) puts
//   the permit back, so every early return still frees the slot
//
// Rust concepts:
// - RAII: cleanup tied to a value going out of scope (Drop)
// - Arc: the semaphore is shared between the dispatcher and the slots
// =============================================================================

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::error::Cancelled;

/// Pool of fetch slots
#[derive(Debug, Clone)]
pub struct Dispatcher {
    slots: Arc<Semaphore>,
    capacity: usize,
}

/// Permission to run one fetch; returned to the pool on drop
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Slot {
    /// Returns the slot to the pool. Never blocks.
    pub fn release(self) {
        drop(self);
    }
}

impl Dispatcher {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a free slot.
    ///
    /// Fails with `Cancelled` if `cancel` fires first, including when it has
    /// already fired before the call.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<Slot, Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        tokio::select! {
            // Prefer cancellation when both are ready
            biased;
            _ = cancel.cancelled() => Err(Cancelled),
            permit = Arc::clone(&self.slots).acquire_owned() => {
                // The semaphore is never closed, so this only fails if that changes
                permit.map(|permit| Slot { _permit: permit }).map_err(|_| Cancelled)
            }
        }
    }

    /// Number of slots currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not a worker pool?
//    - Tasks are cheap in tokio; thousands of them waiting on a semaphore
//      cost almost nothing
//    - Only the network work needs a ceiling, not the number of tasks
//
// 2. Why `biased;` in select!?
//    - Without it select! picks a ready branch at random
//    - With it, once the deadline has fired no new slot is handed out even
//      if one happens to be free at the same moment
// -----------------------------------------------------------------------------
