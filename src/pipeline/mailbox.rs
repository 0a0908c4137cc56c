use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct Slot<T> {
    item: Option<T>,
    closed: bool,
    dropped: u64,
}

/// Single-slot mailbox that keeps only the most recent item.
///
/// Posting while an item is still waiting replaces it; the displaced item is
/// handed back to the caller (dropping it releases a camera frame). At most
/// one item is ever queued, so a slow consumer always sees the latest one.
pub struct Mailbox<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

impl<T> Mailbox<T> {
    /// Create an empty, open mailbox
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                item: None,
                closed: false,
                dropped: 0,
            }),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `item`, returning whatever undelivered item it replaced.
    ///
    /// Returns `Err(item)` once the mailbox is closed.
    pub fn post(&self, item: T) -> Result<Option<T>, T> {
        let mut slot = self.lock();
        if slot.closed {
            return Err(item);
        }
        let displaced = slot.item.replace(item);
        if displaced.is_some() {
            slot.dropped += 1;
        }
        drop(slot);
        self.ready.notify_one();
        Ok(displaced)
    }

    /// Block until an item is available; `None` once closed and empty
    pub fn take(&self) -> Option<T> {
        let mut slot = self.lock();
        loop {
            if let Some(item) = slot.item.take() {
                return Some(item);
            }
            if slot.closed {
                return None;
            }
            slot = self.ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take the waiting item without blocking
    pub fn try_take(&self) -> Option<T> {
        self.lock().item.take()
    }

    /// Remove the waiting item, if any, without delivering it
    pub fn clear(&self) -> Option<T> {
        self.lock().item.take()
    }

    /// Refuse further posts and wake any blocked consumer.
    ///
    /// An item already waiting can still be taken.
    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of items replaced before they were taken
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.lock();
        f.debug_struct("Mailbox")
            .field("occupied", &slot.item.is_some())
            .field("closed", &slot.closed)
            .field("dropped", &slot.dropped)
            .finish()
    }
}
