//! Numeric block id allocation.
//!
//! Ids come from a process-wide monotonic counter. A definition that
//! never received an explicit id draws one lazily; once read it is
//! fixed for the definition's lifetime. Workers replaying descriptors
//! keep their local counter ahead of every replayed id so later local
//! allocations cannot collide.

use std::sync::atomic::{AtomicU32, Ordering};

/// Custom blocks start well above the vanilla id range.
pub const FIRST_BLOCK_ID: u32 = 10000;

pub struct IdAllocator {
    next: AtomicU32,
}

impl IdAllocator {
    pub const fn new(start: u32) -> IdAllocator {
        IdAllocator {
            next: AtomicU32::new(start),
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Ensures future allocations land strictly after `id`.
    pub fn reserve_through(&self, id: u32) {
        self.next.fetch_max(id + 1, Ordering::Relaxed);
    }

    pub fn peek(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}

/// Counter used by the main-thread registration path.
pub static BLOCK_IDS: IdAllocator = IdAllocator::new(FIRST_BLOCK_ID);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_monotonic() {
        let ids = IdAllocator::new(100);
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
    }

    #[test]
    fn reserve_through_skips_replayed_ids() {
        let ids = IdAllocator::new(100);
        ids.reserve_through(500);
        assert_eq!(ids.next_id(), 501);
        // Reserving below the watermark changes nothing.
        ids.reserve_through(10);
        assert_eq!(ids.next_id(), 502);
    }
}
