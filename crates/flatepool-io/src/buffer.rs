//! Scratch buffer pool with a retained-size bound
//!
//! A pool only amortizes cost when its entries cost roughly the same, so a
//! buffer that grew past the high-water mark is dropped on release instead
//! of pinning its allocation in the pool.

use crate::pool::{Pool, PoolStats};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters of a [`BufferPool`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferPoolStats {
    /// Counters of the underlying pool
    pub pool: PoolStats,
    /// Buffers dropped on release for exceeding the high-water mark
    pub evicted: u64,
}

/// Buffer pool for reusing scratch buffers across operations
#[derive(Debug)]
pub struct BufferPool {
    buffers: Pool<Vec<u8>>,
    initial_capacity: usize,
    max_retained_capacity: usize,
    evicted: AtomicU64,
}

impl BufferPool {
    /// Create a new buffer pool
    ///
    /// New buffers start with `initial_capacity`; buffers whose capacity grew
    /// beyond `max_retained_capacity` are not kept.
    pub fn new(initial_capacity: usize, max_retained_capacity: usize, max_idle: usize) -> Self {
        Self {
            buffers: Pool::new(max_idle, move || Vec::with_capacity(initial_capacity)),
            initial_capacity,
            max_retained_capacity,
            evicted: AtomicU64::new(0),
        }
    }

    /// Get an empty buffer from the pool or create a new one
    pub fn acquire(&self) -> Vec<u8> {
        let mut buffer = self.buffers.acquire();
        buffer.clear();
        buffer
    }

    /// Return a buffer to the pool
    ///
    /// Returns `true` if the buffer was retained.
    pub fn release(&self, mut buffer: Vec<u8>) -> bool {
        if buffer.capacity() > self.max_retained_capacity {
            self.evicted.fetch_add(1, Ordering::Relaxed);
            trace!(
                capacity = buffer.capacity(),
                limit = self.max_retained_capacity,
                "evicting oversized buffer"
            );
            return false;
        }

        buffer.clear();
        self.buffers.release(buffer)
    }

    /// Capacity of newly allocated buffers
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Largest capacity a buffer may have and still be retained
    pub fn max_retained_capacity(&self) -> usize {
        self.max_retained_capacity
    }

    /// Get the current pool size
    pub fn idle(&self) -> usize {
        self.buffers.idle()
    }

    /// Clear all buffers from the pool
    pub fn clear(&self) {
        self.buffers.clear();
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> BufferPoolStats {
        BufferPoolStats {
            pool: self.buffers.stats(),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(4 * 1024, 64 * 1024, 16) // 4KB buffers, keep up to 64KB, max 16 in pool
    }
}
