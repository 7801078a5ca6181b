//! Non-blocking object pool
//!
//! A [`Pool`] holds idle instances of one reusable type in a bounded
//! lock-free queue. Acquiring from an empty pool never waits: the factory
//! builds a fresh instance instead. Releasing into a full pool drops the
//! instance.

use crossbeam_queue::ArrayQueue;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Point-in-time pool counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolStats {
    /// Instances handed out
    pub acquired: u64,
    /// Instances built by the factory on a miss
    pub created: u64,
    /// Instances accepted back into the pool
    pub released: u64,
    /// Instances dropped on release because the pool was full
    pub dropped: u64,
}

impl PoolStats {
    /// Acquisitions served from an idle instance
    pub fn reused(&self) -> u64 {
        self.acquired.saturating_sub(self.created)
    }

    /// Fraction of acquisitions served without construction
    pub fn hit_rate(&self) -> f64 {
        if self.acquired == 0 {
            0.0
        } else {
            self.reused() as f64 / self.acquired as f64
        }
    }
}

#[derive(Default)]
struct Counters {
    acquired: AtomicU64,
    created: AtomicU64,
    released: AtomicU64,
    dropped: AtomicU64,
}

/// Concurrent pool of reusable instances with a factory for misses
pub struct Pool<T> {
    idle: ArrayQueue<T>,
    factory: Factory<T>,
    counters: Counters,
}

impl<T> Pool<T> {
    /// Create a pool that keeps at most `max_idle` idle instances
    ///
    /// A `max_idle` of zero is raised to one.
    pub fn new<F>(max_idle: usize, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            idle: ArrayQueue::new(max_idle.max(1)),
            factory: Box::new(factory),
            counters: Counters::default(),
        }
    }

    /// Take an idle instance, or build one if none is available
    pub fn acquire(&self) -> T {
        self.counters.acquired.fetch_add(1, Ordering::Relaxed);
        self.idle.pop().unwrap_or_else(|| {
            self.counters.created.fetch_add(1, Ordering::Relaxed);
            (self.factory)()
        })
    }

    /// Return an instance for later reuse
    ///
    /// Returns `false` if the pool was full and the instance was dropped.
    pub fn release(&self, item: T) -> bool {
        match self.idle.push(item) {
            Ok(()) => {
                self.counters.released.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Number of idle instances currently held
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    /// Maximum number of idle instances held
    pub fn max_idle(&self) -> usize {
        self.idle.capacity()
    }

    /// Drop every idle instance
    pub fn clear(&self) {
        while self.idle.pop().is_some() {}
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            acquired: self.counters.acquired.load(Ordering::Relaxed),
            created: self.counters.created.load(Ordering::Relaxed),
            released: self.counters.released.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle.len())
            .field("max_idle", &self.idle.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_miss_builds_with_factory() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let pool = Pool::new(2, move || counter.fetch_add(1, Ordering::SeqCst));

        assert_eq!(pool.acquire(), 0);
        assert_eq!(pool.acquire(), 1);
        assert_eq!(built.load(Ordering::SeqCst), 2);

        let stats = pool.stats();
        assert_eq!(stats.acquired, 2);
        assert_eq!(stats.created, 2);
        assert_eq!(stats.reused(), 0);
    }

    #[test]
    fn test_release_then_reuse() {
        let pool = Pool::new(4, || String::from("fresh"));

        let mut item = pool.acquire();
        item.push_str("-used");
        assert!(pool.release(item));
        assert_eq!(pool.idle(), 1);

        assert_eq!(pool.acquire(), "fresh-used");
        let stats = pool.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.reused(), 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_full_pool_drops_on_release() {
        let pool = Pool::new(1, Vec::<u8>::new);

        assert!(pool.release(Vec::new()));
        assert!(!pool.release(Vec::new()));
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.stats().dropped, 1);
    }

    #[test]
    fn test_zero_max_idle_is_raised() {
        let pool = Pool::new(0, || 0u8);
        assert_eq!(pool.max_idle(), 1);
        assert!(pool.release(7));
        assert_eq!(pool.acquire(), 7);
    }

    #[test]
    fn test_clear() {
        let pool = Pool::new(8, || 0u32);
        for i in 0..5 {
            pool.release(i);
        }
        pool.clear();
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = Arc::new(Pool::new(8, || vec![0u8; 16]));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let item = pool.acquire();
                        assert_eq!(item.len(), 16);
                        pool.release(item);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = pool.stats();
        assert_eq!(stats.acquired, 16 * 1000);
        assert_eq!(stats.released + stats.dropped, 16 * 1000);
        assert!(pool.idle() <= 8);
    }
}
