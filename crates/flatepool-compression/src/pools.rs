//! Pools of reusable compression engines

use crate::engine::{Compressor, Decompressor};
use flatepool_io::{Pool, PoolStats};
use flatepool_types::CompressionLevel;

/// Pool of compressors that all share one level
#[derive(Debug)]
pub struct CompressorPool {
    engines: Pool<Compressor>,
    level: CompressionLevel,
}

impl CompressorPool {
    /// Create a pool keeping up to `max_idle` compressors at `level`
    pub fn new(level: CompressionLevel, max_idle: usize) -> Self {
        Self {
            engines: Pool::new(max_idle, move || Compressor::new(level)),
            level,
        }
    }

    /// Take an idle compressor or build a new one
    pub fn acquire(&self) -> Compressor {
        self.engines.acquire()
    }

    /// Return a compressor after a successful operation
    pub fn release(&self, compressor: Compressor) -> bool {
        debug_assert_eq!(compressor.level(), self.level);
        self.engines.release(compressor)
    }

    /// Level of every compressor in this pool
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Number of idle compressors
    pub fn idle(&self) -> usize {
        self.engines.idle()
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        self.engines.stats()
    }
}

/// Pool of decompressors
#[derive(Debug)]
pub struct DecompressorPool {
    engines: Pool<Decompressor>,
}

impl DecompressorPool {
    /// Create a pool keeping up to `max_idle` decompressors
    pub fn new(max_idle: usize) -> Self {
        Self {
            engines: Pool::new(max_idle, Decompressor::new),
        }
    }

    /// Take an idle decompressor or build a new one
    pub fn acquire(&self) -> Decompressor {
        self.engines.acquire()
    }

    /// Return a decompressor after a successful operation
    pub fn release(&self, decompressor: Decompressor) -> bool {
        self.engines.release(decompressor)
    }

    /// Number of idle decompressors
    pub fn idle(&self) -> usize {
        self.engines.idle()
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        self.engines.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressor_pool_reuses_engines() {
        let pool = CompressorPool::new(CompressionLevel::fastest(), 2);

        let engine = pool.acquire();
        assert_eq!(engine.level(), CompressionLevel::fastest());
        assert!(pool.release(engine));
        assert_eq!(pool.idle(), 1);

        let _engine = pool.acquire();
        let stats = pool.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.reused(), 1);
    }

    #[test]
    fn test_compressor_pool_level() {
        let pool = CompressorPool::new(CompressionLevel::best(), 2);
        assert_eq!(pool.level(), CompressionLevel::best());
        assert_eq!(pool.acquire().level(), CompressionLevel::best());
    }

    #[test]
    fn test_decompressor_pool_bounded() {
        let pool = DecompressorPool::new(1);
        let first = pool.acquire();
        let second = pool.acquire();

        assert!(pool.release(first));
        assert!(!pool.release(second));
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.stats().dropped, 1);
    }
}
