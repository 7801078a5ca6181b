//! Service-level operation counters

use flatepool_io::{BufferPoolStats, PoolStats};
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Live counters shared by every caller of a service
#[derive(Debug, Default)]
pub struct ServiceStats {
    compressions: AtomicU64,
    decompressions: AtomicU64,
    compression_failures: AtomicU64,
    decompression_failures: AtomicU64,
    bytes_compressed_in: AtomicU64,
    bytes_compressed_out: AtomicU64,
    bytes_decompressed_in: AtomicU64,
    bytes_decompressed_out: AtomicU64,
    engines_discarded: AtomicU64,
}

impl ServiceStats {
    /// Record a successful compression
    pub fn record_compression(&self, input: usize, output: usize) {
        self.compressions.fetch_add(1, Ordering::Relaxed);
        self.bytes_compressed_in
            .fetch_add(input as u64, Ordering::Relaxed);
        self.bytes_compressed_out
            .fetch_add(output as u64, Ordering::Relaxed);
    }

    /// Record a successful decompression
    pub fn record_decompression(&self, input: usize, output: usize) {
        self.decompressions.fetch_add(1, Ordering::Relaxed);
        self.bytes_decompressed_in
            .fetch_add(input as u64, Ordering::Relaxed);
        self.bytes_decompressed_out
            .fetch_add(output as u64, Ordering::Relaxed);
    }

    /// Record a failed compression and the engine it cost
    pub fn record_compression_failure(&self) {
        self.compression_failures.fetch_add(1, Ordering::Relaxed);
        self.engines_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed decompression and the engine it cost
    pub fn record_decompression_failure(&self) {
        self.decompression_failures.fetch_add(1, Ordering::Relaxed);
        self.engines_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the counters together with the pool counters
    pub fn snapshot(
        &self,
        buffers: BufferPoolStats,
        compressors: PoolStats,
        decompressors: PoolStats,
    ) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            compressions: self.compressions.load(Ordering::Relaxed),
            decompressions: self.decompressions.load(Ordering::Relaxed),
            compression_failures: self.compression_failures.load(Ordering::Relaxed),
            decompression_failures: self.decompression_failures.load(Ordering::Relaxed),
            bytes_compressed_in: self.bytes_compressed_in.load(Ordering::Relaxed),
            bytes_compressed_out: self.bytes_compressed_out.load(Ordering::Relaxed),
            bytes_decompressed_in: self.bytes_decompressed_in.load(Ordering::Relaxed),
            bytes_decompressed_out: self.bytes_decompressed_out.load(Ordering::Relaxed),
            engines_discarded: self.engines_discarded.load(Ordering::Relaxed),
            buffers,
            compressors,
            decompressors,
        }
    }
}

/// Point-in-time view of a service's counters
///
/// Counters are read one at a time, so a snapshot taken under concurrent
/// load may mix values from adjacent operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServiceStatsSnapshot {
    /// Successful compressions
    pub compressions: u64,
    /// Successful decompressions
    pub decompressions: u64,
    /// Failed compressions
    pub compression_failures: u64,
    /// Failed decompressions
    pub decompression_failures: u64,
    /// Uncompressed bytes fed to successful compressions
    pub bytes_compressed_in: u64,
    /// Compressed bytes returned by successful compressions
    pub bytes_compressed_out: u64,
    /// Compressed bytes fed to successful decompressions
    pub bytes_decompressed_in: u64,
    /// Bytes returned by successful decompressions
    pub bytes_decompressed_out: u64,
    /// Engines dropped instead of returned to their pool
    pub engines_discarded: u64,
    /// Scratch buffer pool counters
    pub buffers: BufferPoolStats,
    /// Compressor pool counters
    pub compressors: PoolStats,
    /// Decompressor pool counters
    pub decompressors: PoolStats,
}

impl ServiceStatsSnapshot {
    /// Calculate overall compression ratio
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed_in == 0 {
            1.0
        } else {
            self.bytes_compressed_out as f64 / self.bytes_compressed_in as f64
        }
    }

    /// Total failed operations
    pub fn failures(&self) -> u64 {
        self.compression_failures + self.decompression_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ServiceStats::default();
        stats.record_compression(1000, 250);
        stats.record_compression(1000, 250);
        stats.record_decompression(250, 1000);
        stats.record_decompression_failure();

        let snapshot = stats.snapshot(
            BufferPoolStats::default(),
            PoolStats::default(),
            PoolStats::default(),
        );
        assert_eq!(snapshot.compressions, 2);
        assert_eq!(snapshot.decompressions, 1);
        assert_eq!(snapshot.bytes_decompressed_out, 1000);
        assert_eq!(snapshot.failures(), 1);
        assert_eq!(snapshot.engines_discarded, 1);
        assert!((snapshot.compression_ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_without_data() {
        assert_eq!(ServiceStatsSnapshot::default().compression_ratio(), 1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_serializes() {
        let stats = ServiceStats::default();
        stats.record_compression(10, 12);
        let snapshot = stats.snapshot(
            BufferPoolStats::default(),
            PoolStats::default(),
            PoolStats::default(),
        );

        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["compressions"], 1);
        assert_eq!(json["buffers"]["evicted"], 0);
    }
}
