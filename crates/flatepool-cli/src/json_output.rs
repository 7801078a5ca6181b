//! JSON output structures for the flatepool CLI

use flatepool_compression::ServiceStatsSnapshot;
use serde::{Deserialize, Serialize};

/// Result of the `stats` self-check
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsReport {
    /// flatepool version
    pub version: String,
    /// Compression level used
    pub level: u32,
    /// Size of the input payload
    pub input_bytes: u64,
    /// Size of the compressed payload
    pub compressed_bytes: u64,
    /// Whether decompression reproduced the input
    pub roundtrip_ok: bool,
    /// Compressed size divided by input size
    pub compression_ratio: f64,
    /// Service counters after the round trip
    pub stats: ServiceStatsSnapshot,
}

impl StatsReport {
    /// Build a report from one round trip
    pub fn new(
        level: u32,
        input_bytes: usize,
        compressed_bytes: usize,
        roundtrip_ok: bool,
        stats: ServiceStatsSnapshot,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            level,
            input_bytes: input_bytes as u64,
            compressed_bytes: compressed_bytes as u64,
            roundtrip_ok,
            compression_ratio: stats.compression_ratio(),
            stats,
        }
    }
}
