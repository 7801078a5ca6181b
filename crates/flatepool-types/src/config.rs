//! Configuration types for flatepool
//!
//! This module provides type-safe configuration structures with validation
//! and optional serialization support.

use crate::{Error, Result};

/// Compression level with validation
///
/// Follows the conventional DEFLATE spectrum: 0 stores, 1 is fastest,
/// 9 compresses best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// No compression
    pub const NONE: u32 = 0;
    /// Fastest compression
    pub const FASTEST: u32 = 1;
    /// Default compression
    pub const DEFAULT: u32 = 6;
    /// Best compression
    pub const BEST: u32 = 9;

    /// Create a new compression level with validation
    pub fn new(level: u32) -> Result<Self> {
        if level > Self::BEST {
            Err(Error::config(format!(
                "Compression level {} exceeds maximum {}",
                level,
                Self::BEST
            )))
        } else {
            Ok(Self(level))
        }
    }

    /// Fastest level
    pub const fn fastest() -> Self {
        Self(Self::FASTEST)
    }

    /// Best-ratio level
    pub const fn best() -> Self {
        Self(Self::BEST)
    }

    /// Get the compression level value
    pub fn get(self) -> u32 {
        self.0
    }

    /// Check if compression is enabled
    pub fn is_enabled(self) -> bool {
        self.0 > Self::NONE
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for CompressionLevel {
    type Error = Error;

    fn try_from(level: u32) -> Result<Self> {
        Self::new(level)
    }
}

impl From<CompressionLevel> for u32 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

/// Configuration of one compression service and its pools.
///
/// The level is fixed for the lifetime of the service so that pooled
/// compressors stay interchangeable. Services with different levels need
/// separate instances.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServiceConfig {
    /// Compression level baked into every pooled compressor
    pub level: CompressionLevel,
    /// Largest buffer capacity the buffer pool keeps for reuse
    pub max_retained_capacity: usize,
    /// Capacity of a freshly allocated scratch buffer
    pub initial_buffer_capacity: usize,
    /// Idle instances kept per pool
    pub max_idle: usize,
    /// Ceiling on decompressed output; `None` disables the check
    pub max_decompressed_size: Option<usize>,
}

impl ServiceConfig {
    /// Default high-water mark for retained buffers (64KB)
    pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 64 * 1024;
    /// Default capacity of new scratch buffers (4KB)
    pub const DEFAULT_INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
    /// Default decompressed output ceiling (256MB)
    pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

    /// Set the compression level
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the retained buffer high-water mark
    pub fn with_max_retained_capacity(mut self, capacity: usize) -> Self {
        self.max_retained_capacity = capacity;
        self
    }

    /// Set the capacity of new scratch buffers
    pub fn with_initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }

    /// Set the number of idle instances kept per pool
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Set or clear the decompressed output ceiling
    pub fn with_max_decompressed_size(mut self, limit: Option<usize>) -> Self {
        self.max_decompressed_size = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_idle == 0 {
            return Err(Error::config("max_idle must be at least 1"));
        }
        if self.initial_buffer_capacity > self.max_retained_capacity {
            return Err(Error::config(format!(
                "initial_buffer_capacity {} exceeds max_retained_capacity {}",
                self.initial_buffer_capacity, self.max_retained_capacity
            )));
        }
        if self.max_decompressed_size == Some(0) {
            return Err(Error::config("max_decompressed_size must be non-zero"));
        }
        Ok(())
    }

    fn default_max_idle() -> usize {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        (cpu_count * 4).max(4)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            level: CompressionLevel::fastest(),
            max_retained_capacity: Self::DEFAULT_MAX_RETAINED_CAPACITY,
            initial_buffer_capacity: Self::DEFAULT_INITIAL_BUFFER_CAPACITY,
            max_idle: Self::default_max_idle(),
            max_decompressed_size: Some(Self::DEFAULT_MAX_DECOMPRESSED_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(6)]
    #[case(9)]
    fn test_valid_levels(#[case] level: u32) {
        assert_eq!(CompressionLevel::new(level).unwrap().get(), level);
    }

    #[rstest]
    #[case(10)]
    #[case(22)]
    #[case(u32::MAX)]
    fn test_invalid_levels(#[case] level: u32) {
        let error = CompressionLevel::new(level).unwrap_err();
        assert!(error.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_level_spectrum() {
        assert!(CompressionLevel::fastest() < CompressionLevel::default());
        assert!(CompressionLevel::default() < CompressionLevel::best());
        assert!(!CompressionLevel::new(0).unwrap().is_enabled());
        assert!(CompressionLevel::fastest().is_enabled());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.level, CompressionLevel::fastest());
        assert_eq!(config.max_retained_capacity, 64 * 1024);
        assert!(config.max_idle >= 4);
    }

    #[test]
    fn test_config_validation() {
        let zero_idle = ServiceConfig::default().with_max_idle(0);
        assert!(zero_idle.validate().is_err());

        let inverted = ServiceConfig::default()
            .with_initial_buffer_capacity(128 * 1024)
            .with_max_retained_capacity(64 * 1024);
        assert!(inverted.validate().is_err());

        let zero_ceiling = ServiceConfig::default().with_max_decompressed_size(Some(0));
        assert!(zero_ceiling.validate().is_err());

        let unbounded = ServiceConfig::default().with_max_decompressed_size(None);
        assert!(unbounded.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_roundtrip() {
        let config = ServiceConfig::default().with_level(CompressionLevel::best());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"level\":9"));

        let parsed: ServiceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let rejected = serde_json::from_str::<ServiceConfig>(r#"{"level": 12}"#);
        assert!(rejected.is_err());
    }
}
