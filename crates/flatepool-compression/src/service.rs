//! Pooled compression service
//!
//! [`CompressionService`] turns whole byte slices into raw DEFLATE streams
//! and back. Engines and scratch buffers come from the service's pools and
//! go back after a successful call. An engine whose call failed is dropped
//! because its internal state can no longer be trusted.

use crate::engine::{Compressor, Decompressor};
use crate::pools::{CompressorPool, DecompressorPool};
use crate::stats::{ServiceStats, ServiceStatsSnapshot};
use flatepool_io::BufferPool;
use flatepool_types::{CompressionLevel, Error, Result, ServiceConfig};
use std::io::{self, Read, Write};
use tracing::{debug, trace, warn};

/// Thread-safe compressor/decompressor backed by reusable resources
///
/// Calls run synchronously on the caller's thread. Share one instance
/// across threads by reference or through an `Arc`.
#[derive(Debug)]
pub struct CompressionService {
    config: ServiceConfig,
    buffers: BufferPool,
    compressors: CompressorPool,
    decompressors: DecompressorPool,
    stats: ServiceStats,
}

impl CompressionService {
    /// Create a service after validating `config`
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ServiceConfig) -> Self {
        debug!(
            level = config.level.get(),
            max_idle = config.max_idle,
            max_retained_capacity = config.max_retained_capacity,
            max_decompressed_size = ?config.max_decompressed_size,
            "Creating compression service"
        );

        Self {
            buffers: BufferPool::new(
                config.initial_buffer_capacity,
                config.max_retained_capacity,
                config.max_idle,
            ),
            compressors: CompressorPool::new(config.level, config.max_idle),
            decompressors: DecompressorPool::new(config.max_idle),
            stats: ServiceStats::default(),
            config,
        }
    }

    /// Compress `data` into a complete raw DEFLATE stream
    ///
    /// Empty input yields a short, valid stream that decodes to nothing.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut engine = self.compressors.acquire();
        let mut buffer = self.buffers.acquire();

        match Self::deflate_into(&mut engine, &mut buffer, data) {
            Ok(()) => {
                let compressed = buffer.clone();
                self.buffers.release(buffer);
                self.compressors.release(engine);
                self.stats.record_compression(data.len(), compressed.len());
                trace!(
                    input = data.len(),
                    output = compressed.len(),
                    "compressed payload"
                );
                Ok(compressed)
            }
            Err(e) => {
                self.buffers.release(buffer);
                drop(engine);
                self.stats.record_compression_failure();
                warn!(error = %e, input = data.len(), "discarding compressor after failure");
                Err(Error::compression_failed(e))
            }
        }
    }

    /// Decompress a complete raw DEFLATE stream
    ///
    /// Fails on corrupt or truncated input, on bytes following the end of
    /// the stream and on output beyond the configured ceiling.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut engine = self.decompressors.acquire();
        let mut buffer = self.buffers.acquire();
        buffer.extend_from_slice(data);

        let result = self.inflate_from(&mut engine, &buffer);
        self.buffers.release(buffer);

        match result {
            Ok(decompressed) => {
                self.decompressors.release(engine);
                self.stats
                    .record_decompression(data.len(), decompressed.len());
                trace!(
                    input = data.len(),
                    output = decompressed.len(),
                    "decompressed payload"
                );
                Ok(decompressed)
            }
            Err(e) => {
                drop(engine);
                self.stats.record_decompression_failure();
                warn!(error = %e, input = data.len(), "discarding decompressor after failure");
                Err(Error::decompression_failed(e))
            }
        }
    }

    fn deflate_into(engine: &mut Compressor, sink: &mut Vec<u8>, data: &[u8]) -> io::Result<()> {
        let mut encoder = engine.attach(sink);
        if let Err(e) = encoder.write_all(data).and_then(|()| encoder.flush()) {
            // Best-effort close before the engine is discarded
            return Err(match encoder.finish() {
                Ok(()) => e,
                Err(close) => join_close_error(e, &close),
            });
        }
        encoder.finish()
    }

    fn inflate_from(&self, engine: &mut Decompressor, source: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoder = engine.attach(source);
        let mut output = Vec::new();

        match self.config.max_decompressed_size {
            Some(limit) => {
                (&mut decoder)
                    .take((limit as u64).saturating_add(1))
                    .read_to_end(&mut output)?;
                if output.len() > limit {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("decompressed output exceeds limit of {limit} bytes"),
                    ));
                }
            }
            None => {
                decoder.read_to_end(&mut output)?;
            }
        }

        let trailing = decoder.remaining_input().len();
        if trailing > 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{trailing} trailing bytes after end of deflate stream"),
            ));
        }
        Ok(output)
    }

    /// Get service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Level used by every compression on this service
    pub fn level(&self) -> CompressionLevel {
        self.compressors.level()
    }

    /// Scratch buffer pool
    pub fn buffer_pool(&self) -> &BufferPool {
        &self.buffers
    }

    /// Compressor pool
    pub fn compressor_pool(&self) -> &CompressorPool {
        &self.compressors
    }

    /// Decompressor pool
    pub fn decompressor_pool(&self) -> &DecompressorPool {
        &self.decompressors
    }

    /// Get service statistics
    pub fn stats(&self) -> ServiceStatsSnapshot {
        self.stats.snapshot(
            self.buffers.stats(),
            self.compressors.stats(),
            self.decompressors.stats(),
        )
    }
}

/// Append a failure to close the engine to the error that caused the close
fn join_close_error(cause: io::Error, close: &io::Error) -> io::Error {
    io::Error::new(cause.kind(), format!("{cause}; close: {close}"))
}

impl Default for CompressionService {
    fn default() -> Self {
        Self::build(ServiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatepool_types::ErrorKind;
    use rstest::rstest;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_service_is_send_sync() {
        assert_send_sync::<CompressionService>();
    }

    #[test]
    fn test_roundtrip() {
        let service = CompressionService::default();
        let data = b"Hello, world! This is test data for compression.";

        let compressed = service.compress(data).unwrap();
        let decompressed = service.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[rstest]
    #[case(CompressionLevel::NONE)]
    #[case(CompressionLevel::FASTEST)]
    #[case(CompressionLevel::BEST)]
    fn test_roundtrip_per_level(#[case] level: u32) {
        let config = ServiceConfig::default().with_level(CompressionLevel::new(level).unwrap());
        let service = CompressionService::new(config).unwrap();
        assert_eq!(service.level().get(), level);

        let data = b"abcabcabcabcabcabcabcabcabcabcabc".repeat(64);
        let compressed = service.compress(&data).unwrap();
        assert_eq!(service.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let error = CompressionService::new(ServiceConfig::default().with_max_idle(0)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_resources_return_to_pools() {
        let service = CompressionService::new(ServiceConfig::default().with_max_idle(4)).unwrap();
        for _ in 0..10 {
            let compressed = service.compress(b"pooled").unwrap();
            service.decompress(&compressed).unwrap();
        }

        let stats = service.stats();
        assert_eq!(stats.compressors.created, 1);
        assert_eq!(stats.decompressors.created, 1);
        assert_eq!(stats.buffers.pool.created, 1);
        assert_eq!(service.compressor_pool().idle(), 1);
        assert_eq!(service.decompressor_pool().idle(), 1);
        assert_eq!(service.buffer_pool().idle(), 1);
    }

    #[test]
    fn test_failed_decompression_discards_engine() {
        let service = CompressionService::default();
        let error = service.decompress(&[0xFF; 64]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Decompression);

        let stats = service.stats();
        assert_eq!(stats.decompression_failures, 1);
        assert_eq!(stats.engines_discarded, 1);
        assert_eq!(stats.decompressors.released, 0);
        assert_eq!(service.decompressor_pool().idle(), 0);
        // the scratch buffer is still returned
        assert_eq!(service.buffer_pool().idle(), 1);
    }

    #[test]
    fn test_close_error_joined_to_cause() {
        let cause = io::Error::new(io::ErrorKind::WriteZero, "deflate accepted no input");
        let close = io::Error::other("deflate stream could not be finished");

        let joined = join_close_error(cause, &close);
        assert_eq!(joined.kind(), io::ErrorKind::WriteZero);
        assert_eq!(
            joined.to_string(),
            "deflate accepted no input; close: deflate stream could not be finished"
        );

        let error = Error::compression_failed(joined);
        assert_eq!(error.kind(), ErrorKind::Compression);
        assert_eq!(error.io_kind(), Some(io::ErrorKind::WriteZero));
        assert!(error.to_string().ends_with("close: deflate stream could not be finished"));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let service = CompressionService::default();
        let mut compressed = service.compress(b"payload").unwrap();
        compressed.push(0);

        let error = service.decompress(&compressed).unwrap_err();
        assert_eq!(error.io_kind(), Some(io::ErrorKind::InvalidData));
        assert!(error.to_string().contains("trailing"));
    }

    #[rstest]
    #[case(1024, true)]
    #[case(1023, false)]
    fn test_output_ceiling(#[case] limit: usize, #[case] accepted: bool) {
        let config = ServiceConfig::default().with_max_decompressed_size(Some(limit));
        let service = CompressionService::new(config).unwrap();
        let compressed = service.compress(&[7u8; 1024]).unwrap();

        let result = service.decompress(&compressed);
        assert_eq!(result.is_ok(), accepted);
        if let Err(error) = result {
            assert!(error.to_string().contains("exceeds limit"));
        }
    }

    #[test]
    fn test_unbounded_output() {
        let config = ServiceConfig::default().with_max_decompressed_size(None);
        let service = CompressionService::new(config).unwrap();
        let data = vec![0u8; 4 * 1024 * 1024];

        let compressed = service.compress(&data).unwrap();
        assert_eq!(service.decompress(&compressed).unwrap().len(), data.len());
    }
}
