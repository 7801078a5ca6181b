//! Pooled raw DEFLATE compression for flatepool
//!
//! This crate turns whole byte slices into raw DEFLATE streams (RFC 1951, no
//! zlib or gzip framing) and back, reusing engine state and scratch memory
//! across calls:
//!
//! - **Engines**: resettable compressors and decompressors that bind to a
//!   buffer only for the duration of one operation
//! - **Pools**: lock-free pools of idle engines, one compressor pool per level
//! - **Service**: the thread-safe entry point tying engines, buffers and
//!   statistics together
//!
//! # Features
//!
//! - `serde` (default): Enable serialization of configuration and statistics
//!
//! # Examples
//!
//! ```rust
//! use flatepool_compression::CompressionService;
//!
//! let service = CompressionService::default();
//! let data = b"Hello, world! This is test data for compression.";
//!
//! let compressed = service.compress(data)?;
//! let decompressed = service.decompress(&compressed)?;
//!
//! assert_eq!(data, decompressed.as_slice());
//! # Ok::<(), flatepool_types::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod pools;
pub mod service;
pub mod stats;


// Re-export main types
pub use engine::{Compressor, Decoder, Decompressor, Encoder};
pub use pools::{CompressorPool, DecompressorPool};
pub use service::CompressionService;
pub use stats::{ServiceStats, ServiceStatsSnapshot};
