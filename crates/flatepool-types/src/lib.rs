//! Core error and configuration types for flatepool
//!
//! This crate provides the foundational types shared by the flatepool
//! crates. It includes:
//!
//! - **Error handling**: the `CompressionFailed` / `DecompressionFailed`
//!   taxonomy with the underlying cause attached
//! - **Configuration**: validated compression levels and per-service pool settings
//!
//! # Features
//!
//! - `serde`: Enable serialization support for configuration types
//!
//! # Examples
//!
//! ```rust
//! use flatepool_types::{CompressionLevel, ServiceConfig};
//!
//! let config = ServiceConfig::default()
//!     .with_level(CompressionLevel::best())
//!     .with_max_retained_capacity(128 * 1024);
//! assert!(config.validate().is_ok());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod result;

// Re-export commonly used types
pub use config::{CompressionLevel, ServiceConfig};
pub use error::{Error, ErrorKind};
pub use result::Result;
