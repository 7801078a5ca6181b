//! Lock-free object and buffer pools for flatepool
//!
//! This crate provides the resource pools the compression service is built on:
//!
//! - **Object pool**: a bounded, never-blocking pool of reusable instances
//!   with a factory for misses
//! - **Buffer pool**: scratch byte buffers that come back empty and are only
//!   retained below a capacity high-water mark
//!
//! # Examples
//!
//! ```rust
//! use flatepool_io::BufferPool;
//!
//! let pool = BufferPool::new(4 * 1024, 64 * 1024, 8);
//! let mut buffer = pool.acquire();
//! buffer.extend_from_slice(b"scratch");
//! pool.release(buffer);
//!
//! assert!(pool.acquire().is_empty());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod pool;

pub use buffer::{BufferPool, BufferPoolStats};
pub use pool::{Pool, PoolStats};
