//! flatepool Testing Suite
//!
//! This crate provides integration tests for the flatepool crates together
//! with the data generators and thread harness they share.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Concurrency testing utilities
///
/// This module provides a scoped-thread harness for hammering one shared
/// service from many workers.
pub mod concurrency_utils;

/// Unified test utilities
///
/// This module provides deterministic payload generators used across all
/// test files.
pub mod test_utils;
