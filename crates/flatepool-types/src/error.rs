//! Error types for flatepool
//!
//! Every failure that reaches a caller is one of two data errors, each
//! carrying the underlying I/O cause, or a configuration error raised before
//! any pool is built.

use std::io;

/// Main error type for flatepool operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Writing, flushing or finalizing the compressor failed
    #[error("Compression failed: {source}")]
    CompressionFailed {
        /// Underlying cause reported by the engine or its sink
        source: io::Error,
    },

    /// The input is not a complete, valid compressed stream
    #[error("Decompression failed: {source}")]
    DecompressionFailed {
        /// Underlying cause reported by the engine
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Compression errors
    Compression,
    /// Decompression errors
    Decompression,
    /// Configuration errors
    Config,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CompressionFailed { .. } => ErrorKind::Compression,
            Self::DecompressionFailed { .. } => ErrorKind::Decompression,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Check if the caller can recover by retrying with different input.
    ///
    /// The service itself never retries.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::CompressionFailed { .. } | Self::DecompressionFailed { .. } => true,
            Self::Config { .. } => false,
        }
    }

    /// The I/O error kind of the underlying cause, if any
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::CompressionFailed { source } | Self::DecompressionFailed { source } => {
                Some(source.kind())
            }
            Self::Config { .. } => None,
        }
    }

    /// Create a new compression error
    pub fn compression_failed(source: io::Error) -> Self {
        Self::CompressionFailed { source }
    }

    /// Create a new decompression error
    pub fn decompression_failed(source: io::Error) -> Self {
        Self::DecompressionFailed { source }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
