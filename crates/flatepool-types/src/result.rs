//! Result type alias for flatepool operations

use crate::Error;

/// Result type alias for flatepool operations
pub type Result<T> = std::result::Result<T, Error>;
