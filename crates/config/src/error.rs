//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration sources could not be read or merged.
    #[display("unable to load configuration sources")]
    Load,
    /// A recognized option failed validation.
    ///
    /// Every size and concurrency cap must be a positive integer: a zero
    /// concurrency cap would deadlock the admission wait, and a zero chunk
    /// size produces no chunks at all.
    #[display("invalid value for '{field}': expected a positive integer, got {value}")]
    InvalidSetting {
        /// The offending settings field.
        field: &'static str,
        /// The rejected value.
        value: usize,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Configuration is either valid or it's not.
        false
    }
}
