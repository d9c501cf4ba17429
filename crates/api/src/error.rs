//! Transport Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A transport error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Inside a bulk run all of these are logged and swallowed by
/// the executor's failure-isolation contract; only listing operations
/// propagate them.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never completed (network, session, HTTP-level failure).
    #[display("transport failure talking to the service")]
    Transport,
    /// The endpoint settled but returned something other than the expected
    /// ordered sequence. The protocol is undocumented; shapes drift.
    #[display("endpoint returned an unexpected payload shape")]
    UnexpectedShape,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport => true,
            Self::UnexpectedShape => false,
        }
    }
}
