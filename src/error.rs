//! Façade Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A façade error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for façade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Bulk actions never raise these — per-chunk failures are isolated and
/// reported in the action's [`Report`](crate::Report) — so the only errors
/// that escape the façade come from listing collection and album creation,
/// where a transport failure genuinely stops the operation.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A transport operation outside a bulk run failed.
    #[display("transport operation failed")]
    Api,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api => true,
        }
    }
}
