//! Core error types for Jam

use thiserror::Error;

/// Errors reported by a [`ContentResolver`](crate::traits::ContentResolver)
///
/// All variants are recoverable and reported to the requester; the engine
/// never retries a failed resolution on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The query matched no playable content
    #[error("No results found for query")]
    NotFound,

    /// The matched content exceeds the resolver's size limit
    #[error("Content exceeds download size limit ({limit_bytes} bytes)")]
    TooLarge {
        /// Size limit the content exceeded, in bytes
        limit_bytes: u64,
    },

    /// Download or extraction failed
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}
