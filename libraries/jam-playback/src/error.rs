//! Error types for the coordination engine

use crate::types::PlaybackState;
use jam_core::ResolveError;
use thiserror::Error;

/// Playback coordination errors
///
/// Every variant is recoverable and reported to the command source as a
/// typed outcome; none of them are process-fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Queue reached its configured capacity; the track was rejected
    #[error("Queue is full ({capacity} tracks)")]
    QueueFull {
        /// Configured queue capacity
        capacity: usize,
    },

    /// Queue has no pending tracks
    #[error("Queue is empty")]
    QueueEmpty,

    /// Command does not apply in the session's current state
    #[error("Cannot {action} while {state}")]
    InvalidStateTransition {
        /// State the session was in
        state: PlaybackState,
        /// The requested action
        action: &'static str,
    },

    /// No active playback session for this chat
    #[error("Nothing is playing in this chat")]
    NothingPlaying,

    /// Queue position outside the pending range (1-based)
    #[error("Position out of range: {0}")]
    PositionOutOfRange(usize),

    /// Content resolution failed; playback state was not touched
    #[error(transparent)]
    Resolution(#[from] ResolveError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
