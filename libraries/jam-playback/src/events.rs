//! Playback events
//!
//! Event-based notification for the command front end. Events are
//! emitted after the corresponding transition has been applied, on a
//! broadcast channel so multiple consumers (reply renderer, metrics,
//! tests) can observe them independently.

use jam_core::ChatId;
use serde::{Deserialize, Serialize};

/// Events emitted by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A track became current and the transport was told to start it
    TrackStarted {
        /// Chat the track plays in
        chat_id: ChatId,
        /// Track title
        title: String,
    },

    /// A track joined the pending queue
    TrackQueued {
        /// Chat whose queue grew
        chat_id: ChatId,
        /// Track title
        title: String,
        /// 1-based queue position
        position: usize,
    },

    /// Playback was paused
    Paused {
        /// Chat that paused
        chat_id: ChatId,
    },

    /// Playback was resumed
    Resumed {
        /// Chat that resumed
        chat_id: ChatId,
    },

    /// The current track was skipped or finished
    Advanced {
        /// Chat that advanced
        chat_id: ChatId,
        /// Title now playing, or `None` if the queue drained
        next_title: Option<String>,
    },

    /// Playback was stopped and the queue cleared
    Stopped {
        /// Chat that stopped
        chat_id: ChatId,
        /// How many tracks were discarded (current + pending)
        discarded: usize,
    },

    /// A play request failed to resolve; playback state is untouched
    ResolutionFailed {
        /// Chat the request targeted
        chat_id: ChatId,
        /// The original query
        query: String,
        /// Human-readable failure reason
        reason: String,
    },
}
