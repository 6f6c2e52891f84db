//! Core types for the coordination engine

use jam_core::Track;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-chat playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No current track; the queue may be pre-filling while the first
    /// resolution is still in flight
    Idle,

    /// Current track set, transport actively delivering audio
    Playing,

    /// Current track set, transport suspended
    Paused,

    /// Stopped by command; no current track, queue cleared
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Configuration for the coordination engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum pending tracks per chat queue (default: 20)
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

fn default_max_queue_size() -> usize {
    20
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_queue_size: default_max_queue_size(),
        }
    }
}

/// Read-only snapshot of one chat's playback status
///
/// Captures the current track and pending queue at the moment of the
/// call; later mutations are not reflected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueView {
    /// Session state at snapshot time
    pub state: PlaybackState,

    /// Track currently playing or paused, if any
    pub current: Option<Track>,

    /// Pending tracks in play order
    pub pending: Vec<Track>,

    /// Configured queue capacity
    pub capacity: usize,
}

impl QueueView {
    /// Snapshot for a chat with no session
    pub fn empty(capacity: usize) -> Self {
        Self {
            state: PlaybackState::Idle,
            current: None,
            pending: Vec::new(),
            capacity,
        }
    }

    /// Number of pending tracks
    pub fn size(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is at capacity
    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.capacity
    }
}
