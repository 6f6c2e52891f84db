//! Collaborator traits for the Jam engine

use crate::error::ResolveError;
use crate::types::{ChatId, Track};
use async_trait::async_trait;

/// Content resolver
///
/// Turns a user query (search term or URL) into a playable [`Track`] with
/// a downloaded payload. Resolution is long-running (network bound) and
/// is never awaited on a command path; the coordinator runs it on a
/// separate task and merges the result back into the session.
///
/// Retry policy, if any, belongs to the implementer — the engine reports
/// every failure upward exactly once and moves on.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Resolve a query into a downloaded track
    ///
    /// # Errors
    /// Returns a [`ResolveError`] if nothing matched, the content was too
    /// large, or the download failed.
    async fn resolve(&self, query: &str) -> Result<Track, ResolveError>;

    /// Free any resource retained for a track's content handle
    ///
    /// Called exactly once per track, after the engine no longer
    /// references it (discarded from a cleared queue, finished playing,
    /// superseded by a stop, or rejected by a full queue).
    async fn release(&self, track: &Track);
}

/// Audio transport
///
/// Delivers decoded audio to a chat's voice channel. The engine only
/// issues instructions; it never observes audio itself. The transport
/// reports natural end-of-track back to the coordinator by calling its
/// `track_ended` entry point, which the engine treats exactly like an
/// explicit skip.
///
/// Methods are infallible from the engine's point of view: a transport
/// that cannot act (e.g. lost voice connection) handles that on its own
/// side and surfaces it through the front end, not through playback
/// state.
#[async_trait]
pub trait AudioTransport: Send + Sync {
    /// Begin delivering a track to the chat's voice channel
    async fn start(&self, chat_id: ChatId, track: &Track);

    /// Suspend delivery, keeping position
    async fn suspend(&self, chat_id: ChatId);

    /// Resume suspended delivery
    async fn resume(&self, chat_id: ChatId);

    /// Stop delivery and leave the voice channel
    async fn stop(&self, chat_id: ChatId);
}
