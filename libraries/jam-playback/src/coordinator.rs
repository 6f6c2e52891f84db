//! Command-level playback coordination
//!
//! The coordinator is the only component that talks to collaborators.
//! It owns the session registry, drives resolver and transport calls,
//! and emits events after each applied transition. Transport
//! instructions and event sends for a chat happen while that chat's
//! session lock is held, so both always follow the transition order.
//!
//! Resolution is the one long-running operation and never runs under a
//! session lock: `play` registers the resolution with the registry on
//! the command path, capturing the chat's resolution generation before
//! the task is spawned, then merges the result back in afterwards. A
//! stop bumps the generation, so a result the stop overtook is
//! discarded instead of resurrecting playback, even when the stop lands
//! before the resolution task first runs.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::registry::{SessionHandle, SessionRegistry};
use crate::session::Resolved;
use crate::types::{PlaybackConfig, QueueView};
use jam_core::{AudioTransport, ChatId, ContentResolver, RequesterId, Track};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How a play request settled
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// Nothing was current; the resolved track is playing now
    Started {
        /// The track that started
        track: Track,
    },

    /// Playback was underway; the resolved track joined the queue
    Queued {
        /// The queued track
        track: Track,
        /// 1-based queue position for display
        position: usize,
    },

    /// A stop overtook the resolution; the result was discarded
    Superseded,
}

/// Playback coordination engine
///
/// Cheap to clone; clones share the registry, collaborators, and event
/// channel. One instance serves every chat in the process.
#[derive(Clone)]
pub struct Coordinator {
    registry: Arc<SessionRegistry>,
    resolver: Arc<dyn ContentResolver>,
    transport: Arc<dyn AudioTransport>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl Coordinator {
    /// Create a coordinator over the given collaborators
    pub fn new(
        config: &PlaybackConfig,
        resolver: Arc<dyn ContentResolver>,
        transport: Arc<dyn AudioTransport>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            registry: Arc::new(SessionRegistry::new(config)),
            resolver,
            transport,
            events,
        }
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Number of chats with a live session
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Request playback of a query for a chat
    ///
    /// Returns immediately with a handle to the spawned resolution; the
    /// caller can use the immediate return as its "searching" reply and
    /// the awaited outcome as the final one. The command path is never
    /// blocked on the download.
    pub fn play(
        &self,
        chat_id: ChatId,
        query: impl Into<String>,
        requested_by: RequesterId,
    ) -> JoinHandle<Result<PlayOutcome>> {
        // Register before spawning: a stop issued from here on sees the
        // pending count and invalidates the captured generation, however
        // late the task runs.
        let (handle, generation) = self.registry.begin_resolution(chat_id);
        let this = self.clone();
        let query = query.into();
        tokio::spawn(async move {
            this.run_play(handle, generation, chat_id, &query, requested_by)
                .await
        })
    }

    async fn run_play(
        &self,
        handle: SessionHandle,
        generation: u64,
        chat_id: ChatId,
        query: &str,
        requested_by: RequesterId,
    ) -> Result<PlayOutcome> {
        tracing::debug!(chat_id = %chat_id, query, "resolving track");
        let resolved = self.resolver.resolve(query).await;

        let mut session = handle.lock().await;
        self.registry.finish_resolution(chat_id);

        let track = match resolved {
            Ok(track) => track.with_requester(requested_by),
            Err(err) => {
                tracing::warn!(chat_id = %chat_id, query, error = %err, "resolution failed");
                self.emit(PlaybackEvent::ResolutionFailed {
                    chat_id,
                    query: query.to_owned(),
                    reason: err.to_string(),
                });
                drop(session);
                self.registry.remove_if_disposable(chat_id);
                return Err(PlaybackError::Resolution(err));
            }
        };

        if self.registry.generation(chat_id) != Some(generation) {
            // A stop landed after this resolution registered; the result
            // must not restart playback.
            tracing::debug!(chat_id = %chat_id, title = %track.title, "discarding stale resolution");
            drop(session);
            self.registry.remove_if_disposable(chat_id);
            self.resolver.release(&track).await;
            return Ok(PlayOutcome::Superseded);
        }

        match session.track_resolved(track) {
            Resolved::Started(track) => {
                self.transport.start(chat_id, &track).await;
                self.emit(PlaybackEvent::TrackStarted {
                    chat_id,
                    title: track.title.clone(),
                });
                Ok(PlayOutcome::Started { track })
            }
            Resolved::Queued { track, position } => {
                self.emit(PlaybackEvent::TrackQueued {
                    chat_id,
                    title: track.title.clone(),
                    position,
                });
                Ok(PlayOutcome::Queued { track, position })
            }
            Resolved::Rejected { track, capacity } => {
                drop(session);
                self.resolver.release(&track).await;
                Err(PlaybackError::QueueFull { capacity })
            }
        }
    }

    /// Pause the chat's active playback
    ///
    /// # Errors
    /// `NothingPlaying` if the chat has no session, or
    /// `InvalidStateTransition` unless currently Playing.
    pub async fn pause(&self, chat_id: ChatId) -> Result<()> {
        let handle = self
            .registry
            .get(chat_id)
            .ok_or(PlaybackError::NothingPlaying)?;
        let mut session = handle.lock().await;
        session.pause()?;
        self.transport.suspend(chat_id).await;
        self.emit(PlaybackEvent::Paused { chat_id });
        Ok(())
    }

    /// Resume the chat's paused playback
    ///
    /// # Errors
    /// `NothingPlaying` if the chat has no session, or
    /// `InvalidStateTransition` unless currently Paused.
    pub async fn resume(&self, chat_id: ChatId) -> Result<()> {
        let handle = self
            .registry
            .get(chat_id)
            .ok_or(PlaybackError::NothingPlaying)?;
        let mut session = handle.lock().await;
        session.resume()?;
        self.transport.resume(chat_id).await;
        self.emit(PlaybackEvent::Resumed { chat_id });
        Ok(())
    }

    /// Skip the chat's current track
    ///
    /// The next pending track starts immediately; with nothing pending
    /// the transport is told to stop and the session goes Idle. Returns
    /// the new current track, if any.
    ///
    /// # Errors
    /// `NothingPlaying` if the chat has no session or no current track.
    pub async fn skip(&self, chat_id: ChatId) -> Result<Option<Track>> {
        let handle = self
            .registry
            .get(chat_id)
            .ok_or(PlaybackError::NothingPlaying)?;
        let mut session = handle.lock().await;
        let advance = session.advance()?;
        self.apply_advance(chat_id, &advance).await;
        self.emit(PlaybackEvent::Advanced {
            chat_id,
            next_title: advance.next.as_ref().map(|t| t.title.clone()),
        });
        drop(session);
        self.resolver.release(&advance.finished).await;
        Ok(advance.next)
    }

    /// Handle the transport's natural end-of-track signal
    ///
    /// Same advance as [`skip`](Self::skip), but tolerant: a signal
    /// arriving after a stop or for an unknown chat is a no-op, since
    /// completion callbacks race user commands by nature.
    pub async fn track_ended(&self, chat_id: ChatId) -> Option<Track> {
        let handle = self.registry.get(chat_id)?;
        let mut session = handle.lock().await;
        let advance = session.track_ended()?;
        self.apply_advance(chat_id, &advance).await;
        self.emit(PlaybackEvent::Advanced {
            chat_id,
            next_title: advance.next.as_ref().map(|t| t.title.clone()),
        });
        drop(session);
        self.resolver.release(&advance.finished).await;
        advance.next
    }

    /// Stop the chat's playback, discarding the current track and queue
    ///
    /// In-flight resolutions spawned before the stop are invalidated and
    /// will be discarded when they arrive. The session is dropped from
    /// the registry once nothing remains pending for it.
    ///
    /// # Errors
    /// `NothingPlaying` if the chat has no session.
    pub async fn stop(&self, chat_id: ChatId) -> Result<()> {
        let handle = self
            .registry
            .get(chat_id)
            .ok_or(PlaybackError::NothingPlaying)?;
        let mut session = handle.lock().await;
        let discarded = session.stop();
        self.registry.invalidate_resolutions(chat_id);
        self.transport.stop(chat_id).await;
        self.emit(PlaybackEvent::Stopped {
            chat_id,
            discarded: discarded.len(),
        });
        drop(session);

        self.registry.remove_if_disposable(chat_id);
        for track in &discarded {
            self.resolver.release(track).await;
        }
        Ok(())
    }

    /// Remove a pending track by 1-based queue position
    ///
    /// Returns the removed track's metadata; its content is released
    /// before returning.
    ///
    /// # Errors
    /// `NothingPlaying` if the chat has no session, `QueueEmpty` or
    /// `PositionOutOfRange` from the queue.
    pub async fn remove_track(&self, chat_id: ChatId, position: usize) -> Result<Track> {
        let handle = self
            .registry
            .get(chat_id)
            .ok_or(PlaybackError::NothingPlaying)?;
        let mut session = handle.lock().await;
        let removed = session.queue_mut().remove(position)?;
        drop(session);
        self.resolver.release(&removed).await;
        Ok(removed)
    }

    /// Move a pending track between 1-based queue positions
    ///
    /// # Errors
    /// `NothingPlaying` if the chat has no session, `QueueEmpty` or
    /// `PositionOutOfRange` from the queue.
    pub async fn move_track(&self, chat_id: ChatId, from: usize, to: usize) -> Result<()> {
        let handle = self
            .registry
            .get(chat_id)
            .ok_or(PlaybackError::NothingPlaying)?;
        let mut session = handle.lock().await;
        session.queue_mut().move_track(from, to)
    }

    /// Snapshot of a chat's playback state and queue
    ///
    /// A chat that never played (or whose session was disposed) gets an
    /// empty Idle view; asking never creates a session.
    pub async fn show_queue(&self, chat_id: ChatId) -> QueueView {
        match self.registry.get(chat_id) {
            Some(handle) => handle.lock().await.view(),
            None => QueueView::empty(self.registry.max_queue_size()),
        }
    }

    async fn apply_advance(&self, chat_id: ChatId, advance: &crate::session::Advance) {
        match &advance.next {
            Some(next) => self.transport.start(chat_id, next).await,
            None => self.transport.stop(chat_id).await,
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // Nobody listening is fine; events are advisory.
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("sessions", &self.registry.len())
            .finish_non_exhaustive()
    }
}
