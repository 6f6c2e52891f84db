//! Per-chat playback session state machine
//!
//! The session is pure state: every operation either mutates the machine
//! and describes what happened, or reports a typed failure. Transport and
//! resolver side effects are carried out by the coordinator from the
//! returned values; no I/O happens here.

use crate::error::{PlaybackError, Result};
use crate::queue::ChatQueue;
use crate::types::{PlaybackState, QueueView};
use jam_core::{ChatId, Track};

/// What applying a resolved track did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// No current track existed; this one starts playing now
    Started(Track),

    /// Playback was already underway; the track joined the queue
    Queued {
        /// The queued track
        track: Track,
        /// 1-based queue position for display
        position: usize,
    },

    /// The queue was full; the track was not accepted
    ///
    /// The caller still owns the track and must release its content.
    Rejected {
        /// The rejected track
        track: Track,
        /// Configured queue capacity
        capacity: usize,
    },
}

/// Result of advancing past the current track (skip or natural end)
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    /// The track that just stopped being current
    pub finished: Track,

    /// The new current track, or `None` if the queue drained (session
    /// is Idle now)
    pub next: Option<Track>,
}

/// Per-chat playback state machine
///
/// One session exists per chat id, created lazily on first use and owned
/// by the [`SessionRegistry`](crate::registry::SessionRegistry). The
/// current track, if any, is held here; the queue holds only pending
/// tracks. Protection against stale asynchronous resolutions lives in
/// the registry's generation counter, not here.
#[derive(Debug)]
pub struct PlaybackSession {
    chat_id: ChatId,
    state: PlaybackState,
    current: Option<Track>,
    queue: ChatQueue,
}

impl PlaybackSession {
    /// Create a fresh Idle session with an empty queue
    pub fn new(chat_id: ChatId, max_queue_size: usize) -> Self {
        Self {
            chat_id,
            state: PlaybackState::Idle,
            current: None,
            queue: ChatQueue::new(max_queue_size),
        }
    }

    /// Chat this session belongs to
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Currently playing or paused track, if any
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Pending-track queue
    pub fn queue(&self) -> &ChatQueue {
        &self.queue
    }

    /// Mutable access to the pending-track queue (reorder/remove)
    pub fn queue_mut(&mut self) -> &mut ChatQueue {
        &mut self.queue
    }

    /// Whether this session has reached the end of its life
    ///
    /// True only after an explicit stop with an empty queue. The registry
    /// additionally requires that no resolution is in flight for the chat
    /// before it drops the entry.
    pub fn is_disposable(&self) -> bool {
        self.state == PlaybackState::Stopped && self.queue.is_empty()
    }

    /// Apply a successfully resolved track
    ///
    /// With no current track (Idle, or Stopped re-entering active use)
    /// the track becomes current and the session starts Playing.
    /// Otherwise it joins the queue, or bounces off a full one.
    pub fn track_resolved(&mut self, track: Track) -> Resolved {
        if self.current.is_none() {
            self.current = Some(track.clone());
            self.state = PlaybackState::Playing;
            return Resolved::Started(track);
        }

        match self.queue.enqueue(track.clone()) {
            Ok(position) => Resolved::Queued { track, position },
            Err(_) => Resolved::Rejected {
                track,
                capacity: self.queue.capacity(),
            },
        }
    }

    /// Pause active playback
    ///
    /// # Errors
    /// `InvalidStateTransition` unless currently Playing.
    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                Ok(())
            }
            state => Err(PlaybackError::InvalidStateTransition {
                state,
                action: "pause",
            }),
        }
    }

    /// Resume paused playback
    ///
    /// # Errors
    /// `InvalidStateTransition` unless currently Paused.
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                Ok(())
            }
            state => Err(PlaybackError::InvalidStateTransition {
                state,
                action: "resume",
            }),
        }
    }

    /// Advance past the current track (explicit skip)
    ///
    /// The next pending track, if any, becomes current and the session
    /// is Playing (also from Paused). A drained queue leaves it Idle.
    ///
    /// # Errors
    /// `NothingPlaying` when no track is current.
    pub fn advance(&mut self) -> Result<Advance> {
        let Some(finished) = self.current.take() else {
            return Err(PlaybackError::NothingPlaying);
        };

        match self.queue.dequeue_next() {
            Ok(next) => {
                self.current = Some(next.clone());
                self.state = PlaybackState::Playing;
                Ok(Advance {
                    finished,
                    next: Some(next),
                })
            }
            Err(_) => {
                self.state = PlaybackState::Idle;
                Ok(Advance {
                    finished,
                    next: None,
                })
            }
        }
    }

    /// Advance after natural end-of-track
    ///
    /// Identical to [`advance`](Self::advance) except that a session with
    /// nothing current tolerates the signal as a no-op: the transport's
    /// completion callback can race a stop or skip.
    pub fn track_ended(&mut self) -> Option<Advance> {
        self.advance().ok()
    }

    /// Stop playback, clearing the current track and the queue
    ///
    /// Returns every discarded track (former current first) for resource
    /// release.
    pub fn stop(&mut self) -> Vec<Track> {
        let mut discarded = Vec::with_capacity(self.queue.len() + 1);
        if let Some(current) = self.current.take() {
            discarded.push(current);
        }
        discarded.extend(self.queue.clear());

        self.state = PlaybackState::Stopped;
        discarded
    }

    /// Snapshot of state, current track, and pending queue
    pub fn view(&self) -> QueueView {
        QueueView {
            state: self.state,
            current: self.current.clone(),
            pending: self.queue.peek_all().cloned().collect(),
            capacity: self.queue.capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jam_core::{ContentHandle, RequesterId};
    use std::time::Duration;

    fn create_test_track(title: &str) -> Track {
        Track::new(
            title,
            Duration::from_secs(200),
            format!("https://example.com/watch?v={title}"),
            ContentHandle::new(format!("/downloads/{title}.mp3")),
            RequesterId::new("tester"),
        )
    }

    fn session() -> PlaybackSession {
        PlaybackSession::new(ChatId::new(1), 20)
    }

    #[test]
    fn first_resolved_track_starts_playing() {
        let mut s = session();
        assert_eq!(s.state(), PlaybackState::Idle);

        let outcome = s.track_resolved(create_test_track("a"));
        assert!(matches!(outcome, Resolved::Started(t) if t.title == "a"));
        assert_eq!(s.state(), PlaybackState::Playing);
        assert_eq!(s.current().unwrap().title, "a");
        assert!(s.queue().is_empty());
    }

    #[test]
    fn second_resolved_track_queues_behind_current() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));

        let outcome = s.track_resolved(create_test_track("b"));
        assert!(matches!(
            outcome,
            Resolved::Queued { position: 1, ref track } if track.title == "b"
        ));
        assert_eq!(s.current().unwrap().title, "a");
        assert_eq!(s.queue().len(), 1);

        // End-to-end: skip lands on b with an empty queue
        let advance = s.advance().unwrap();
        assert_eq!(advance.finished.title, "a");
        assert_eq!(advance.next.unwrap().title, "b");
        assert_eq!(s.current().unwrap().title, "b");
        assert!(s.queue().is_empty());
    }

    #[test]
    fn resolved_track_bounces_off_full_queue() {
        let mut s = PlaybackSession::new(ChatId::new(1), 1);
        s.track_resolved(create_test_track("a"));
        s.track_resolved(create_test_track("b"));

        let outcome = s.track_resolved(create_test_track("c"));
        assert!(matches!(
            outcome,
            Resolved::Rejected { capacity: 1, ref track } if track.title == "c"
        ));
        assert_eq!(s.queue().len(), 1);
    }

    #[test]
    fn pause_outside_playing_is_rejected() {
        let mut s = session();
        assert_eq!(
            s.pause().unwrap_err(),
            PlaybackError::InvalidStateTransition {
                state: PlaybackState::Idle,
                action: "pause",
            }
        );

        s.track_resolved(create_test_track("a"));
        s.pause().unwrap();
        assert_eq!(s.state(), PlaybackState::Paused);

        // Double pause is also invalid
        assert!(s.pause().is_err());

        s.resume().unwrap();
        assert_eq!(s.state(), PlaybackState::Playing);
        assert_eq!(s.current().unwrap().title, "a");
    }

    #[test]
    fn resume_outside_paused_is_rejected() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));
        assert_eq!(
            s.resume().unwrap_err(),
            PlaybackError::InvalidStateTransition {
                state: PlaybackState::Playing,
                action: "resume",
            }
        );
    }

    #[test]
    fn skip_from_paused_resumes_with_next() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));
        s.track_resolved(create_test_track("b"));
        s.pause().unwrap();

        let advance = s.advance().unwrap();
        assert_eq!(advance.next.unwrap().title, "b");
        assert_eq!(s.state(), PlaybackState::Playing);
    }

    #[test]
    fn skip_with_empty_queue_goes_idle() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));

        let advance = s.advance().unwrap();
        assert_eq!(advance.finished.title, "a");
        assert!(advance.next.is_none());
        assert_eq!(s.state(), PlaybackState::Idle);
        assert!(s.current().is_none());
    }

    #[test]
    fn skip_with_nothing_current_reports_nothing_playing() {
        let mut s = session();
        assert_eq!(s.advance().unwrap_err(), PlaybackError::NothingPlaying);
    }

    #[test]
    fn track_ended_is_noop_when_idle() {
        let mut s = session();
        assert!(s.track_ended().is_none());
        assert_eq!(s.state(), PlaybackState::Idle);
    }

    #[test]
    fn stop_discards_current_and_pending() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));
        s.track_resolved(create_test_track("b"));
        s.track_resolved(create_test_track("c"));

        let discarded = s.stop();
        let titles: Vec<_> = discarded.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(s.state(), PlaybackState::Stopped);
        assert!(s.current().is_none());
        assert!(s.queue().is_empty());
    }

    #[test]
    fn stop_leaves_session_disposable() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));
        assert!(!s.is_disposable());

        s.stop();
        assert!(s.is_disposable());
    }

    #[test]
    fn resolved_after_stop_reenters_playing() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));
        s.stop();
        assert_eq!(s.state(), PlaybackState::Stopped);

        let outcome = s.track_resolved(create_test_track("b"));
        assert!(matches!(outcome, Resolved::Started(t) if t.title == "b"));
        assert_eq!(s.state(), PlaybackState::Playing);
    }

    #[test]
    fn idle_session_is_never_disposable() {
        let s = session();
        assert!(!s.is_disposable());
    }

    #[test]
    fn view_captures_current_and_pending() {
        let mut s = session();
        s.track_resolved(create_test_track("a"));
        s.track_resolved(create_test_track("b"));

        let view = s.view();
        assert_eq!(view.state, PlaybackState::Playing);
        assert_eq!(view.current.unwrap().title, "a");
        assert_eq!(view.pending.len(), 1);
        assert_eq!(view.pending[0].title, "b");

        // Snapshot does not track later mutations
        s.stop();
        assert_eq!(view.pending.len(), 1);
    }
}
