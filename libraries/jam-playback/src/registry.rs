//! Process-wide chat-to-session mapping
//!
//! The registry's map is the only state shared between chats. Its lock
//! covers a single lookup/create/remove call and is never held across an
//! await, so one chat's long-running work cannot stall another's. Each
//! session carries its own async mutex; holding it serializes every
//! mutation for that chat.
//!
//! The registry also counts in-flight resolutions per chat and holds the
//! chat's resolution generation, both under the same map lock. Keeping
//! them here (rather than in the session) makes "may this entry be
//! dropped?" a single atomic question and lets a play command register
//! its resolution on the command path, before any task is spawned: a
//! stop issued after that registration always sees the pending count and
//! always invalidates the captured generation, no matter when the
//! resolution task first runs.

use crate::session::PlaybackSession;
use crate::types::PlaybackConfig;
use jam_core::ChatId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

/// Shared handle to one chat's serialized session
pub type SessionHandle = Arc<AsyncMutex<PlaybackSession>>;

#[derive(Debug)]
struct Entry {
    session: SessionHandle,
    pending_resolutions: usize,
    generation: u64,
}

/// Concurrent mapping from chat id to playback session
///
/// Sessions are created lazily on first use and removed once stopped
/// with nothing pending. Creation is idempotent: concurrent first-time
/// lookups for the same chat observe one shared session instance.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<ChatId, Entry>>,
    max_queue_size: usize,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_queue_size: config.max_queue_size,
        }
    }

    /// Look up a chat's session, creating a fresh Idle one if absent
    pub fn get_or_create(&self, chat_id: ChatId) -> SessionHandle {
        let mut sessions = self.lock_map();
        Arc::clone(&self.entry_or_create(&mut sessions, chat_id).session)
    }

    /// Look up a chat's session without creating one
    pub fn get(&self, chat_id: ChatId) -> Option<SessionHandle> {
        self.lock_map()
            .get(&chat_id)
            .map(|entry| Arc::clone(&entry.session))
    }

    /// Look up or create a chat's session and count a resolution in
    /// flight against it, returning the current resolution generation
    ///
    /// Call this on the command path, before spawning the resolution
    /// task: the entry cannot be dropped until
    /// [`finish_resolution`](Self::finish_resolution) balances this
    /// call, and any later
    /// [`invalidate_resolutions`](Self::invalidate_resolutions) renders
    /// the returned generation stale.
    pub fn begin_resolution(&self, chat_id: ChatId) -> (SessionHandle, u64) {
        let mut sessions = self.lock_map();
        let entry = self.entry_or_create(&mut sessions, chat_id);
        entry.pending_resolutions += 1;
        (Arc::clone(&entry.session), entry.generation)
    }

    /// Record that a spawned resolution settled (applied or discarded)
    pub fn finish_resolution(&self, chat_id: ChatId) {
        if let Some(entry) = self.lock_map().get_mut(&chat_id) {
            entry.pending_resolutions = entry.pending_resolutions.saturating_sub(1);
        }
    }

    /// Render every previously registered resolution for a chat stale
    ///
    /// Called on stop, while the caller holds the session lock, so a
    /// resolution checking its generation under that same lock either
    /// applied before the stop or observes the bump.
    pub fn invalidate_resolutions(&self, chat_id: ChatId) {
        if let Some(entry) = self.lock_map().get_mut(&chat_id) {
            entry.generation += 1;
        }
    }

    /// Current resolution generation for a chat, if it has an entry
    pub fn generation(&self, chat_id: ChatId) -> Option<u64> {
        self.lock_map().get(&chat_id).map(|entry| entry.generation)
    }

    /// Number of resolutions currently in flight for a chat
    pub fn pending_resolutions(&self, chat_id: ChatId) -> usize {
        self.lock_map()
            .get(&chat_id)
            .map_or(0, |entry| entry.pending_resolutions)
    }

    /// Drop a chat's entry if its session reached end of life
    ///
    /// Removes the entry only when no resolution is in flight and the
    /// session reports itself disposable (stopped, queue empty). The
    /// session state is probed with `try_lock`: if some other task holds
    /// the session it is busy by definition and the entry stays.
    ///
    /// Returns whether the entry was removed.
    pub fn remove_if_disposable(&self, chat_id: ChatId) -> bool {
        let mut sessions = self.lock_map();
        let disposable = match sessions.get(&chat_id) {
            Some(entry) if entry.pending_resolutions == 0 => entry
                .session
                .try_lock()
                .map(|session| session.is_disposable())
                .unwrap_or(false),
            _ => false,
        };
        if disposable {
            sessions.remove(&chat_id);
            tracing::debug!(chat_id = %chat_id, "removed playback session");
        }
        disposable
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    /// Whether no sessions exist
    pub fn is_empty(&self) -> bool {
        self.lock_map().is_empty()
    }

    /// Configured per-chat queue capacity
    pub fn max_queue_size(&self) -> usize {
        self.max_queue_size
    }

    fn entry_or_create<'a>(
        &self,
        sessions: &'a mut MutexGuard<'_, HashMap<ChatId, Entry>>,
        chat_id: ChatId,
    ) -> &'a mut Entry {
        sessions.entry(chat_id).or_insert_with(|| {
            tracing::debug!(chat_id = %chat_id, "creating playback session");
            Entry {
                session: Arc::new(AsyncMutex::new(PlaybackSession::new(
                    chat_id,
                    self.max_queue_size,
                ))),
                pending_resolutions: 0,
                generation: 0,
            }
        })
    }

    fn lock_map(&self) -> MutexGuard<'_, HashMap<ChatId, Entry>> {
        // The map stays structurally sound if a holder panicked mid-call;
        // recover the guard rather than poisoning every later command.
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
