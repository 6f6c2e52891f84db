//! Jam - Playback Coordination
//!
//! Per-chat playback session and queue coordination for Jam.
//!
//! This crate provides:
//! - Playback state machine per chat (Idle, Playing, Paused, Stopped)
//! - Bounded FIFO track queue with 1-based display positions
//! - Queue editing (remove, move)
//! - Async content resolution merged back in without blocking commands
//! - Stale-resolution protection via a per-chat generation token
//! - Event broadcast for command front ends
//!
//! # Architecture
//!
//! `jam-playback` is completely front-end-agnostic:
//! - No dependency on any chat platform API
//! - No dependency on any downloader or streaming stack
//! - No audio handling of its own
//!
//! Content resolution and audio delivery are provided via the
//! [`ContentResolver`](jam_core::ContentResolver) and
//! [`AudioTransport`](jam_core::AudioTransport) traits. Chats are
//! isolated: each chat's commands are serialized on its own session
//! while distinct chats proceed in parallel.
//!
//! # Example: Basic Coordination
//!
//! ```rust,no_run
//! use jam_playback::{Coordinator, PlaybackConfig};
//! use jam_core::{ChatId, RequesterId};
//! use std::sync::Arc;
//!
//! # async fn demo(resolver: Arc<dyn jam_core::ContentResolver>,
//! #               transport: Arc<dyn jam_core::AudioTransport>) {
//! let coordinator = Coordinator::new(&PlaybackConfig::default(), resolver, transport);
//! let chat = ChatId::new(42);
//!
//! // Kick off resolution; the handle resolves to the final outcome
//! let pending = coordinator.play(chat, "some song", RequesterId::new("user-1"));
//! let outcome = pending.await.unwrap();
//!
//! coordinator.pause(chat).await.ok();
//! coordinator.resume(chat).await.ok();
//! coordinator.skip(chat).await.ok();
//! coordinator.stop(chat).await.ok();
//! # let _ = outcome;
//! # }
//! ```
//!
//! # Example: Observing Events
//!
//! ```rust,no_run
//! use jam_playback::{Coordinator, PlaybackEvent};
//!
//! # async fn demo(coordinator: Coordinator) {
//! let mut events = coordinator.subscribe();
//! while let Ok(event) = events.recv().await {
//!     if let PlaybackEvent::TrackStarted { chat_id, title } = event {
//!         println!("{chat_id}: now playing {title}");
//!     }
//! }
//! # }
//! ```

mod coordinator;
mod error;
mod events;
mod queue;
mod registry;
mod session;
pub mod types;

// Public exports
pub use coordinator::{Coordinator, PlayOutcome};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use queue::ChatQueue;
pub use registry::{SessionHandle, SessionRegistry};
pub use session::{Advance, PlaybackSession, Resolved};
pub use types::{PlaybackConfig, PlaybackState, QueueView};
