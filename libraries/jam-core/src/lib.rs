//! Jam Core
//!
//! Shared types, collaborator traits, and error handling for Jam.
//!
//! Jam coordinates audio playback inside many independent chat contexts.
//! This crate provides the foundational building blocks the coordination
//! engine (`jam-playback`) and its external collaborators agree on:
//!
//! - **Domain Types**: [`Track`], [`ContentHandle`], [`ChatId`], [`RequesterId`]
//! - **Collaborator Traits**: [`ContentResolver`], [`AudioTransport`]
//! - **Error Handling**: [`ResolveError`]
//!
//! # Architecture
//!
//! The command front end, the content resolver (search/download), and the
//! audio transport (voice-channel delivery) all live outside the engine.
//! They are reached only through the traits defined here, so tests can
//! substitute deterministic fakes without touching the core.
//!
//! # Example
//!
//! ```rust
//! use jam_core::{ChatId, ContentHandle, RequesterId, Track};
//! use std::time::Duration;
//!
//! let track = Track::new(
//!     "My Favorite Song",
//!     Duration::from_secs(180),
//!     "https://example.com/watch?v=abc123",
//!     ContentHandle::new("/downloads/my_favorite_song.mp3"),
//!     RequesterId::new("user-42"),
//! );
//!
//! let chat = ChatId::new(-1001234567890);
//! assert_eq!(chat.get(), -1001234567890);
//! assert_eq!(track.title, "My Favorite Song");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::ResolveError;
pub use traits::{AudioTransport, ContentResolver};
pub use types::{ChatId, ContentHandle, RequesterId, Track};
