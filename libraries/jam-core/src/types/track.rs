//! Resolved track metadata

use crate::types::RequesterId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Opaque reference to a resolved (downloaded) audio payload
///
/// Owned by the [`Track`] carrying it. The resolver that produced the
/// handle is the only party that knows how to free the underlying
/// resource (e.g. delete a temp file); the engine just hands the track
/// back via `ContentResolver::release` when it is done with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHandle(PathBuf);

impl ContentHandle {
    /// Create a handle from a payload location
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Get the payload location
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One resolved, playable item
///
/// Immutable once constructed. Owned by the queue slot holding it, or
/// transiently by the coordinator while resolution is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track title for display
    pub title: String,

    /// Track duration
    pub duration: Duration,

    /// Source reference the track was resolved from (e.g. URL)
    pub source_url: String,

    /// Handle to the downloaded audio payload
    pub content: ContentHandle,

    /// Who asked for this track
    pub requested_by: RequesterId,
}

impl Track {
    /// Create a new track
    pub fn new(
        title: impl Into<String>,
        duration: Duration,
        source_url: impl Into<String>,
        content: ContentHandle,
        requested_by: RequesterId,
    ) -> Self {
        Self {
            title: title.into(),
            duration,
            source_url: source_url.into(),
            content,
            requested_by,
        }
    }

    /// Re-stamp the track with the user whose request produced it
    ///
    /// Resolvers typically fill in a placeholder requester; the engine
    /// replaces it with the id of the command that triggered resolution.
    #[must_use]
    pub fn with_requester(mut self, requested_by: RequesterId) -> Self {
        self.requested_by = requested_by;
        self
    }
}
