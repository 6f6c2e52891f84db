//! Bounded per-chat pending-track queue
//!
//! Holds only *pending* tracks: the currently playing track lives in the
//! session, not here. Positions are 1-based for user display.

use crate::error::{PlaybackError, Result};
use jam_core::Track;
use std::collections::VecDeque;

/// Bounded ordered queue of pending tracks for one chat
///
/// Insertion order is play order. A full queue rejects new tracks
/// outright; nothing is ever evicted silently.
#[derive(Debug, Clone)]
pub struct ChatQueue {
    tracks: VecDeque<Track>,
    capacity: usize,
}

impl ChatQueue {
    /// Create an empty queue with the given capacity
    ///
    /// A capacity of zero is treated as one; a queue that can never
    /// accept a track would make every play command fail.
    pub fn new(capacity: usize) -> Self {
        Self {
            tracks: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a track, returning its 1-based queue position
    ///
    /// # Errors
    /// Returns `QueueFull` when at capacity; queue contents are unchanged.
    pub fn enqueue(&mut self, track: Track) -> Result<usize> {
        if self.tracks.len() >= self.capacity {
            return Err(PlaybackError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.tracks.push_back(track);
        Ok(self.tracks.len())
    }

    /// Remove and return the head track
    ///
    /// # Errors
    /// Returns `QueueEmpty` when there is nothing pending.
    pub fn dequeue_next(&mut self) -> Result<Track> {
        self.tracks.pop_front().ok_or(PlaybackError::QueueEmpty)
    }

    /// Iterate over pending tracks in play order
    ///
    /// A borrow-time snapshot: callers must not assume it reflects later
    /// mutations.
    pub fn peek_all(&self) -> impl Iterator<Item = &Track> + '_ {
        self.tracks.iter()
    }

    /// Remove the track at a 1-based position
    ///
    /// # Errors
    /// Returns `PositionOutOfRange` if no track sits at that position.
    pub fn remove(&mut self, position: usize) -> Result<Track> {
        let index = position
            .checked_sub(1)
            .filter(|i| *i < self.tracks.len())
            .ok_or(PlaybackError::PositionOutOfRange(position))?;
        // Bounds were just checked
        self.tracks
            .remove(index)
            .ok_or(PlaybackError::PositionOutOfRange(position))
    }

    /// Move a track between 1-based positions, shifting the rest
    ///
    /// # Errors
    /// Returns `PositionOutOfRange` if either position is outside the
    /// pending range.
    pub fn move_track(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.tracks.len();
        let from_idx = from
            .checked_sub(1)
            .filter(|i| *i < len)
            .ok_or(PlaybackError::PositionOutOfRange(from))?;
        let to_idx = to
            .checked_sub(1)
            .filter(|i| *i < len)
            .ok_or(PlaybackError::PositionOutOfRange(to))?;

        if from_idx != to_idx {
            if let Some(track) = self.tracks.remove(from_idx) {
                self.tracks.insert(to_idx, track);
            }
        }
        Ok(())
    }

    /// Empty the queue, returning the discarded tracks
    ///
    /// The caller is responsible for releasing any resources the
    /// discarded tracks still hold.
    pub fn clear(&mut self) -> Vec<Track> {
        self.tracks.drain(..).collect()
    }

    /// Current pending count
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no tracks are pending
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Whether the queue is at capacity
    pub fn is_full(&self) -> bool {
        self.tracks.len() >= self.capacity
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
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
            Duration::from_secs(180),
            format!("https://example.com/watch?v={title}"),
            ContentHandle::new(format!("/downloads/{title}.mp3")),
            RequesterId::new("tester"),
        )
    }

    #[test]
    fn create_empty_queue() {
        let queue = ChatQueue::new(20);
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 20);
    }

    #[test]
    fn enqueue_returns_display_position() {
        let mut queue = ChatQueue::new(5);
        assert_eq!(queue.enqueue(create_test_track("a")).unwrap(), 1);
        assert_eq!(queue.enqueue(create_test_track("b")).unwrap(), 2);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn full_queue_rejects_without_eviction() {
        let mut queue = ChatQueue::new(2);
        queue.enqueue(create_test_track("a")).unwrap();
        queue.enqueue(create_test_track("b")).unwrap();

        let err = queue.enqueue(create_test_track("c")).unwrap_err();
        assert_eq!(err, PlaybackError::QueueFull { capacity: 2 });

        // Contents unchanged
        let titles: Vec<_> = queue.peek_all().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn dequeue_follows_insertion_order() {
        let mut queue = ChatQueue::new(5);
        queue.enqueue(create_test_track("a")).unwrap();
        queue.enqueue(create_test_track("b")).unwrap();

        assert_eq!(queue.dequeue_next().unwrap().title, "a");
        assert_eq!(queue.dequeue_next().unwrap().title, "b");
        assert_eq!(queue.dequeue_next().unwrap_err(), PlaybackError::QueueEmpty);
    }

    #[test]
    fn clear_returns_discarded_tracks() {
        let mut queue = ChatQueue::new(5);
        queue.enqueue(create_test_track("a")).unwrap();
        queue.enqueue(create_test_track("b")).unwrap();

        let discarded = queue.clear();
        assert_eq!(discarded.len(), 2);
        assert_eq!(discarded[0].title, "a");
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_at_position() {
        let mut queue = ChatQueue::new(5);
        queue.enqueue(create_test_track("a")).unwrap();
        queue.enqueue(create_test_track("b")).unwrap();
        queue.enqueue(create_test_track("c")).unwrap();

        let removed = queue.remove(2).unwrap();
        assert_eq!(removed.title, "b");

        let titles: Vec<_> = queue.peek_all().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);

        assert_eq!(
            queue.remove(3).unwrap_err(),
            PlaybackError::PositionOutOfRange(3)
        );
        assert_eq!(
            queue.remove(0).unwrap_err(),
            PlaybackError::PositionOutOfRange(0)
        );
    }

    #[test]
    fn move_track_reorders() {
        let mut queue = ChatQueue::new(5);
        queue.enqueue(create_test_track("a")).unwrap();
        queue.enqueue(create_test_track("b")).unwrap();
        queue.enqueue(create_test_track("c")).unwrap();

        queue.move_track(1, 3).unwrap();
        let titles: Vec<_> = queue.peek_all().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);

        assert_eq!(
            queue.move_track(1, 4).unwrap_err(),
            PlaybackError::PositionOutOfRange(4)
        );
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut queue = ChatQueue::new(0);
        assert_eq!(queue.capacity(), 1);
        queue.enqueue(create_test_track("a")).unwrap();
        assert!(queue.is_full());
    }
}
