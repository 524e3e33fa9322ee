//! Loaded source with a live cursor
//!
//! A `PlayerSource` binds a track or collection to the position being
//! played. Navigation is index based and non-destructive: the entity is
//! never copied or reordered, shuffle only keeps a permutation of indices.

use crate::bookmark::PlaybackBookmark;
use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffled_order;
use crate::types::{AudioEntity, SourceKind, Track};
use std::sync::Arc;

/// Source bound to a session
///
/// Invariants:
/// - the entity has at least one entry
/// - `cursor` indexes the shuffled order when shuffle is on, the original
///   order otherwise
/// - `elapsed < duration(current)` for every track with a non-zero duration
#[derive(Debug, Clone)]
pub struct PlayerSource {
    entity: AudioEntity,

    /// Position in the active (shuffled or original) order
    cursor: usize,

    /// Seconds consumed of the current track
    elapsed: u32,

    /// Play order as original indices, present only while shuffled
    shuffle_order: Option<Vec<usize>>,
}

impl PlayerSource {
    /// Bind an entity at its first entry
    pub fn new(entity: AudioEntity) -> Result<Self> {
        if entity.is_empty() {
            return Err(PlaybackError::EmptyCollection);
        }

        Ok(Self {
            entity,
            cursor: 0,
            elapsed: 0,
            shuffle_order: None,
        })
    }

    /// Bind a podcast at a saved position
    ///
    /// A bookmark that no longer fits the podcast (episodes removed or
    /// shortened) falls back to the start of the affected episode or of the
    /// podcast.
    pub fn resume(entity: AudioEntity, bookmark: &PlaybackBookmark) -> Result<Self> {
        let mut source = Self::new(entity)?;

        if let Some(track) = source.entity.track_at(bookmark.episode_index) {
            source.cursor = bookmark.episode_index;
            if bookmark.offset < track.duration {
                source.elapsed = bookmark.offset;
            }
        }

        Ok(source)
    }

    pub fn entity(&self) -> &AudioEntity {
        &self.entity
    }

    pub fn kind(&self) -> SourceKind {
        self.entity.kind()
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entity.len()
    }

    /// Always false: empty entities are rejected on construction
    pub fn is_empty(&self) -> bool {
        self.entity.is_empty()
    }

    /// Seconds needed to play every entry once
    pub fn total_duration(&self) -> u64 {
        self.entity
            .tracks()
            .iter()
            .map(|track| u64::from(track.duration))
            .sum()
    }

    /// Position in the active order
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Seconds consumed of the current track
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Index of the current track in original order
    pub fn original_index(&self) -> usize {
        match &self.shuffle_order {
            Some(order) => order[self.cursor],
            None => self.cursor,
        }
    }

    /// Track under the cursor
    pub fn current(&self) -> &Arc<Track> {
        &self.entity.tracks()[self.original_index()]
    }

    /// Seconds left in the current track
    pub fn remaining(&self) -> u32 {
        self.current().duration.saturating_sub(self.elapsed)
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle_order.is_some()
    }

    /// Active play order as original indices (`None` when not shuffled)
    pub fn shuffle_order(&self) -> Option<&[usize]> {
        self.shuffle_order.as_deref()
    }

    /// Whether the cursor is on the last entry of the active order
    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.len()
    }

    /// Bookmark for the current position (podcasts only)
    pub fn bookmark(&self) -> Option<PlaybackBookmark> {
        (self.kind() == SourceKind::Podcast).then(|| PlaybackBookmark {
            podcast: self.name().to_string(),
            episode_index: self.original_index(),
            offset: self.elapsed,
        })
    }

    /// Shuffle the remaining play order around the current track
    ///
    /// The current track keeps its cursor position, so playback continues
    /// without a jump.
    pub(crate) fn enable_shuffle(&mut self, seed: u64) {
        let order = shuffled_order(self.len(), self.original_index(), self.cursor, seed);
        self.shuffle_order = Some(order);
    }

    /// Restore original order, keeping the current track under the cursor
    pub(crate) fn disable_shuffle(&mut self) {
        self.cursor = self.original_index();
        self.shuffle_order = None;
    }

    /// Consume seconds of the current track
    ///
    /// Callers pass less than [`PlayerSource::remaining`].
    pub(crate) fn consume(&mut self, secs: u32) {
        self.elapsed = self.elapsed.saturating_add(secs);
    }

    /// Move back within the current track, stopping at its start
    pub(crate) fn rewind(&mut self, secs: u32) {
        self.elapsed = self.elapsed.saturating_sub(secs);
    }

    /// Restart the current track
    pub(crate) fn restart(&mut self) {
        self.elapsed = 0;
    }

    /// Move to the start of the next entry
    ///
    /// Returns false, leaving the cursor untouched, when already on the last entry.
    pub(crate) fn step_forward(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.cursor += 1;
        self.elapsed = 0;
        true
    }

    /// Move to the start of the previous entry, clamped at the first one
    pub(crate) fn step_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.elapsed = 0;
    }

    /// Move to the start of the first entry of the active order
    pub(crate) fn wrap_to_start(&mut self) {
        self.cursor = 0;
        self.elapsed = 0;
    }
}
