//! Podcast bookmarks
//!
//! Remembers where a user left each podcast so a later load resumes there.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last known position inside a podcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackBookmark {
    /// Podcast name
    pub podcast: String,

    /// Episode index in original order
    pub episode_index: usize,

    /// Seconds already heard of that episode
    pub offset: u32,
}

impl PlaybackBookmark {
    /// Bookmark at the very start of a podcast
    pub fn start(podcast: impl Into<String>) -> Self {
        Self {
            podcast: podcast.into(),
            episode_index: 0,
            offset: 0,
        }
    }
}

/// Bookmarks of one user, one row per podcast
///
/// Rows are created on first load of a podcast, overwritten whenever
/// playback leaves or crosses an episode boundary, and only dropped
/// through [`BookmarkRegistry::forget`] when the podcast leaves the catalog.
#[derive(Debug, Clone, Default)]
pub struct BookmarkRegistry {
    entries: BTreeMap<String, PlaybackBookmark>,
}

impl BookmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookmark for a podcast, if one was ever saved
    pub fn get(&self, podcast: &str) -> Option<&PlaybackBookmark> {
        self.entries.get(podcast)
    }

    /// Insert or overwrite the bookmark for `bookmark.podcast`
    pub fn save(&mut self, bookmark: PlaybackBookmark) {
        self.entries.insert(bookmark.podcast.clone(), bookmark);
    }

    /// Rewind a podcast's bookmark to its first episode
    pub fn reset(&mut self, podcast: &str) {
        self.save(PlaybackBookmark::start(podcast));
    }

    /// Drop a podcast's bookmark, returning it
    pub fn forget(&mut self, podcast: &str) -> Option<PlaybackBookmark> {
        self.entries.remove(podcast)
    }

    /// All bookmarks ordered by podcast name
    pub fn iter(&self) -> impl Iterator<Item = &PlaybackBookmark> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
