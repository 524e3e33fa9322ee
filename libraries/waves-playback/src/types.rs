//! Core types for playback sessions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single playable track: a song or a podcast episode
///
/// Owned by the catalog and shared with sessions by reference.
/// Identity is the name, which is unique within the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog-unique name
    pub name: String,

    /// Length in whole seconds
    pub duration: u32,

    /// Genre (empty for episodes)
    #[serde(default)]
    pub genre: String,

    /// Owning artist or host
    #[serde(default)]
    pub owner: String,
}

impl Track {
    pub fn new(name: impl Into<String>, duration: u32) -> Self {
        Self {
            name: name.into(),
            duration,
            genre: String::new(),
            owner: String::new(),
        }
    }
}

/// Kind of an ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Playlist,
    Album,
    Podcast,
}

/// Ordered sequence of tracks (songs for playlists/albums, episodes for podcasts)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub owner: String,
    pub kind: CollectionKind,
    pub tracks: Vec<Arc<Track>>,
}

impl Collection {
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        kind: CollectionKind,
        tracks: Vec<Arc<Track>>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            kind,
            tracks,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Anything a session can load: a lone track or a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEntity {
    Track(Arc<Track>),
    Collection(Arc<Collection>),
}

impl AudioEntity {
    pub fn name(&self) -> &str {
        match self {
            AudioEntity::Track(track) => &track.name,
            AudioEntity::Collection(collection) => &collection.name,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            AudioEntity::Track(_) => SourceKind::Song,
            AudioEntity::Collection(collection) => collection.kind.into(),
        }
    }

    /// Number of playable entries (1 for a lone track)
    pub fn len(&self) -> usize {
        match self {
            AudioEntity::Track(_) => 1,
            AudioEntity::Collection(collection) => collection.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Playable entries in original order
    pub fn tracks(&self) -> &[Arc<Track>] {
        match self {
            AudioEntity::Track(track) => std::slice::from_ref(track),
            AudioEntity::Collection(collection) => &collection.tracks,
        }
    }

    /// Entry at an index in original order
    pub fn track_at(&self, index: usize) -> Option<&Arc<Track>> {
        self.tracks().get(index)
    }
}

impl From<Arc<Track>> for AudioEntity {
    fn from(track: Arc<Track>) -> Self {
        AudioEntity::Track(track)
    }
}

impl From<Arc<Collection>> for AudioEntity {
    fn from(collection: Arc<Collection>) -> Self {
        AudioEntity::Collection(collection)
    }
}

/// Kind of the source bound to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Song,
    Playlist,
    Album,
    Podcast,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Song => "song",
            SourceKind::Playlist => "playlist",
            SourceKind::Album => "album",
            SourceKind::Podcast => "podcast",
        }
    }

    /// Whether the source is an ordered collection of songs
    pub fn is_song_collection(&self) -> bool {
        matches!(self, SourceKind::Playlist | SourceKind::Album)
    }
}

impl From<CollectionKind> for SourceKind {
    fn from(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Playlist => SourceKind::Playlist,
            CollectionKind::Album => SourceKind::Album,
            CollectionKind::Podcast => SourceKind::Podcast,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No source loaded
    Empty,

    /// Source loaded, time does not advance
    Paused,

    /// Source loaded and consuming time
    Playing,
}

/// Repeat mode
///
/// Serialized with the labels reported in player stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Advance through the source and stop at its end
    #[default]
    #[serde(rename = "No Repeat")]
    NoRepeat,

    /// Replay the current track one more time, then fall back to `NoRepeat`
    #[serde(rename = "Repeat Once")]
    RepeatOnce,

    /// Wrap to the first entry after the last one
    #[serde(rename = "Repeat All")]
    RepeatAll,

    /// Like `RepeatAll`; on a lone track, replays it forever
    #[serde(rename = "Repeat Infinite")]
    RepeatInfinite,

    /// Replay the current track until the mode changes
    #[serde(rename = "Repeat Current Song")]
    RepeatCurrentSong,
}

impl RepeatMode {
    /// Next mode in the repeat cycle for a source kind
    ///
    /// ```text
    /// song:        NoRepeat -> RepeatOnce -> RepeatAll         -> NoRepeat
    /// collection:  NoRepeat -> RepeatAll  -> RepeatCurrentSong -> NoRepeat
    /// ```
    ///
    /// Podcasts follow the collection cycle.
    ///
    /// `RepeatInfinite` is never entered by cycling and leads back to
    /// `NoRepeat`.
    pub fn cycle(self, kind: SourceKind) -> Self {
        let song = kind == SourceKind::Song;
        match self {
            RepeatMode::NoRepeat if song => RepeatMode::RepeatOnce,
            RepeatMode::NoRepeat | RepeatMode::RepeatOnce => RepeatMode::RepeatAll,
            RepeatMode::RepeatAll if song => RepeatMode::NoRepeat,
            RepeatMode::RepeatAll => RepeatMode::RepeatCurrentSong,
            RepeatMode::RepeatInfinite | RepeatMode::RepeatCurrentSong => RepeatMode::NoRepeat,
        }
    }

    /// Human-readable label ("repeat all")
    pub fn label(&self) -> &'static str {
        match self {
            RepeatMode::NoRepeat => "no repeat",
            RepeatMode::RepeatOnce => "repeat once",
            RepeatMode::RepeatAll => "repeat all",
            RepeatMode::RepeatInfinite => "repeat infinite",
            RepeatMode::RepeatCurrentSong => "repeat current song",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point-in-time snapshot of a session, derived on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStats {
    /// Current track name, `None` when nothing is loaded
    pub name: Option<String>,

    /// Seconds left in the current track, never negative
    pub remained_time: u32,

    pub repeat: RepeatMode,

    pub shuffle: bool,

    pub paused: bool,
}

impl PlaybackStats {
    /// Stats of a session with nothing loaded
    pub fn empty() -> Self {
        Self {
            name: None,
            remained_time: 0,
            repeat: RepeatMode::NoRepeat,
            shuffle: false,
            paused: true,
        }
    }
}

/// Configuration for playback sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seconds jumped by podcast forward/backward (default: 90)
    pub skip_step_secs: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { skip_step_secs: 90 }
    }
}
