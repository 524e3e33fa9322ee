//! Playback Events
//!
//! Sessions queue events as side effects of commands and time advances:
//! - Source loaded or ended
//! - State changes (paused/playing/empty)
//! - Track changes at boundaries and on explicit navigation
//! - Podcast bookmark writes
//! - Repeat and shuffle changes
//!
//! Callers drain them with [`crate::PlaybackSession::drain_events`].

use crate::types::{PlaybackState, RepeatMode, SourceKind};
use serde::{Deserialize, Serialize};

/// Events emitted by a playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A new source was bound to the session
    Loaded {
        /// Name of the loaded track or collection
        name: String,
        kind: SourceKind,
    },

    /// Session state changed
    StateChanged { state: PlaybackState },

    /// A different track (or the same one, restarted) is now under the cursor
    TrackChanged {
        /// Name of the new current track
        track: String,
        /// Name of the track that was current before
        previous: String,
    },

    /// The source played out and was cleared
    SourceEnded {
        /// Name of the cleared track or collection
        name: String,
    },

    /// A podcast position was written to the bookmark registry
    BookmarkSaved {
        podcast: String,
        episode_index: usize,
        offset: u32,
    },

    RepeatChanged { mode: RepeatMode },

    ShuffleChanged { enabled: bool },
}

impl PlaybackEvent {
    /// Stable short name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackEvent::Loaded { .. } => "loaded",
            PlaybackEvent::StateChanged { .. } => "state_changed",
            PlaybackEvent::TrackChanged { .. } => "track_changed",
            PlaybackEvent::SourceEnded { .. } => "source_ended",
            PlaybackEvent::BookmarkSaved { .. } => "bookmark_saved",
            PlaybackEvent::RepeatChanged { .. } => "repeat_changed",
            PlaybackEvent::ShuffleChanged { .. } => "shuffle_changed",
        }
    }
}
