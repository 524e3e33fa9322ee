//! Waves - Playback Session Engine
//!
//! Per-user player state machines driven by a virtual clock. Nothing is
//! decoded or streamed: "playback" is pure time accounting over catalog
//! descriptors.
//!
//! This crate provides:
//! - Loading of songs, playlists, albums and podcasts (always starting paused)
//! - Pause/resume, next/prev, podcast forward/backward
//! - Repeat modes (no repeat, once, all, infinite, current song)
//! - Seeded, reproducible shuffle that keeps the current track in place
//! - Podcast bookmarks that survive switching to other sources
//! - Derived player stats
//! - A scheduler owning the virtual clock and every user's session
//!
//! # Architecture
//!
//! `waves-playback` owns no catalog. Tracks and collections are shared
//! with the catalog through `Arc` and never copied. Every command returns
//! a [`Result`] whose errors are expected, user-facing outcomes.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use std::sync::Arc;
//! use waves_playback::{
//!     AudioEntity, Collection, CollectionKind, PlaybackSession, PlaybackState, Track,
//! };
//!
//! let album = Arc::new(Collection::new(
//!     "Night Drive",
//!     "The Band",
//!     CollectionKind::Album,
//!     vec![Arc::new(Track::new("Intro", 30)), Arc::new(Track::new("Outro", 40))],
//! ));
//!
//! let mut session = PlaybackSession::default();
//! session.load(Some(AudioEntity::from(album))).unwrap();
//! assert_eq!(session.state(), PlaybackState::Paused);
//!
//! session.pause().unwrap(); // resume
//! session.advance(35);
//!
//! let stats = session.stats();
//! assert_eq!(stats.name.as_deref(), Some("Outro"));
//! assert_eq!(stats.remained_time, 35);
//! ```
//!
//! # Example: Scheduler
//!
//! ```rust
//! use std::sync::Arc;
//! use waves_playback::{AudioEntity, PlaybackConfig, Scheduler, Track};
//!
//! let mut scheduler = Scheduler::new(PlaybackConfig::default());
//! scheduler.register("alice").unwrap();
//!
//! let session = scheduler.session_mut("alice").unwrap();
//! session.load(Some(AudioEntity::from(Arc::new(Track::new("Song", 60))))).unwrap();
//! session.pause().unwrap();
//!
//! scheduler.advance_to(15);
//! assert_eq!(scheduler.session("alice").unwrap().remaining(), 45);
//! ```

mod bookmark;
mod clock;
mod error;
mod events;
mod session;
pub mod shuffle;
mod source;
pub mod types;

// Public exports
pub use bookmark::{BookmarkRegistry, PlaybackBookmark};
pub use clock::Scheduler;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use session::{NextOutcome, PlaybackSession, MAX_PENDING_EVENTS};
pub use source::PlayerSource;
pub use types::{
    AudioEntity, Collection, CollectionKind, PlaybackConfig, PlaybackState, PlaybackStats,
    RepeatMode, SourceKind, Track,
};
