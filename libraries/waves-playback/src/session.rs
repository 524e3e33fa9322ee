//! Playback session - per-user player state machine
//!
//! Coordinates the loaded source, repeat/shuffle configuration, virtual time
//! and podcast bookmarks for one user.

use crate::{
    bookmark::{BookmarkRegistry, PlaybackBookmark},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    source::PlayerSource,
    types::{AudioEntity, PlaybackConfig, PlaybackState, PlaybackStats, RepeatMode, SourceKind, Track},
};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Events kept for a caller that never drains; older ones are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Result of an explicit skip to the next track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// Playback continues on this track
    Playing(Arc<Track>),

    /// The source had no further track and was cleared
    Ended,
}

/// Per-user playback state machine
///
/// ```text
/// Empty --load--> Paused <--pause--> Playing
///   ^                                   |
///   +------ end of source / stop -------+
/// ```
///
/// Every `load` starts paused with shuffle off and repeat reset to
/// [`RepeatMode::NoRepeat`]. Time only moves through [`PlaybackSession::advance`].
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    // State
    source: Option<PlayerSource>,
    paused: bool,
    repeat: RepeatMode,

    // Podcast positions, kept across loads
    bookmarks: BookmarkRegistry,

    config: PlaybackConfig,

    // Event queue for the caller, bounded by MAX_PENDING_EVENTS
    pending_events: VecDeque<PlaybackEvent>,
}

impl PlaybackSession {
    /// Create an empty session
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            source: None,
            paused: true,
            repeat: RepeatMode::NoRepeat,
            bookmarks: BookmarkRegistry::new(),
            config,
            pending_events: VecDeque::new(),
        }
    }

    // ===== Loading =====

    /// Bind the selected entity as the new source
    ///
    /// Fails with [`PlaybackError::NoSelection`] when `selection` is `None`
    /// and with [`PlaybackError::EmptyCollection`] when it has no entries;
    /// in both cases the current source is left untouched.
    ///
    /// A podcast resumes from its bookmark. Leaving a podcast saves its
    /// position first.
    pub fn load(&mut self, selection: Option<AudioEntity>) -> Result<()> {
        let entity = selection.ok_or(PlaybackError::NoSelection)?;
        if entity.is_empty() {
            return Err(PlaybackError::EmptyCollection);
        }

        let before = self.state();
        self.flush_bookmark();

        let kind = entity.kind();
        let name = entity.name().to_string();
        let saved = match kind {
            SourceKind::Podcast => self.bookmarks.get(&name).cloned(),
            _ => None,
        };

        let source = match &saved {
            Some(bookmark) => PlayerSource::resume(entity, bookmark)?,
            None => PlayerSource::new(entity)?,
        };

        if kind == SourceKind::Podcast && saved.is_none() {
            self.bookmarks.reset(&name);
        }

        debug!(
            "Loaded {} '{}' at entry {} (+{}s)",
            kind,
            name,
            source.cursor(),
            source.elapsed()
        );

        self.source = Some(source);
        self.repeat = RepeatMode::NoRepeat;
        self.paused = true;
        self.push_event(PlaybackEvent::Loaded { name, kind });
        self.emit_state_change(before);

        Ok(())
    }

    /// Unload the current source, saving podcast position
    ///
    /// No-op when nothing is loaded.
    pub fn stop(&mut self) {
        let before = self.state();
        self.flush_bookmark();
        if let Some(source) = self.clear_source() {
            debug!("Stopped '{}'", source.name());
        }
        self.emit_state_change(before);
    }

    // ===== Transport =====

    /// Toggle between paused and playing
    ///
    /// Returns the new state.
    pub fn pause(&mut self) -> Result<PlaybackState> {
        self.require_source()?;

        let before = self.state();
        self.paused = !self.paused;
        self.emit_state_change(before);

        Ok(self.state())
    }

    /// Advance virtual time by `secs` seconds
    ///
    /// No-op while empty or paused. Crosses track boundaries as needed,
    /// applying the repeat policy at each one. Time left over after the
    /// source plays out is discarded.
    pub fn advance(&mut self, secs: u32) {
        if self.paused {
            return;
        }

        let before = self.state();
        let mut left = self.skip_laps(secs);
        let mut idle_crossings = 0usize;

        while left > 0 {
            let Some(source) = self.source.as_mut() else {
                break;
            };

            let remaining = source.remaining();
            if left < remaining {
                source.consume(left);
                break;
            }
            left -= remaining;

            // Zero-length entries consume no time; stop once all were crossed
            if remaining == 0 {
                idle_crossings += 1;
                if idle_crossings > source.len() {
                    debug!("'{}' has no playable length, dropping {}s", source.name(), left);
                    break;
                }
            } else {
                idle_crossings = 0;
            }

            if !self.finish_current() {
                break;
            }
        }

        self.emit_state_change(before);
    }

    /// Finish the current track now and move on
    ///
    /// Applies the same repeat policy as a natural end of track and resumes
    /// playback. Returns [`NextOutcome::Ended`] when the source was cleared.
    pub fn next(&mut self) -> Result<NextOutcome> {
        self.require_source()?;

        let before = self.state();
        if self.finish_current() {
            self.paused = false;
        }

        let outcome = match &self.source {
            Some(source) => NextOutcome::Playing(Arc::clone(source.current())),
            None => NextOutcome::Ended,
        };
        self.emit_state_change(before);

        Ok(outcome)
    }

    /// Restart the current track, or go back one entry if it just started
    ///
    /// Clamps at the first entry (restarting it) and resumes playback.
    pub fn prev(&mut self) -> Result<Arc<Track>> {
        let before = self.state();
        let source = self.source.as_mut().ok_or(PlaybackError::NothingLoaded)?;

        let previous = source.current().name.clone();
        if source.elapsed() > 0 {
            source.restart();
        } else {
            source.step_back();
        }

        let track = Arc::clone(source.current());
        let bookmark = source.bookmark();

        self.paused = false;
        self.push_event(PlaybackEvent::TrackChanged {
            track: track.name.clone(),
            previous,
        });
        if let Some(bookmark) = bookmark {
            self.save_bookmark(bookmark);
        }
        self.emit_state_change(before);

        Ok(track)
    }

    /// Jump forward inside the current podcast episode
    ///
    /// Jumping past the end finishes the episode. Resumes playback.
    pub fn skip_forward(&mut self) -> Result<()> {
        let step = self.config.skip_step_secs;
        let before = self.state();

        let remaining = self.podcast_source_mut()?.remaining();
        match self.source.as_mut() {
            Some(source) if remaining > step => source.consume(step),
            _ => {
                self.finish_current();
            }
        }

        if self.source.is_some() {
            self.paused = false;
        }
        self.emit_state_change(before);

        Ok(())
    }

    /// Jump backward inside the current podcast episode, stopping at its start
    ///
    /// Resumes playback.
    pub fn skip_backward(&mut self) -> Result<()> {
        let step = self.config.skip_step_secs;
        let before = self.state();

        self.podcast_source_mut()?.rewind(step);
        self.paused = false;
        self.emit_state_change(before);

        Ok(())
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle on a playlist or album
    ///
    /// Enabling builds a play order from `seed` that keeps the current track
    /// under the cursor; disabling restores original order. The seed is
    /// ignored when disabling. Returns whether shuffle is now on.
    pub fn toggle_shuffle(&mut self, seed: u64) -> Result<bool> {
        let source = self.source.as_mut().ok_or(PlaybackError::NothingLoaded)?;

        let kind = source.kind();
        if !kind.is_song_collection() {
            return Err(PlaybackError::WrongSourceKind(kind));
        }

        let enabled = if source.is_shuffled() {
            source.disable_shuffle();
            false
        } else {
            source.enable_shuffle(seed);
            true
        };

        debug!("Shuffle {} for '{}' (seed {})", enabled, source.name(), seed);
        self.push_event(PlaybackEvent::ShuffleChanged { enabled });

        Ok(enabled)
    }

    /// Move to the next repeat mode for the loaded source kind
    ///
    /// See [`RepeatMode::cycle`] for the order.
    pub fn cycle_repeat(&mut self) -> Result<RepeatMode> {
        let kind = self.require_source()?.kind();
        let mode = self.repeat.cycle(kind);
        self.set_repeat_mode(mode);
        Ok(mode)
    }

    /// Set the repeat mode directly
    pub fn set_repeat(&mut self, mode: RepeatMode) -> Result<()> {
        self.require_source()?;
        self.set_repeat_mode(mode);
        Ok(())
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        match (&self.source, self.paused) {
            (None, _) => PlaybackState::Empty,
            (Some(_), true) => PlaybackState::Paused,
            (Some(_), false) => PlaybackState::Playing,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_shuffled(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.is_shuffled())
    }

    /// Loaded source, if any
    pub fn source(&self) -> Option<&PlayerSource> {
        self.source.as_ref()
    }

    /// Name of the loaded track or collection
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name())
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.source.as_ref().map(|s| s.kind())
    }

    /// Track under the cursor
    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.source.as_ref().map(|s| s.current())
    }

    /// Seconds left in the current track (0 when empty)
    pub fn remaining(&self) -> u32 {
        self.source.as_ref().map(|s| s.remaining()).unwrap_or(0)
    }

    /// Track that a like/unlike applies to
    ///
    /// The loaded song, or the song under the cursor of a playlist/album.
    /// Podcast episodes are never likeable.
    pub fn likeable_track(&self) -> Result<Arc<Track>> {
        let source = self.require_source()?;
        match source.kind() {
            SourceKind::Podcast => Err(PlaybackError::WrongSourceKind(SourceKind::Podcast)),
            _ => Ok(Arc::clone(source.current())),
        }
    }

    /// Snapshot of the session
    pub fn stats(&self) -> PlaybackStats {
        match &self.source {
            None => PlaybackStats::empty(),
            Some(source) => PlaybackStats {
                name: Some(source.current().name.clone()),
                remained_time: source.remaining(),
                repeat: self.repeat,
                shuffle: source.is_shuffled(),
                paused: self.paused,
            },
        }
    }

    /// Podcast bookmarks of this session's user
    pub fn bookmarks(&self) -> &BookmarkRegistry {
        &self.bookmarks
    }

    /// Drop the bookmark of a podcast that left the catalog
    pub fn forget_bookmark(&mut self, podcast: &str) -> Option<PlaybackBookmark> {
        self.bookmarks.forget(podcast)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.pending_events.drain(..).collect()
    }

    // ===== Internals =====

    fn require_source(&self) -> Result<&PlayerSource> {
        self.source.as_ref().ok_or(PlaybackError::NothingLoaded)
    }

    fn podcast_source_mut(&mut self) -> Result<&mut PlayerSource> {
        let source = self.source.as_mut().ok_or(PlaybackError::NothingLoaded)?;
        match source.kind() {
            SourceKind::Podcast => Ok(source),
            other => Err(PlaybackError::WrongSourceKind(other)),
        }
    }

    fn set_repeat_mode(&mut self, mode: RepeatMode) {
        if self.repeat != mode {
            debug!("Repeat mode {} -> {}", self.repeat, mode);
            self.repeat = mode;
            self.push_event(PlaybackEvent::RepeatChanged { mode });
        }
    }

    /// End-of-track policy
    ///
    /// Returns false when the source played out and was cleared.
    fn finish_current(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };

        let previous = source.current().name.clone();
        let moved = match self.repeat {
            RepeatMode::RepeatCurrentSong | RepeatMode::RepeatOnce => {
                source.restart();
                true
            }
            RepeatMode::RepeatAll | RepeatMode::RepeatInfinite => {
                if !source.step_forward() {
                    source.wrap_to_start();
                }
                true
            }
            RepeatMode::NoRepeat => source.step_forward(),
        };

        let track = source.current().name.clone();
        let bookmark = source.bookmark();

        if !moved {
            self.end_source();
            return false;
        }

        if self.repeat == RepeatMode::RepeatOnce {
            self.set_repeat_mode(RepeatMode::NoRepeat);
        }

        self.push_event(PlaybackEvent::TrackChanged { track, previous });
        if let Some(bookmark) = bookmark {
            self.save_bookmark(bookmark);
        }

        true
    }

    /// Drop whole laps of a wrapping source from `secs`
    ///
    /// A lap brings a repeating source back to the same position, so only
    /// the remainder is played through.
    fn skip_laps(&mut self, secs: u32) -> u32 {
        let Some(source) = self.source.as_ref() else {
            return secs;
        };

        let lap = match self.repeat {
            RepeatMode::RepeatAll | RepeatMode::RepeatInfinite => source.total_duration(),
            RepeatMode::RepeatCurrentSong => u64::from(source.current().duration),
            RepeatMode::NoRepeat | RepeatMode::RepeatOnce => 0,
        };
        let Ok(lap) = u32::try_from(lap) else {
            return secs;
        };
        if lap == 0 || secs < lap {
            return secs;
        }

        debug!("Skipping {} laps of '{}'", secs / lap, source.name());

        // The last crossing of a lap enters the current episode at its start
        let bookmark = source.bookmark().map(|b| PlaybackBookmark { offset: 0, ..b });
        if let Some(bookmark) = bookmark {
            self.save_bookmark(bookmark);
        }

        secs % lap
    }

    /// Clear a source that played out
    fn end_source(&mut self) {
        let Some(source) = self.clear_source() else {
            return;
        };

        if source.kind() == SourceKind::Podcast {
            self.save_bookmark(PlaybackBookmark::start(source.name()));
        }

        debug!("'{}' played out", source.name());
        self.push_event(PlaybackEvent::SourceEnded {
            name: source.name().to_string(),
        });
    }

    fn clear_source(&mut self) -> Option<PlayerSource> {
        let source = self.source.take();
        self.repeat = RepeatMode::NoRepeat;
        self.paused = true;
        source
    }

    /// Save the loaded podcast's position
    fn flush_bookmark(&mut self) {
        if let Some(bookmark) = self.source.as_ref().and_then(|s| s.bookmark()) {
            self.save_bookmark(bookmark);
        }
    }

    fn save_bookmark(&mut self, bookmark: PlaybackBookmark) {
        debug!(
            "Bookmark '{}' at episode {} (+{}s)",
            bookmark.podcast, bookmark.episode_index, bookmark.offset
        );
        self.push_event(PlaybackEvent::BookmarkSaved {
            podcast: bookmark.podcast.clone(),
            episode_index: bookmark.episode_index,
            offset: bookmark.offset,
        });
        self.bookmarks.save(bookmark);
    }

    fn push_event(&mut self, event: PlaybackEvent) {
        if self.pending_events.len() >= MAX_PENDING_EVENTS {
            self.pending_events.pop_front();
        }
        self.pending_events.push_back(event);
    }

    fn emit_state_change(&mut self, before: PlaybackState) {
        let after = self.state();
        if before != after {
            self.push_event(PlaybackEvent::StateChanged { state: after });
        }
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collection, CollectionKind};

    fn song(name: &str, duration: u32) -> AudioEntity {
        AudioEntity::Track(Arc::new(Track::new(name, duration)))
    }

    fn collection(name: &str, kind: CollectionKind, durations: &[u32]) -> AudioEntity {
        let tracks = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Arc::new(Track::new(format!("{} {}", name, i), d)))
            .collect();
        AudioEntity::Collection(Arc::new(Collection::new(name, "owner", kind, tracks)))
    }

    fn album(durations: &[u32]) -> AudioEntity {
        collection("Album", CollectionKind::Album, durations)
    }

    fn podcast(durations: &[u32]) -> AudioEntity {
        collection("Show", CollectionKind::Podcast, durations)
    }

    fn playing(entity: AudioEntity) -> PlaybackSession {
        let mut session = PlaybackSession::default();
        session.load(Some(entity)).unwrap();
        session.pause().unwrap();
        session
    }

    fn current_name(session: &PlaybackSession) -> Option<&str> {
        session.current_track().map(|t| t.name.as_str())
    }

    #[test]
    fn create_session() {
        let mut session = PlaybackSession::new(PlaybackConfig::default());
        assert_eq!(session.state(), PlaybackState::Empty);
        assert_eq!(session.stats(), PlaybackStats::empty());
        assert_eq!(session.remaining(), 0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn load_without_selection_fails() {
        let mut session = PlaybackSession::default();
        assert_eq!(session.load(None), Err(PlaybackError::NoSelection));
        assert_eq!(session.state(), PlaybackState::Empty);
    }

    #[test]
    fn load_starts_paused() {
        let mut session = PlaybackSession::default();
        session.load(Some(song("Song", 60))).unwrap();
        assert_eq!(session.state(), PlaybackState::Paused);

        session.advance(10);
        assert_eq!(session.remaining(), 60);
    }

    #[test]
    fn empty_collection_keeps_prior_source() {
        let mut session = playing(song("Song", 60));
        session.advance(5);

        let err = session.load(Some(album(&[]))).unwrap_err();
        assert_eq!(err, PlaybackError::EmptyCollection);
        assert_eq!(session.source_name(), Some("Song"));
        assert_eq!(session.state(), PlaybackState::Playing);
        assert_eq!(session.remaining(), 55);
    }

    #[test]
    fn transport_requires_source() {
        let mut session = PlaybackSession::default();
        assert_eq!(session.pause(), Err(PlaybackError::NothingLoaded));
        assert_eq!(session.next(), Err(PlaybackError::NothingLoaded));
        assert_eq!(session.prev(), Err(PlaybackError::NothingLoaded));
        assert_eq!(session.cycle_repeat(), Err(PlaybackError::NothingLoaded));
        assert_eq!(session.toggle_shuffle(1), Err(PlaybackError::NothingLoaded));
        assert_eq!(session.skip_forward(), Err(PlaybackError::NothingLoaded));
        assert_eq!(session.likeable_track(), Err(PlaybackError::NothingLoaded));
    }

    #[test]
    fn advance_crosses_boundaries() {
        let mut session = playing(album(&[10, 20, 30]));
        session.advance(35);

        assert_eq!(current_name(&session), Some("Album 2"));
        assert_eq!(session.remaining(), 25);
    }

    #[test]
    fn advance_to_exact_boundary() {
        let mut session = playing(album(&[10, 20]));
        session.advance(10);

        assert_eq!(current_name(&session), Some("Album 1"));
        assert_eq!(session.source().unwrap().elapsed(), 0);
    }

    #[test]
    fn no_repeat_clears_at_end() {
        let mut session = playing(album(&[10, 10]));
        session.drain_events();
        session.advance(100);

        assert_eq!(session.state(), PlaybackState::Empty);
        assert_eq!(session.stats(), PlaybackStats::empty());

        let events = session.drain_events();
        assert!(events.contains(&PlaybackEvent::SourceEnded {
            name: "Album".to_string()
        }));
        assert_eq!(
            events.last(),
            Some(&PlaybackEvent::StateChanged {
                state: PlaybackState::Empty
            })
        );
    }

    #[test]
    fn repeat_all_wraps() {
        let mut session = playing(album(&[10, 10]));
        session.set_repeat(RepeatMode::RepeatAll).unwrap();
        session.advance(25);

        assert_eq!(current_name(&session), Some("Album 0"));
        assert_eq!(session.remaining(), 5);
        assert_eq!(session.repeat(), RepeatMode::RepeatAll);
    }

    #[test]
    fn repeat_current_song_restarts() {
        let mut session = playing(album(&[10, 10]));
        session.cycle_repeat().unwrap();
        assert_eq!(session.cycle_repeat().unwrap(), RepeatMode::RepeatCurrentSong);

        session.advance(35);
        assert_eq!(current_name(&session), Some("Album 0"));
        assert_eq!(session.remaining(), 5);
    }

    #[test]
    fn song_repeat_once_replays_then_ends() {
        let mut session = playing(song("Song", 10));
        assert_eq!(session.cycle_repeat().unwrap(), RepeatMode::RepeatOnce);

        session.advance(15);
        assert_eq!(session.remaining(), 5);
        assert_eq!(session.repeat(), RepeatMode::NoRepeat);

        session.advance(10);
        assert_eq!(session.state(), PlaybackState::Empty);
    }

    #[test]
    fn song_repeat_all_never_ends() {
        let mut session = playing(song("Song", 10));
        session.cycle_repeat().unwrap();
        assert_eq!(session.cycle_repeat().unwrap(), RepeatMode::RepeatAll);

        session.advance(1003);
        assert_eq!(current_name(&session), Some("Song"));
        assert_eq!(session.remaining(), 7);
        assert_eq!(session.cycle_repeat().unwrap(), RepeatMode::NoRepeat);
    }

    #[test]
    fn repeat_infinite_wraps_collection() {
        let mut session = playing(album(&[10, 10]));
        session.set_repeat(RepeatMode::RepeatInfinite).unwrap();

        session.advance(45);
        assert_eq!(current_name(&session), Some("Album 0"));
        assert_eq!(session.remaining(), 5);
        assert_eq!(session.repeat(), RepeatMode::RepeatInfinite);
    }

    #[test]
    fn repeating_sources_skip_whole_laps() {
        let mut session = playing(album(&[10, 20]));
        session.set_repeat(RepeatMode::RepeatAll).unwrap();
        session.drain_events();

        session.advance(u32::MAX);
        // u32::MAX % 30 == 15
        assert_eq!(current_name(&session), Some("Album 1"));
        assert_eq!(session.remaining(), 15);
        assert_eq!(session.drain_events().len(), 1);

        session.set_repeat(RepeatMode::RepeatCurrentSong).unwrap();
        session.advance(20 * 1000 + 4);
        assert_eq!(current_name(&session), Some("Album 1"));
        assert_eq!(session.remaining(), 11);
    }

    #[test]
    fn skipped_podcast_laps_bookmark_episode_start() {
        let mut session = playing(podcast(&[10, 10]));
        session.advance(13);
        session.set_repeat(RepeatMode::RepeatAll).unwrap();

        session.advance(20 * 50);
        assert_eq!(
            session.bookmarks().get("Show"),
            Some(&PlaybackBookmark {
                podcast: "Show".to_string(),
                episode_index: 1,
                offset: 0,
            })
        );
        assert_eq!(session.source().unwrap().elapsed(), 3);
    }

    #[test]
    fn event_queue_is_bounded() {
        let mut session = playing(album(&[1, 1, 1]));
        session.set_repeat(RepeatMode::RepeatAll).unwrap();
        session.drain_events();

        for _ in 0..1000 {
            session.advance(2);
        }

        let events = session.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(matches!(events.last(), Some(PlaybackEvent::TrackChanged { .. })));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn next_at_end_clears_source() {
        let mut session = PlaybackSession::default();
        session.load(Some(album(&[10, 10]))).unwrap();

        match session.next().unwrap() {
            NextOutcome::Playing(track) => assert_eq!(track.name, "Album 1"),
            NextOutcome::Ended => panic!("expected a next track"),
        }
        assert_eq!(session.state(), PlaybackState::Playing);

        assert_eq!(session.next().unwrap(), NextOutcome::Ended);
        assert_eq!(session.pause(), Err(PlaybackError::NothingLoaded));
    }

    #[test]
    fn prev_restarts_then_steps_back() {
        let mut session = playing(album(&[10, 10, 10]));
        session.advance(15);

        assert_eq!(session.prev().unwrap().name, "Album 1");
        assert_eq!(session.remaining(), 10);

        assert_eq!(session.prev().unwrap().name, "Album 0");
        assert_eq!(session.prev().unwrap().name, "Album 0");
        assert_eq!(session.source().unwrap().cursor(), 0);
    }

    #[test]
    fn prev_resumes_playback() {
        let mut session = PlaybackSession::default();
        session.load(Some(album(&[10, 10]))).unwrap();
        session.prev().unwrap();
        assert_eq!(session.state(), PlaybackState::Playing);
    }

    #[test]
    fn podcast_skips() {
        let mut session = PlaybackSession::default();
        session.load(Some(podcast(&[300, 100]))).unwrap();

        session.skip_forward().unwrap();
        assert_eq!(session.state(), PlaybackState::Playing);
        assert_eq!(session.remaining(), 210);

        session.skip_backward().unwrap();
        session.skip_backward().unwrap();
        assert_eq!(session.remaining(), 300);
    }

    #[test]
    fn skip_forward_past_end_finishes_episode() {
        let mut session = playing(podcast(&[100, 100]));
        session.skip_forward().unwrap();
        session.skip_forward().unwrap();

        assert_eq!(current_name(&session), Some("Show 1"));
        assert_eq!(session.remaining(), 100);
        assert_eq!(
            session.bookmarks().get("Show"),
            Some(&PlaybackBookmark {
                podcast: "Show".to_string(),
                episode_index: 1,
                offset: 0,
            })
        );
    }

    #[test]
    fn skips_need_podcast() {
        let mut session = playing(song("Song", 100));
        assert_eq!(
            session.skip_forward(),
            Err(PlaybackError::WrongSourceKind(SourceKind::Song))
        );
        assert_eq!(
            session.skip_backward(),
            Err(PlaybackError::WrongSourceKind(SourceKind::Song))
        );
    }

    #[test]
    fn skip_step_is_configurable() {
        let mut session = PlaybackSession::new(PlaybackConfig { skip_step_secs: 30 });
        session.load(Some(podcast(&[300]))).unwrap();
        session.skip_forward().unwrap();
        assert_eq!(session.remaining(), 270);
    }

    #[test]
    fn shuffle_needs_song_collection() {
        let mut session = playing(song("Song", 100));
        assert_eq!(
            session.toggle_shuffle(1),
            Err(PlaybackError::WrongSourceKind(SourceKind::Song))
        );

        session.load(Some(podcast(&[10]))).unwrap();
        assert_eq!(
            session.toggle_shuffle(1),
            Err(PlaybackError::WrongSourceKind(SourceKind::Podcast))
        );

        session.load(Some(collection("Mix", CollectionKind::Playlist, &[10, 10]))).unwrap();
        assert_eq!(session.toggle_shuffle(1), Ok(true));
    }

    #[test]
    fn shuffle_toggles_regardless_of_seed() {
        let mut session = playing(album(&[10, 10, 10]));
        assert_eq!(session.toggle_shuffle(3), Ok(true));
        assert!(session.is_shuffled());
        assert_eq!(session.toggle_shuffle(99), Ok(false));
        assert!(!session.is_shuffled());
        assert!(!session.stats().shuffle);
    }

    #[test]
    fn shuffled_playback_follows_order() {
        let mut session = playing(album(&[10, 10, 10, 10, 10]));
        session.toggle_shuffle(7).unwrap();

        // SplitMix64 seed 7, track 0 pinned: [0, 2, 3, 1, 4]
        session.advance(10);
        assert_eq!(current_name(&session), Some("Album 2"));
        session.advance(10);
        assert_eq!(current_name(&session), Some("Album 3"));

        session.toggle_shuffle(7).unwrap();
        assert_eq!(session.source().unwrap().cursor(), 3);
        session.advance(10);
        assert_eq!(current_name(&session), Some("Album 4"));
    }

    #[test]
    fn load_resets_repeat_and_shuffle() {
        let mut session = playing(album(&[10, 10]));
        session.set_repeat(RepeatMode::RepeatAll).unwrap();
        session.toggle_shuffle(5).unwrap();

        session.load(Some(album(&[10, 10]))).unwrap();
        let stats = session.stats();
        assert_eq!(stats.repeat, RepeatMode::NoRepeat);
        assert!(!stats.shuffle);
        assert!(stats.paused);
    }

    #[test]
    fn likeable_tracks() {
        let session = playing(song("Song", 10));
        assert_eq!(session.likeable_track().unwrap().name, "Song");

        let mut session = playing(album(&[10, 10]));
        session.advance(12);
        assert_eq!(session.likeable_track().unwrap().name, "Album 1");

        let session = playing(podcast(&[10]));
        assert_eq!(
            session.likeable_track(),
            Err(PlaybackError::WrongSourceKind(SourceKind::Podcast))
        );
    }

    #[test]
    fn podcast_resumes_from_bookmark() {
        let mut session = playing(podcast(&[20, 20, 20]));
        session.advance(25);

        session.load(Some(song("Song", 60))).unwrap();
        session.load(Some(podcast(&[20, 20, 20]))).unwrap();

        let source = session.source().unwrap();
        assert_eq!(source.cursor(), 1);
        assert_eq!(source.elapsed(), 5);
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[test]
    fn first_podcast_load_creates_bookmark() {
        let mut session = PlaybackSession::default();
        session.load(Some(podcast(&[20]))).unwrap();
        assert_eq!(
            session.bookmarks().get("Show"),
            Some(&PlaybackBookmark::start("Show"))
        );
    }

    #[test]
    fn finished_podcast_starts_over() {
        let mut session = playing(podcast(&[10, 10]));
        session.advance(30);
        assert_eq!(session.state(), PlaybackState::Empty);
        assert_eq!(
            session.bookmarks().get("Show"),
            Some(&PlaybackBookmark::start("Show"))
        );
    }

    #[test]
    fn stop_saves_podcast_position() {
        let mut session = playing(podcast(&[20, 20]));
        session.advance(5);
        session.stop();

        assert_eq!(session.state(), PlaybackState::Empty);
        assert_eq!(session.bookmarks().get("Show").map(|b| b.offset), Some(5));
    }

    #[test]
    fn forget_bookmark() {
        let mut session = playing(podcast(&[20, 20]));
        session.stop();
        assert!(session.forget_bookmark("Show").is_some());
        assert!(session.bookmarks().is_empty());
    }

    #[test]
    fn load_and_pause_events() {
        let mut session = PlaybackSession::default();
        session.load(Some(song("Song", 10))).unwrap();
        session.pause().unwrap();

        let events = session.drain_events();
        assert_eq!(
            events,
            vec![
                PlaybackEvent::Loaded {
                    name: "Song".to_string(),
                    kind: SourceKind::Song,
                },
                PlaybackEvent::StateChanged {
                    state: PlaybackState::Paused
                },
                PlaybackEvent::StateChanged {
                    state: PlaybackState::Playing
                },
            ]
        );
    }

    #[test]
    fn zero_length_tracks_do_not_stall() {
        let mut session = playing(album(&[0, 0]));
        session.set_repeat(RepeatMode::RepeatAll).unwrap();
        session.advance(10);
        assert_eq!(session.state(), PlaybackState::Playing);

        let mut session = playing(song("Silence", 0));
        session.set_repeat(RepeatMode::RepeatCurrentSong).unwrap();
        session.advance(10);
        assert_eq!(session.state(), PlaybackState::Playing);
    }
}
