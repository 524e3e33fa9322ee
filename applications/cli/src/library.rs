//! Catalog loaded from a library JSON file
//!
//! The library owns every track and collection. Sessions only hold `Arc`
//! handles to them, so a loaded source is never a copy.

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use waves_playback::{AudioEntity, Collection, CollectionKind, Track};

/// Most results a search returns
pub const MAX_SEARCH_RESULTS: usize = 5;

// ===== Input format =====

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryInput {
    #[serde(default)]
    pub songs: Vec<SongInput>,

    #[serde(default)]
    pub podcasts: Vec<PodcastInput>,

    #[serde(default)]
    pub albums: Vec<CollectionInput>,

    #[serde(default)]
    pub playlists: Vec<CollectionInput>,

    #[serde(default)]
    pub users: Vec<UserInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
    pub name: String,
    pub duration: u32,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub artist: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInput {
    pub name: String,
    pub duration: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodcastInput {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub episodes: Vec<EpisodeInput>,
}

/// Playlist or album listing its songs by name
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInput {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub songs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub username: String,
}

// ===== Search =====

/// Entity type a search runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Song,
    Playlist,
    Album,
    Podcast,
}

impl FromStr for SearchType {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "song" => Ok(SearchType::Song),
            "playlist" => Ok(SearchType::Playlist),
            "album" => Ok(SearchType::Album),
            "podcast" => Ok(SearchType::Podcast),
            other => Err(CliError::Library(format!("Unsupported search type '{}'", other))),
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchType::Song => "song",
            SearchType::Playlist => "playlist",
            SearchType::Album => "album",
            SearchType::Podcast => "podcast",
        };
        f.write_str(name)
    }
}

/// Search filters; every filter given must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Filters {
    /// Case-insensitive name prefix
    #[serde(default)]
    pub name: Option<String>,

    /// Exact artist, host or playlist owner
    #[serde(default)]
    pub owner: Option<String>,

    /// Case-insensitive genre (songs only)
    #[serde(default)]
    pub genre: Option<String>,
}

impl Filters {
    fn matches_name(&self, name: &str) -> bool {
        self.name
            .as_ref()
            .map_or(true, |prefix| name.to_lowercase().starts_with(&prefix.to_lowercase()))
    }

    fn matches_owner(&self, owner: &str) -> bool {
        self.owner.as_ref().map_or(true, |wanted| wanted == owner)
    }

    fn matches_track(&self, track: &Track) -> bool {
        self.matches_name(&track.name)
            && self.matches_owner(&track.owner)
            && self
                .genre
                .as_ref()
                .map_or(true, |genre| genre.eq_ignore_ascii_case(&track.genre))
    }

    fn matches_collection(&self, collection: &Collection) -> bool {
        self.genre.is_none()
            && self.matches_name(&collection.name)
            && self.matches_owner(&collection.owner)
    }
}

// ===== Library =====

#[derive(Debug, Clone, Default)]
pub struct Library {
    songs: Vec<Arc<Track>>,
    playlists: Vec<Arc<Collection>>,
    albums: Vec<Arc<Collection>>,
    podcasts: Vec<Arc<Collection>>,
    users: Vec<String>,
    likes: HashMap<String, u32>,
}

impl Library {
    /// Read and build a library from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let input: LibraryInput = serde_json::from_str(&content)?;
        let library = Self::from_input(input)?;

        info!(
            "Loaded library from {:?}: {} songs, {} playlists, {} albums, {} podcasts, {} users",
            path,
            library.songs.len(),
            library.playlists.len(),
            library.albums.len(),
            library.podcasts.len(),
            library.users.len()
        );
        Ok(library)
    }

    /// Build a library, resolving playlist and album songs by name
    ///
    /// Songs naming an album that is not listed explicitly are grouped into
    /// one, in library order.
    pub fn from_input(input: LibraryInput) -> Result<Self> {
        let songs: Vec<Arc<Track>> = input
            .songs
            .iter()
            .map(|song| {
                Arc::new(Track {
                    name: song.name.clone(),
                    duration: song.duration,
                    genre: song.genre.clone(),
                    owner: song.artist.clone(),
                })
            })
            .collect();

        let by_name: HashMap<&str, &Arc<Track>> = songs
            .iter()
            .map(|track| (track.name.as_str(), track))
            .collect();

        let resolve = |input: &CollectionInput, kind: CollectionKind| -> Result<Arc<Collection>> {
            let tracks = input
                .songs
                .iter()
                .map(|name| {
                    by_name.get(name.as_str()).map(|t| Arc::clone(t)).ok_or_else(|| {
                        CliError::Library(format!(
                            "{} '{}' lists unknown song '{}'",
                            kind_label(kind),
                            input.name,
                            name
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Arc::new(Collection::new(&input.name, &input.owner, kind, tracks)))
        };

        let playlists = input
            .playlists
            .iter()
            .map(|p| resolve(p, CollectionKind::Playlist))
            .collect::<Result<Vec<_>>>()?;

        let mut albums = input
            .albums
            .iter()
            .map(|a| resolve(a, CollectionKind::Album))
            .collect::<Result<Vec<_>>>()?;

        // Albums implied by songs
        let mut implied: Vec<(String, String, Vec<Arc<Track>>)> = Vec::new();
        for (song, track) in input.songs.iter().zip(&songs) {
            let Some(album) = song.album.as_ref() else {
                continue;
            };
            if albums.iter().any(|a| &a.name == album && a.owner == song.artist) {
                continue;
            }
            match implied
                .iter_mut()
                .find(|(name, owner, _)| name == album && owner == &song.artist)
            {
                Some((_, _, tracks)) => tracks.push(Arc::clone(track)),
                None => implied.push((album.clone(), song.artist.clone(), vec![Arc::clone(track)])),
            }
        }
        albums.extend(
            implied
                .into_iter()
                .map(|(name, owner, tracks)| Arc::new(Collection::new(name, owner, CollectionKind::Album, tracks))),
        );

        let podcasts = input
            .podcasts
            .into_iter()
            .map(|podcast| {
                let episodes = podcast
                    .episodes
                    .into_iter()
                    .map(|episode| {
                        Arc::new(Track {
                            name: episode.name,
                            duration: episode.duration,
                            genre: String::new(),
                            owner: podcast.owner.clone(),
                        })
                    })
                    .collect();
                Arc::new(Collection::new(podcast.name, podcast.owner, CollectionKind::Podcast, episodes))
            })
            .collect();

        let users = input.users.into_iter().map(|user| user.username).collect();

        debug!("Library built with {} implied albums", albums.len() - input.albums.len());

        Ok(Self {
            songs,
            playlists,
            albums,
            podcasts,
            users,
            likes: HashMap::new(),
        })
    }

    /// Entities of one type matching every filter, at most
    /// [`MAX_SEARCH_RESULTS`], in library order
    pub fn search(&self, search_type: SearchType, filters: &Filters) -> Vec<AudioEntity> {
        let collections = match search_type {
            SearchType::Song => {
                return self
                    .songs
                    .iter()
                    .filter(|track| filters.matches_track(track))
                    .take(MAX_SEARCH_RESULTS)
                    .map(|track| AudioEntity::Track(Arc::clone(track)))
                    .collect();
            }
            SearchType::Playlist => &self.playlists,
            SearchType::Album => &self.albums,
            SearchType::Podcast => &self.podcasts,
        };

        collections
            .iter()
            .filter(|collection| filters.matches_collection(collection))
            .take(MAX_SEARCH_RESULTS)
            .map(|collection| AudioEntity::Collection(Arc::clone(collection)))
            .collect()
    }

    pub fn songs(&self) -> &[Arc<Track>] {
        &self.songs
    }

    pub fn podcasts(&self) -> &[Arc<Collection>] {
        &self.podcasts
    }

    /// Usernames in library order
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Number of users currently liking a song
    pub fn likes(&self, song: &str) -> u32 {
        self.likes.get(song).copied().unwrap_or(0)
    }

    pub fn like(&mut self, song: &Track) {
        *self.likes.entry(song.name.clone()).or_insert(0) += 1;
    }

    pub fn unlike(&mut self, song: &Track) {
        if let Some(count) = self.likes.get_mut(&song.name) {
            *count = count.saturating_sub(1);
        }
    }
}

fn kind_label(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Playlist => "Playlist",
        CollectionKind::Album => "Album",
        CollectionKind::Podcast => "Podcast",
    }
}
