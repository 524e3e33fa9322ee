//! Command runner - replays timestamped user commands
//!
//! Owns the library and the scheduler. Before each command the virtual
//! clock moves to the command's timestamp, then the command runs against
//! the user's session and produces exactly one response.

use crate::{
    commands::{CommandInput, CommandKind, CommandOutput},
    error::Result,
    library::{Library, SearchType},
};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use waves_playback::{
    AudioEntity, NextOutcome, PlaybackConfig, PlaybackError, PlaybackSession, PlaybackState,
    Scheduler, Track,
};

/// Per-user state outside the player: search results, selection, likes
#[derive(Debug, Clone, Default)]
struct UserState {
    last_search: Option<Vec<AudioEntity>>,
    selection: Option<AudioEntity>,
    liked: Vec<Arc<Track>>,
}

pub struct CommandRunner {
    library: Library,
    scheduler: Scheduler,
    users: HashMap<String, UserState>,
}

impl CommandRunner {
    /// Register a session for every library user
    pub fn new(library: Library, config: PlaybackConfig) -> Result<Self> {
        let mut scheduler = Scheduler::new(config);
        let mut users = HashMap::new();
        for user in library.users() {
            scheduler.register(user.as_str())?;
            users.insert(user.clone(), UserState::default());
        }

        Ok(Self {
            library,
            scheduler,
            users,
        })
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run commands in order, one response each
    pub fn run(&mut self, commands: &[CommandInput]) -> Vec<CommandOutput> {
        info!("Replaying {} commands", commands.len());
        commands.iter().map(|input| self.execute(input)).collect()
    }

    /// Advance the clock to the command's timestamp and run it
    pub fn execute(&mut self, input: &CommandInput) -> CommandOutput {
        self.scheduler.advance_to(input.timestamp);
        let output = CommandOutput::for_input(input);

        let kind = match input.command.parse::<CommandKind>() {
            Ok(kind) => kind,
            Err(name) => {
                warn!("Unknown command '{}' at {}", name, input.timestamp);
                return output.with_message(format!("The command {} is not supported.", name));
            }
        };

        if kind == CommandKind::GetOnlineUsers {
            let online: Vec<String> = self
                .scheduler
                .online_users()
                .into_iter()
                .map(str::to_string)
                .collect();
            return output.without_user().with_result(online);
        }

        let Some(user) = input.username.as_deref() else {
            warn!("Command {} at {} has no username", kind, input.timestamp);
            return output.with_message(format!("The command {} needs a username.", kind));
        };

        if !self.scheduler.contains(user) {
            return output.with_message(format!("The username {} doesn't exist.", user));
        }

        if kind.needs_online() && !self.scheduler.is_online(user).unwrap_or(false) {
            let output = output.with_message(format!("{} is offline.", user));
            return match kind {
                CommandKind::Search => output.with_results(Vec::new()),
                _ => output,
            };
        }

        debug!("{} runs {} at {}", user, kind, input.timestamp);
        let output = match kind {
            CommandKind::Search => self.search(user, input, output),
            CommandKind::Select => self.select(user, input, output),
            CommandKind::Load => self.load(user, output),
            CommandKind::Like => self.like(user, output),
            CommandKind::ShowPreferredSongs => {
                let liked: Vec<String> = self
                    .users
                    .get(user)
                    .map(|state| state.liked.iter().map(|t| t.name.clone()).collect())
                    .unwrap_or_default();
                output.with_result(liked)
            }
            CommandKind::SwitchConnectionStatus => match self.scheduler.toggle_connection(user) {
                Ok(_) => output.with_message(format!("{} has changed status successfully.", user)),
                Err(err) => output.with_message(err.to_string()),
            },
            _ => match self.scheduler.session_mut(user) {
                Some(session) => player_command(kind, session, input, output),
                None => output.with_message(format!("The username {} doesn't exist.", user)),
            },
        };

        if let Some(session) = self.scheduler.session_mut(user) {
            for event in session.drain_events() {
                debug!("{} [{}]: {:?}", user, event.name(), event);
            }
        }

        output
    }

    fn search(&mut self, user: &str, input: &CommandInput, output: CommandOutput) -> CommandOutput {
        let raw = input.search_type.as_deref().unwrap_or_default();
        let search_type = match raw.parse::<SearchType>() {
            Ok(search_type) => search_type,
            Err(err) => {
                warn!("{}", err);
                return output
                    .with_message(format!("Unsupported search type {}.", raw))
                    .with_results(Vec::new());
            }
        };

        // A new search stops the player and drops the old selection
        if let Some(session) = self.scheduler.session_mut(user) {
            session.stop();
        }

        let filters = input.filters.clone().unwrap_or_default();
        let results = self.library.search(search_type, &filters);
        let names: Vec<String> = results.iter().map(|e| e.name().to_string()).collect();

        let state = self.users.entry(user.to_string()).or_default();
        state.selection = None;
        state.last_search = Some(results);

        debug!("{} searched {} and got {} results", user, search_type, names.len());
        output
            .with_message(format!("Search returned {} results", names.len()))
            .with_results(names)
    }

    fn select(&mut self, user: &str, input: &CommandInput, output: CommandOutput) -> CommandOutput {
        let state = self.users.entry(user.to_string()).or_default();
        let Some(results) = state.last_search.take() else {
            return output.with_message("Please conduct a search before making a selection.");
        };

        // Zero and negative numbers never match a result
        let chosen = input
            .item_number
            .and_then(|n| usize::try_from(n).ok())
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| results.get(index));

        match chosen {
            Some(entity) => {
                let message = format!("Successfully selected {}.", entity.name());
                state.selection = Some(entity.clone());
                output.with_message(message)
            }
            None => output.with_message("The selected ID is too high."),
        }
    }

    fn load(&mut self, user: &str, output: CommandOutput) -> CommandOutput {
        let state = self.users.entry(user.to_string()).or_default();
        let Some(session) = self.scheduler.session_mut(user) else {
            return output.with_message(format!("The username {} doesn't exist.", user));
        };

        let message = match session.load(state.selection.clone()) {
            Ok(()) => {
                state.selection = None;
                "Playback loaded successfully.".to_string()
            }
            Err(PlaybackError::NoSelection) => {
                "Please select a source before attempting to load.".to_string()
            }
            Err(PlaybackError::EmptyCollection) => {
                "You can't load an empty audio collection!".to_string()
            }
            Err(err) => err.to_string(),
        };
        output.with_message(message)
    }

    fn like(&mut self, user: &str, output: CommandOutput) -> CommandOutput {
        let track = match self.scheduler.session(user).map(|s| s.likeable_track()) {
            Some(Ok(track)) => track,
            Some(Err(PlaybackError::WrongSourceKind(_))) => {
                return output.with_message("Loaded source is not a song.");
            }
            _ => return output.with_message("Please load a source before liking or unliking."),
        };

        let state = self.users.entry(user.to_string()).or_default();
        if let Some(index) = state.liked.iter().position(|t| Arc::ptr_eq(t, &track)) {
            state.liked.remove(index);
            self.library.unlike(&track);
            return output.with_message("Unlike registered successfully.");
        }

        state.liked.push(Arc::clone(&track));
        self.library.like(&track);
        output.with_message("Like registered successfully.")
    }
}

/// Commands that only touch the user's session
fn player_command(
    kind: CommandKind,
    session: &mut PlaybackSession,
    input: &CommandInput,
    output: CommandOutput,
) -> CommandOutput {
    let message = match kind {
        CommandKind::PlayPause => match session.pause() {
            Ok(PlaybackState::Paused) => "Playback paused successfully.".to_string(),
            Ok(_) => "Playback resumed successfully.".to_string(),
            Err(_) => {
                "Please load a source before attempting to pause or resume playback.".to_string()
            }
        },
        CommandKind::Repeat => match session.cycle_repeat() {
            Ok(mode) => format!("Repeat mode changed to {}.", mode.label()),
            Err(_) => "Please load a source before setting the repeat status.".to_string(),
        },
        CommandKind::Shuffle => {
            // Negative seeds keep their bit pattern
            let seed = input.seed.unwrap_or_default() as u64;
            match session.toggle_shuffle(seed) {
                Ok(true) => "Shuffle function activated successfully.".to_string(),
                Ok(false) => "Shuffle function deactivated successfully.".to_string(),
                Err(PlaybackError::WrongSourceKind(_)) => {
                    "The loaded source is not a playlist or an album.".to_string()
                }
                Err(_) => "Please load a source before using the shuffle function.".to_string(),
            }
        }
        CommandKind::Forward => match session.skip_forward() {
            Ok(()) => "Skipped forward successfully.".to_string(),
            Err(PlaybackError::WrongSourceKind(_)) => "The loaded source is not a podcast.".to_string(),
            Err(_) => "Please load a source before attempting to forward.".to_string(),
        },
        CommandKind::Backward => match session.skip_backward() {
            Ok(()) => "Rewound successfully.".to_string(),
            Err(PlaybackError::WrongSourceKind(_)) => "The loaded source is not a podcast.".to_string(),
            Err(_) => "Please select a source before rewinding.".to_string(),
        },
        CommandKind::Next => match session.next() {
            Ok(NextOutcome::Playing(track)) => format!(
                "Skipped to next track successfully. The current track is {}.",
                track.name
            ),
            Ok(NextOutcome::Ended) | Err(_) => {
                "Please load a source before skipping to the next track.".to_string()
            }
        },
        CommandKind::Prev => match session.prev() {
            Ok(track) => format!(
                "Returned to previous track successfully. The current track is {}.",
                track.name
            ),
            Err(_) => "Please load a source before returning to the previous track.".to_string(),
        },
        CommandKind::Status => return output.with_stats(session.stats()),
        other => {
            warn!("{} is not a player command", other);
            format!("The command {} is not supported.", other)
        }
    };

    output.with_message(message)
}

/// Read a JSON array of commands
pub fn read_commands(path: &Path) -> Result<Vec<CommandInput>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write responses as a JSON array
pub fn write_outputs<W: Write>(writer: W, outputs: &[CommandOutput], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, outputs)?;
    } else {
        serde_json::to_writer(writer, outputs)?;
    }
    Ok(())
}
