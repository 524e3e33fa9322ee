//! Virtual clock and the sessions it drives
//!
//! There is no background ticking. Time moves only when the caller hands
//! the scheduler a new timestamp, and then every online session advances by
//! the same delta. Offline sessions are frozen and never receive the time
//! they missed.

use crate::{
    error::{PlaybackError, Result},
    session::PlaybackSession,
    types::PlaybackConfig,
};
use tracing::debug;

#[derive(Debug, Clone)]
struct SessionEntry {
    user: String,
    online: bool,
    session: PlaybackSession,
}

/// Owner of the virtual clock and every user's playback session
///
/// Sessions are kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    config: PlaybackConfig,
    entries: Vec<SessionEntry>,
}

impl Scheduler {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            now: 0,
            config,
            entries: Vec::new(),
        }
    }

    /// Current virtual timestamp
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Create an empty, online session for a user
    pub fn register(&mut self, user: impl Into<String>) -> Result<()> {
        let user = user.into();
        if self.position(&user).is_some() {
            return Err(PlaybackError::DuplicateUser(user));
        }

        debug!("Registered session for {}", user);
        self.entries.push(SessionEntry {
            user,
            online: true,
            session: PlaybackSession::new(self.config),
        });
        Ok(())
    }

    /// Remove a user's session, returning it
    pub fn unregister(&mut self, user: &str) -> Result<PlaybackSession> {
        let index = self
            .position(user)
            .ok_or_else(|| PlaybackError::UnknownUser(user.to_string()))?;
        Ok(self.entries.remove(index).session)
    }

    pub fn contains(&self, user: &str) -> bool {
        self.position(user).is_some()
    }

    pub fn session(&self, user: &str) -> Option<&PlaybackSession> {
        self.entries
            .iter()
            .find(|entry| entry.user == user)
            .map(|entry| &entry.session)
    }

    pub fn session_mut(&mut self, user: &str) -> Option<&mut PlaybackSession> {
        self.entries
            .iter_mut()
            .find(|entry| entry.user == user)
            .map(|entry| &mut entry.session)
    }

    pub fn is_online(&self, user: &str) -> Result<bool> {
        self.entries
            .iter()
            .find(|entry| entry.user == user)
            .map(|entry| entry.online)
            .ok_or_else(|| PlaybackError::UnknownUser(user.to_string()))
    }

    /// Flip a user between online and offline, returning the new status
    pub fn toggle_connection(&mut self, user: &str) -> Result<bool> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.user == user)
            .ok_or_else(|| PlaybackError::UnknownUser(user.to_string()))?;

        entry.online = !entry.online;
        debug!("{} is now {}", user, if entry.online { "online" } else { "offline" });
        Ok(entry.online)
    }

    /// Online users in registration order
    pub fn online_users(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.online)
            .map(|entry| entry.user.as_str())
            .collect()
    }

    /// All users in registration order
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.user.as_str())
    }

    /// Move the clock to `timestamp`, advancing every online session
    ///
    /// Timestamps at or before the current one leave everything unchanged.
    /// Returns the number of seconds applied.
    pub fn advance_to(&mut self, timestamp: u64) -> u64 {
        if timestamp <= self.now {
            return 0;
        }

        let delta = timestamp - self.now;
        self.now = timestamp;

        // Sessions count in u32 seconds; very large gaps are applied in chunks
        let mut left = delta;
        while left > 0 {
            let step = u32::try_from(left).unwrap_or(u32::MAX);
            for entry in self.entries.iter_mut().filter(|entry| entry.online) {
                entry.session.advance(step);
            }
            left -= u64::from(step);
        }

        debug!("Clock advanced by {}s to {}", delta, timestamp);
        delta
    }

    fn position(&self, user: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.user == user)
    }
}
