//! Error types for playback sessions

use crate::types::SourceKind;
use thiserror::Error;

/// Playback errors
///
/// Every variant is an expected, user-facing outcome local to one command
/// and one session. None of them leaves the session in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The command needs a loaded source
    #[error("Nothing loaded")]
    NothingLoaded,

    /// Load was requested without a prior selection
    #[error("Nothing selected")]
    NoSelection,

    /// The load target has no entries
    #[error("Collection is empty")]
    EmptyCollection,

    /// The command is not valid for the loaded source kind
    #[error("Command not supported for source kind: {0}")]
    WrongSourceKind(SourceKind),

    /// No session is registered for this user
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// A session is already registered for this user
    #[error("User already registered: {0}")]
    DuplicateUser(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
