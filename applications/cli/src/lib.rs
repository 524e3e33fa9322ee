//! Waves CLI Library
//!
//! Replays a JSON list of timestamped user commands (search, select, load,
//! player controls, likes, connection status) against per-user playback
//! sessions and produces one JSON response per command.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod runner;

// Re-export commonly used types for convenience
pub use commands::{CommandInput, CommandKind, CommandOutput};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use library::{Filters, Library, SearchType};
pub use runner::{read_commands, write_outputs, CommandRunner};
