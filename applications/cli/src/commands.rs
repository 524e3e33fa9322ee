/// Command records read from and written to JSON
use crate::library::Filters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use waves_playback::PlaybackStats;

/// One timestamped user command
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInput {
    pub command: String,

    #[serde(default)]
    pub username: Option<String>,

    pub timestamp: u64,

    #[serde(default, rename = "type")]
    pub search_type: Option<String>,

    #[serde(default, skip_serializing)]
    pub filters: Option<Filters>,

    /// 1-based position in the last search results
    #[serde(default)]
    pub item_number: Option<i64>,

    #[serde(default)]
    pub seed: Option<i64>,
}

/// Supported commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Search,
    Select,
    Load,
    PlayPause,
    Repeat,
    Shuffle,
    Forward,
    Backward,
    Next,
    Prev,
    Like,
    ShowPreferredSongs,
    Status,
    SwitchConnectionStatus,
    GetOnlineUsers,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Search => "search",
            CommandKind::Select => "select",
            CommandKind::Load => "load",
            CommandKind::PlayPause => "playPause",
            CommandKind::Repeat => "repeat",
            CommandKind::Shuffle => "shuffle",
            CommandKind::Forward => "forward",
            CommandKind::Backward => "backward",
            CommandKind::Next => "next",
            CommandKind::Prev => "prev",
            CommandKind::Like => "like",
            CommandKind::ShowPreferredSongs => "showPreferredSongs",
            CommandKind::Status => "status",
            CommandKind::SwitchConnectionStatus => "switchConnectionStatus",
            CommandKind::GetOnlineUsers => "getOnlineUsers",
        }
    }

    /// Commands that drive the user's player and are refused while offline
    pub fn needs_online(&self) -> bool {
        !matches!(
            self,
            CommandKind::ShowPreferredSongs
                | CommandKind::Status
                | CommandKind::SwitchConnectionStatus
                | CommandKind::GetOnlineUsers
        )
    }
}

impl FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "search" => CommandKind::Search,
            "select" => CommandKind::Select,
            "load" => CommandKind::Load,
            "playPause" => CommandKind::PlayPause,
            "repeat" => CommandKind::Repeat,
            "shuffle" => CommandKind::Shuffle,
            "forward" => CommandKind::Forward,
            "backward" => CommandKind::Backward,
            "next" => CommandKind::Next,
            "prev" => CommandKind::Prev,
            "like" => CommandKind::Like,
            "showPreferredSongs" => CommandKind::ShowPreferredSongs,
            "status" => CommandKind::Status,
            "switchConnectionStatus" => CommandKind::SwitchConnectionStatus,
            "getOnlineUsers" => CommandKind::GetOnlineUsers,
            other => return Err(other.to_string()),
        };
        Ok(kind)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response to one command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandOutput {
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    pub timestamp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<PlaybackStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<String>>,
}

impl CommandOutput {
    /// Empty response echoing the command header
    pub fn for_input(input: &CommandInput) -> Self {
        Self {
            command: input.command.clone(),
            user: input.username.clone(),
            timestamp: input.timestamp,
            message: None,
            results: None,
            stats: None,
            result: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_results(mut self, results: Vec<String>) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_stats(mut self, stats: PlaybackStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_result(mut self, result: Vec<String>) -> Self {
        self.result = Some(result);
        self
    }

    /// Drop the user field, for commands that are not about one user
    pub fn without_user(mut self) -> Self {
        self.user = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_command_input() {
        let input: CommandInput = serde_json::from_value(json!({
            "command": "search",
            "username": "alice",
            "timestamp": 10,
            "type": "song",
            "filters": { "name": "Sha" }
        }))
        .unwrap();

        assert_eq!(input.search_type.as_deref(), Some("song"));
        assert_eq!(input.filters.unwrap().name.as_deref(), Some("Sha"));
        assert_eq!(input.item_number, None);
    }

    #[test]
    fn accepts_negative_numbers() {
        let inputs: Vec<CommandInput> = serde_json::from_str(
            r#"[
                {"command":"shuffle","username":"alice","timestamp":3,"seed":-42},
                {"command":"select","username":"alice","timestamp":4,"itemNumber":-1}
            ]"#,
        )
        .unwrap();

        assert_eq!(inputs[0].seed, Some(-42));
        assert_eq!(inputs[1].item_number, Some(-1));
    }

    #[test]
    fn command_names_round_trip() {
        for name in ["playPause", "showPreferredSongs", "switchConnectionStatus"] {
            let kind: CommandKind = name.parse().unwrap();
            assert_eq!(kind.as_str(), name);
        }
        assert_eq!("dance".parse::<CommandKind>(), Err("dance".to_string()));
    }

    #[test]
    fn output_skips_absent_fields() {
        let input = CommandInput {
            command: "getOnlineUsers".to_string(),
            timestamp: 5,
            ..Default::default()
        };
        let output = CommandOutput::for_input(&input).with_result(vec!["alice".to_string()]);

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({ "command": "getOnlineUsers", "timestamp": 5, "result": ["alice"] })
        );
    }
}
