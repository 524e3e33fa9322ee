/// Common test utilities for CLI tests
use serde_json::{json, Value};
use waves_cli::{CommandInput, CommandOutput, CommandRunner, Filters, Library};
use waves_playback::PlaybackConfig;

/// Library used by most tests
pub fn library_json() -> Value {
    json!({
        "songs": [
            { "name": "Solar Wind", "duration": 120, "album": "Orbit", "genre": "Pop", "artist": "Nova" },
            { "name": "Solar Flare", "duration": 100, "album": "Orbit", "genre": "Pop", "artist": "Nova" },
            { "name": "Moonlight", "duration": 200, "genre": "Jazz", "artist": "Luna" }
        ],
        "podcasts": [
            { "name": "Deep Dive", "owner": "host", "episodes": [
                { "name": "Intro", "duration": 600 },
                { "name": "Part Two", "duration": 300 }
            ] }
        ],
        "playlists": [
            { "name": "Chill", "owner": "alice", "songs": ["Moonlight", "Solar Wind"] },
            { "name": "Nothing", "owner": "bob", "songs": [] }
        ],
        "users": [ { "username": "alice" }, { "username": "bob" } ]
    })
}

pub fn create_runner() -> CommandRunner {
    create_runner_with(PlaybackConfig::default())
}

pub fn create_runner_with(config: PlaybackConfig) -> CommandRunner {
    let input = serde_json::from_value(library_json()).unwrap();
    let library = Library::from_input(input).unwrap();
    CommandRunner::new(library, config).unwrap()
}

pub fn cmd(command: &str, user: &str, timestamp: u64) -> CommandInput {
    CommandInput {
        command: command.to_string(),
        username: Some(user.to_string()),
        timestamp,
        ..Default::default()
    }
}

pub fn search(user: &str, timestamp: u64, search_type: &str, name: &str) -> CommandInput {
    CommandInput {
        search_type: Some(search_type.to_string()),
        filters: Some(Filters {
            name: Some(name.to_string()),
            ..Default::default()
        }),
        ..cmd("search", user, timestamp)
    }
}

pub fn select(user: &str, timestamp: u64, item_number: i64) -> CommandInput {
    CommandInput {
        item_number: Some(item_number),
        ..cmd("select", user, timestamp)
    }
}

/// Search, select the first result, load it and start playing
pub fn play(runner: &mut CommandRunner, user: &str, timestamp: u64, search_type: &str, name: &str) {
    let outputs = runner.run(&[
        search(user, timestamp, search_type, name),
        select(user, timestamp, 1),
        cmd("load", user, timestamp),
        cmd("playPause", user, timestamp),
    ]);
    assert_eq!(message(&outputs[2]), "Playback loaded successfully.");
    assert_eq!(message(&outputs[3]), "Playback resumed successfully.");
}

pub fn message(output: &CommandOutput) -> &str {
    output.message.as_deref().unwrap_or_default()
}
