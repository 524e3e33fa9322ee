/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use waves_playback::PlaybackConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Fallback filter when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSettings {
    /// Pretty-print the JSON responses
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl CliConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables use the `WAVES_` prefix and `__` between
    /// section and key, e.g. `WAVES_PLAYBACK__SKIP_STEP_SECS=30`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file not found at {:?}",
                    path
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("WAVES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.skip_step_secs == 0 {
            return Err(CliError::Config(
                "Skip step must be at least one second (set WAVES_PLAYBACK__SKIP_STEP_SECS)"
                    .to_string(),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(CliError::Config("Log filter must not be empty".to_string()));
        }

        Ok(())
    }
}

// Default values
fn default_filter() -> String {
    "waves_cli=info,waves_playback=info".to_string()
}

fn default_pretty() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}
