use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use venue_maze_world::WorldConfig;

/// Frames simulated per second of wall-clock play.
pub(crate) const TICKS_PER_SECOND: u64 = 60;

/// Settings read from the optional TOML file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Parameters forwarded to the world.
    pub(crate) world: WorldConfig,
    /// Parameters of the headless run itself.
    pub(crate) run: RunSettings,
}

/// Limits applied to the headless run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct RunSettings {
    /// Frames simulated per game before the autopilot gives up.
    pub(crate) max_ticks: u64,
    /// Number of consecutive mazes to play.
    pub(crate) games: u32,
    /// Tracing filter directive, e.g. `info` or `venue_maze_world=debug`.
    pub(crate) log_level: Option<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_ticks: 30 * 60 * TICKS_PER_SECOND,
            games: 1,
            log_level: None,
        }
    }
}

/// Loads settings from `path`, or returns the defaults when no file was given.
pub(crate) fn load(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(contents: &str) -> Result<Settings> {
    toml::from_str(contents).context("failed to parse config toml contents")
}
