// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::ColorMode;

/// Settings as read from a TOML file, before validation.
///
/// ```toml
/// [log]
/// enabled = true
/// history_cap = 100000
/// batch_size = 500
/// flush_interval_ms = 50
///
/// [run]
/// poll_interval_ms = 100
///
/// [storage]
/// commands_file = "commands.json"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSettings {
    #[serde(default)]
    pub log: LogSection,

    #[serde(default)]
    pub run: RunSection,

    #[serde(default)]
    pub storage: StorageSection,
}

/// `[log]` section: the log pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    /// When false, nothing is logged and process output is not captured.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of entries kept in the history store.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Maximum number of entries drained per flush tick.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// Rendered lines allowed above `history_cap` before the sink is trimmed.
    #[serde(default = "default_trim_slack")]
    pub trim_slack: usize,

    #[serde(default)]
    pub color: ColorMode,
}

impl LogSection {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            enabled: true,
            history_cap: default_history_cap(),
            batch_size: default_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
            trim_slack: default_trim_slack(),
            color: ColorMode::default(),
        }
    }
}

/// `[run]` section: process execution.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// How often a running process is checked for cancellation.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound on progress status updates per batch; larger batches
    /// only report every Nth file (plus the first and last).
    #[serde(default = "default_progress_updates")]
    pub progress_updates: usize,
}

impl RunSection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            progress_updates: default_progress_updates(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Where command definitions are persisted, relative to the working
    /// directory unless absolute.
    #[serde(default = "default_commands_file")]
    pub commands_file: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            commands_file: default_commands_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_history_cap() -> usize {
    100_000
}

fn default_batch_size() -> usize {
    500
}

fn default_flush_interval_ms() -> u64 {
    50
}

fn default_trim_slack() -> usize {
    5_000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_progress_updates() -> usize {
    100
}

fn default_commands_file() -> PathBuf {
    PathBuf::from("commands.json")
}

/// Validated settings.
///
/// Can only be obtained through `TryFrom<RawSettings>` (see `validate.rs`) or
/// `Default`, so the bounds checked there always hold.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub log: LogSection,
    pub run: RunSection,
    pub storage: StorageSection,
}

impl Settings {
    pub(crate) fn new_unchecked(log: LogSection, run: RunSection, storage: StorageSection) -> Self {
        Self { log, run, storage }
    }
}
