// src/config/validate.rs

use crate::config::model::{RawSettings, Settings};
use crate::errors::{CmdeckError, Result};

/// Largest accepted poll interval; keeps cancellation latency bounded.
pub const MAX_POLL_INTERVAL_MS: u64 = 150;

impl TryFrom<RawSettings> for Settings {
    type Error = CmdeckError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_raw_settings(&raw)?;
        Ok(Settings::new_unchecked(raw.log, raw.run, raw.storage))
    }
}

fn validate_raw_settings(raw: &RawSettings) -> Result<()> {
    validate_log_section(raw)?;
    validate_run_section(raw)?;
    validate_storage_section(raw)?;
    Ok(())
}

fn validate_log_section(raw: &RawSettings) -> Result<()> {
    if raw.log.history_cap == 0 {
        return Err(CmdeckError::ConfigError(
            "[log].history_cap must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.log.batch_size == 0 {
        return Err(CmdeckError::ConfigError(
            "[log].batch_size must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.log.flush_interval_ms == 0 {
        return Err(CmdeckError::ConfigError(
            "[log].flush_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_run_section(raw: &RawSettings) -> Result<()> {
    let poll = raw.run.poll_interval_ms;
    if poll == 0 || poll > MAX_POLL_INTERVAL_MS {
        return Err(CmdeckError::ConfigError(format!(
            "[run].poll_interval_ms must be between 1 and {MAX_POLL_INTERVAL_MS} (got {poll})"
        )));
    }
    Ok(())
}

fn validate_storage_section(raw: &RawSettings) -> Result<()> {
    if raw.storage.commands_file.as_os_str().is_empty() {
        return Err(CmdeckError::ConfigError(
            "[storage].commands_file must not be empty".to_string(),
        ));
    }
    Ok(())
}
