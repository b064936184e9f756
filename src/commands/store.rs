// src/commands/store.rs

//! JSON persistence for command definitions.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::commands::model::CommandDefinition;
use crate::errors::Result;

/// Read the command list from `path`.
///
/// A missing file is not an error: it yields an empty list.
pub fn load_commands(path: impl AsRef<Path>) -> Result<Vec<CommandDefinition>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(?path, "command file not found; starting with no commands");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    let commands: Vec<CommandDefinition> = serde_json::from_str(&contents)?;
    debug!(?path, count = commands.len(), "loaded commands");
    Ok(commands)
}

/// Write the command list to `path` as indented JSON, creating parent
/// directories as needed.
///
/// The JSON goes to a sibling temp file first and is renamed over `path`, so
/// a failed write leaves the previous file untouched.
pub fn save_commands(path: impl AsRef<Path>, commands: &[CommandDefinition]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(commands)?;
    let staging = staging_path(path);
    if let Err(err) = fs::write(&staging, json) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    fs::rename(&staging, path)?;
    debug!(?path, count = commands.len(), "saved commands");
    Ok(())
}

/// `dir/commands.json` -> `dir/.commands.json.tmp`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("commands")));
    name.push(".tmp");
    path.with_file_name(name)
}
