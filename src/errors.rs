// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every variant maps onto one of the user-facing error classes reported in
//! the log: usage errors, spawn errors, persistence errors and configuration
//! errors. Runtime failures of spawned programs (nonzero exit, `[ERR]` lines)
//! are not errors at this level; they only ever surface as log lines.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmdeckError {
    #[error("Executable not found at '{0}'")]
    MissingExecutable(String),

    #[error("'{0}' requires files but the staging area is empty")]
    FilesRequired(String),

    #[error("failed to start '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("A command named '{0}' already exists")]
    DuplicateCommand(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CmdeckError {
    /// Text prefix used when the error is written to the log.
    ///
    /// Usage and spawn errors share a severity (both are error-styled) but
    /// keep different prefixes so they can be told apart.
    pub fn log_prefix(&self) -> &'static str {
        match self {
            CmdeckError::MissingExecutable(_) | CmdeckError::FilesRequired(_) => "Usage error",
            CmdeckError::Spawn { .. } => "Exception",
            CmdeckError::IoError(_) | CmdeckError::JsonError(_) => "Persistence error",
            CmdeckError::ConfigError(_) | CmdeckError::TomlError(_) => "Configuration error",
            CmdeckError::UnknownCommand(_) | CmdeckError::DuplicateCommand(_) => "Command error",
            CmdeckError::Other(_) => "Error",
        }
    }

    /// The full line written to the log for this error.
    pub fn log_line(&self) -> String {
        match self {
            // The message already starts with its own class name.
            CmdeckError::ConfigError(_) => self.to_string(),
            _ => format!("{}: {}", self.log_prefix(), self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CmdeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_and_spawn_errors_carry_distinct_prefixes() {
        let usage = CmdeckError::FilesRequired("Convert".to_string());
        let spawn = CmdeckError::Spawn {
            executable: "/bin/nope".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };

        assert!(usage.log_line().starts_with("Usage error: "));
        assert!(spawn.log_line().starts_with("Exception: "));
        assert_ne!(usage.log_prefix(), spawn.log_prefix());
    }

    #[test]
    fn config_error_is_not_double_prefixed() {
        let err = CmdeckError::ConfigError("[log].batch_size must be >= 1".to_string());
        assert_eq!(
            err.log_line(),
            "Configuration error: [log].batch_size must be >= 1"
        );
    }
}
