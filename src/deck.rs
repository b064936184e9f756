// src/deck.rs

//! The core facade a front end (CLI, GUI) drives.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::commands::{CommandDefinition, CommandRegistry};
use crate::config::Settings;
use crate::engine::{Orchestrator, RunEvent, Toggle};
use crate::errors::{CmdeckError, Result};
use crate::exec::{ActiveProcessSet, ProcessBackend, ProcessRunner};
use crate::log::LogHandle;
use crate::types::LogColor;

/// Owns the command registry, the orchestrator and the log handle.
///
/// Log entries themselves are observed through the sink given to the
/// [`LogPipeline`](crate::log::LogPipeline); run progress and state changes
/// through [`subscribe`](Self::subscribe).
#[derive(Debug)]
pub struct Deck {
    settings: Settings,
    registry: CommandRegistry,
    orchestrator: Orchestrator,
    log: LogHandle,
}

impl Deck {
    /// Deck backed by real processes.
    pub fn new(settings: Settings, log: LogHandle) -> Self {
        let active = Arc::new(ActiveProcessSet::new());
        let runner = ProcessRunner::new(log.clone(), Arc::clone(&active), settings.run.poll_interval());
        Self::with_backend(settings, log, Arc::new(runner), active)
    }

    /// Deck with a custom process backend, e.g. a fake in tests.
    pub fn with_backend(
        settings: Settings,
        log: LogHandle,
        backend: Arc<dyn ProcessBackend>,
        active: Arc<ActiveProcessSet>,
    ) -> Self {
        let orchestrator = Orchestrator::new(backend, active, log.clone(), settings.run.progress_updates);
        Self {
            settings,
            registry: CommandRegistry::new(),
            orchestrator,
            log,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn log(&self) -> &LogHandle {
        &self.log
    }

    pub fn commands_file(&self) -> &Path {
        &self.settings.storage.commands_file
    }

    pub fn list_commands(&self) -> Vec<Arc<CommandDefinition>> {
        self.registry.list()
    }

    /// Start the named command over `files`, or stop it if it is running.
    pub fn start_or_toggle(&self, name: &str, files: Vec<String>) -> Result<Toggle> {
        let Some(command) = self.registry.get(name) else {
            let err = CmdeckError::UnknownCommand(name.to_string());
            self.log.error(err.log_line());
            return Err(err);
        };
        Ok(self.orchestrator.start(command, files))
    }

    /// Write the registry to the commands file.
    pub fn save_commands(&self) -> Result<usize> {
        let path = self.commands_file().to_path_buf();
        match self.registry.save_to(&path) {
            Ok(count) => {
                info!(count, ?path, "commands saved");
                self.log
                    .emit_styled("Settings saved successfully.", Some(LogColor::SUCCESS), false);
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, ?path, "saving commands failed");
                self.log.error(format!("Error saving settings: {err}"));
                Err(err)
            }
        }
    }

    /// Replace the registry with the commands file. A missing file yields an
    /// empty list; a failed load keeps the current list.
    pub fn load_commands(&self) -> Result<usize> {
        let path: PathBuf = self.commands_file().to_path_buf();
        self.registry.load_from(&path).inspect_err(|err| {
            warn!(error = %err, ?path, "loading commands failed");
            self.log.error(format!("Error loading settings: {err}"));
        })
    }

    pub fn set_logging_enabled(&self, enabled: bool) {
        self.log.set_enabled(enabled);
    }

    pub fn set_logging_paused(&self, paused: bool) {
        self.log.set_paused(paused);
    }

    pub fn set_filter(&self, text: &str, active: bool) {
        self.log.set_filter(text, active);
    }

    pub fn clear_log(&self) {
        self.log.clear();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.orchestrator.subscribe()
    }

    /// Cancel every run and kill every process still alive.
    pub fn shutdown(&self) {
        self.orchestrator.shutdown();
    }
}
