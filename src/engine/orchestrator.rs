// src/engine/orchestrator.rs

use std::path::Path;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::commands::CommandDefinition;
use crate::engine::progress::ProgressThrottle;
use crate::engine::runs::{Claim, RunHandle, RunTable};
use crate::engine::{RunEvent, RunState};
use crate::errors::CmdeckError;
use crate::exec::{ActiveProcessSet, CancelSignal, ProcessBackend, ProcessRequest, RunResult};
use crate::log::LogHandle;
use crate::template::{batch_stamp, expand};
use crate::types::LogColor;

const EVENT_CAPACITY: usize = 256;

/// Outcome of [`Orchestrator::start`].
#[derive(Debug)]
pub enum Toggle {
    Started(RunTicket),
    /// The command was already running; its run has been asked to stop.
    StopRequested,
}

/// A started run. Awaiting it yields the terminal state.
#[derive(Debug)]
pub struct RunTicket {
    handle: RunHandle,
    task: JoinHandle<RunState>,
}

impl RunTicket {
    pub fn handle(&self) -> &RunHandle {
        &self.handle
    }

    pub async fn wait(self) -> RunState {
        match self.task.await {
            Ok(state) => state,
            Err(err) => {
                warn!(command = %self.handle.command_name, error = %err, "run task did not finish cleanly");
                RunState::Failed
            }
        }
    }
}

/// Starts, stops and sequences command runs.
///
/// Cheap to clone; clones share the run table, backend and event channel.
#[derive(Clone)]
pub struct Orchestrator {
    runs: Arc<RunTable>,
    backend: Arc<dyn ProcessBackend>,
    active: Arc<ActiveProcessSet>,
    log: LogHandle,
    events: broadcast::Sender<RunEvent>,
    progress_updates: usize,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("runs", &self.runs)
            .field("active", &self.active)
            .field("progress_updates", &self.progress_updates)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn ProcessBackend>,
        active: Arc<ActiveProcessSet>,
        log: LogHandle,
        progress_updates: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            runs: Arc::new(RunTable::new()),
            backend,
            active,
            log,
            events,
            progress_updates,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.events.subscribe()
    }

    pub fn runs(&self) -> &RunTable {
        &self.runs
    }

    pub fn active(&self) -> &Arc<ActiveProcessSet> {
        &self.active
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.runs.is_running(name)
    }

    /// Start `command` over `files`, or stop it if it is already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, command: Arc<CommandDefinition>, files: Vec<String>) -> Toggle {
        match self.runs.claim_or_cancel(&command.name) {
            Claim::StopRequested(handle) => {
                info!(command = %command.name, run_id = handle.run_id, "stop requested");
                self.log
                    .emit_styled(format!("Stopping: {}", command.name), Some(LogColor::WARNING), false);
                Toggle::StopRequested
            }
            Claim::Started(handle) => {
                info!(command = %command.name, run_id = handle.run_id, files = files.len(), "run started");
                let _ = self.events.send(RunEvent::StateChanged {
                    command: command.name.clone(),
                    state: RunState::Running,
                });

                let guard = RunGuard {
                    runs: Arc::clone(&self.runs),
                    log: self.log.clone(),
                    events: self.events.clone(),
                    handle: handle.clone(),
                    state: RunState::Failed,
                };
                let this = self.clone();
                let task = tokio::spawn(async move { this.run_batch(guard, command, files).await });

                Toggle::Started(RunTicket { handle, task })
            }
        }
    }

    /// Signal the live run of `name`, if any. Returns whether one existed.
    pub fn stop(&self, name: &str) -> bool {
        self.runs.cancel(name)
    }

    /// Cancel every run and force-kill every active process.
    pub fn shutdown(&self) {
        let runs = self.runs.cancel_all();
        let processes = self.active.kill_all();
        info!(runs, processes, "orchestrator shutdown");
    }

    async fn run_batch(
        &self,
        mut guard: RunGuard,
        command: Arc<CommandDefinition>,
        files: Vec<String>,
    ) -> RunState {
        let state = self.run_batch_inner(&command, &files, &guard.handle.cancel).await;
        guard.state = state;
        state
    }

    async fn run_batch_inner(
        &self,
        command: &CommandDefinition,
        files: &[String],
        cancel: &CancelSignal,
    ) -> RunState {
        self.log.emit_styled(
            format!("--- Starting execution: {} ---", command.name),
            Some(LogColor::BANNER),
            true,
        );

        if !Path::new(&command.executable_path).is_file() {
            let err = CmdeckError::MissingExecutable(command.executable_path.clone());
            warn!(command = %command.name, error = %err, "pre-flight check failed");
            self.log.error(err.log_line());
            return RunState::Failed;
        }

        if files.is_empty() {
            if command.requires_files() {
                let err = CmdeckError::FilesRequired(command.name.clone());
                warn!(command = %command.name, "file placeholder with no files staged");
                self.log.error(err.log_line());
                return RunState::Failed;
            }

            // Nothing to substitute: the template runs exactly as written.
            let arguments = command.argument_template.clone();
            return match self.invoke(command, arguments, cancel).await {
                RunResult::Killed => RunState::Cancelled,
                _ => RunState::Completed,
            };
        }

        let stamp = batch_stamp();
        let total = files.len();
        let throttle = ProgressThrottle::new(total, self.progress_updates);

        for (index, file) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(command = %command.name, remaining = total - index, "batch cancelled between files");
                return RunState::Cancelled;
            }

            let current = index + 1;
            self.log
                .emit_styled(format!("[{current}/{total}] {file}"), Some(LogColor::PROGRESS), false);
            if throttle.should_emit(current) {
                let _ = self.events.send(RunEvent::Progress {
                    command: command.name.clone(),
                    current,
                    total,
                });
            }

            let arguments = expand(&command.argument_template, file, &stamp);
            if self.invoke(command, arguments, cancel).await == RunResult::Killed {
                return RunState::Cancelled;
            }
        }

        RunState::Completed
    }

    /// Run one process and report its exit. Only `Killed` changes the
    /// course of the batch.
    async fn invoke(&self, command: &CommandDefinition, arguments: String, cancel: &CancelSignal) -> RunResult {
        let result = self
            .backend
            .run(ProcessRequest {
                command: command.name.clone(),
                executable: command.executable_path.clone(),
                arguments,
                cancel: cancel.clone(),
            })
            .await;

        if let RunResult::Exited(code) = result {
            if code != 0 {
                self.log.emit_styled(
                    format!("Process exited with code {code}"),
                    Some(LogColor::WARNING),
                    false,
                );
            }
        }
        result
    }
}

/// Cleanup for one run. Dropping it, on any path, removes the run from the
/// table, logs the terminal banner and publishes the final state.
struct RunGuard {
    runs: Arc<RunTable>,
    log: LogHandle,
    events: broadcast::Sender<RunEvent>,
    handle: RunHandle,
    state: RunState,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let name = &self.handle.command_name;
        self.runs.release(name, self.handle.run_id);

        let (label, color) = match self.state {
            RunState::Completed => ("Finished", LogColor::SUCCESS),
            RunState::Cancelled => ("Cancelled", LogColor::WARNING),
            _ => ("Failed", LogColor::ERROR),
        };
        self.log
            .emit_styled(format!("--- {label}: {name} ---"), Some(color), true);
        info!(
            command = %name,
            run_id = self.handle.run_id,
            state = %self.state,
            elapsed = ?self.handle.started_at.elapsed(),
            "run finished"
        );

        let _ = self.events.send(RunEvent::StateChanged {
            command: name.clone(),
            state: self.state,
        });
        let _ = self.events.send(RunEvent::StateChanged {
            command: name.clone(),
            state: RunState::Idle,
        });
    }
}
