// src/exec/runner.rs

//! Runs a single external program and streams its output into the log.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::errors::CmdeckError;
use crate::exec::active::ActiveProcessSet;
use crate::exec::backend::{ProcessRequest, RunResult};
use crate::exec::cancel::CancelSignal;
use crate::exec::kill::kill_process_tree;
use crate::log::LogHandle;
use crate::types::LogColor;

/// How long to wait for the output readers after the process is gone.
const READER_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
enum Stream {
    Out,
    Err,
}

/// Production [`ProcessBackend`](crate::exec::ProcessBackend).
///
/// Output capture is decided once per invocation: when logging is disabled
/// at spawn time, stdout and stderr go to the null device and no reader
/// tasks exist.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    log: LogHandle,
    active: Arc<ActiveProcessSet>,
    poll_interval: Duration,
}

impl ProcessRunner {
    pub fn new(log: LogHandle, active: Arc<ActiveProcessSet>, poll_interval: Duration) -> Self {
        Self {
            log,
            active,
            poll_interval,
        }
    }

    pub fn active(&self) -> &Arc<ActiveProcessSet> {
        &self.active
    }

    pub async fn execute(&self, request: ProcessRequest) -> RunResult {
        let ProcessRequest {
            command,
            executable,
            arguments,
            cancel,
        } = request;

        self.log.emit_with(None, false, || {
            format!("Executing: {executable} {arguments}").trim_end().to_string()
        });

        let capture = self.log.is_enabled();
        let slot = self.active.reserve(&command);

        let mut child = match build_command(&executable, &arguments, capture).spawn() {
            Ok(child) => child,
            Err(source) => {
                let err = CmdeckError::Spawn {
                    executable: executable.clone(),
                    source,
                };
                warn!(command = %command, error = %err, "failed to spawn process");
                self.log.error(err.log_line());
                return RunResult::SpawnError(err.to_string());
            }
        };

        if let Some(pid) = child.id() {
            slot.attach(pid);
            info!(command = %command, pid, capture, "process started");
        }

        let mut readers = Vec::new();
        if capture {
            if let Some(stdout) = child.stdout.take() {
                readers.push(spawn_reader(stdout, self.log.clone(), Stream::Out));
            }
            if let Some(stderr) = child.stderr.take() {
                readers.push(spawn_reader(stderr, self.log.clone(), Stream::Err));
            }
        }

        let result = self.wait(&mut child, &cancel).await;
        info!(command = %command, result = ?result, "process finished");

        for reader in readers {
            if tokio::time::timeout(READER_GRACE, reader).await.is_err() {
                debug!(command = %command, "output reader still open after exit; detaching");
            }
        }

        drop(slot);
        result
    }

    /// Wait for exit, checking the cancel signal every poll interval.
    async fn wait(&self, child: &mut Child, cancel: &CancelSignal) -> RunResult {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                status = child.wait() => {
                    return match status {
                        // Killed from outside, e.g. by a shutdown, before the
                        // next poll noticed the cancellation.
                        Ok(status) if cancel.is_cancelled() && !status.success() => RunResult::Killed,
                        Ok(status) => RunResult::Exited(status.code().unwrap_or(-1)),
                        Err(err) => {
                            self.log.error(format!("Exception: {err}"));
                            RunResult::SpawnError(err.to_string())
                        }
                    };
                }
                _ = ticker.tick() => {
                    if cancel.is_cancelled() {
                        terminate(child).await;
                        return RunResult::Killed;
                    }
                }
            }
        }
    }
}

/// Kill the process tree and reap the child. A child that has already been
/// reaped has no pid, so this does nothing for it.
async fn terminate(child: &mut Child) {
    if let Some(pid) = child.id() {
        kill_process_tree(pid);
    }
    if let Err(err) = child.kill().await {
        debug!(error = %err, "kill after group signal failed");
    }
}

fn build_command(executable: &str, arguments: &str, capture: bool) -> Command {
    let mut cmd = Command::new(executable);

    #[cfg(windows)]
    {
        if !arguments.is_empty() {
            cmd.raw_arg(arguments);
        }
    }
    #[cfg(not(windows))]
    {
        cmd.args(crate::template::split_arguments(arguments));
    }

    let output = || if capture { Stdio::piped() } else { Stdio::null() };
    cmd.stdin(Stdio::null())
        .stdout(output())
        .stderr(output())
        .kill_on_drop(true);

    // Group leader, so a cancel reaches every descendant.
    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}

fn spawn_reader<R>(stream: R, log: LogHandle, kind: Stream) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    let line = text.trim_end_matches(['\n', '\r']);
                    match kind {
                        Stream::Out => log.emit(format!("[OUT] {line}")),
                        Stream::Err => {
                            log.emit_styled(format!("[ERR] {line}"), Some(LogColor::ERROR), true)
                        }
                    }
                }
                Err(err) => {
                    debug!(error = %err, stream = ?kind, "output reader failed");
                    break;
                }
            }
        }
    })
}
