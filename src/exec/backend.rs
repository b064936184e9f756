// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The orchestrator talks to a `ProcessBackend` instead of spawning processes
//! itself, so tests can swap in a fake that records requests and scripts
//! results without touching the operating system.

use std::future::Future;
use std::pin::Pin;

use crate::exec::cancel::CancelSignal;
use crate::exec::runner::ProcessRunner;

/// One external program invocation.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Name of the command this invocation belongs to.
    pub command: String,
    pub executable: String,
    /// Fully expanded argument string.
    pub arguments: String,
    pub cancel: CancelSignal,
}

/// How a single invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// The process exited on its own with this code (`-1` when the OS
    /// reported none).
    Exited(i32),
    /// The process was force-killed after cancellation.
    Killed,
    /// The process could not be started.
    SpawnError(String),
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Exited(0))
    }
}

pub trait ProcessBackend: Send + Sync + 'static {
    /// Run the request to completion or until it is cancelled.
    ///
    /// Implementations never fail: every outcome is a [`RunResult`].
    fn run(&self, request: ProcessRequest) -> Pin<Box<dyn Future<Output = RunResult> + Send + '_>>;
}

impl ProcessBackend for ProcessRunner {
    fn run(&self, request: ProcessRequest) -> Pin<Box<dyn Future<Output = RunResult> + Send + '_>> {
        Box::pin(self.execute(request))
    }
}
