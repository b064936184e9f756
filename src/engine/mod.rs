// src/engine/mod.rs

//! Run orchestration.
//!
//! - [`runs`] is the live-run table: at most one run per command name, and
//!   the start-or-stop decision is made under its lock.
//! - [`orchestrator`] drives one batch per run, strictly one file at a time,
//!   through a [`ProcessBackend`](crate::exec::ProcessBackend).
//! - [`progress`] rate-limits progress events for large batches.

use std::fmt;

/// Lifecycle of a command name: `Idle → Running → terminal → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Cancelled => "cancelled",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Status updates published to subscribers (progress bars, run buttons).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Progress {
        command: String,
        current: usize,
        total: usize,
    },
    StateChanged {
        command: String,
        state: RunState,
    },
}

pub mod orchestrator;
pub mod progress;
pub mod runs;

pub use orchestrator::{Orchestrator, RunTicket, Toggle};
pub use progress::ProgressThrottle;
pub use runs::{Claim, RunHandle, RunTable};
