// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] spawns one external program, captures its output as log
//!   lines and kills it when its run is cancelled.
//! - [`backend`] provides the `ProcessBackend` trait the orchestrator talks
//!   to; [`ProcessRunner`] is the production implementation and tests can
//!   substitute a fake one.
//! - [`active`] tracks every live process so shutdown can kill them all.
//! - [`cancel`] and [`kill`] hold the cancellation flag and the
//!   platform-specific process-tree kill.

pub mod active;
pub mod backend;
pub mod cancel;
pub mod kill;
pub mod runner;

pub use active::{ActiveProcess, ActiveProcessSet, ProcessSlot};
pub use backend::{ProcessBackend, ProcessRequest, RunResult};
pub use cancel::CancelSignal;
pub use kill::kill_process_tree;
pub use runner::ProcessRunner;
