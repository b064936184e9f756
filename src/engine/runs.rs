// src/engine/runs.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::debug;

use crate::exec::CancelSignal;

/// One in-flight run of a command.
#[derive(Debug, Clone)]
pub struct RunHandle {
    pub command_name: String,
    pub cancel: CancelSignal,
    pub started_at: Instant,
    /// Distinguishes successive runs of the same command name.
    pub run_id: u64,
}

/// Result of a start request.
#[derive(Debug, Clone)]
pub enum Claim {
    /// No run was live; this fresh handle is now registered.
    Started(RunHandle),
    /// A run was already live and has been asked to stop.
    StopRequested(RunHandle),
}

/// Live runs keyed by command name.
#[derive(Debug, Default)]
pub struct RunTable {
    runs: Mutex<HashMap<String, RunHandle>>,
    next_id: AtomicU64,
}

impl RunTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle decision for `name`, made under the table lock: either
    /// register a new handle or cancel the live one.
    pub fn claim_or_cancel(&self, name: &str) -> Claim {
        let mut runs = self.runs.lock();
        if let Some(existing) = runs.get(name) {
            existing.cancel.cancel();
            debug!(command = %name, run_id = existing.run_id, "cancel requested for live run");
            return Claim::StopRequested(existing.clone());
        }

        let handle = RunHandle {
            command_name: name.to_string(),
            cancel: CancelSignal::new(),
            started_at: Instant::now(),
            run_id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        runs.insert(name.to_string(), handle.clone());
        Claim::Started(handle)
    }

    /// Remove the handle for `name` if it still belongs to run `run_id`.
    pub fn release(&self, name: &str, run_id: u64) -> bool {
        let mut runs = self.runs.lock();
        match runs.get(name) {
            Some(handle) if handle.run_id == run_id => {
                runs.remove(name);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&self, name: &str) -> bool {
        match self.runs.lock().get(name) {
            Some(handle) => {
                handle.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) -> usize {
        let runs = self.runs.lock();
        for handle in runs.values() {
            handle.cancel.cancel();
        }
        runs.len()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.runs.lock().contains_key(name)
    }

    pub fn handle(&self, name: &str) -> Option<RunHandle> {
        self.runs.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.runs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.lock().is_empty()
    }
}
