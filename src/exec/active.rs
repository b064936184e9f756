// src/exec/active.rs

//! Registry of external processes that are currently alive.
//!
//! Only used for emergency teardown: a runner reserves a slot before it
//! spawns and the slot deregisters itself when dropped, so no exit path can
//! leave an entry behind.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::exec::kill::kill_process_tree;

#[derive(Debug, Clone)]
pub struct ActiveProcess {
    pub command: String,
    pub pid: Option<u32>,
    pub started_at: Instant,
}

#[derive(Debug, Default)]
pub struct ActiveProcessSet {
    entries: Mutex<HashMap<u64, ActiveProcess>>,
    next_id: AtomicU64,
}

impl ActiveProcessSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process that is about to be spawned for `command`.
    pub fn reserve(self: &Arc<Self>, command: &str) -> ProcessSlot {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().insert(
            id,
            ActiveProcess {
                command: command.to_string(),
                pid: None,
                started_at: Instant::now(),
            },
        );
        ProcessSlot {
            set: Arc::clone(self),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<ActiveProcess> {
        self.entries.lock().values().cloned().collect()
    }

    /// Force-kill every registered process tree.
    ///
    /// Entries stay registered until their runners observe the exit and drop
    /// their slots. Processes that already exited are skipped silently.
    pub fn kill_all(&self) -> usize {
        let pids: Vec<u32> = self
            .entries
            .lock()
            .values()
            .filter_map(|p| p.pid)
            .collect();

        if !pids.is_empty() {
            info!(count = pids.len(), "killing all active processes");
        }
        for pid in &pids {
            kill_process_tree(*pid);
        }
        pids.len()
    }

    fn attach(&self, id: u64, pid: u32) {
        if let Some(entry) = self.entries.lock().get_mut(&id) {
            entry.pid = Some(pid);
        }
    }

    fn release(&self, id: u64) {
        if let Some(entry) = self.entries.lock().remove(&id) {
            debug!(command = %entry.command, pid = ?entry.pid, "process deregistered");
        }
    }
}

/// Registration of one process in an [`ActiveProcessSet`]; removed on drop.
#[derive(Debug)]
pub struct ProcessSlot {
    set: Arc<ActiveProcessSet>,
    id: u64,
}

impl ProcessSlot {
    pub fn attach(&self, pid: u32) {
        self.set.attach(self.id, pid);
    }
}

impl Drop for ProcessSlot {
    fn drop(&mut self) {
        self.set.release(self.id);
    }
}
