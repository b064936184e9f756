// src/log/ingest.rs

//! Producer side of the log pipeline.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::log::entry::LogEntry;
use crate::log::pipeline::LogControl;
use crate::types::LogColor;

/// The two ingest stages, behind one lock so that unpausing moves the whole
/// pause buffer into the live queue atomically.
#[derive(Debug, Default)]
struct Buffers {
    paused: bool,
    pause_buffer: VecDeque<LogEntry>,
    live: VecDeque<LogEntry>,
}

#[derive(Debug)]
pub(crate) struct Ingest {
    enabled: AtomicBool,
    buffers: Mutex<Buffers>,
}

impl Ingest {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            buffers: Mutex::new(Buffers::default()),
        }
    }

    fn push(&self, entry: LogEntry) {
        let mut buffers = self.buffers.lock();
        if buffers.paused {
            buffers.pause_buffer.push_back(entry);
        } else {
            buffers.live.push_back(entry);
        }
    }

    fn set_paused(&self, paused: bool) {
        let mut buffers = self.buffers.lock();
        if buffers.paused && !paused {
            let mut held = std::mem::take(&mut buffers.pause_buffer);
            buffers.live.append(&mut held);
        }
        buffers.paused = paused;
    }

    /// Take up to `max` entries from the front of the live queue.
    pub(crate) fn drain_batch(&self, max: usize) -> Vec<LogEntry> {
        let mut buffers = self.buffers.lock();
        let n = max.min(buffers.live.len());
        buffers.live.drain(..n).collect()
    }

    pub(crate) fn live_len(&self) -> usize {
        self.buffers.lock().live.len()
    }

    fn paused_len(&self) -> usize {
        self.buffers.lock().pause_buffer.len()
    }

    fn is_paused(&self) -> bool {
        self.buffers.lock().paused
    }
}

/// Cloneable handle used by everything that writes to the log.
///
/// Filter and clear requests are forwarded to the task that owns the sink;
/// emitting and pausing act directly on the shared buffers.
#[derive(Debug, Clone)]
pub struct LogHandle {
    ingest: Arc<Ingest>,
    control: mpsc::UnboundedSender<LogControl>,
}

impl LogHandle {
    pub(crate) fn new(ingest: Arc<Ingest>, control: mpsc::UnboundedSender<LogControl>) -> Self {
        Self { ingest, control }
    }

    /// Whether logging is switched on. Producers that would do expensive work
    /// to build a message (or capture process output) should check this
    /// first.
    pub fn is_enabled(&self) -> bool {
        self.ingest.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.ingest.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn emit(&self, message: impl Into<String>) {
        self.emit_styled(message, None, false);
    }

    pub fn emit_styled(&self, message: impl Into<String>, color: Option<LogColor>, bold: bool) {
        if !self.is_enabled() {
            return;
        }
        self.ingest.push(LogEntry::new(message, color, bold));
    }

    /// Like [`emit`](Self::emit), but the message is only built when logging
    /// is enabled.
    pub fn emit_with<F>(&self, color: Option<LogColor>, bold: bool, message: F)
    where
        F: FnOnce() -> String,
    {
        if !self.is_enabled() {
            return;
        }
        self.ingest.push(LogEntry::new(message(), color, bold));
    }

    /// Error-styled line.
    pub fn error(&self, message: impl Into<String>) {
        self.emit_styled(message, Some(LogColor::ERROR), true);
    }

    /// While paused, new entries are held back; unpausing releases all of them
    /// to the live queue in one step, in order.
    pub fn set_paused(&self, paused: bool) {
        self.ingest.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.ingest.is_paused()
    }

    /// Entries waiting in the live queue.
    pub fn pending(&self) -> usize {
        self.ingest.live_len()
    }

    /// Entries held back by a pause.
    pub fn held(&self) -> usize {
        self.ingest.paused_len()
    }

    /// Change the view filter; the sink is re-rendered from history.
    pub fn set_filter(&self, text: impl Into<String>, active: bool) {
        let _ = self.control.send(LogControl::SetFilter {
            text: text.into(),
            active,
        });
    }

    /// Drop history and clear the sink.
    pub fn clear(&self) {
        let _ = self.control.send(LogControl::Clear);
    }

    /// Ask the pipeline task to drain what is queued and stop.
    pub fn close(&self) {
        let _ = self.control.send(LogControl::Shutdown);
    }
}
