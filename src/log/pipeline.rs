// src/log/pipeline.rs

//! Consumer side of the log pipeline: batching, history, filtering and the
//! sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::LogSection;
use crate::log::entry::RenderedLine;
use crate::log::history::{LogFilter, LogHistory};
use crate::log::ingest::{Ingest, LogHandle};
use crate::log::sink::LogSink;

/// Requests that must run on the task owning the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogControl {
    SetFilter { text: String, active: bool },
    Clear,
    Shutdown,
}

/// Owns the sink, the history store and the current filter.
///
/// The synchronous methods (`flush_tick`, `set_filter`, `clear_history`)
/// hold all the semantics; [`run`](Self::run) is the async shell that calls
/// them on a fixed interval and in response to [`LogControl`] messages.
pub struct LogPipeline<S: LogSink> {
    ingest: Arc<Ingest>,
    control_rx: mpsc::UnboundedReceiver<LogControl>,
    sink: S,
    history: LogHistory,
    filter: LogFilter,
    batch_size: usize,
    trim_slack: usize,
    flush_interval: Duration,
}

impl<S: LogSink> LogPipeline<S> {
    /// Build a pipeline around `sink` and return it with its producer handle.
    pub fn new(settings: &LogSection, sink: S) -> (Self, LogHandle) {
        let ingest = Arc::new(Ingest::new(settings.enabled));
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let handle = LogHandle::new(Arc::clone(&ingest), control_tx);

        let pipeline = Self {
            ingest,
            control_rx,
            sink,
            history: LogHistory::new(settings.history_cap),
            filter: LogFilter::default(),
            batch_size: settings.batch_size.max(1),
            trim_slack: settings.trim_slack,
            flush_interval: settings.flush_interval(),
        };

        (pipeline, handle)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn history(&self) -> &LogHistory {
        &self.history
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    /// Move at most one batch from the live queue to the sink and history.
    ///
    /// Returns the number of entries taken from the queue.
    pub fn flush_tick(&mut self) -> usize {
        let batch = self.ingest.drain_batch(self.batch_size);
        if batch.is_empty() {
            return 0;
        }

        let rendered: Vec<RenderedLine> = batch
            .iter()
            .filter(|entry| self.filter.matches(entry))
            .map(|entry| entry.render())
            .collect();
        if !rendered.is_empty() {
            self.sink.append(&rendered);
        }

        let taken = batch.len();
        self.history.extend(batch);
        self.enforce_sink_capacity();
        taken
    }

    /// Flush until the live queue is empty.
    pub fn drain_all(&mut self) -> usize {
        let mut total = 0;
        loop {
            let taken = self.flush_tick();
            if taken == 0 {
                return total;
            }
            total += taken;
        }
    }

    /// Replace the filter and re-render the sink from history.
    pub fn set_filter(&mut self, text: &str, active: bool) {
        debug!(filter = %text, active, "log filter changed");
        self.filter = LogFilter::new(text, active);
        self.rerender();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.sink.clear();
    }

    /// Apply a control message. Returns `false` for `Shutdown`.
    pub fn apply(&mut self, control: LogControl) -> bool {
        match control {
            LogControl::SetFilter { text, active } => self.set_filter(&text, active),
            LogControl::Clear => self.clear_history(),
            LogControl::Shutdown => return false,
        }
        true
    }

    /// Full re-render of the sink from history through the current filter.
    ///
    /// If the user was at the bottom before, they are put back at the bottom;
    /// otherwise the sink's scroll position is left alone.
    fn rerender(&mut self) {
        let was_at_bottom = self.sink.is_at_bottom();

        let lines: Vec<RenderedLine> = self
            .history
            .iter()
            .filter(|entry| self.filter.matches(entry))
            .map(|entry| entry.render())
            .collect();

        self.sink.clear();
        if !lines.is_empty() {
            self.sink.append(&lines);
        }
        self.enforce_sink_capacity();

        if was_at_bottom {
            self.sink.scroll_to_bottom();
        }
    }

    /// Once the sink holds more than `history_cap + trim_slack` lines, trim
    /// it back down to `history_cap`.
    fn enforce_sink_capacity(&mut self) {
        let cap = self.history.cap();
        let count = self.sink.line_count();
        if count > cap.saturating_add(self.trim_slack) {
            let excess = count - cap;
            debug!(count, cap, excess, "trimming oldest lines from log sink");
            self.sink.trim_front(excess);
        }
    }

    /// Drive the pipeline until a `Shutdown` arrives or every handle is gone,
    /// then drain what is left and hand the sink back.
    pub async fn run(mut self) -> S {
        let mut ticker = tokio::time::interval(self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = ?self.flush_interval, "log pipeline started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.flush_tick();
                }
                control = self.control_rx.recv() => {
                    match control {
                        Some(control) => {
                            if !self.apply(control) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        self.drain_all();
        info!("log pipeline stopped");
        self.sink
    }
}
