// src/log/mod.rs

//! User-facing log pipeline.
//!
//! ```text
//! producers ──emit──▶ pause buffer ─┐
//!            (paused)               ├─▶ live queue ──flush_tick──▶ sink
//!            ──emit──▶──────────────┘   (≤ batch_size)         └──▶ history
//! ```
//!
//! - [`LogHandle`] is the cheap, cloneable producer side. Emitting never
//!   blocks on the sink.
//! - [`LogPipeline`] owns the sink, the history and the filter. Only its
//!   flush routine touches the sink, so the sink can live on whatever
//!   thread or task drives the pipeline.
//! - [`style`] and [`ansi`] are pure style resolvers applied in a fixed
//!   order: auto-detection, explicit caller style, inline SGR codes.
//!
//! This is separate from the `tracing` diagnostics set up in
//! [`crate::logging`].

pub mod ansi;
pub mod entry;
pub mod history;
pub mod ingest;
pub mod pipeline;
pub mod sink;
pub mod style;

pub use ansi::{StyledSpan, parse_sgr, strip_sgr};
pub use entry::{LogEntry, RenderedLine};
pub use history::{LogFilter, LogHistory};
pub use ingest::LogHandle;
pub use pipeline::{LogControl, LogPipeline};
pub use sink::{LogSink, TerminalSink};
pub use style::LineStyle;
