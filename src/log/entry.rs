// src/log/entry.rs

use std::sync::OnceLock;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::log::ansi::{StyledSpan, parse_sgr};
use crate::log::style::{LineStyle, base_style};
use crate::types::LogColor;

/// One immutable log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub timestamp: OffsetDateTime,
    pub color: Option<LogColor>,
    pub bold: bool,
}

impl LogEntry {
    pub fn new(text: impl Into<String>, color: Option<LogColor>, bold: bool) -> Self {
        Self {
            text: text.into(),
            timestamp: now(),
            color,
            bold,
        }
    }

    /// `HH:MM:SS` in local time when the offset is known, UTC otherwise.
    pub fn time_label(&self) -> String {
        let format = format_description!("[hour]:[minute]:[second]");
        self.timestamp
            .format(&format)
            .unwrap_or_else(|_| String::from("--:--:--"))
    }

    /// Resolve the style and split the text into spans.
    pub fn render(&self) -> RenderedLine {
        let base = base_style(&self.text, self.color, self.bold);
        RenderedLine {
            time: self.time_label(),
            base,
            spans: parse_sgr(&self.text, base),
        }
    }
}

/// A log entry as handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub time: String,
    /// Style of the line before inline escape codes; used for the time label.
    pub base: LineStyle,
    pub spans: Vec<StyledSpan>,
}

impl RenderedLine {
    /// Visible text without the time label.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

fn now() -> OffsetDateTime {
    // The local offset can only be determined reliably before other threads
    // exist, so it is looked up once and reused.
    static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();
    let offset = *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));
    OffsetDateTime::now_utc().to_offset(offset)
}

/// Resolve and cache the local UTC offset. Call early in `main`, before the
/// async runtime starts its worker threads.
pub fn init_local_offset() {
    let _ = now();
}
