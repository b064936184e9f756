// src/log/sink.rs

use std::io::Write;

use anstyle::{AnsiColor, Style};
use tracing::debug;

use crate::log::entry::RenderedLine;
use crate::log::style::LineStyle;
use crate::types::{ColorMode, LogColor};

/// Where rendered log lines end up: a terminal, a GUI text view, a test
/// recorder.
///
/// Only the pipeline's flush routine calls into a sink, from whichever task
/// or thread drives that pipeline.
pub trait LogSink: Send {
    /// Append lines at the end of the view.
    fn append(&mut self, lines: &[RenderedLine]);

    /// Remove everything from the view.
    fn clear(&mut self);

    /// Number of lines currently materialised in the view.
    fn line_count(&self) -> usize;

    /// Drop the oldest `count` lines from the view.
    fn trim_front(&mut self, count: usize);

    /// Whether the user is looking at the newest line.
    fn is_at_bottom(&self) -> bool {
        true
    }

    fn scroll_to_bottom(&mut self) {}
}

/// Sink writing `[HH:MM:SS] text` lines to a byte stream, with ANSI styling.
///
/// A terminal cannot take back what it printed, so `clear` and `trim_front`
/// only adjust the bookkeeping.
#[derive(Debug)]
pub struct TerminalSink<W> {
    out: W,
    lines: usize,
}

impl TerminalSink<anstream::AutoStream<std::io::Stdout>> {
    /// Stdout, with escapes kept or stripped according to `mode`.
    pub fn stdout(mode: ColorMode) -> Self {
        let choice = match mode {
            ColorMode::Auto => anstream::ColorChoice::Auto,
            ColorMode::Always => anstream::ColorChoice::Always,
            ColorMode::Never => anstream::ColorChoice::Never,
        };
        Self::new(anstream::AutoStream::new(std::io::stdout(), choice))
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &RenderedLine) -> std::io::Result<()> {
        let time_style = to_anstyle(line.base);
        write!(
            self.out,
            "{}[{}] {}",
            time_style.render(),
            line.time,
            time_style.render_reset()
        )?;
        for span in &line.spans {
            let style = to_anstyle(span.style);
            write!(self.out, "{}{}{}", style.render(), span.text, style.render_reset())?;
        }
        writeln!(self.out)
    }
}

impl<W: Write + Send> LogSink for TerminalSink<W> {
    fn append(&mut self, lines: &[RenderedLine]) {
        for line in lines {
            if let Err(err) = self.write_line(line) {
                debug!(error = %err, "terminal sink write failed");
                return;
            }
            self.lines += 1;
        }
        let _ = self.out.flush();
    }

    fn clear(&mut self) {
        self.lines = 0;
    }

    fn line_count(&self) -> usize {
        self.lines
    }

    fn trim_front(&mut self, count: usize) {
        self.lines = self.lines.saturating_sub(count);
    }
}

fn to_anstyle(style: LineStyle) -> Style {
    let mut out = Style::new().fg_color(style.color.map(|c| ansi_color(c).into()));
    if style.bold {
        out = out.bold();
    }
    out
}

fn ansi_color(color: LogColor) -> AnsiColor {
    match color {
        LogColor::Black => AnsiColor::Black,
        LogColor::Red => AnsiColor::Red,
        LogColor::Green => AnsiColor::Green,
        LogColor::Yellow => AnsiColor::Yellow,
        LogColor::Blue => AnsiColor::Blue,
        LogColor::Magenta => AnsiColor::Magenta,
        LogColor::Cyan => AnsiColor::Cyan,
        LogColor::White => AnsiColor::White,
    }
}
