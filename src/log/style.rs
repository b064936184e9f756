// src/log/style.rs

use crate::types::LogColor;

/// Colour and weight of (part of) a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineStyle {
    pub color: Option<LogColor>,
    pub bold: bool,
}

impl LineStyle {
    pub const PLAIN: LineStyle = LineStyle {
        color: None,
        bold: false,
    };

    pub const ERROR: LineStyle = LineStyle {
        color: Some(LogColor::ERROR),
        bold: true,
    };

    pub fn new(color: Option<LogColor>, bold: bool) -> Self {
        Self { color, bold }
    }
}

/// Substrings that mark a line as an error even if the caller did not.
pub const ERROR_MARKERS: &[&str] = &["[ERR]", "Error:", "error:", "ERROR", "Exception:"];

/// Style implied by the text alone.
pub fn auto_detect(text: &str) -> LineStyle {
    if ERROR_MARKERS.iter().any(|m| text.contains(m)) {
        LineStyle::ERROR
    } else {
        LineStyle::PLAIN
    }
}

/// Base style of a line: auto-detection first, then the caller's explicit
/// style on top.
///
/// Auto-detection only applies when the caller passed no colour; an explicit
/// colour always wins, together with the caller's `bold`.
pub fn base_style(text: &str, color: Option<LogColor>, bold: bool) -> LineStyle {
    match color {
        Some(color) => LineStyle::new(Some(color), bold),
        None => {
            let detected = auto_detect(text);
            LineStyle::new(detected.color, bold || detected.bold)
        }
    }
}
