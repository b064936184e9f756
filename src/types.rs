// src/types.rs

use serde::{Deserialize, Serialize};

/// Foreground colour of a log line.
///
/// The eight named colours line up with SGR codes `30`..=`37`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl LogColor {
    /// Error lines (usage errors, spawn errors, `[ERR]` output).
    pub const ERROR: LogColor = LogColor::Red;
    /// Nonzero exits and other non-fatal warnings.
    pub const WARNING: LogColor = LogColor::Yellow;
    /// Successful completion banners and persistence confirmations.
    pub const SUCCESS: LogColor = LogColor::Green;
    /// Start banners.
    pub const BANNER: LogColor = LogColor::Cyan;
    /// Per-file progress lines.
    pub const PROGRESS: LogColor = LogColor::Blue;

    /// Map an SGR foreground code (`30`..=`37`) to a colour.
    pub fn from_sgr(code: u16) -> Option<Self> {
        match code {
            30 => Some(LogColor::Black),
            31 => Some(LogColor::Red),
            32 => Some(LogColor::Green),
            33 => Some(LogColor::Yellow),
            34 => Some(LogColor::Blue),
            35 => Some(LogColor::Magenta),
            36 => Some(LogColor::Cyan),
            37 => Some(LogColor::White),
            _ => None,
        }
    }
}

/// Whether the terminal sink emits colour escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_codes_outside_named_range_have_no_colour() {
        assert_eq!(LogColor::from_sgr(31), Some(LogColor::Red));
        assert_eq!(LogColor::from_sgr(37), Some(LogColor::White));
        assert_eq!(LogColor::from_sgr(38), None);
        assert_eq!(LogColor::from_sgr(90), None);
    }
}
