// src/log/ansi.rs

//! Inline SGR (`ESC [ params m`) handling for captured process output.
//!
//! Recognised codes:
//! - `0` (or empty params): back to the line's base style
//! - `1`: bold on
//! - `30`..=`37`: named foreground colour
//! - `39`: foreground back to the base colour
//!
//! Anything else, including other CSI sequences such as cursor movement, is
//! consumed and ignored.

use std::borrow::Cow;

use crate::log::style::LineStyle;
use crate::types::LogColor;

const ESC: char = '\x1b';

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: LineStyle,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Split `line` into styled spans, starting from `base`.
///
/// Lines without an escape character skip the parser and come back as a
/// single span.
pub fn parse_sgr(line: &str, base: LineStyle) -> Vec<StyledSpan> {
    if !line.contains(ESC) {
        return vec![StyledSpan::new(line, base)];
    }

    let mut spans: Vec<StyledSpan> = Vec::new();
    let mut current = base;
    let mut text = String::new();
    let mut rest = line;

    while let Some(pos) = rest.find(ESC) {
        text.push_str(&rest[..pos]);
        let after = &rest[pos + ESC.len_utf8()..];

        match csi_sequence(after) {
            Some((params, final_byte, len)) => {
                if final_byte == 'm' {
                    let next = apply_sgr(params, current, base);
                    if next != current {
                        push_span(&mut spans, &mut text, current);
                        current = next;
                    }
                }
                rest = &after[len..];
            }
            // A stray ESC is dropped; the text after it is kept.
            None => rest = after,
        }
    }

    text.push_str(rest);
    push_span(&mut spans, &mut text, current);
    spans
}

/// The visible text of `line` with every escape sequence removed.
pub fn strip_sgr(line: &str) -> Cow<'_, str> {
    if !line.contains(ESC) {
        return Cow::Borrowed(line);
    }
    let plain: String = parse_sgr(line, LineStyle::PLAIN)
        .into_iter()
        .map(|span| span.text)
        .collect();
    Cow::Owned(plain)
}

fn push_span(spans: &mut Vec<StyledSpan>, text: &mut String, style: LineStyle) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => spans.push(StyledSpan::new(text.as_str(), style)),
    }
    text.clear();
}

/// Parse a CSI sequence following an ESC. Returns the parameter bytes, the
/// final byte and the number of bytes consumed (including `[`).
fn csi_sequence(s: &str) -> Option<(&str, char, usize)> {
    let body = s.strip_prefix('[')?;
    for (i, c) in body.char_indices() {
        match c {
            '\x20'..='\x3f' => continue,
            '\x40'..='\x7e' => return Some((&body[..i], c, 1 + i + c.len_utf8())),
            _ => return None,
        }
    }
    None
}

fn apply_sgr(params: &str, current: LineStyle, base: LineStyle) -> LineStyle {
    let mut style = current;
    for raw in params.split(';') {
        let code = if raw.is_empty() {
            Some(0)
        } else {
            raw.parse::<u16>().ok()
        };
        match code {
            Some(0) => style = base,
            Some(1) => style.bold = true,
            Some(c @ 30..=37) => style.color = LogColor::from_sgr(c),
            Some(39) => style.color = base.color,
            _ => {}
        }
    }
    style
}
