// src/template/mod.rs

//! Argument templating.
//!
//! A command's argument template is expanded once per staged file:
//!
//! - `$file` / `{file}`: the staged file path, wrapped in double quotes.
//! - `$dt`: a batch timestamp, shared by every file of one run.
//! - `+`: the conjunction operator. A placeholder joined to neighbouring
//!   text with `+` becomes part of a single quoted argument, e.g.
//!   `$file+.bak` expands to `"/a/b.txt.bak"` rather than `"/a/b.txt".bak`.
//!
//! [`split`] turns the expanded string into an argv on platforms that do
//! not take a raw command line.

pub mod expand;
pub mod split;

use std::time::{SystemTime, UNIX_EPOCH};

pub use expand::{FILE_PLACEHOLDERS, STAMP_PLACEHOLDER, expand};
pub use split::split_arguments;

/// True if `template` references the staged file path.
pub fn references_file(template: &str) -> bool {
    FILE_PLACEHOLDERS.iter().any(|p| template.contains(p))
}

/// The `$dt` value for a batch: Unix time in milliseconds.
pub fn batch_stamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}
