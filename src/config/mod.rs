// src/config/mod.rs

//! Settings loading and validation for cmdeck.
//!
//! Responsibilities:
//! - Define the TOML-backed settings model (`model.rs`).
//! - Load a settings file from disk, falling back to defaults (`loader.rs`).
//! - Validate bounds such as batch size and poll interval (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{LogSection, RawSettings, RunSection, Settings, StorageSection};
