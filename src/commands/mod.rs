// src/commands/mod.rs

//! User-defined commands.
//!
//! - [`model`] holds the persisted `CommandDefinition` record.
//! - [`registry`] is the in-memory, lock-guarded command list.
//! - [`store`] reads and writes the JSON command file.

pub mod model;
pub mod registry;
pub mod store;

pub use model::{CommandDefinition, DisplayAttributes};
pub use registry::CommandRegistry;
pub use store::{load_commands, save_commands};
