// src/commands/registry.rs

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::commands::model::CommandDefinition;
use crate::commands::store;
use crate::errors::{CmdeckError, Result};

/// The command list owned by the collaborator.
///
/// Reads vastly outnumber writes (every start looks a command up; edits are
/// rare), so the list sits behind a `RwLock`. Entries are handed out as
/// `Arc`s: a running batch keeps the definition it started with even if the
/// entry is replaced or removed mid-run.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: RwLock<Vec<Arc<CommandDefinition>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: Vec<CommandDefinition>) -> Self {
        let registry = Self::new();
        registry.replace_all(definitions);
        registry
    }

    /// All commands in insertion order.
    pub fn list(&self) -> Vec<Arc<CommandDefinition>> {
        self.commands.read().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.commands.read().iter().map(|c| c.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<CommandDefinition>> {
        self.commands.read().iter().find(|c| c.name == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    /// Add a new command. Names must be unique.
    pub fn add(&self, definition: CommandDefinition) -> Result<()> {
        let mut commands = self.commands.write();
        if commands.iter().any(|c| c.name == definition.name) {
            return Err(CmdeckError::DuplicateCommand(definition.name));
        }
        debug!(command = %definition.name, "adding command");
        commands.push(Arc::new(definition));
        Ok(())
    }

    /// Replace the command called `name` with `definition`, keeping its
    /// position. Renaming onto another existing command is rejected.
    pub fn replace(&self, name: &str, definition: CommandDefinition) -> Result<()> {
        let mut commands = self.commands.write();
        let index = commands
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| CmdeckError::UnknownCommand(name.to_string()))?;

        if definition.name != name && commands.iter().any(|c| c.name == definition.name) {
            return Err(CmdeckError::DuplicateCommand(definition.name));
        }

        debug!(command = %name, new_name = %definition.name, "replacing command");
        commands[index] = Arc::new(definition);
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<Arc<CommandDefinition>> {
        let mut commands = self.commands.write();
        let index = commands
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| CmdeckError::UnknownCommand(name.to_string()))?;
        debug!(command = %name, "removing command");
        Ok(commands.remove(index))
    }

    /// Swap in a whole new command list in one step.
    pub fn replace_all(&self, definitions: Vec<CommandDefinition>) {
        let fresh: Vec<Arc<CommandDefinition>> = definitions.into_iter().map(Arc::new).collect();
        *self.commands.write() = fresh;
    }

    /// Owned copy of every definition, e.g. for serialisation.
    pub fn snapshot(&self) -> Vec<CommandDefinition> {
        self.commands
            .read()
            .iter()
            .map(|c| CommandDefinition::clone(c))
            .collect()
    }

    /// Replace the registry contents with the commands stored at `path`.
    ///
    /// The file is read and parsed completely before anything is swapped in,
    /// so a failed load leaves the current list untouched.
    pub fn load_from(&self, path: impl AsRef<Path>) -> Result<usize> {
        let definitions = store::load_commands(path.as_ref())?;
        let count = definitions.len();
        self.replace_all(definitions);
        info!(count, path = ?path.as_ref(), "command registry loaded");
        Ok(count)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<usize> {
        let definitions = self.snapshot();
        store::save_commands(path.as_ref(), &definitions)?;
        Ok(definitions.len())
    }
}
