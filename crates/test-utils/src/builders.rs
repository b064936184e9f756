#![allow(dead_code)]

use cmdeck::commands::CommandDefinition;

/// Builder for `CommandDefinition` to simplify test setup.
pub struct CommandBuilder {
    command: CommandDefinition,
}

impl CommandBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            command: CommandDefinition::new(name, "", ""),
        }
    }

    pub fn exe(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.command.executable_path = path.as_ref().display().to_string();
        self
    }

    pub fn args(mut self, template: &str) -> Self {
        self.command.argument_template = template.to_string();
        self
    }

    pub fn accent(mut self, accent: &str) -> Self {
        self.command = self.command.with_accent(accent);
        self
    }

    pub fn build(self) -> CommandDefinition {
        self.command
    }
}
