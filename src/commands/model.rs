// src/commands/model.rs

use serde::{Deserialize, Serialize};

use crate::template;

/// A named external command.
///
/// Persisted as one JSON record per command:
///
/// ```json
/// {
///   "Name": "Convert",
///   "ExecutablePath": "/usr/bin/ffmpeg",
///   "Arguments": "-i $file -o $file+.mp4"
/// }
/// ```
///
/// Values are never mutated while a run borrows them; edits build a new
/// definition and replace the old one in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandDefinition {
    /// Unique, user-facing key.
    pub name: String,

    pub executable_path: String,

    /// Argument template, see [`crate::template::expand`].
    #[serde(rename = "Arguments", default)]
    pub argument_template: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayAttributes>,
}

/// Optional presentation hints kept alongside a command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayAttributes {
    /// Free-form accent colour name for the collaborator's button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

impl CommandDefinition {
    pub fn new(
        name: impl Into<String>,
        executable_path: impl Into<String>,
        argument_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            executable_path: executable_path.into(),
            argument_template: argument_template.into(),
            display: None,
        }
    }

    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.display = Some(DisplayAttributes {
            accent: Some(accent.into()),
        });
        self
    }

    /// Whether the template cannot run without at least one staged file.
    pub fn requires_files(&self) -> bool {
        template::references_file(&self.argument_template)
    }
}
