// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `cmdeck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cmdeck",
    version,
    about = "Run named external commands against a list of files.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// Default: `Cmdeck.toml` in the current working directory. A missing
    /// file means default settings.
    #[arg(long, global = true, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Diagnostic logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CMDECK_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// List the saved commands.
    List,

    /// Add a new command.
    Add(AddArgs),

    /// Change an existing command.
    Edit(EditArgs),

    /// Delete a command.
    Remove {
        /// Name of the command to delete.
        name: String,
    },

    /// Run a command once per file (or once, without files).
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    /// Path to the executable.
    #[arg(long = "exe", value_name = "PATH")]
    pub executable: String,

    /// Argument template. `$file`/`{file}` is the staged file, `$dt` the
    /// batch timestamp, `+` joins a placeholder to neighbouring text.
    #[arg(long = "args", value_name = "TEMPLATE", default_value = "", allow_hyphen_values = true)]
    pub arguments: String,

    /// Accent colour shown by front ends.
    #[arg(long)]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Current name of the command.
    pub target: String,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "exe", value_name = "PATH")]
    pub executable: Option<String>,

    #[arg(long = "args", value_name = "TEMPLATE", allow_hyphen_values = true)]
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Name of the command to run.
    pub name: String,

    /// Files to run the command against, in order.
    pub files: Vec<PathBuf>,

    /// Do not log, and do not capture process output.
    #[arg(long)]
    pub no_log: bool,

    /// Only show log lines containing this text (case-insensitive).
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Print the expanded arguments per file, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_files_and_flags() {
        let args = CliArgs::try_parse_from([
            "cmdeck", "run", "Convert", "a.txt", "b.txt", "--filter", "err", "--no-log",
        ])
        .unwrap();

        let CliCommand::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.name, "Convert");
        assert_eq!(run.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(run.filter.as_deref(), Some("err"));
        assert!(run.no_log);
        assert!(!run.dry_run);
        assert_eq!(args.config, PathBuf::from("Cmdeck.toml"));
    }

    #[test]
    fn add_accepts_templates_starting_with_a_dash() {
        let args = CliArgs::try_parse_from([
            "cmdeck", "add", "--name", "Zip", "--exe", "/usr/bin/zip", "--args", "-q $file+.zip $file",
        ])
        .unwrap();

        let CliCommand::Add(add) = args.command else {
            panic!("expected add");
        };
        assert_eq!(add.arguments, "-q $file+.zip $file");
        assert!(add.accent.is_none());
    }
}
