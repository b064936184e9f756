// src/lib.rs

pub mod cli;
pub mod commands;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod log;
pub mod logging;
pub mod staging;
pub mod template;
pub mod types;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::cli::{AddArgs, CliArgs, CliCommand, EditArgs, RunArgs};
use crate::commands::CommandDefinition;
use crate::config::{Settings, load_or_default};
use crate::engine::{RunState, Toggle};
use crate::log::{LogPipeline, TerminalSink};
use crate::staging::StagedFiles;
use crate::template::{batch_stamp, expand};

pub use crate::deck::Deck;

/// High-level entry point used by `main.rs`.
///
/// Loads settings, then dispatches the subcommand. Every subcommand goes
/// through a [`Deck`], so persistence and run behaviour match what any other
/// front end would get.
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_or_default(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    debug!(?settings, "settings loaded");

    match args.command {
        CliCommand::List => manage(settings, list_commands),
        CliCommand::Add(add) => manage(settings, |deck| add_command(deck, add)),
        CliCommand::Edit(edit) => manage(settings, |deck| edit_command(deck, edit)),
        CliCommand::Remove { name } => manage(settings, |deck| {
            deck.registry().remove(&name)?;
            deck.save_commands()?;
            Ok(())
        }),
        CliCommand::Run(run_args) => run_command(settings, run_args).await,
    }
}

/// Run a registry operation against a freshly loaded deck, then flush the
/// log to the terminal.
fn manage<F>(settings: Settings, op: F) -> Result<()>
where
    F: FnOnce(&Deck) -> Result<()>,
{
    let (mut pipeline, log) = LogPipeline::new(&settings.log, TerminalSink::stdout(settings.log.color));
    let deck = Deck::new(settings, log);

    let result = deck
        .load_commands()
        .map_err(anyhow::Error::from)
        .and_then(|_| op(&deck));

    pipeline.drain_all();
    result
}

fn list_commands(deck: &Deck) -> Result<()> {
    let commands = deck.list_commands();
    if commands.is_empty() {
        println!("no commands in {}", deck.commands_file().display());
        return Ok(());
    }
    for command in commands {
        println!("{}", command.name);
        println!("    exe:  {}", command.executable_path);
        if !command.argument_template.is_empty() {
            println!("    args: {}", command.argument_template);
        }
        if let Some(accent) = command.display.as_ref().and_then(|d| d.accent.as_deref()) {
            println!("    accent: {accent}");
        }
    }
    Ok(())
}

fn add_command(deck: &Deck, add: AddArgs) -> Result<()> {
    let mut definition = CommandDefinition::new(add.name, add.executable, add.arguments);
    if let Some(accent) = add.accent {
        definition = definition.with_accent(accent);
    }
    deck.registry().add(definition)?;
    deck.save_commands()?;
    Ok(())
}

fn edit_command(deck: &Deck, edit: EditArgs) -> Result<()> {
    let Some(current) = deck.registry().get(&edit.target) else {
        bail!("unknown command '{}'", edit.target);
    };

    // Copy, change, replace: a run holding the old definition keeps it.
    let mut updated = CommandDefinition::clone(&current);
    if let Some(name) = edit.name {
        updated.name = name;
    }
    if let Some(executable) = edit.executable {
        updated.executable_path = executable;
    }
    if let Some(arguments) = edit.arguments {
        updated.argument_template = arguments;
    }

    deck.registry().replace(&edit.target, updated)?;
    deck.save_commands()?;
    Ok(())
}

async fn run_command(mut settings: Settings, args: RunArgs) -> Result<()> {
    if args.no_log {
        settings.log.enabled = false;
    }

    let (pipeline, log) = LogPipeline::new(&settings.log, TerminalSink::stdout(settings.log.color));
    let pipeline_task = tokio::spawn(pipeline.run());

    let deck = Deck::new(settings, log.clone());
    if let Some(filter) = &args.filter {
        deck.set_filter(filter, true);
    }

    let outcome = drive_run(&deck, &args).await;

    log.close();
    if let Err(err) = pipeline_task.await {
        warn!(error = %err, "log pipeline task failed");
    }
    outcome
}

async fn drive_run(deck: &Deck, args: &RunArgs) -> Result<()> {
    deck.load_commands()?;

    let mut staged = StagedFiles::new();
    staged.add_many(args.files.iter().map(|p| p.display().to_string()));
    let none: [&str; 0] = [];
    let files = staged.batch(&none);

    if args.dry_run {
        return print_dry_run(deck, &args.name, &files);
    }

    let Toggle::Started(ticket) = deck.start_or_toggle(&args.name, files)? else {
        bail!("'{}' is already running", args.name);
    };

    let wait = ticket.wait();
    tokio::pin!(wait);
    let mut interrupted = false;

    let state = loop {
        tokio::select! {
            state = &mut wait => break state,
            signal = tokio::signal::ctrl_c(), if !interrupted => {
                if let Err(err) = signal {
                    warn!(error = %err, "failed to listen for Ctrl+C");
                }
                info!("interrupt received; cancelling runs");
                interrupted = true;
                deck.shutdown();
            }
        }
    };

    match state {
        RunState::Completed => Ok(()),
        other => bail!("'{}' {}", args.name, other),
    }
}

/// Print the argument string each file would get, without running anything.
fn print_dry_run(deck: &Deck, name: &str, files: &[String]) -> Result<()> {
    let Some(command) = deck.registry().get(name) else {
        bail!("unknown command '{name}'");
    };

    println!("cmdeck dry-run: {}", command.name);
    println!("  exe: {}", command.executable_path);

    if files.is_empty() {
        if command.requires_files() {
            bail!("'{}' requires files but none were given", command.name);
        }
        println!("  args: {}", command.argument_template);
        return Ok(());
    }

    let stamp = batch_stamp();

    for file in files {
        println!("  [{file}] {}", expand(&command.argument_template, file, &stamp));
    }
    debug!("dry-run complete (no execution)");
    Ok(())
}
