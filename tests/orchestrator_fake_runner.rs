// tests/orchestrator_fake_runner.rs

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};
use tokio::sync::broadcast::error::TryRecvError;

use cmdeck::Deck;
use cmdeck::config::Settings;
use cmdeck::engine::{RunEvent, RunState, Toggle};
use cmdeck::errors::CmdeckError;
use cmdeck::exec::{ActiveProcessSet, RunResult};
use cmdeck::log::LogPipeline;
use cmdeck::template::split_arguments;
use cmdeck_test_utils::{CommandBuilder, FakeRunner, RecordingSink, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

/// A deck wired to a fake backend and a recording log, with a real file to
/// serve as the executable.
struct Harness {
    deck: Deck,
    pipeline: LogPipeline<RecordingSink>,
    fake: Arc<FakeRunner>,
    exe: NamedTempFile,
    _dir: TempDir,
}

impl Harness {
    fn new(fake: FakeRunner) -> Result<Self, Box<dyn Error>> {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let mut settings = Settings::default();
        settings.storage.commands_file = dir.path().join("commands.json");

        let (pipeline, log) = LogPipeline::new(&settings.log, RecordingSink::new());
        let fake = Arc::new(fake);
        let deck = Deck::with_backend(
            settings,
            log,
            Arc::clone(&fake) as Arc<dyn cmdeck::exec::ProcessBackend>,
            Arc::new(ActiveProcessSet::new()),
        );

        Ok(Self {
            deck,
            pipeline,
            fake,
            exe: NamedTempFile::new()?,
            _dir: dir,
        })
    }

    fn add(&self, name: &str, template: &str) -> TestResult {
        let command = CommandBuilder::new(name).exe(self.exe.path()).args(template).build();
        self.deck.registry().add(command)?;
        Ok(())
    }

    fn log_lines(&mut self) -> Vec<String> {
        self.pipeline.drain_all();
        self.pipeline.history().iter().map(|e| e.text.clone()).collect()
    }
}

fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn started(toggle: Toggle) -> cmdeck::engine::RunTicket {
    match toggle {
        Toggle::Started(ticket) => ticket,
        Toggle::StopRequested => panic!("expected a new run to start"),
    }
}

async fn wait_for_calls(fake: &FakeRunner, n: usize) {
    with_timeout(async {
        while fake.calls() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
}

#[tokio::test]
async fn files_run_in_order_with_one_shared_stamp() -> TestResult {
    let mut h = Harness::new(FakeRunner::new())?;
    h.add("Copy", "$file $dt+.bak")?;

    let ticket = started(h.deck.start_or_toggle("Copy", files(&["a", "b", "c"]))?);
    assert_eq!(with_timeout(ticket.wait()).await, RunState::Completed);

    let argv: Vec<Vec<String>> = h.fake.arguments().iter().map(|a| split_arguments(a)).collect();
    assert_eq!(argv.len(), 3);
    assert_eq!(argv[0][0], "a");
    assert_eq!(argv[1][0], "b");
    assert_eq!(argv[2][0], "c");
    let stamp = argv[0][1].clone();
    assert!(stamp.ends_with(".bak"));
    assert!(argv.iter().all(|a| a[1] == stamp));

    let lines = h.log_lines();
    assert_eq!(lines.first().map(String::as_str), Some("--- Starting execution: Copy ---"));
    assert!(lines.contains(&"[2/3] b".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("--- Finished: Copy ---"));
    Ok(())
}

#[tokio::test]
async fn starting_a_running_command_stops_it_instead() -> TestResult {
    let mut h = Harness::new(FakeRunner::holding())?;
    h.add("Slow", "$file")?;

    let ticket = started(h.deck.start_or_toggle("Slow", files(&["a", "b", "c"]))?);
    let first_run = ticket.handle().run_id;
    wait_for_calls(&h.fake, 1).await;

    let toggle = h.deck.start_or_toggle("Slow", files(&["x"]))?;
    assert!(matches!(toggle, Toggle::StopRequested));
    assert_eq!(h.deck.orchestrator().runs().len(), 1);

    assert_eq!(with_timeout(ticket.wait()).await, RunState::Cancelled);
    // The loop unwound without starting the remaining files.
    assert_eq!(h.fake.calls(), 1);
    assert!(!h.deck.orchestrator().is_running("Slow"));

    let again = started(h.deck.start_or_toggle("Slow", files(&["a"]))?);
    assert_ne!(again.handle().run_id, first_run);
    h.deck.orchestrator().stop("Slow");
    assert_eq!(with_timeout(again.wait()).await, RunState::Cancelled);

    let lines = h.log_lines();
    assert!(lines.contains(&"--- Cancelled: Slow ---".to_string()));
    assert!(lines.contains(&"Stopping: Slow".to_string()));
    Ok(())
}

#[tokio::test]
async fn file_placeholder_without_files_is_one_usage_error() -> TestResult {
    let mut h = Harness::new(FakeRunner::new())?;
    h.add("Convert", "-i $file -o $file+.out")?;

    let ticket = started(h.deck.start_or_toggle("Convert", Vec::new())?);
    assert_eq!(with_timeout(ticket.wait()).await, RunState::Failed);
    assert_eq!(h.fake.calls(), 0);

    let lines = h.log_lines();
    let usage: Vec<&String> = lines.iter().filter(|l| l.starts_with("Usage error")).collect();
    assert_eq!(usage.len(), 1);
    assert!(lines.contains(&"--- Failed: Convert ---".to_string()));
    Ok(())
}

#[tokio::test]
async fn missing_executable_short_circuits_the_whole_batch() -> TestResult {
    let mut h = Harness::new(FakeRunner::new())?;
    let command = CommandBuilder::new("Ghost").exe("/definitely/not/here").args("$file").build();
    h.deck.registry().add(command)?;

    let ticket = started(h.deck.start_or_toggle("Ghost", files(&["a", "b"]))?);
    assert_eq!(with_timeout(ticket.wait()).await, RunState::Failed);
    assert_eq!(h.fake.calls(), 0);

    let lines = h.log_lines();
    assert!(lines.contains(&"Usage error: Executable not found at '/definitely/not/here'".to_string()));
    Ok(())
}

#[tokio::test]
async fn template_without_placeholders_runs_once_verbatim() -> TestResult {
    let h = Harness::new(FakeRunner::new())?;
    h.add("Version", "--version a+b")?;

    let ticket = started(h.deck.start_or_toggle("Version", Vec::new())?);
    assert_eq!(with_timeout(ticket.wait()).await, RunState::Completed);
    assert_eq!(h.fake.arguments(), vec!["--version a+b"]);
    Ok(())
}

#[tokio::test]
async fn stamp_and_conjunction_are_left_alone_without_files() -> TestResult {
    let h = Harness::new(FakeRunner::new())?;
    h.add("Tag", "--tag $dt a+b")?;

    let ticket = started(h.deck.start_or_toggle("Tag", Vec::new())?);
    assert_eq!(with_timeout(ticket.wait()).await, RunState::Completed);
    assert_eq!(h.fake.arguments(), vec!["--tag $dt a+b"]);
    Ok(())
}

#[tokio::test]
async fn failures_inside_a_batch_do_not_stop_it() -> TestResult {
    let fake = FakeRunner::with_results([
        RunResult::Exited(2),
        RunResult::SpawnError("permission denied".to_string()),
    ]);
    let mut h = Harness::new(fake)?;
    h.add("Lint", "$file")?;

    let ticket = started(h.deck.start_or_toggle("Lint", files(&["a", "b", "c"]))?);
    assert_eq!(with_timeout(ticket.wait()).await, RunState::Completed);
    assert_eq!(h.fake.calls(), 3);

    let lines = h.log_lines();
    assert!(lines.contains(&"Process exited with code 2".to_string()));
    Ok(())
}

#[tokio::test]
async fn subscribers_see_progress_and_state_changes() -> TestResult {
    let h = Harness::new(FakeRunner::new())?;
    h.add("Echo", "$file")?;
    let mut events = h.deck.subscribe();

    let ticket = started(h.deck.start_or_toggle("Echo", files(&["a", "b"]))?);
    with_timeout(ticket.wait()).await;

    let mut seen = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => seen.push(event),
            Err(TryRecvError::Empty) => break,
            Err(err) => return Err(err.into()),
        }
    }

    let state = |state| RunEvent::StateChanged {
        command: "Echo".to_string(),
        state,
    };
    let progress = |current| RunEvent::Progress {
        command: "Echo".to_string(),
        current,
        total: 2,
    };
    assert_eq!(
        seen,
        vec![
            state(RunState::Running),
            progress(1),
            progress(2),
            state(RunState::Completed),
            state(RunState::Idle),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn shutdown_cancels_every_run() -> TestResult {
    let h = Harness::new(FakeRunner::holding())?;
    h.add("A", "$file")?;
    h.add("B", "")?;

    let a = started(h.deck.start_or_toggle("A", files(&["x", "y"]))?);
    let b = started(h.deck.start_or_toggle("B", Vec::new())?);
    wait_for_calls(&h.fake, 2).await;

    h.deck.shutdown();
    assert_eq!(with_timeout(a.wait()).await, RunState::Cancelled);
    assert_eq!(with_timeout(b.wait()).await, RunState::Cancelled);
    assert!(h.deck.orchestrator().runs().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_command_is_reported() -> TestResult {
    let mut h = Harness::new(FakeRunner::new())?;

    let err = h.deck.start_or_toggle("Nope", Vec::new()).unwrap_err();
    assert!(matches!(err, CmdeckError::UnknownCommand(_)));
    assert_eq!(h.log_lines(), vec!["Command error: Unknown command: Nope"]);
    Ok(())
}

#[tokio::test]
async fn deck_saves_and_reloads_commands() -> TestResult {
    let mut h = Harness::new(FakeRunner::new())?;
    h.add("One", "$file")?;
    h.add("Two", "")?;

    assert_eq!(h.deck.save_commands()?, 2);
    h.deck.registry().remove("One")?;
    assert_eq!(h.deck.load_commands()?, 2);
    assert_eq!(h.deck.registry().names(), vec!["One", "Two"]);

    std::fs::write(h.deck.commands_file(), "not json")?;
    assert!(h.deck.load_commands().is_err());
    assert_eq!(h.deck.list_commands().len(), 2);

    let lines = h.log_lines();
    assert!(lines.contains(&"Settings saved successfully.".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("Error loading settings: ")));
    Ok(())
}
