// tests/log_pipeline.rs

use std::error::Error;

use cmdeck::config::LogSection;
use cmdeck::log::{LineStyle, LogControl, LogPipeline, LogSink};
use cmdeck::types::LogColor;
use cmdeck_test_utils::{RecordingSink, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn section(history_cap: usize, batch_size: usize) -> LogSection {
    LogSection {
        history_cap,
        batch_size,
        ..LogSection::default()
    }
}

fn history_texts(pipeline: &LogPipeline<RecordingSink>) -> Vec<String> {
    pipeline.history().iter().map(|e| e.text.clone()).collect()
}

#[test]
fn history_keeps_only_the_newest_entries_in_order() {
    init_tracing();
    let cap = 200;
    let (mut pipeline, log) = LogPipeline::new(&section(cap, 500), RecordingSink::new());

    for i in 0..cap + 1000 {
        log.emit(format!("line {i}"));
    }
    pipeline.drain_all();

    let expected: Vec<String> = (1000..cap + 1000).map(|i| format!("line {i}")).collect();
    assert_eq!(pipeline.history().len(), cap);
    assert_eq!(history_texts(&pipeline), expected);
}

#[test]
fn each_tick_drains_at_most_one_batch() {
    let (mut pipeline, log) = LogPipeline::new(&section(1_000, 10), RecordingSink::new());
    for i in 0..25 {
        log.emit(format!("{i}"));
    }

    assert_eq!(pipeline.flush_tick(), 10);
    assert_eq!(log.pending(), 15);
    assert_eq!(pipeline.sink().line_count(), 10);
    assert_eq!(pipeline.flush_tick(), 10);
    assert_eq!(pipeline.flush_tick(), 5);
    assert_eq!(pipeline.flush_tick(), 0);

    let expected: Vec<String> = (0..25).map(|i| i.to_string()).collect();
    assert_eq!(pipeline.sink().texts(), expected);
}

#[test]
fn pause_holds_entries_and_unpause_releases_them_in_order() {
    let (mut pipeline, log) = LogPipeline::new(&section(1_000, 500), RecordingSink::new());

    log.emit("before");
    log.set_paused(true);
    log.emit("held 1");
    log.emit("held 2");

    pipeline.drain_all();
    assert_eq!(pipeline.sink().texts(), vec!["before"]);
    assert_eq!(log.held(), 2);
    assert!(log.is_paused());

    log.set_paused(false);
    log.emit("after");
    pipeline.drain_all();

    assert_eq!(log.held(), 0);
    assert_eq!(
        pipeline.sink().texts(),
        vec!["before", "held 1", "held 2", "after"]
    );
}

#[test]
fn disabled_logging_drops_entries_and_skips_formatting() {
    let (mut pipeline, log) = LogPipeline::new(&section(1_000, 500), RecordingSink::new());
    log.set_enabled(false);

    log.emit("dropped");
    log.emit_with(None, false, || panic!("message must not be built"));
    assert_eq!(log.pending(), 0);

    pipeline.drain_all();
    assert!(pipeline.history().is_empty());
    assert_eq!(pipeline.sink().line_count(), 0);
}

#[test]
fn changing_the_filter_rerenders_from_history() {
    let (mut pipeline, log) = LogPipeline::new(&section(1_000, 500), RecordingSink::new());
    for text in ["apple", "banana", "APPLE pie", "\x1b[31mapp\x1b[0mle red"] {
        log.emit(text);
    }
    pipeline.drain_all();

    // User scrolled up: the re-render must not jump to the bottom.
    pipeline.sink_mut().set_at_bottom(false);
    pipeline.set_filter("apple", true);

    assert!(pipeline.filter().is_active());
    assert_eq!(
        pipeline.sink().texts(),
        vec!["apple", "APPLE pie", "apple red"]
    );
    assert_eq!(pipeline.sink().scrolls_to_bottom, 0);

    // New lines are filtered as they arrive.
    log.emit("cherry");
    log.emit("apple again");
    pipeline.drain_all();
    assert_eq!(pipeline.sink().texts().last().map(String::as_str), Some("apple again"));
    assert_eq!(pipeline.sink().line_count(), 4);

    // Back at the bottom: turning the filter off re-renders everything and
    // stays at the bottom.
    pipeline.sink_mut().set_at_bottom(true);
    pipeline.set_filter("apple", false);
    assert_eq!(pipeline.sink().line_count(), 6);
    assert_eq!(pipeline.sink().scrolls_to_bottom, 1);
    assert_eq!(pipeline.history().len(), 6);
}

#[test]
fn sink_is_trimmed_once_it_exceeds_cap_plus_slack() {
    let settings = LogSection {
        history_cap: 10,
        trim_slack: 5,
        ..LogSection::default()
    };
    let (mut pipeline, log) = LogPipeline::new(&settings, RecordingSink::new());

    for i in 0..13 {
        log.emit(format!("{i}"));
    }
    pipeline.drain_all();
    assert_eq!(pipeline.sink().line_count(), 13);

    for i in 13..16 {
        log.emit(format!("{i}"));
    }
    pipeline.drain_all();

    let expected: Vec<String> = (6..16).map(|i| i.to_string()).collect();
    assert_eq!(pipeline.sink().texts(), expected);
}

#[test]
fn clear_empties_history_and_sink() {
    let (mut pipeline, log) = LogPipeline::new(&section(1_000, 500), RecordingSink::new());
    log.emit("one");
    log.emit("two");
    pipeline.drain_all();

    pipeline.clear_history();
    assert!(pipeline.history().is_empty());
    assert_eq!(pipeline.sink().line_count(), 0);
    assert_eq!(pipeline.sink().clears, 1);
}

#[test]
fn error_markers_and_explicit_colors_style_lines() {
    let (mut pipeline, log) = LogPipeline::new(&section(1_000, 500), RecordingSink::new());
    log.emit("[ERR] broken pipe");
    log.emit_styled("done", Some(LogColor::SUCCESS), false);
    log.emit_styled("Exception: told you", Some(LogColor::BANNER), false);
    log.emit("plain");
    pipeline.drain_all();

    let styles: Vec<LineStyle> = pipeline.sink().lines.iter().map(|l| l.base).collect();
    assert_eq!(styles[0], LineStyle::ERROR);
    assert_eq!(styles[1].color, Some(LogColor::Green));
    // An explicit colour wins over auto-detection.
    assert_eq!(styles[2].color, Some(LogColor::Cyan));
    assert_eq!(styles[3], LineStyle::PLAIN);
}

#[tokio::test]
async fn running_pipeline_applies_control_messages_and_drains_on_close() -> TestResult {
    init_tracing();
    let (pipeline, log) = LogPipeline::new(&section(1_000, 3), RecordingSink::new());
    let task = tokio::spawn(pipeline.run());

    log.set_filter("keep", true);
    for i in 0..10 {
        log.emit(format!("keep {i}"));
        log.emit(format!("drop {i}"));
    }
    log.close();

    let sink = with_timeout(task).await?;
    let expected: Vec<String> = (0..10).map(|i| format!("keep {i}")).collect();
    assert_eq!(sink.texts(), expected);
    Ok(())
}

#[test]
fn control_messages_map_onto_pipeline_operations() {
    let (mut pipeline, log) = LogPipeline::new(&section(1_000, 500), RecordingSink::new());
    log.emit("old");
    pipeline.drain_all();

    assert!(pipeline.apply(LogControl::Clear));
    assert!(pipeline.history().is_empty());

    log.emit("new");
    pipeline.drain_all();
    assert!(pipeline.apply(LogControl::SetFilter {
        text: "zzz".to_string(),
        active: true,
    }));
    assert_eq!(pipeline.sink().line_count(), 0);
    assert_eq!(pipeline.history().len(), 1);

    assert!(!pipeline.apply(LogControl::Shutdown));
}
