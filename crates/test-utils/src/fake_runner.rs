use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use cmdeck::exec::{ProcessBackend, ProcessRequest, RunResult};

/// A fake process backend that:
/// - records every request it receives
/// - returns scripted results in order, then `Exited(0)`
/// - or, when holding, blocks each run until it is cancelled and reports
///   `Killed`, like a process that never finishes on its own.
#[derive(Default)]
pub struct FakeRunner {
    requests: Mutex<Vec<ProcessRequest>>,
    script: Mutex<VecDeque<RunResult>>,
    hold: bool,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding() -> Self {
        Self {
            hold: true,
            ..Self::default()
        }
    }

    pub fn with_results(results: impl IntoIterator<Item = RunResult>) -> Self {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Expanded argument strings, in call order.
    pub fn arguments(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.arguments.clone())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ProcessBackend for FakeRunner {
    fn run(&self, request: ProcessRequest) -> Pin<Box<dyn Future<Output = RunResult> + Send + '_>> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.script.lock().unwrap().pop_front();
        let hold = self.hold;

        Box::pin(async move {
            if hold {
                request.cancel.cancelled().await;
                return RunResult::Killed;
            }
            scripted.unwrap_or(RunResult::Exited(0))
        })
    }
}
