//! Sequential test execution.
//!
//! The runner drives one case at a time in registration order. Deferred
//! bodies run to completion on a current-thread tokio runtime before the
//! next case starts, so every check a body queues executes and is captured
//! before that case's aggregation, and no two cases ever overlap.
//!
//! Whatever a case did (pass, fail, or panic), the runner resets the case's
//! session afterwards, so no armed flag or stale buffer can outlive it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::Result;
use futures::future::BoxFuture;
use futures::FutureExt;

#[cfg(feature = "json")]
use serde::Serialize;

use crate::context::TestContext;
use crate::output::{OutputConfig, OutputFormatter};
use crate::report::AggregatedAssertionFailure;
use crate::suite::{BodyOutcome, RunMode, Suite, TestBody};

/// Why a case failed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub enum FailureKind {
    /// One or more collected check failures, reported as a single aggregate.
    Aggregated { count: usize },
    /// Anything else: a body error, a chain-step error, or a panic. These
    /// abort the case immediately and never show the aggregation banner.
    Hard,
}

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub enum TestStatus {
    Passed,
    Skipped,
    Failed { kind: FailureKind, message: String },
}

impl TestStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TestStatus::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestStatus::Failed { .. })
    }

    fn failed_hard(message: String) -> Self {
        TestStatus::Failed {
            kind: FailureKind::Hard,
            message,
        }
    }
}

/// One title/status pair from a run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct CaseOutcome {
    pub title: String,
    pub status: TestStatus,
}

/// Results of running a suite.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct RunReport {
    outcomes: Vec<CaseOutcome>,
}

impl RunReport {
    pub(crate) fn new(outcomes: Vec<CaseOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> usize {
        self.count(TestStatus::is_passed)
    }

    pub fn failed(&self) -> usize {
        self.count(TestStatus::is_failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(TestStatus::is_skipped)
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&TestStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }

    /// Serialize the report for tooling.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Executes a [`Suite`] case by case.
pub struct Runner {
    formatter: OutputFormatter,
    runtime: tokio::runtime::Runtime,
}

impl Runner {
    pub fn new() -> Self {
        Self::with_config(OutputConfig::default())
    }

    pub fn with_config(config: OutputConfig) -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("current-thread tokio runtime should build");
        Self {
            formatter: OutputFormatter::new(config),
            runtime,
        }
    }

    /// Run every case in registration order and return the report.
    ///
    /// When at least one `only` case is registered, all non-`only` cases are
    /// skipped for the run.
    pub fn run(&self, suite: Suite) -> RunReport {
        let cases = suite.into_cases();
        let restricted = cases.iter().any(|case| case.mode == RunMode::Only);

        let mut outcomes = Vec::with_capacity(cases.len());
        for case in cases {
            let excluded = restricted && case.mode != RunMode::Only;
            let status = match case.body {
                Some(body) if case.mode != RunMode::Skip && !excluded => {
                    self.run_case(&case.title, body)
                }
                _ => TestStatus::Skipped,
            };
            self.formatter.print_case(&case.title, &status);
            outcomes.push(CaseOutcome {
                title: case.title,
                status,
            });
        }

        let report = RunReport::new(outcomes);
        self.formatter.print_summary(&report);
        report
    }

    fn run_case(&self, title: &str, body: TestBody) -> TestStatus {
        let ctx = TestContext::new(title);
        let run_ctx = ctx.clone();

        let status = match panic::catch_unwind(AssertUnwindSafe(move || body(run_ctx))) {
            Err(payload) => TestStatus::failed_hard(panic_message(payload)),
            Ok(BodyOutcome::Immediate(result)) => classify(result),
            Ok(BodyOutcome::Deferred(future)) => self.drive(future),
            Ok(BodyOutcome::Chained(chain)) => {
                let chain_ctx = ctx.clone();
                match panic::catch_unwind(AssertUnwindSafe(move || chain.run(&chain_ctx))) {
                    Ok(result) => classify(result),
                    Err(payload) => TestStatus::failed_hard(panic_message(payload)),
                }
            }
        };

        // Teardown net: nothing from this case survives into the next.
        ctx.session().reset();
        status
    }

    /// Drive a deferred body to completion, catching panics inside it.
    fn drive(&self, future: BoxFuture<'static, Result<()>>) -> TestStatus {
        match self.runtime.block_on(AssertUnwindSafe(future).catch_unwind()) {
            Ok(result) => classify(result),
            Err(payload) => TestStatus::failed_hard(panic_message(payload)),
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a body result onto a status, telling aggregates apart from hard
/// failures by downcast.
fn classify(result: Result<()>) -> TestStatus {
    match result {
        Ok(()) => TestStatus::Passed,
        Err(err) => match err.downcast_ref::<AggregatedAssertionFailure>() {
            Some(aggregate) => TestStatus::Failed {
                kind: FailureKind::Aggregated {
                    count: aggregate.count(),
                },
                message: err.to_string(),
            },
            None => TestStatus::failed_hard(format!("{err:#}")),
        },
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "test body panicked".to_string()
    }
}
