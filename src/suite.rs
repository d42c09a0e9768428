//! Test registration: the suite and the shapes a test body can take.
//!
//! A [`Suite`] is an ordered registry of cases. `case` / `case_only` /
//! `case_skip` are the host primitives; the soft variants in the `soft`
//! module wrap them. Cases run strictly in registration order, one at a
//! time, when the suite is handed to a [`Runner`](crate::runner::Runner).
//!
//! # Example
//!
//! ```rust,ignore
//! use softcheck::{BodyOutcome, Suite};
//!
//! let mut suite = Suite::new();
//! suite.case("plain strict case", |ctx| {
//!     ctx.check_eq(&2 + 2, &4, "arithmetic");
//!     BodyOutcome::done()
//! });
//! suite.soft_case("collects every failure", |ctx| {
//!     ctx.check_true(false, "first");
//!     ctx.check_true(false, "second");
//!     BodyOutcome::done()
//! });
//! let report = suite.run();
//! assert_eq!(report.failed(), 1);
//! ```

use std::future::Future;

use anyhow::Result;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::chain::CommandChain;
use crate::context::TestContext;
use crate::output::OutputConfig;
use crate::runner::{RunReport, Runner};

/// How a test body finished its synchronous part.
///
/// The three shapes are explicit so the lifecycle around a body can branch
/// exhaustively instead of sniffing the return value.
pub enum BodyOutcome {
    /// All work completed synchronously.
    Immediate(Result<()>),
    /// The body handed back a future; the test finishes when it settles.
    Deferred(BoxFuture<'static, Result<()>>),
    /// The body queued deferred steps; the test finishes when the chain does.
    Chained(CommandChain),
}

impl BodyOutcome {
    /// Synchronous success.
    pub fn done() -> Self {
        BodyOutcome::Immediate(Ok(()))
    }

    /// Synchronous hard failure.
    pub fn failed(err: anyhow::Error) -> Self {
        BodyOutcome::Immediate(Err(err))
    }

    /// Asynchronous completion.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        BodyOutcome::Deferred(future.boxed())
    }
}

impl From<Result<()>> for BodyOutcome {
    fn from(result: Result<()>) -> Self {
        BodyOutcome::Immediate(result)
    }
}

impl From<CommandChain> for BodyOutcome {
    fn from(chain: CommandChain) -> Self {
        BodyOutcome::Chained(chain)
    }
}

impl std::fmt::Debug for BodyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyOutcome::Immediate(result) => f.debug_tuple("Immediate").field(result).finish(),
            BodyOutcome::Deferred(_) => f.write_str("Deferred(..)"),
            BodyOutcome::Chained(chain) => f.debug_tuple("Chained").field(chain).finish(),
        }
    }
}

/// A registered test body.
pub type TestBody = Box<dyn FnOnce(TestContext) -> BodyOutcome + Send>;

/// Whether a case runs normally, exclusively, or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Normal,
    Only,
    Skip,
}

pub(crate) struct TestCase {
    pub(crate) title: String,
    pub(crate) mode: RunMode,
    pub(crate) body: Option<TestBody>,
}

/// Handle to a registered case.
#[derive(Debug, Clone)]
pub struct TestHandle {
    index: usize,
    title: String,
}

impl TestHandle {
    /// Position of the case in registration order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Ordered registry of test cases.
#[derive(Default)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case.
    pub fn case<B>(&mut self, title: impl Into<String>, body: B) -> TestHandle
    where
        B: FnOnce(TestContext) -> BodyOutcome + Send + 'static,
    {
        self.register(title.into(), RunMode::Normal, Some(Box::new(body)))
    }

    /// Register a restricted-run case: when any `only` case exists, all
    /// other cases are skipped for that run.
    pub fn case_only<B>(&mut self, title: impl Into<String>, body: B) -> TestHandle
    where
        B: FnOnce(TestContext) -> BodyOutcome + Send + 'static,
    {
        self.register(title.into(), RunMode::Only, Some(Box::new(body)))
    }

    /// Register a skipped case. The body is accepted for signature parity
    /// but never stored and never runs.
    pub fn case_skip<B>(&mut self, title: impl Into<String>, _body: B)
    where
        B: FnOnce(TestContext) -> BodyOutcome + Send + 'static,
    {
        self.register(title.into(), RunMode::Skip, None);
    }

    fn register(&mut self, title: String, mode: RunMode, body: Option<TestBody>) -> TestHandle {
        let handle = TestHandle {
            index: self.cases.len(),
            title: title.clone(),
        };
        self.cases.push(TestCase { title, mode, body });
        handle
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub(crate) fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }

    /// Run all cases with default output.
    pub fn run(self) -> RunReport {
        Runner::new().run(self)
    }

    /// Run all cases with the given output configuration.
    pub fn run_with(self, config: OutputConfig) -> RunReport {
        Runner::with_config(config).run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_report_registration_order() {
        let mut suite = Suite::new();
        let first = suite.case("one", |_| BodyOutcome::done());
        let second = suite.case_only("two", |_| BodyOutcome::done());
        suite.case_skip("three", |_| BodyOutcome::done());

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(second.title(), "two");
        assert_eq!(suite.len(), 3);
    }

    #[test]
    fn skip_registers_without_a_body() {
        let mut suite = Suite::new();
        suite.case_skip("never", |_| BodyOutcome::done());
        let cases = suite.into_cases();
        assert_eq!(cases[0].mode, RunMode::Skip);
        assert!(cases[0].body.is_none());
    }

    #[test]
    fn outcome_constructors_match_variants() {
        assert!(matches!(BodyOutcome::done(), BodyOutcome::Immediate(Ok(()))));
        assert!(matches!(
            BodyOutcome::failed(anyhow::anyhow!("boom")),
            BodyOutcome::Immediate(Err(_))
        ));
        assert!(matches!(
            BodyOutcome::deferred(async { Ok(()) }),
            BodyOutcome::Deferred(_)
        ));
        assert!(matches!(
            BodyOutcome::from(CommandChain::new()),
            BodyOutcome::Chained(_)
        ));
    }
}
