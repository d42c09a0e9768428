//! The execution context handed to every test body.
//!
//! All checks (the `check_*` helpers here and the fluent [`Expectation`]
//! surface) funnel through one core entry point, [`TestContext::verify`].
//! That single seam is what the collecting handler overrides, so every
//! assertion style gets soft semantics for free inside a soft case.
//!
//! # Example
//!
//! ```rust,ignore
//! use softcheck::{BodyOutcome, Suite};
//!
//! let mut suite = Suite::new();
//! suite.soft_case("totals line up", |ctx| {
//!     ctx.check_eq(&subtotal(), &980, "subtotal");
//!     ctx.check_true(receipt().contains("VAT"), "receipt mentions VAT");
//!     ctx.expect(line_count()).to_equal(4);
//!     BodyOutcome::done()
//! });
//! ```

use std::fmt;
use std::sync::Arc;

use crate::engine::{Disposition, Engine};
use crate::fluent::Expectation;
use crate::record::FailureRecord;
use crate::session::SoftSession;

/// Execution context for one test case.
///
/// Cheap to clone; clones share the same session and engine, so a context
/// moved into an async body or a chain step still reports into the same run.
#[derive(Debug, Clone)]
pub struct TestContext {
    title: Arc<str>,
    session: SoftSession,
    engine: Engine,
}

impl TestContext {
    /// Create a fresh context. The runner does this per case; creating one
    /// directly is useful for driving checks outside a suite.
    pub fn new(title: &str) -> Self {
        Self {
            title: Arc::from(title),
            session: SoftSession::new(),
            engine: Engine::new(),
        }
    }

    /// Title of the test this context belongs to.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn session(&self) -> &SoftSession {
        &self.session
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Core check entry point: evaluate and raise on failure.
    ///
    /// Passing checks return immediately; the message closure only runs on
    /// failure. A failed check becomes a [`FailureRecord`] and goes through
    /// the engine: suppressed-and-recorded in an armed soft case, otherwise
    /// propagated by panicking with the failure message.
    pub fn verify(&self, passed: bool, message: impl FnOnce() -> String) {
        if passed {
            return;
        }
        let record = FailureRecord::capture(message());
        match self.engine.dispatch(record, &self.session) {
            Disposition::Suppressed => {}
            Disposition::Propagate(record) => {
                panic!("check failed: {}", record.message);
            }
        }
    }

    /// Check an already-evaluated condition with a fixed message.
    pub fn check(&self, passed: bool, message: impl Into<String>) {
        let message = message.into();
        self.verify(passed, || message);
    }

    /// Unconditional failure, for branches that should be unreachable.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.verify(false, || message);
    }

    pub fn check_true(&self, condition: bool, label: &str) {
        self.verify(condition, || format!("{label}: expected true, got false"));
    }

    pub fn check_false(&self, condition: bool, label: &str) {
        self.verify(!condition, || format!("{label}: expected false, got true"));
    }

    pub fn check_eq<A, B>(&self, actual: &A, expected: &B, label: &str)
    where
        A: fmt::Debug + PartialEq<B>,
        B: fmt::Debug,
    {
        self.verify(actual == expected, || {
            format!("{label}: expected {expected:?}, got {actual:?}")
        });
    }

    pub fn check_ne<A, B>(&self, actual: &A, unexpected: &B, label: &str)
    where
        A: fmt::Debug + PartialEq<B>,
        B: fmt::Debug,
    {
        self.verify(actual != unexpected, || {
            format!("{label}: expected anything but {unexpected:?}")
        });
    }

    pub fn check_contains(&self, haystack: &str, needle: &str, label: &str) {
        self.verify(haystack.contains(needle), || {
            format!("{label}: expected {haystack:?} to contain {needle:?}")
        });
    }

    /// Start a fluent expectation on a value.
    pub fn expect<T>(&self, actual: T) -> Expectation<'_, T> {
        Expectation::new(self, actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CollectingHandler;

    fn soft_context() -> TestContext {
        let ctx = TestContext::new("unit");
        ctx.engine().install(Arc::new(CollectingHandler));
        ctx
    }

    #[test]
    fn passing_checks_record_nothing() {
        let ctx = soft_context();
        let _guard = ctx.session().arm();
        ctx.check_true(true, "fine");
        ctx.check_eq(&1, &1, "equal");
        assert_eq!(ctx.session().failure_count(), 0);
    }

    #[test]
    fn armed_context_collects_instead_of_panicking() {
        let ctx = soft_context();
        let _guard = ctx.session().arm();
        ctx.check_eq(&1, &2, "numbers");
        ctx.check_contains("hello", "world", "greeting");
        assert_eq!(ctx.session().failure_count(), 2);
    }

    #[test]
    #[should_panic(expected = "check failed: numbers: expected 2, got 1")]
    fn disarmed_context_panics_on_first_failure() {
        let ctx = soft_context();
        ctx.check_eq(&1, &2, "numbers");
    }

    #[test]
    #[should_panic(expected = "check failed")]
    fn strict_engine_panics_even_while_armed() {
        let ctx = TestContext::new("unit");
        let _guard = ctx.session().arm();
        ctx.check_true(false, "strict");
    }

    #[test]
    fn messages_read_like_the_check() {
        let ctx = soft_context();
        let _guard = ctx.session().arm();
        ctx.check_ne(&5, &5, "five");
        ctx.fail("explicit failure");
        let drained = ctx.session().drain();
        assert_eq!(drained[0].message, "five: expected anything but 5");
        assert_eq!(drained[1].message, "explicit failure");
    }
}
