//! Fluent expectation API.
//!
//! This is sugar over [`TestContext::verify`]: every terminal method builds a
//! pass/fail outcome plus a message and hands it to the core check entry
//! point, so expectations are soft inside a soft case and strict everywhere
//! else, with no extra wiring.
//!
//! # Example
//!
//! ```rust,ignore
//! ctx.expect(total).to_equal(42);
//! ctx.expect(status).not().to_equal(Status::Pending);
//! ctx.expect(body).to_contain("order confirmed");
//! ctx.expect(user.email()).to_be_some();
//! ```

use std::fmt;

use crate::context::TestContext;

/// Expectation on a single value, created by [`TestContext::expect`].
///
/// Terminal methods (`to_equal`, `to_contain`, ...) evaluate immediately.
/// `not()` flips the sense of the next terminal method.
#[derive(Debug)]
pub struct Expectation<'c, T> {
    ctx: &'c TestContext,
    actual: T,
    negated: bool,
}

impl<'c, T> Expectation<'c, T> {
    pub(crate) fn new(ctx: &'c TestContext, actual: T) -> Self {
        Self {
            ctx,
            actual,
            negated: false,
        }
    }

    /// Invert the expectation.
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    fn verify(&self, passed: bool, message: impl FnOnce() -> String) {
        self.ctx.verify(passed ^ self.negated, message);
    }

    fn sense(&self) -> &'static str {
        if self.negated {
            "not to"
        } else {
            "to"
        }
    }
}

impl<'c, T: fmt::Debug> Expectation<'c, T> {
    pub fn to_equal<U>(self, expected: U)
    where
        T: PartialEq<U>,
        U: fmt::Debug,
    {
        let passed = self.actual == expected;
        self.verify(passed, || {
            format!(
                "expected {:?} {} equal {:?}",
                self.actual,
                self.sense(),
                expected
            )
        });
    }

    /// Check an arbitrary predicate, described in the failure message.
    pub fn to_satisfy(self, description: &str, predicate: impl FnOnce(&T) -> bool) {
        let passed = predicate(&self.actual);
        self.verify(passed, || {
            format!(
                "expected {:?} {} satisfy: {}",
                self.actual,
                self.sense(),
                description
            )
        });
    }
}

impl<'c, T: AsRef<str> + fmt::Debug> Expectation<'c, T> {
    pub fn to_contain(self, needle: &str) {
        let passed = self.actual.as_ref().contains(needle);
        self.verify(passed, || {
            format!(
                "expected {:?} {} contain {:?}",
                self.actual,
                self.sense(),
                needle
            )
        });
    }
}

impl<'c> Expectation<'c, bool> {
    pub fn to_be_true(self) {
        let passed = self.actual;
        self.verify(passed, || {
            format!("expected value {} be true", self.sense())
        });
    }

    pub fn to_be_false(self) {
        let passed = !self.actual;
        self.verify(passed, || {
            format!("expected value {} be false", self.sense())
        });
    }
}

impl<'c, T: fmt::Debug> Expectation<'c, Option<T>> {
    pub fn to_be_some(self) {
        let passed = self.actual.is_some();
        self.verify(passed, || {
            format!("expected {:?} {} be Some", self.actual, self.sense())
        });
    }

    pub fn to_be_none(self) {
        let passed = self.actual.is_none();
        self.verify(passed, || {
            format!("expected {:?} {} be None", self.actual, self.sense())
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::context::TestContext;
    use crate::engine::CollectingHandler;

    fn soft_context() -> TestContext {
        let ctx = TestContext::new("fluent");
        ctx.engine().install(Arc::new(CollectingHandler));
        ctx
    }

    #[test]
    fn passing_expectations_record_nothing() {
        let ctx = soft_context();
        let _guard = ctx.session().arm();

        ctx.expect(5).to_equal(5);
        ctx.expect("hello world").to_contain("world");
        ctx.expect(true).to_be_true();
        ctx.expect(Some(1)).to_be_some();
        ctx.expect(None::<i32>).to_be_none();
        ctx.expect(3).not().to_equal(4);
        ctx.expect(10).to_satisfy("even", |n| n % 2 == 0);

        assert_eq!(ctx.session().failure_count(), 0);
    }

    #[test]
    fn failing_expectations_are_collected_in_order() {
        let ctx = soft_context();
        let _guard = ctx.session().arm();

        ctx.expect(5).to_equal(6);
        ctx.expect("hello").to_contain("bye");

        let drained = ctx.session().drain();
        assert_eq!(drained[0].message, "expected 5 to equal 6");
        assert_eq!(drained[1].message, "expected \"hello\" to contain \"bye\"");
    }

    #[test]
    fn negation_flips_the_outcome_and_message() {
        let ctx = soft_context();
        let _guard = ctx.session().arm();

        ctx.expect(5).not().to_equal(5);

        let drained = ctx.session().drain();
        assert_eq!(drained[0].message, "expected 5 not to equal 5");
    }

    #[test]
    #[should_panic(expected = "check failed: expected value to be true")]
    fn strict_expectation_panics() {
        let ctx = TestContext::new("fluent");
        ctx.expect(false).to_be_true();
    }
}
