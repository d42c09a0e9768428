//! Soft registration: wraps the suite's plain primitives so a case collects
//! every check failure and fails once at the end.
//!
//! The wrapper sequences the lifecycle around the user body: install the
//! collecting handler and arm the session before the body runs, then disarm
//! and raise the aggregate failure only after all of the body's work
//! (synchronous, async, or chained) has finished. Hard failures (body
//! errors, chain-step errors, panics) bypass aggregation: the case aborts
//! with that failure alone and captured soft failures are discarded.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Result;

use crate::context::TestContext;
use crate::engine::CollectingHandler;
use crate::report;
use crate::suite::{BodyOutcome, Suite, TestHandle};

impl Suite {
    /// Register a soft case: every check failure is collected and the case
    /// fails once at the end, listing all of them.
    pub fn soft_case<B>(&mut self, title: impl Into<String>, body: B) -> TestHandle
    where
        B: FnOnce(TestContext) -> BodyOutcome + Send + 'static,
    {
        self.case(title, wrap_soft(body))
    }

    /// Restricted-run variant of [`soft_case`](Suite::soft_case); same
    /// lifecycle, registered as `only`.
    pub fn soft_case_only<B>(&mut self, title: impl Into<String>, body: B) -> TestHandle
    where
        B: FnOnce(TestContext) -> BodyOutcome + Send + 'static,
    {
        self.case_only(title, wrap_soft(body))
    }

    /// Skipped variant: delegates straight to the skip primitive. No mode
    /// changes; the body never runs.
    pub fn soft_case_skip<B>(&mut self, title: impl Into<String>, body: B)
    where
        B: FnOnce(TestContext) -> BodyOutcome + Send + 'static,
    {
        self.case_skip(title, body);
    }
}

/// Wrap a user body with the collecting lifecycle.
fn wrap_soft<B>(body: B) -> impl FnOnce(TestContext) -> BodyOutcome + Send + 'static
where
    B: FnOnce(TestContext) -> BodyOutcome + Send + 'static,
{
    move |ctx: TestContext| {
        ctx.session().reset();
        ctx.engine().install(Arc::new(CollectingHandler));
        let guard = ctx.session().arm();

        // A panic here means the body blew up before any deferred work
        // existed: disarm, restore the strict handler, discard captured
        // failures, and re-raise unchanged.
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| body(ctx.clone()))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                guard.disarm();
                ctx.engine().uninstall();
                ctx.session().reset();
                panic::resume_unwind(payload);
            }
        };

        match outcome {
            BodyOutcome::Immediate(Ok(())) => {
                guard.disarm();
                BodyOutcome::Immediate(finish(&ctx))
            }
            BodyOutcome::Immediate(Err(err)) => {
                guard.disarm();
                ctx.session().reset();
                BodyOutcome::Immediate(Err(err))
            }
            BodyOutcome::Deferred(future) => {
                let ctx = ctx.clone();
                BodyOutcome::deferred(async move {
                    match future.await {
                        Ok(()) => {
                            guard.disarm();
                            finish(&ctx)
                        }
                        Err(err) => {
                            // Rejection is a hard failure: no aggregation,
                            // captured soft failures are discarded.
                            guard.disarm();
                            ctx.session().reset();
                            Err(err)
                        }
                    }
                })
            }
            BodyOutcome::Chained(chain) => {
                // Aggregation becomes the chain's final step, so every
                // queued check runs and is captured first. If an earlier
                // step errors, the chain stops and this step never runs;
                // the guard is dropped with it and the runner's teardown
                // clears the buffer.
                let ctx = ctx.clone();
                BodyOutcome::Chained(chain.then(move |_| {
                    guard.disarm();
                    finish(&ctx)
                }))
            }
        }
    }
}

/// Drain the session and convert a non-empty buffer into the test's failure.
fn finish(ctx: &TestContext) -> Result<()> {
    report::raise_if_failed(ctx.session()).map_err(anyhow::Error::from)
}
