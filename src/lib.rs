//! # softcheck
//!
//! Soft assertions for sequential test suites: run every check, collect the
//! failures, fail once with the full list.
//!
//! A plain case keeps the usual semantics: the first failed check aborts
//! it. A soft case flips that around: every check runs, failures are
//! collected in order, and the case fails once at the end with a numbered
//! report. Non-check failures (body errors, panics, failed chain steps) are
//! untouched either way: they abort the case immediately and the collected
//! failures are discarded.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use softcheck::{BodyOutcome, Suite};
//!
//! let mut suite = Suite::new();
//!
//! suite.soft_case("invoice totals", |ctx| {
//!     ctx.check_eq(&invoice.subtotal, &980, "subtotal");
//!     ctx.check_eq(&invoice.vat, &186, "vat");
//!     ctx.expect(invoice.footer.as_str()).to_contain("thank you");
//!     BodyOutcome::done()
//! });
//!
//! let report = suite.run();
//! assert!(report.all_passed());
//! ```
//!
//! If `subtotal` and `footer` are both wrong, the case fails once:
//!
//! ```text
//! ================================================================================
//! SOFT ASSERTION FAILURES (2 failed):
//! ================================================================================
//!   1. subtotal: expected 980, got 960
//!   2. expected "regards" to contain "thank you"
//! ================================================================================
//! ```
//!
//! ## Async and chained bodies
//!
//! A body says how it finishes by returning a [`BodyOutcome`]: `done()` for
//! synchronous work, `deferred(future)` when the rest of the work is async,
//! or a [`CommandChain`] of queued steps. Aggregation always runs after the
//! body's last deferred piece of work, never before.
//!
//! ```rust,ignore
//! suite.soft_case("eventually consistent", |ctx| {
//!     let ctx2 = ctx.clone();
//!     BodyOutcome::deferred(async move {
//!         let state = fetch_state().await?;
//!         ctx2.check_eq(&state.replicas, &3, "replica count");
//!         Ok(())
//!     })
//! });
//! ```

pub mod chain;
pub mod context;
pub mod engine;
pub mod fluent;
pub mod output;
pub mod record;
pub mod report;
pub mod runner;
pub mod session;
pub mod soft;
pub mod suite;

// Core types
pub use chain::CommandChain;
pub use context::TestContext;
pub use record::{FailureBuffer, FailureRecord};
pub use report::AggregatedAssertionFailure;
pub use session::{ArmGuard, SoftSession};

// Registration and execution
pub use runner::{CaseOutcome, FailureKind, RunReport, Runner, TestStatus};
pub use suite::{BodyOutcome, RunMode, Suite, TestHandle};

// Assertion seam
pub use engine::{CollectingHandler, Disposition, Engine, FailureHandler, StrictHandler};
pub use fluent::Expectation;

// Output formatting
pub use output::{OutputConfig, OutputFormatter, OutputMode};
