//! Walkthrough of soft cases: collected failures, hard failures, and chains.
//!
//! Run with: `cargo run --example soft-demo`

use softcheck::{BodyOutcome, CommandChain, OutputConfig, OutputMode, Suite};

fn main() {
    let mut suite = Suite::new();

    // Every failed check is collected; the case fails once with the list.
    suite.soft_case("collects every failure", |ctx| {
        ctx.check_eq(&(2 + 2), &5, "arithmetic");
        ctx.check_true("rust".starts_with("go"), "prefix");
        ctx.expect("hello world").to_contain("universe");
        BodyOutcome::done()
    });

    // Passing checks stay silent.
    suite.soft_case("passes quietly", |ctx| {
        ctx.check_eq(&(2 + 2), &4, "arithmetic");
        ctx.expect(Some(42)).to_be_some();
        BodyOutcome::done()
    });

    // A body error is a hard failure: no banner, collected checks discarded.
    suite.soft_case("hard failures abort", |ctx| {
        ctx.check_true(false, "collected then discarded");
        BodyOutcome::failed(anyhow::anyhow!("backend unreachable"))
    });

    // Deferred steps run after the body returns; aggregation runs last.
    suite.soft_case("chained checks", |_ctx| {
        CommandChain::new()
            .then(|ctx| {
                ctx.check_eq(&1, &2, "first step");
                Ok(())
            })
            .then(|ctx| {
                ctx.check_eq(&3, &3, "second step");
                Ok(())
            })
            .into()
    });

    suite.soft_case_skip("not today", |_ctx| BodyOutcome::done());

    let report = suite.run_with(OutputConfig::new().details(OutputMode::OnFailure));
    println!(
        "\ndone: {} passed, {} failed, {} skipped",
        report.passed(),
        report.failed(),
        report.skipped()
    );
}
