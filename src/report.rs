//! Aggregate failure reporting.
//!
//! At the end of a soft case the buffer is drained; if anything was captured
//! the whole case fails once, with every failure listed in encounter order.
//! Entries are renumbered 1..N over the checks that actually failed, not
//! their positions among all checks.

use thiserror::Error;

use crate::record::FailureRecord;
use crate::session::SoftSession;

const BANNER_WIDTH: usize = 80;

/// The single composite failure raised for a soft case.
///
/// A dedicated type (rather than a bare message) so tooling can tell an
/// aggregate apart from a single native assertion failure by downcast.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AggregatedAssertionFailure {
    count: usize,
    message: String,
}

impl AggregatedAssertionFailure {
    /// How many checks failed.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The full banner-formatted message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Format captured failures into the banner block.
///
/// Layout is a fixed contract: empty line, 80-`=` banner, count header,
/// banner, the numbered list (1-indexed, two-space indent), banner, empty
/// line.
pub fn aggregate_message(records: &[FailureRecord]) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut message = String::new();
    message.push('\n');
    message.push_str(&banner);
    message.push('\n');
    message.push_str(&format!(
        "SOFT ASSERTION FAILURES ({} failed):\n",
        records.len()
    ));
    message.push_str(&banner);
    message.push('\n');
    for (index, record) in records.iter().enumerate() {
        message.push_str(&format!("  {}. {}\n", index + 1, record.message));
    }
    message.push_str(&banner);
    message.push('\n');
    message
}

/// Drain the session and raise the aggregate failure if anything was captured.
///
/// The drain clears the buffer before the message is built, so the next case
/// starts clean even if formatting itself were to unwind. Nothing captured
/// means the case passes silently.
pub fn raise_if_failed(session: &SoftSession) -> Result<(), AggregatedAssertionFailure> {
    let records = session.drain();
    if records.is_empty() {
        return Ok(());
    }
    Err(AggregatedAssertionFailure {
        count: records.len(),
        message: aggregate_message(&records),
    })
}
