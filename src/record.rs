//! Captured check failures and the ordered buffer that holds them.

use std::backtrace::{Backtrace, BacktraceStatus};

#[cfg(feature = "json")]
use serde::Serialize;

/// A single captured check failure.
///
/// Records are created when a collecting session suppresses a failure and are
/// immutable afterwards. Encounter order is what the aggregate report prints,
/// so the buffer never reorders them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct FailureRecord {
    /// Human-readable failure message.
    pub message: String,
    /// Rendered backtrace, when backtrace capture is enabled.
    pub stack: Option<String>,
}

impl FailureRecord {
    /// Create a record with no backtrace.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    /// Create a record, capturing a backtrace if `RUST_BACKTRACE` asks for one.
    pub fn capture(message: impl Into<String>) -> Self {
        let backtrace = Backtrace::capture();
        let stack = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self {
            message: message.into(),
            stack,
        }
    }
}

/// Ordered collection of [`FailureRecord`]s for one running test.
///
/// Empty at the start of every collecting test and empty again once the
/// aggregate report has drained it (or a hard failure has discarded it).
#[derive(Debug, Default)]
pub struct FailureBuffer {
    records: Vec<FailureRecord>,
}

impl FailureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all records. Used at test start.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Add a record at the end, preserving encounter order.
    pub fn append(&mut self, record: FailureRecord) {
        self.records.push(record);
    }

    /// Take the current records and clear the buffer in one step.
    ///
    /// The take and the clear are the same operation, so nothing appended
    /// before the drain can be lost and nothing lingers for the next test.
    pub fn drain(&mut self) -> Vec<FailureRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_encounter_order() {
        let mut buffer = FailureBuffer::new();
        buffer.append(FailureRecord::new("first"));
        buffer.append(FailureRecord::new("second"));
        buffer.append(FailureRecord::new("third"));

        let drained = buffer.drain();
        let messages: Vec<&str> = drained.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn drain_clears_the_buffer() {
        let mut buffer = FailureBuffer::new();
        buffer.append(FailureRecord::new("only"));

        let drained = buffer.drain();
        assert_eq!(drained.len(), 1);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn reset_discards_records() {
        let mut buffer = FailureBuffer::new();
        buffer.append(FailureRecord::new("stale"));
        buffer.reset();
        assert!(buffer.is_empty());
    }

    #[test]
    fn new_record_has_no_stack() {
        let record = FailureRecord::new("message");
        assert_eq!(record.message, "message");
        assert!(record.stack.is_none());
    }
}
