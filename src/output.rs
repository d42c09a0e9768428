//! Output formatting for suite runs.
//!
//! Configurable display for per-case status lines and failure details, with
//! support for showing failure messages either always, on failure, or never.
//!
//! # Example
//!
//! ```rust,ignore
//! use softcheck::{OutputConfig, OutputMode};
//!
//! let config = OutputConfig::new()
//!     .details(OutputMode::Always)
//!     .colors(false);
//!
//! suite.run_with(config);
//! ```

use std::io::IsTerminal;

use crate::runner::{RunReport, TestStatus};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// When to display output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Always show output regardless of test result.
    Always,
    /// Only show output when a case fails (default for details).
    #[default]
    OnFailure,
    /// Never show output.
    Never,
}

/// Configuration for run output.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// When to show per-case status lines and the summary.
    pub statuses: OutputMode,
    /// When to show failure message blocks under a case line.
    pub details: OutputMode,
    /// Whether to use ANSI colors in output.
    pub colors_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            statuses: OutputMode::Always,
            details: OutputMode::OnFailure,
            colors_enabled: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputConfig {
    /// Defaults: status lines always, failure details on failure, colors
    /// auto-detected from the terminal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure when to show per-case status lines.
    pub fn statuses(mut self, mode: OutputMode) -> Self {
        self.statuses = mode;
        self
    }

    /// Configure when to show failure details.
    pub fn details(mut self, mode: OutputMode) -> Self {
        self.details = mode;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    /// Configuration that prints nothing. Useful when the report is consumed
    /// programmatically.
    pub fn quiet() -> Self {
        Self {
            statuses: OutputMode::Never,
            details: OutputMode::Never,
            colors_enabled: false,
        }
    }
}

/// Prints case lines and the run summary.
pub struct OutputFormatter {
    config: OutputConfig,
}

impl OutputFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(OutputConfig::new())
    }

    fn should_show(&self, mode: OutputMode, failed: bool) -> bool {
        match mode {
            OutputMode::Always => true,
            OutputMode::OnFailure => failed,
            OutputMode::Never => false,
        }
    }

    /// Format one case line: `✓ title`, `✗ title`, or `- title`.
    pub fn format_case(&self, title: &str, status: &TestStatus) -> String {
        let (glyph, color) = match status {
            TestStatus::Passed => ("✓", GREEN),
            TestStatus::Failed { .. } => ("✗", RED),
            TestStatus::Skipped => ("-", YELLOW),
        };
        if self.config.colors_enabled {
            format!("{color}{glyph}{RESET} {title}")
        } else {
            format!("{glyph} {title}")
        }
    }

    /// Print one case line, with the failure message indented below it when
    /// the details mode allows.
    pub fn print_case(&self, title: &str, status: &TestStatus) {
        if self.should_show(self.config.statuses, status.is_failed()) {
            println!("{}", self.format_case(title, status));
        }
        if let TestStatus::Failed { message, .. } = status {
            if self.should_show(self.config.details, true) {
                for line in message.lines() {
                    println!("    {line}");
                }
            }
        }
    }

    /// Format the run summary line.
    pub fn format_summary(&self, report: &RunReport) -> String {
        let summary = format!(
            "{} passed, {} failed, {} skipped",
            report.passed(),
            report.failed(),
            report.skipped()
        );
        if !self.config.colors_enabled {
            return summary;
        }
        let color = if report.all_passed() { GREEN } else { RED };
        format!("{color}{summary}{RESET}")
    }

    pub fn print_summary(&self, report: &RunReport) {
        if self.should_show(self.config.statuses, !report.all_passed()) {
            println!();
            println!("{}", self.format_summary(report));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::FailureKind;

    fn plain() -> OutputFormatter {
        OutputFormatter::new(OutputConfig::new().colors(false))
    }

    #[test]
    fn case_lines_use_status_glyphs() {
        let formatter = plain();
        assert_eq!(formatter.format_case("ok", &TestStatus::Passed), "✓ ok");
        assert_eq!(formatter.format_case("off", &TestStatus::Skipped), "- off");
        let failed = TestStatus::Failed {
            kind: FailureKind::Hard,
            message: "boom".to_string(),
        };
        assert_eq!(formatter.format_case("bad", &failed), "✗ bad");
    }

    #[test]
    fn colors_wrap_the_glyph() {
        let formatter = OutputFormatter::new(OutputConfig::new().colors(true));
        let line = formatter.format_case("ok", &TestStatus::Passed);
        assert!(line.starts_with(GREEN));
        assert!(line.contains(RESET));
    }

    #[test]
    fn summary_counts_every_status() {
        let formatter = plain();
        let report = RunReport::default();
        assert_eq!(
            formatter.format_summary(&report),
            "0 passed, 0 failed, 0 skipped"
        );
    }

    #[test]
    fn on_failure_mode_gates_on_result() {
        let formatter = plain();
        assert!(formatter.should_show(OutputMode::OnFailure, true));
        assert!(!formatter.should_show(OutputMode::OnFailure, false));
        assert!(formatter.should_show(OutputMode::Always, false));
        assert!(!formatter.should_show(OutputMode::Never, true));
    }
}
