//! Build-time diagnostics channel.
//!
//! Validation issues and emission failures are reported through a
//! [`DiagnosticSink`]. The CLI uses [`TracingDiagnostics`], which forwards each
//! report to `tracing`; tests and embedding hosts can use
//! [`CollectedDiagnostics`] to inspect what was reported.

use std::fmt::{self, Display, Formatter};

/// How serious a reported problem is.
///
/// Any [`Severity::Error`] marks the round as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Reported, but the round can still succeed.
    Warning,
    /// The round fails.
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Receive problems reported during a round.
pub trait DiagnosticSink {
    /// Report `message` about `subject` (usually a qualified type name).
    fn report(&mut self, severity: Severity, subject: &str, message: &str);
}

/// Forwards reports to `tracing` and counts them.
#[derive(Debug, Default)]
pub struct TracingDiagnostics {
    warnings: usize,
    errors: usize,
}

impl TracingDiagnostics {
    /// Create a sink with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of warnings reported so far.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }

    /// Number of errors reported so far.
    #[must_use]
    pub const fn errors(&self) -> usize {
        self.errors
    }
}

impl DiagnosticSink for TracingDiagnostics {
    fn report(&mut self, severity: Severity, subject: &str, message: &str) {
        match severity {
            Severity::Warning => {
                self.warnings += 1;
                tracing::warn!(subject, "{message}");
            }
            Severity::Error => {
                self.errors += 1;
                tracing::error!(subject, "{message}");
            }
        }
    }
}

/// One report captured by [`CollectedDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Reported severity.
    pub severity: Severity,
    /// What the report is about.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// Keeps every report in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectedDiagnostics {
    reports: Vec<Report>,
}

impl CollectedDiagnostics {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports in arrival order.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Reports of the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(move |r| r.severity == severity)
    }

    /// Whether any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.with_severity(Severity::Error).next().is_some()
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn report(&mut self, severity: Severity, subject: &str, message: &str) {
        self.reports.push(Report {
            severity,
            subject: subject.to_owned(),
            message: message.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_diagnostics_counts_by_severity() {
        let mut sink = TracingDiagnostics::new();
        sink.report(Severity::Warning, "a.B", "stub generated");
        sink.report(Severity::Error, "a.C", "missing member");
        sink.report(Severity::Error, "a.D", "wrong supertype");
        assert_eq!(sink.warnings(), 1);
        assert_eq!(sink.errors(), 2);
    }

    #[test]
    fn collected_diagnostics_filters_by_severity() {
        let mut sink = CollectedDiagnostics::new();
        sink.report(Severity::Warning, "a.B", "stub generated");
        assert!(!sink.has_errors());
        sink.report(Severity::Error, "a.C", "missing member");
        assert!(sink.has_errors());
        assert_eq!(sink.with_severity(Severity::Warning).count(), 1);
    }
}
