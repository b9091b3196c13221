//! Utilities for collecting diagnostics.
//!
//! The coil and wire advisors swallow [`crate::Severity::Error`]-level
//! failures per-candidate (a pattern that does not fit, a wire that does not
//! survive filtering) rather than propagating them, but a trail of what was
//! tried and discarded must remain available to the caller. `read_log()`
//! implementations return an [`IssueSet`] of [`LogEntry`] built up over the
//! course of an advisor call.

#![warn(missing_docs)]

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// A diagnostic issue that should be reported to users.
pub trait Diagnostic: Debug + Display {
    /// Returns the severity of this issue.
    ///
    /// The default implementation returns [`Severity::default`].
    fn severity(&self) -> Severity {
        Default::default()
    }
}

/// An enumeration of possible severity levels.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    /// An informational message.
    Info,
    /// A warning: a candidate was discarded but the overall operation can
    /// still succeed.
    #[default]
    Warning,
    /// An error: the overall operation could not produce any result.
    Error,
}

/// A single entry in an advisor's log trail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity of this entry.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// An optional reference identifying which candidate this entry
    /// concerns (e.g. a coil-pattern reference string).
    pub candidate_reference: Option<String>,
}

impl LogEntry {
    /// Creates a new informational entry.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            candidate_reference: None,
        }
    }

    /// Creates a new warning entry, recording which candidate it concerns.
    pub fn warning(message: impl Into<String>, candidate_reference: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            candidate_reference: Some(candidate_reference.into()),
        }
    }

    /// Creates a new error entry.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            candidate_reference: None,
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.candidate_reference {
            Some(reference) => write!(f, "[{:?}] {} ({reference})", self.severity, self.message),
            None => write!(f, "[{:?}] {}", self.severity, self.message),
        }
    }
}

impl Diagnostic for LogEntry {
    fn severity(&self) -> Severity {
        self.severity
    }
}

/// A collection of issues, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct IssueSet<T> {
    issues: Vec<T>,
    num_errors: usize,
    num_warnings: usize,
}

impl<T> IssueSet<T> {
    /// Creates a new, empty issue set.
    #[inline]
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            num_errors: 0,
            num_warnings: 0,
        }
    }

    /// Returns an iterator over all issues in the set.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.issues.iter()
    }

    /// The number of issues in this issue set.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if this issue set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<T: Diagnostic> IssueSet<T> {
    /// Adds the given issue to the issue set.
    #[inline]
    pub fn add(&mut self, issue: T) {
        match issue.severity() {
            Severity::Error => self.num_errors += 1,
            Severity::Warning => self.num_warnings += 1,
            Severity::Info => (),
        };
        self.issues.push(issue);
    }

    /// Returns `true` if this issue set contains an error.
    pub fn has_error(&self) -> bool {
        self.num_errors > 0
    }

    /// The number of errors in this issue set.
    #[inline]
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    /// The number of warnings in this issue set.
    #[inline]
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_errors_and_warnings_separately() {
        let mut set = IssueSet::new();
        set.add(LogEntry::info("starting"));
        set.add(LogEntry::warning("pattern dropped", "pattern-2"));
        set.add(LogEntry::error("no candidates fit"));
        assert_eq!(set.len(), 3);
        assert_eq!(set.num_warnings(), 1);
        assert_eq!(set.num_errors(), 1);
        assert!(set.has_error());
    }
}
