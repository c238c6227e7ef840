//! Error types for itemforge
//!
//! Provides the structured validation-issue accumulator used by every
//! attribute kind, plus the unified crate error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using ForgeError
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Unified error type for itemforge operations
#[derive(Debug, Error)]
pub enum ForgeError {
    // -------------------------------------------------------------------------
    // Value Validation Errors
    // -------------------------------------------------------------------------
    #[error("validation failed: {0}")]
    Validation(Issues),

    // -------------------------------------------------------------------------
    // Structural Configuration Errors
    // -------------------------------------------------------------------------
    #[error("schema configuration error: {0}")]
    Schema(String),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("usage error: {0}")]
    Usage(String),
}

impl ForgeError {
    /// The accumulated issues, when this is a validation error
    pub fn issues(&self) -> Option<&Issues> {
        match self {
            ForgeError::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

// =============================================================================
// Issue
// =============================================================================

/// A single structured validation issue
///
/// When `message` is absent it is synthesized from `path`, `expected` and
/// `received` on rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// What was being validated ("value", "length", "size", "regex", ...)
    pub path: String,

    /// What the validator wanted ("string", ">=5", "ulid", ...)
    pub expected: Option<String>,

    /// What it got instead ("number", "4", the offending value, ...)
    pub received: Option<String>,

    /// Explicit message; overrides synthesis when present
    pub message: Option<String>,
}

impl Issue {
    /// Create an issue from expected/received tokens
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: Some(expected.into()),
            received: Some(received.into()),
            message: None,
        }
    }

    /// Create an issue carrying an explicit message
    pub fn with_message(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: None,
            received: None,
            message: Some(message.into()),
        }
    }

    /// Rendered message, synthesized when no explicit one was supplied
    pub fn message(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        let expected = self.expected.as_deref().unwrap_or("");
        let received = self.received.as_deref().unwrap_or("");
        format!(
            "\"{}\" is expected to be \"{}\" but received \"{}\"",
            self.path, expected, received
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

// =============================================================================
// Issues (accumulator)
// =============================================================================

/// Ordered, append-only accumulator of validation issues
///
/// Issues are never removed implicitly; clearing happens only through an
/// explicit [`Issues::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issues {
    issues: Vec<Issue>,
}

impl Issues {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single issue
    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Append issues in order, preserving their input order
    pub fn add_issues(&mut self, issues: Issues) {
        self.issues.extend(issues.issues);
    }

    /// True once any issue exists
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Number of accumulated issues
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True when no issue has been recorded
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterate the accumulated issues in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    /// Explicitly clear the accumulator
    pub fn reset(&mut self) {
        self.issues.clear();
    }

    /// Rendered message: all issue messages joined by `", "`, terminated
    /// with `"."`
    pub fn message(&self) -> String {
        let joined = self
            .issues
            .iter()
            .map(Issue::message)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{joined}.")
    }

    /// Prefix every issue path with `prefix.`, used when aggregating
    /// attribute issues at the record level
    pub(crate) fn prefixed(&self, prefix: &str) -> Issues {
        let issues = self
            .issues
            .iter()
            .cloned()
            .map(|mut issue| {
                issue.path = format!("{}.{}", prefix, issue.path);
                issue
            })
            .collect();
        Issues { issues }
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<Issue> for Issues {
    fn from(issue: Issue) -> Self {
        let mut issues = Issues::new();
        issues.add_issue(issue);
        issues
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}
