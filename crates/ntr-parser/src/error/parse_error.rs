//! The ParseError type returned when a document is rejected.

use std::fmt;

use crate::error::ParseIssue;

/// Error type for a rejected document.
///
/// Wraps every issue collected up to and including the one that caused the
/// rejection, so no diagnostic is lost on failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    issues: Vec<ParseIssue>,
}

impl ParseError {
    /// Create a new parse error from issues.
    pub fn new(issues: Vec<ParseIssue>) -> Self {
        Self { issues }
    }

    /// Get all issues in this error.
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Consume the error and return its issues.
    pub fn into_issues(self) -> Vec<ParseIssue> {
        self.issues
    }

    /// The issue that caused the rejection, i.e. the last error issue.
    pub fn cause(&self) -> Option<&ParseIssue> {
        self.issues
            .iter()
            .rev()
            .find(|issue| issue.severity().is_error())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cause) = self.cause() {
            write!(f, "{}", cause)?;
            if self.issues.len() > 1 {
                write!(f, " (+{} more)", self.issues.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<ParseIssue> for ParseError {
    fn from(issue: ParseIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl From<Vec<ParseIssue>> for ParseError {
    fn from(issues: Vec<ParseIssue>) -> Self {
        Self { issues }
    }
}
