//! Collector for accumulating issues during a processing phase.

use crate::error::ParseIssue;

/// A collector for accumulating issues during a processing phase.
///
/// Phases emit every problem they find instead of returning on the first
/// one; the caller takes the collected issues at the end.
#[derive(Debug, Default)]
pub(crate) struct IssueCollector {
    issues: Vec<ParseIssue>,
    error_count: usize,
}

impl IssueCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an issue to this collector.
    pub fn emit(&mut self, issue: ParseIssue) {
        if issue.severity().is_error() {
            self.error_count += 1;
        }
        self.issues.push(issue);
    }

    /// Number of error-severity issues emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Finish collection and return the issues in emission order.
    pub fn into_issues(self) -> Vec<ParseIssue> {
        self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_new_is_empty() {
        let collector = IssueCollector::new();
        assert_eq!(collector.error_count(), 0);
        assert!(collector.into_issues().is_empty());
    }

    #[test]
    fn test_collector_counts_errors_only() {
        let mut collector = IssueCollector::new();

        collector.emit(ParseIssue::error("error 1"));
        collector.emit(ParseIssue::warning("warning 1"));
        collector.emit(ParseIssue::error("error 2"));

        assert_eq!(collector.error_count(), 2);
        assert_eq!(collector.into_issues().len(), 3);
    }

    #[test]
    fn test_collector_preserves_order() {
        let mut collector = IssueCollector::new();

        collector.emit(ParseIssue::warning("first"));
        collector.emit(ParseIssue::error("second"));

        let issues = collector.into_issues();
        assert_eq!(issues[0].message(), "first");
        assert_eq!(issues[1].message(), "second");
    }
}
