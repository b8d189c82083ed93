//! Error adapter for converting NtrError to miette diagnostics.
//!
//! This module provides the bridge between the library's error and issue
//! types and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Issue Support
//!
//! A rejected document carries every issue collected while reading it, and
//! each issue is rendered independently.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity as MietteSeverity,
    SourceSpan,
};

use ntr::NtrError;
use ntr_parser::{ParseIssue, Severity, Span};

/// Adapter for a single parse issue.
///
/// This adapter wraps a [`ParseIssue`] and implements [`MietteDiagnostic`]
/// to enable rich error formatting in the CLI.
pub struct IssueAdapter<'a> {
    /// The wrapped issue
    issue: &'a ParseIssue,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> IssueAdapter<'a> {
    /// Create a new issue adapter.
    pub fn new(issue: &'a ParseIssue, src: &'a str) -> Self {
        Self { issue, src }
    }
}

impl fmt::Debug for IssueAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueAdapter")
            .field("issue", &self.issue)
            .finish()
    }
}

impl fmt::Display for IssueAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue.line_number() {
            Some(line) => write!(f, "{} (line {line})", self.issue.message()),
            None => write!(f, "{}", self.issue.message()),
        }
    }
}

impl std::error::Error for IssueAdapter<'_> {}

impl MietteDiagnostic for IssueAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.issue
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.issue.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    /// Explicit details win; otherwise the code's description is shown.
    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.issue
            .details()
            .or_else(|| self.issue.code().map(|c| c.description()))
            .map(|d| Box::new(d) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.issue.span()?;
        let label = self
            .issue
            .record_code()
            .map(|code| format!("in {code} record"));
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(label, span_to_miette(span)),
        )))
    }
}

/// Adapter for non-diagnostic [`NtrError`] variants.
///
/// This adapter handles errors that don't carry issues, such as I/O,
/// decoding, and export errors.
pub struct ErrorAdapter<'a>(pub &'a NtrError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            NtrError::Io(_) => "ntr::io",
            NtrError::Decode(_) => "ntr::decode",
            NtrError::Parse { .. } => return None,
            NtrError::Export(_) => "ntr::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single issue or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parse issue with source location information.
    Issue(IssueAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Issue(i) => fmt::Display::fmt(i, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Issue(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Issue(i) => i.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Issue(i) => i.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Issue(i) => i.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Issue(i) => i.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Issue(i) => i.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an NTR [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert an [`NtrError`] into a list of reportable errors.
///
/// For [`NtrError::Parse`], this returns one [`Reportable`] for each issue
/// in the error. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &NtrError) -> Vec<Reportable<'_>> {
    match err {
        NtrError::Parse {
            err: parse_err,
            src,
        } => issue_reportables(parse_err.issues(), src),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Wrap the issues of an accepted document for rendering.
pub fn issue_reportables<'a>(issues: &'a [ParseIssue], src: &'a str) -> Vec<Reportable<'a>> {
    issues
        .iter()
        .map(|issue| Reportable::Issue(IssueAdapter::new(issue, src)))
        .collect()
}

/// Render reportables with miette's graphical handler, one after another.
pub fn render(reportables: &[Reportable<'_>]) -> String {
    let reporter = GraphicalReportHandler::new();
    let mut writer = String::new();
    for reportable in reportables {
        if reporter.render_report(&mut writer, reportable).is_err() {
            writer.push_str(&reportable.to_string());
            writer.push('\n');
        }
    }
    writer
}
