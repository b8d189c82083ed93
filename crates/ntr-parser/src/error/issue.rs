//! The issue type shared by every pipeline phase.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ErrorCode, Severity},
    span::Span,
};

/// A single diagnostic produced while lexing, interpreting or validating.
///
/// Issues carry:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A human-readable message
/// - The record code and 1-based line number of the offending record, when
///   the issue is tied to one (document-level issues have neither)
/// - Optional details, such as the offending path in a document
/// - An optional byte span for rendering source snippets
///
/// # Example
///
/// ```text
/// error[E102]: missing required field `P2` in RO record
///   --> pipes.ntr:4:1
///    |
///  4 | RO P1='0,0,0' DN=DN150
///    | ^^^^^^^^^^^^^^^^^^^^^^ record rejected
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseIssue {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    record_code: Option<String>,
    line_number: Option<usize>,
    details: Option<String>,
    span: Option<Span>,
}

impl ParseIssue {
    /// Create an error issue.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning issue.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this issue.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the code of the record this issue is about, if any.
    pub fn record_code(&self) -> Option<&str> {
        self.record_code.as_deref()
    }

    /// Get the 1-based source line, if the issue is tied to one.
    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }

    /// Get the details, if any.
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Get the source span, if any.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the record code.
    pub fn with_record_code(mut self, record_code: impl Into<String>) -> Self {
        self.record_code = Some(record_code.into());
        self
    }

    /// Set the 1-based line number.
    pub fn at_line(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Set the details text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            record_code: None,
            line_number: None,
            details: None,
            span: None,
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E102]: message (line 4)" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(line) = self.line_number {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseIssue {}
