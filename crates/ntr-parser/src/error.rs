//! Issue reporting for the NTR parsing pipeline.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Severity levels
//! - [`ParseIssue`], a single diagnostic with line number and optional span
//! - A collector for accumulating issues across a phase
//! - [`ParseError`], the failure returned when a document is rejected
//!
//! # Overview
//!
//! The lexer and the record interpreter never stop at the first problem: every
//! malformed token or record becomes a [`ParseIssue`] and processing carries
//! on with the next one. Only document validation can reject the whole
//! document, in which case every issue collected so far travels inside the
//! returned [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use ntr_parser::{ErrorCode, ParseIssue, Span};
//! let issue = ParseIssue::error("missing required field `P2` in RO record")
//!     .with_code(ErrorCode::E102)
//!     .with_record_code("RO")
//!     .at_line(12)
//!     .with_span(Span::new(340..368));
//!
//! assert_eq!(issue.line_number(), Some(12));
//! ```

mod collector;
mod error_code;
mod issue;
mod parse_error;
mod severity;

pub(crate) use collector::IssueCollector;

pub use error_code::ErrorCode;
pub use issue::ParseIssue;
pub use parse_error::ParseError;
pub use severity::Severity;
