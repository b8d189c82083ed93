//! # NTR Parser
//!
//! Parser for NTR ("Neutral") piping interchange files. This crate provides
//! the pipeline from source text to a validated [`NtrDocument`].
//!
//! ## Usage
//!
//! ```
//! # use ntr_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "
//! C simple line
//! DN NAME=DN150 DA=168.3 S=4.5
//! RO P1='0, 0, 0' P2='5, 0, 0' DN=DN150 MAT=P235GH
//! ";
//!
//!     let document = parse(source, "line-1")?;
//!     assert_eq!(document.elements().len(), 1);
//!     assert_eq!(document.error_count(), 0);
//!     Ok(())
//! }
//! ```
//!
//! Lexing and interpretation never fail; they collect [`ParseIssue`]s and
//! skip what they cannot read. Validation is the single gate that can reject
//! a document, and its [`ParseError`] still carries every issue collected.

mod document;
mod error;
mod fields;
mod interpret;
mod lexer;
mod record;
mod span;
mod validate;

pub use document::{Definitions, DocumentCandidate, NtrDocument};
pub use error::{ErrorCode, ParseError, ParseIssue, Severity};
pub use interpret::{Interpretation, interpret};
pub use lexer::tokenize;
pub use record::{RawField, RawRecord};
pub use span::Span;
pub use validate::validate;

use log::info;
use ntr_core::metadata::Metadata;

/// Parse source text into a validated document.
///
/// Runs the whole pipeline:
///
/// 1. **Tokenize** - Split lines into raw records
/// 2. **Interpret** - Build typed elements and the nominal-diameter table
/// 3. **Validate** - Check and normalize the assembled document
///
/// `id` identifies the document, typically its file name.
///
/// # Errors
///
/// Returns a [`ParseError`] holding all collected issues when the assembled
/// document is rejected, for example because `id` is blank.
pub fn parse(source: &str, id: &str) -> Result<NtrDocument, ParseError> {
    parse_with_metadata(source, id, None)
}

/// Parse source text into a validated document with caller-supplied metadata.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_metadata(
    source: &str,
    id: &str,
    metadata: Option<Metadata>,
) -> Result<NtrDocument, ParseError> {
    info!(id, bytes = source.len(); "Parsing NTR source");

    // Step 1: Tokenize
    let (records, mut issues) = lexer::tokenize(source);

    // Step 2: Interpret
    let interpretation = interpret::interpret(&records);
    issues.extend(interpretation.issues);
    // Stable, so lexer issues stay ahead of interpreter issues on one line.
    issues.sort_by_key(ParseIssue::line_number);

    // Step 3: Validate
    let candidate = DocumentCandidate {
        id: id.to_string(),
        metadata,
        definitions: Definitions {
            nominal_diameters: interpretation.nominal_diameters,
        },
        elements: interpretation.elements,
        issues: Some(issues),
    };
    validate::validate(candidate)
}
