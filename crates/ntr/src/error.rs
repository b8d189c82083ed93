//! Error types for NTR operations.
//!
//! This module provides the main error type [`NtrError`] which wraps the
//! error conditions that can occur while loading and processing a document.

use std::io;

use thiserror::Error;

use ntr_parser::ParseError;

/// The main error type for NTR operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the rejected document's
/// issues so front ends can render snippets for their spans.
#[derive(Debug, Error)]
pub enum NtrError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Decode(String),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for NtrError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl NtrError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
