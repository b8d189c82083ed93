//! Error codes for the NTR issue system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer issues
//! - `E1xx` - Record interpretation issues
//! - `E2xx` - Document validation issues

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes for categorizing parse issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Issues (E0xx)
    // =========================================================================
    /// Expected a `key=value` pair.
    ///
    /// A token after the record code contains no `=`.
    E001,

    /// Unterminated quoted value.
    ///
    /// A `'` or `"` was opened but the line ended before the matching quote.
    E002,

    /// Missing field key.
    ///
    /// A token starts with `=`, so the value has no key.
    E003,

    /// Missing record code.
    ///
    /// The first token of a line is already a `key=value` pair.
    E004,

    // =========================================================================
    // Interpretation Issues (E1xx)
    // =========================================================================
    /// Unknown record code.
    ///
    /// The record code is not part of the format. The record is skipped.
    E100,

    /// Unsupported record.
    ///
    /// The record code is known but carries data this library does not
    /// interpret (project headers, load case tables, ...). The record is skipped.
    E101,

    /// Missing required field.
    E102,

    /// Invalid coordinate.
    ///
    /// A quoted point value is not three comma-separated finite numbers.
    E103,

    /// Missing coordinate value.
    ///
    /// An unquoted point value is empty.
    E104,

    /// Invalid number.
    E105,

    /// Invalid enumeration value.
    E106,

    /// Duplicate nominal diameter definition.
    ///
    /// The first definition of a code wins; later ones are ignored.
    E107,

    /// Duplicate field.
    ///
    /// A key appears more than once in the same record; the first
    /// occurrence wins.
    E108,

    // =========================================================================
    // Validation Issues (E2xx)
    // =========================================================================
    /// Invalid document identifier.
    E200,

    /// Invalid metadata.
    E201,

    /// Invalid nominal diameter definition.
    E202,

    /// Invalid element.
    E203,

    /// Duplicate nominal diameter key.
    ///
    /// Two definition keys normalize to the same code.
    E204,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer issues
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            // Interpretation issues
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E108 => "E108",
            // Validation issues
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer issues
            ErrorCode::E001 => "expected key=value pair",
            ErrorCode::E002 => "unterminated quoted value",
            ErrorCode::E003 => "missing field key",
            ErrorCode::E004 => "missing record code",
            // Interpretation issues
            ErrorCode::E100 => "unknown record code",
            ErrorCode::E101 => "unsupported record",
            ErrorCode::E102 => "missing required field",
            ErrorCode::E103 => "invalid coordinate",
            ErrorCode::E104 => "missing coordinate value",
            ErrorCode::E105 => "invalid number",
            ErrorCode::E106 => "invalid enumeration value",
            ErrorCode::E107 => "duplicate nominal diameter",
            ErrorCode::E108 => "duplicate field",
            // Validation issues
            ErrorCode::E200 => "invalid document identifier",
            ErrorCode::E201 => "invalid metadata",
            ErrorCode::E202 => "invalid nominal diameter definition",
            ErrorCode::E203 => "invalid element",
            ErrorCode::E204 => "duplicate nominal diameter key",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
        assert_eq!(ErrorCode::E204.to_string(), "E204");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "expected key=value pair");
        assert_eq!(ErrorCode::E102.description(), "missing required field");
        assert_eq!(ErrorCode::E203.description(), "invalid element");
    }
}
