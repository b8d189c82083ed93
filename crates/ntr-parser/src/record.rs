//! Raw records produced by the lexer.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// One `key=value` pair of a record, as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    /// Trimmed, upper-cased key.
    pub key: String,
    /// Text after the `=` exactly as written, quotes included.
    pub raw_value: String,
    /// Quote-stripped value for quoted fields, trimmed text otherwise.
    pub value: String,
    /// Whether the value was wrapped in matching quotes.
    pub quoted: bool,
    pub line_number: usize,
    pub span: Span,
}

/// One non-comment source line: a record code followed by ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Upper-cased record code, e.g. `RO`.
    pub code: String,
    pub line_number: usize,
    pub span: Span,
    pub fields: Vec<RawField>,
}

impl RawRecord {
    /// Returns the first field with the given (upper-case) key.
    pub fn field(&self, key: &str) -> Option<&RawField> {
        self.fields.iter().find(|field| field.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, value: &str) -> RawField {
        RawField {
            key: key.to_string(),
            raw_value: value.to_string(),
            value: value.to_string(),
            quoted: false,
            line_number: 1,
            span: Span::default(),
        }
    }

    #[test]
    fn test_field_lookup_returns_first_match() {
        let record = RawRecord {
            code: "RO".to_string(),
            line_number: 1,
            span: Span::default(),
            fields: vec![field("DN", "DN100"), field("MAT", "P235"), field("DN", "DN80")],
        };

        assert_eq!(record.field("DN").map(|f| f.value.as_str()), Some("DN100"));
        assert_eq!(record.field("MAT").map(|f| f.value.as_str()), Some("P235"));
        assert!(record.field("P1").is_none());
    }
}
