//! Document types.
//!
//! A [`DocumentCandidate`] is the unchecked shape of a document. It can be
//! assembled by hand or deserialised, and becomes an [`NtrDocument`] only by
//! passing [`validate`](crate::validate).

use ntr_core::{
    diameter::{self, DiameterTable, NominalDiameter},
    element::Element,
    metadata::Metadata,
};
use serde::{Deserialize, Serialize};

use crate::error::ParseIssue;

/// Definitions referenced by elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub nominal_diameters: DiameterTable,
}

/// An unvalidated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCandidate {
    pub id: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub definitions: Definitions,
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Issues collected so far; `None` is the same as no issues.
    #[serde(default)]
    pub issues: Option<Vec<ParseIssue>>,
}

impl DocumentCandidate {
    /// Create an empty candidate with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: None,
            definitions: Definitions::default(),
            elements: Vec::new(),
            issues: None,
        }
    }
}

/// A validated NTR document.
///
/// Strings are trimmed and diameter keys are normalized. The document is
/// immutable; use [`NtrDocument::into_candidate`] to derive a changed copy
/// and validate it again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NtrDocument {
    id: String,
    metadata: Metadata,
    definitions: Definitions,
    elements: Vec<Element>,
    issues: Vec<ParseIssue>,
}

impl NtrDocument {
    pub(crate) fn new(
        id: String,
        metadata: Metadata,
        definitions: Definitions,
        elements: Vec<Element>,
        issues: Vec<ParseIssue>,
    ) -> Self {
        Self {
            id,
            metadata,
            definitions,
            elements,
            issues,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// The nominal-diameter table.
    pub fn nominal_diameters(&self) -> &DiameterTable {
        &self.definitions.nominal_diameters
    }

    /// Elements in source order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Issues collected while the document was produced, including warnings
    /// and errors for records that were skipped.
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Look up a nominal-diameter definition; the code is normalized first.
    pub fn diameter(&self, code: &str) -> Option<&NominalDiameter> {
        diameter::lookup(&self.definitions.nominal_diameters, code)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity().is_error())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity().is_warning())
            .count()
    }

    /// Turn the document back into an unvalidated candidate.
    pub fn into_candidate(self) -> DocumentCandidate {
        DocumentCandidate {
            id: self.id,
            metadata: Some(self.metadata),
            definitions: self.definitions,
            elements: self.elements,
            issues: Some(self.issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deserializes_with_defaults() {
        let candidate: DocumentCandidate =
            serde_json::from_str(r#"{ "id": "plant-a" }"#).unwrap();
        assert_eq!(candidate, DocumentCandidate::new("plant-a"));
    }

    #[test]
    fn test_document_counts_and_lookup() {
        let mut definitions = Definitions::default();
        definitions
            .nominal_diameters
            .insert("DN100".to_string(), NominalDiameter::new(114.3, None));

        let document = NtrDocument::new(
            "doc".to_string(),
            Metadata::default(),
            definitions,
            Vec::new(),
            vec![
                ParseIssue::warning("w"),
                ParseIssue::error("e"),
                ParseIssue::warning("w2"),
            ],
        );

        assert_eq!(document.error_count(), 1);
        assert_eq!(document.warning_count(), 2);
        assert_eq!(
            document.diameter(" dn100").map(|d| d.outside_diameter),
            Some(114.3)
        );
        assert!(document.diameter("DN50").is_none());
    }
}
