//! Document validation.
//!
//! [`validate`] is the only way to obtain an [`NtrDocument`]. It re-checks a
//! [`DocumentCandidate`] regardless of how it was produced, normalizes its
//! strings, and either returns the document or fails it as a whole.

use log::debug;
use ntr_core::{
    diameter::{DiameterTable, normalize_code},
    element::{Element, ElementAttributes, PointRef},
    metadata::Metadata,
};
use thiserror::Error;

use crate::{
    document::{Definitions, DocumentCandidate, NtrDocument},
    error::{ErrorCode, ParseError, ParseIssue},
};

/// The first structural problem found in a candidate.
///
/// Every variant carries the path of the offending value, e.g.
/// `elements[2].start.x`.
#[derive(Debug, Clone, PartialEq, Error)]
enum Violation {
    #[error("document identifier must not be empty")]
    EmptyId,

    #[error("metadata value `{path}` must not be empty when present")]
    EmptyMetadata { path: String },

    #[error("nominal diameter key must not be empty")]
    EmptyDiameterKey { path: String },

    #[error("nominal diameter `{key}` is defined more than once")]
    DuplicateDiameterKey { path: String, key: String },

    #[error("outside diameter of `{key}` must be a positive finite number, found {value}")]
    OutsideDiameter { path: String, key: String, value: f64 },

    #[error("wall thickness of `{key}` must be a finite number, found {value}")]
    Thickness { path: String, key: String, value: f64 },

    #[error("coordinate `{path}` must be a finite number, found {value}")]
    NonFiniteCoordinate { path: String, value: f64 },

    #[error("element value `{path}` must not be empty")]
    EmptyText { path: String },

    #[error("weight `{path}` must be a finite number, found {value}")]
    NonFiniteWeight { path: String, value: f64 },
}

impl Violation {
    fn code(&self) -> ErrorCode {
        match self {
            Violation::EmptyId => ErrorCode::E200,
            Violation::EmptyMetadata { .. } => ErrorCode::E201,
            Violation::EmptyDiameterKey { .. }
            | Violation::OutsideDiameter { .. }
            | Violation::Thickness { .. } => ErrorCode::E202,
            Violation::DuplicateDiameterKey { .. } => ErrorCode::E204,
            Violation::NonFiniteCoordinate { .. }
            | Violation::EmptyText { .. }
            | Violation::NonFiniteWeight { .. } => ErrorCode::E203,
        }
    }

    fn path(&self) -> &str {
        match self {
            Violation::EmptyId => "id",
            Violation::EmptyMetadata { path }
            | Violation::EmptyDiameterKey { path }
            | Violation::DuplicateDiameterKey { path, .. }
            | Violation::OutsideDiameter { path, .. }
            | Violation::Thickness { path, .. }
            | Violation::NonFiniteCoordinate { path, .. }
            | Violation::EmptyText { path }
            | Violation::NonFiniteWeight { path, .. } => path,
        }
    }

    fn into_issue(self) -> ParseIssue {
        ParseIssue::error(self.to_string())
            .with_code(self.code())
            .with_details(self.path())
    }
}

/// Validate and normalize a candidate document.
///
/// Strings are trimmed and nominal-diameter keys are normalized. Missing
/// metadata and issues default to empty. On the first violation an error
/// issue naming the offending path is appended to the candidate's issues and
/// all of them are returned as the error; no partial document is produced.
///
/// Validation is idempotent: validating `doc.clone().into_candidate()`
/// yields a document equal to `doc`.
///
/// # Example
///
/// ```
/// # use ntr_parser::{DocumentCandidate, validate};
/// let document = validate(DocumentCandidate::new("  plant-a ")).unwrap();
/// assert_eq!(document.id(), "plant-a");
///
/// let err = validate(DocumentCandidate::new("   ")).unwrap_err();
/// assert_eq!(err.issues()[0].details(), Some("id"));
/// ```
pub fn validate(mut candidate: DocumentCandidate) -> Result<NtrDocument, ParseError> {
    let mut issues = candidate.issues.take().unwrap_or_default();

    match normalize(candidate) {
        Ok((id, metadata, definitions, elements)) => {
            debug!(
                id = id.as_str(),
                elements = elements.len(),
                diameters = definitions.nominal_diameters.len();
                "Document validated"
            );
            Ok(NtrDocument::new(id, metadata, definitions, elements, issues))
        }
        Err(violation) => {
            debug!(path = violation.path(), code = violation.code().as_str(); "Document rejected");
            issues.push(violation.into_issue());
            Err(ParseError::new(issues))
        }
    }
}

type Normalized = (String, Metadata, Definitions, Vec<Element>);

fn normalize(candidate: DocumentCandidate) -> Result<Normalized, Violation> {
    let id = candidate.id.trim().to_string();
    if id.is_empty() {
        return Err(Violation::EmptyId);
    }

    let metadata = normalize_metadata(candidate.metadata.unwrap_or_default())?;
    let definitions = Definitions {
        nominal_diameters: normalize_diameters(candidate.definitions.nominal_diameters)?,
    };
    let elements = candidate
        .elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| normalize_element(index, element))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((id, metadata, definitions, elements))
}

fn normalize_metadata(mut metadata: Metadata) -> Result<Metadata, Violation> {
    for (name, value) in [
        ("title", &mut metadata.title),
        ("source", &mut metadata.source),
    ] {
        optional_text(value, || Violation::EmptyMetadata {
            path: format!("metadata.{name}"),
        })?;
    }
    Ok(metadata)
}

fn normalize_diameters(table: DiameterTable) -> Result<DiameterTable, Violation> {
    let mut normalized = DiameterTable::with_capacity(table.len());

    for (key, diameter) in table {
        let code = normalize_code(&key);
        let path = format!("definitions.nominal_diameters[\"{key}\"]");
        if code.is_empty() {
            return Err(Violation::EmptyDiameterKey { path });
        }
        if normalized.contains_key(&code) {
            return Err(Violation::DuplicateDiameterKey { path, key: code });
        }

        let outside = diameter.outside_diameter;
        if !outside.is_finite() || outside <= 0.0 {
            return Err(Violation::OutsideDiameter {
                path: format!("{path}.outside_diameter"),
                key: code,
                value: outside,
            });
        }
        if let Some(thickness) = diameter.thickness.filter(|t| !t.is_finite()) {
            return Err(Violation::Thickness {
                path: format!("{path}.thickness"),
                key: code,
                value: thickness,
            });
        }

        normalized.insert(code, diameter);
    }

    Ok(normalized)
}

/// Trim `value` in place, failing if nothing is left.
fn required_text(value: &mut String, path: impl FnOnce() -> String) -> Result<(), Violation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Violation::EmptyText { path: path() });
    }
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
    Ok(())
}

/// Trim `value` in place when present, failing if nothing is left.
fn optional_text(
    value: &mut Option<String>,
    violation: impl FnOnce() -> Violation,
) -> Result<(), Violation> {
    if let Some(text) = value {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(violation());
        }
        if trimmed.len() != text.len() {
            *text = trimmed.to_string();
        }
    }
    Ok(())
}

fn normalize_point(point: &mut PointRef, path: String) -> Result<(), Violation> {
    match point {
        PointRef::Coordinate(v) if v.is_finite() => Ok(()),
        PointRef::Coordinate(v) => {
            for (axis, value) in [("x", v.x), ("y", v.y), ("z", v.z)] {
                if !value.is_finite() {
                    return Err(Violation::NonFiniteCoordinate {
                        path: format!("{path}.{axis}"),
                        value,
                    });
                }
            }
            Ok(())
        }
        PointRef::NamedNode(id) => required_text(id, || path),
    }
}

fn normalize_attributes(
    attributes: &mut ElementAttributes,
    at: &impl Fn(&str) -> String,
) -> Result<(), Violation> {
    for (name, value) in [
        ("material", &mut attributes.material),
        ("description", &mut attributes.description),
        ("reference", &mut attributes.reference),
        ("pipeline", &mut attributes.pipeline),
        ("component_tag", &mut attributes.component_tag),
        ("norm", &mut attributes.norm),
        ("series", &mut attributes.series),
        ("schedule", &mut attributes.schedule),
    ] {
        optional_text(value, || Violation::EmptyText {
            path: at(&format!("attributes.{name}")),
        })?;
    }

    for (index, load_case) in attributes.load_cases.iter_mut().enumerate() {
        required_text(load_case, || at(&format!("attributes.load_cases[{index}]")))?;
    }

    if let Some(weight) = attributes.weight.filter(|w| !w.is_finite()) {
        return Err(Violation::NonFiniteWeight {
            path: at("attributes.weight"),
            value: weight,
        });
    }

    Ok(())
}

fn normalize_element(index: usize, mut element: Element) -> Result<Element, Violation> {
    let at = |field: &str| format!("elements[{index}].{field}");
    let empty = |field: &str| Violation::EmptyText { path: at(field) };

    match &mut element {
        Element::StraightPipe(e) => {
            normalize_point(&mut e.start, at("start"))?;
            normalize_point(&mut e.end, at("end"))?;
            required_text(&mut e.nominal_diameter, || at("nominal_diameter"))?;
            normalize_attributes(&mut e.attributes, &at)?;
        }
        Element::Bend(e) => {
            normalize_point(&mut e.start, at("start"))?;
            normalize_point(&mut e.tangent_point, at("tangent_point"))?;
            normalize_point(&mut e.end, at("end"))?;
            required_text(&mut e.nominal_diameter, || at("nominal_diameter"))?;
            normalize_attributes(&mut e.attributes, &at)?;
        }
        Element::Tee(e) => {
            normalize_point(&mut e.main_start, at("main_start"))?;
            normalize_point(&mut e.main_end, at("main_end"))?;
            normalize_point(&mut e.branch_start, at("branch_start"))?;
            normalize_point(&mut e.branch_end, at("branch_end"))?;
            required_text(&mut e.main_diameter, || at("main_diameter"))?;
            required_text(&mut e.branch_diameter, || at("branch_diameter"))?;
            optional_text(&mut e.tee_type, || empty("tee_type"))?;
            normalize_attributes(&mut e.attributes, &at)?;
        }
        Element::Arm(e) => {
            normalize_point(&mut e.start, at("start"))?;
            if let Some(middle) = &mut e.middle {
                normalize_point(middle, at("middle"))?;
            }
            normalize_point(&mut e.end, at("end"))?;
            required_text(&mut e.inlet_diameter, || at("inlet_diameter"))?;
            optional_text(&mut e.outlet_diameter, || empty("outlet_diameter"))?;
            normalize_attributes(&mut e.attributes, &at)?;
        }
        Element::Profile(e) => {
            normalize_point(&mut e.start, at("start"))?;
            normalize_point(&mut e.end, at("end"))?;
            optional_text(&mut e.section, || empty("section"))?;
            optional_text(&mut e.nominal_diameter, || empty("nominal_diameter"))?;
            normalize_attributes(&mut e.attributes, &at)?;
        }
        Element::Reducer(e) => {
            normalize_point(&mut e.start, at("start"))?;
            normalize_point(&mut e.end, at("end"))?;
            required_text(&mut e.inlet_diameter, || at("inlet_diameter"))?;
            required_text(&mut e.outlet_diameter, || at("outlet_diameter"))?;
            normalize_attributes(&mut e.attributes, &at)?;
        }
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use ntr_core::{
        diameter::NominalDiameter,
        element::{Arm, StraightPipe},
        geometry::Vec3,
    };

    use super::*;

    fn pipe(start: PointRef, diameter: &str) -> Element {
        Element::StraightPipe(StraightPipe {
            start,
            end: PointRef::Coordinate(Vec3::new(1.0, 0.0, 0.0)),
            nominal_diameter: diameter.to_string(),
            attributes: ElementAttributes::default(),
        })
    }

    fn candidate_with(elements: Vec<Element>) -> DocumentCandidate {
        DocumentCandidate {
            elements,
            ..DocumentCandidate::new("doc")
        }
    }

    fn rejection(candidate: DocumentCandidate) -> ParseIssue {
        let err = validate(candidate).unwrap_err();
        err.issues().last().cloned().unwrap()
    }

    #[test]
    fn test_defaults_for_missing_metadata_and_issues() {
        let document = validate(DocumentCandidate::new("doc")).unwrap();
        assert_eq!(document.metadata(), &Metadata::default());
        assert!(document.issues().is_empty());
        assert!(document.elements().is_empty());
    }

    #[test]
    fn test_strings_are_trimmed() {
        let mut element = pipe(PointRef::NamedNode("  K1 ".to_string()), " DN100 ");
        if let Element::StraightPipe(e) = &mut element {
            e.attributes.material = Some(" P235GH".to_string());
            e.attributes.load_cases = vec![" LF1 ".to_string()];
        }
        let candidate = DocumentCandidate {
            metadata: Some(Metadata::default().with_title(" Plant A ")),
            ..candidate_with(vec![element])
        };

        let document = validate(candidate).unwrap();
        assert_eq!(document.metadata().title.as_deref(), Some("Plant A"));
        let Element::StraightPipe(e) = &document.elements()[0] else {
            panic!("expected a straight pipe");
        };
        assert_eq!(e.start, PointRef::NamedNode("K1".to_string()));
        assert_eq!(e.nominal_diameter, "DN100");
        assert_eq!(e.attributes.material.as_deref(), Some("P235GH"));
        assert_eq!(e.attributes.load_cases, vec!["LF1"]);
    }

    #[test]
    fn test_diameter_keys_are_normalized() {
        let mut candidate = DocumentCandidate::new("doc");
        candidate
            .definitions
            .nominal_diameters
            .insert(" dn 150".to_string(), NominalDiameter::new(168.3, None));

        let document = validate(candidate).unwrap();
        assert!(document.nominal_diameters().contains_key("DN150"));
    }

    #[test]
    fn test_empty_id() {
        let issue = rejection(DocumentCandidate::new("  "));
        assert_eq!(issue.code(), Some(ErrorCode::E200));
        assert_eq!(issue.details(), Some("id"));
    }

    #[test]
    fn test_empty_metadata_value() {
        let candidate = DocumentCandidate {
            metadata: Some(Metadata::default().with_source(" ")),
            ..DocumentCandidate::new("doc")
        };
        let issue = rejection(candidate);
        assert_eq!(issue.code(), Some(ErrorCode::E201));
        assert_eq!(issue.details(), Some("metadata.source"));
    }

    #[test]
    fn test_duplicate_normalized_diameter_keys() {
        let mut candidate = DocumentCandidate::new("doc");
        let table = &mut candidate.definitions.nominal_diameters;
        table.insert("DN100".to_string(), NominalDiameter::new(114.3, None));
        table.insert("dn100".to_string(), NominalDiameter::new(114.3, None));

        let issue = rejection(candidate);
        assert_eq!(issue.code(), Some(ErrorCode::E204));
    }

    #[test]
    fn test_invalid_diameter_values() {
        for diameter in [
            NominalDiameter::new(0.0, None),
            NominalDiameter::new(f64::NAN, None),
            NominalDiameter::new(10.0, Some(f64::INFINITY)),
        ] {
            let mut candidate = DocumentCandidate::new("doc");
            candidate
                .definitions
                .nominal_diameters
                .insert("DN10".to_string(), diameter);
            assert_eq!(rejection(candidate).code(), Some(ErrorCode::E202));
        }
    }

    #[test]
    fn test_non_finite_coordinate_names_path() {
        let candidate = candidate_with(vec![
            pipe(PointRef::NamedNode("K1".to_string()), "DN100"),
            pipe(PointRef::Coordinate(Vec3::new(0.0, f64::NAN, 0.0)), "DN100"),
        ]);

        let issue = rejection(candidate);
        assert_eq!(issue.code(), Some(ErrorCode::E203));
        assert_eq!(issue.details(), Some("elements[1].start.y"));
    }

    #[test]
    fn test_empty_required_and_optional_text() {
        let issue = rejection(candidate_with(vec![pipe(
            PointRef::NamedNode("K1".to_string()),
            " ",
        )]));
        assert_eq!(issue.details(), Some("elements[0].nominal_diameter"));

        let arm = Element::Arm(Arm {
            start: PointRef::NamedNode("K1".to_string()),
            end: PointRef::NamedNode("K2".to_string()),
            middle: Some(PointRef::NamedNode("".to_string())),
            inlet_diameter: "DN50".to_string(),
            outlet_diameter: None,
            attributes: ElementAttributes::default(),
        });
        let issue = rejection(candidate_with(vec![arm]));
        assert_eq!(issue.details(), Some("elements[0].middle"));
    }

    #[test]
    fn test_attribute_violations() {
        let mut element = pipe(PointRef::NamedNode("K1".to_string()), "DN100");
        if let Element::StraightPipe(e) = &mut element {
            e.attributes.load_cases = vec!["LF1".to_string(), "".to_string()];
        }
        let issue = rejection(candidate_with(vec![element.clone()]));
        assert_eq!(issue.details(), Some("elements[0].attributes.load_cases[1]"));

        if let Element::StraightPipe(e) = &mut element {
            e.attributes.load_cases.clear();
            e.attributes.weight = Some(f64::INFINITY);
        }
        let issue = rejection(candidate_with(vec![element]));
        assert_eq!(issue.details(), Some("elements[0].attributes.weight"));
    }

    #[test]
    fn test_rejection_keeps_existing_issues() {
        let candidate = DocumentCandidate {
            issues: Some(vec![ParseIssue::warning("earlier")]),
            ..DocumentCandidate::new("")
        };

        let err = validate(candidate).unwrap_err();
        assert_eq!(err.issues().len(), 2);
        assert_eq!(err.issues()[0].message(), "earlier");
        assert!(err.issues()[1].severity().is_error());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut candidate = candidate_with(vec![pipe(
            PointRef::NamedNode(" K1".to_string()),
            "DN100 ",
        )]);
        candidate
            .definitions
            .nominal_diameters
            .insert("dn100".to_string(), NominalDiameter::new(114.3, Some(3.6)));
        candidate.issues = Some(vec![ParseIssue::warning("kept")]);

        let document = validate(candidate).unwrap();
        let again = validate(document.clone().into_candidate()).unwrap();
        assert_eq!(again, document);
    }
}
