//! Record interpretation: raw records to typed elements.
//!
//! Interpretation runs in two passes. The first reads every `DN` record
//! into the nominal-diameter table; the second turns element records into
//! [`Element`]s. Element interpretation therefore sees a complete, read-only
//! diameter table regardless of where the definitions appear in the file.
//!
//! Failures never abort the batch: a record that cannot be interpreted
//! contributes exactly one issue and is skipped.

use log::{debug, trace};
use ntr_core::{
    diameter::{DiameterTable, NominalDiameter, normalize_code},
    element::{
        Arm, Bend, Element, ElementKind, Profile, ProfileAxis, Reducer, StraightPipe, Tee,
    },
};

use crate::{
    error::{ErrorCode, IssueCollector, ParseIssue},
    fields::RecordFields,
    record::RawRecord,
};

/// Record code of a nominal-diameter definition.
const DIAMETER_CODE: &str = "DN";

/// Record codes that belong to the format but carry data this library does
/// not interpret (project header, load case tables, node and support data).
const UNSUPPORTED_CODES: [&str; 10] = [
    "GEN", "AUFT", "TEXT", "LAST", "IS", "KN", "ISO", "PK", "FLA", "HALT",
];

/// Result of interpreting a batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Elements in source order.
    pub elements: Vec<Element>,
    /// Nominal-diameter definitions keyed by normalized code.
    pub nominal_diameters: DiameterTable,
    /// Issues ordered by source line.
    pub issues: Vec<ParseIssue>,
}

/// Interpret raw records into elements and nominal-diameter definitions.
///
/// # Example
///
/// ```
/// # use ntr_parser::{interpret, tokenize};
/// let (records, _) = tokenize("DN NAME=DN150 DA=168.3\nRO P1='0,0,0' P2='5,0,0' DN=DN150");
/// let interpretation = interpret(&records);
///
/// assert_eq!(interpretation.elements.len(), 1);
/// assert_eq!(interpretation.nominal_diameters["DN150"].outside_diameter, 168.3);
/// assert!(interpretation.issues.is_empty());
/// ```
pub fn interpret(records: &[RawRecord]) -> Interpretation {
    let mut issues = IssueCollector::new();

    let nominal_diameters = read_diameters(records, &mut issues);

    let mut elements = Vec::new();
    for record in records {
        if let Some(element) = read_record(record, &mut issues) {
            elements.push(element);
        }
    }

    let errors = issues.error_count();
    let mut issues = issues.into_issues();
    // Stable, so issues of one line keep their emission order.
    issues.sort_by_key(|issue| issue.line_number());

    debug!(
        records = records.len(),
        elements = elements.len(),
        diameters = nominal_diameters.len(),
        issues = issues.len(),
        errors;
        "Interpreted records"
    );

    Interpretation {
        elements,
        nominal_diameters,
        issues,
    }
}

/// First pass: build the nominal-diameter table. The first definition of a
/// code wins.
fn read_diameters(records: &[RawRecord], issues: &mut IssueCollector) -> DiameterTable {
    let mut table = DiameterTable::new();

    for record in records.iter().filter(|r| r.code == DIAMETER_CODE) {
        let fields = RecordFields::new(record);
        for warning in fields.duplicate_field_warnings() {
            issues.emit(warning);
        }

        match read_diameter(&fields) {
            Ok((code, diameter)) => {
                if table.contains_key(&code) {
                    issues.emit(
                        ParseIssue::warning(format!(
                            "nominal diameter `{code}` is already defined, this definition is ignored"
                        ))
                        .with_code(ErrorCode::E107)
                        .with_record_code(DIAMETER_CODE)
                        .at_line(record.line_number)
                        .with_span(record.span),
                    );
                } else {
                    trace!(code = code.as_str(), outside_diameter = diameter.outside_diameter; "Defined nominal diameter");
                    table.insert(code, diameter);
                }
            }
            Err(issue) => issues.emit(issue),
        }
    }

    table
}

fn read_diameter(fields: &RecordFields<'_>) -> Result<(String, NominalDiameter), ParseIssue> {
    let code = normalize_code(&fields.code("NAME")?);
    let outside_diameter = fields.positive_number("DA")?;
    let thickness = fields.optional_number("S")?;
    Ok((code, NominalDiameter::new(outside_diameter, thickness)))
}

/// Second pass: interpret one non-`DN` record.
fn read_record(record: &RawRecord, issues: &mut IssueCollector) -> Option<Element> {
    if record.code == DIAMETER_CODE {
        return None;
    }

    let Some(kind) = ElementKind::from_record_code(&record.code) else {
        issues.emit(skipped_record(record));
        return None;
    };

    let fields = RecordFields::new(record);
    for warning in fields.duplicate_field_warnings() {
        issues.emit(warning);
    }

    match read_element(kind, &fields) {
        Ok(element) => Some(element),
        Err(issue) => {
            issues.emit(issue);
            None
        }
    }
}

fn skipped_record(record: &RawRecord) -> ParseIssue {
    let issue = if UNSUPPORTED_CODES.contains(&record.code.as_str()) {
        ParseIssue::warning(format!("unsupported record `{}` was skipped", record.code))
            .with_code(ErrorCode::E101)
    } else {
        ParseIssue::warning(format!("unknown record code `{}`", record.code))
            .with_code(ErrorCode::E100)
    };
    issue
        .with_record_code(record.code.as_str())
        .at_line(record.line_number)
        .with_span(record.span)
}

fn read_element(kind: ElementKind, fields: &RecordFields<'_>) -> Result<Element, ParseIssue> {
    let element = match kind {
        ElementKind::StraightPipe => Element::StraightPipe(StraightPipe {
            start: fields.point("P1")?,
            end: fields.point("P2")?,
            nominal_diameter: fields.code("DN")?,
            attributes: fields.attributes()?,
        }),
        ElementKind::Bend => Element::Bend(Bend {
            start: fields.point("P1")?,
            end: fields.point("P2")?,
            tangent_point: fields.point("PT")?,
            nominal_diameter: fields.code("DN")?,
            attributes: fields.attributes()?,
        }),
        ElementKind::Tee => Element::Tee(Tee {
            main_start: fields.point("PH1")?,
            main_end: fields.point("PH2")?,
            branch_start: fields.point("PA1")?,
            branch_end: fields.point("PA2")?,
            main_diameter: fields.code("DNH")?,
            branch_diameter: fields.code("DNA")?,
            tee_type: fields.optional_text("TYP"),
            attributes: fields.attributes()?,
        }),
        ElementKind::Arm => Element::Arm(Arm {
            start: fields.point("P1")?,
            end: fields.point("P2")?,
            middle: fields.optional_point("PM")?,
            inlet_diameter: fields.code("DN1")?,
            outlet_diameter: fields.optional_text("DN2"),
            attributes: fields.attributes()?,
        }),
        ElementKind::Profile => Element::Profile(Profile {
            start: fields.point("P1")?,
            end: fields.point("P2")?,
            axis: fields.enumeration::<ProfileAxis>("ACHSE", ProfileAxis::EXPECTED)?,
            section: fields.optional_text("TYP"),
            nominal_diameter: fields.optional_text("DN"),
            attributes: fields.attributes()?,
        }),
        ElementKind::Reducer => Element::Reducer(Reducer {
            start: fields.point("P1")?,
            end: fields.point("P2")?,
            inlet_diameter: fields.code("DN1")?,
            outlet_diameter: fields.code("DN2")?,
            attributes: fields.attributes()?,
        }),
    };
    Ok(element)
}
