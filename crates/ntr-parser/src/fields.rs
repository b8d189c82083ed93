//! Typed access to the fields of one raw record.
//!
//! Every accessor returns `Result<_, ParseIssue>` so that interpreters can
//! chain lookups with `?`: the first failing field becomes the single issue
//! for the record and the record is dropped.

use std::{collections::HashSet, str::FromStr};

use indexmap::IndexMap;
use ntr_core::{element::ElementAttributes, element::PointRef, geometry::Vec3};
use thiserror::Error;

use crate::{
    error::{ErrorCode, ParseIssue},
    record::{RawField, RawRecord},
};

const AXES: [&str; 3] = ["x", "y", "z"];

/// Why a field could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
enum FieldError {
    #[error("missing required field `{key}` in {code} record")]
    Missing { key: String, code: String },

    #[error("field `{key}` must hold three comma-separated numbers, found {count} value(s)")]
    CoordinateArity { key: String, count: usize },

    #[error("field `{key}` has an invalid {axis} component `{value}`")]
    CoordinateComponent {
        key: String,
        axis: &'static str,
        value: String,
    },

    #[error("missing coordinate value for field `{key}`")]
    MissingCoordinate { key: String },

    #[error("field `{key}` is not a finite number: `{value}`")]
    InvalidNumber { key: String, value: String },

    #[error("field `{key}` must be positive, found {value}")]
    NonPositive { key: String, value: f64 },

    #[error("invalid value `{value}` for field `{key}`, expected one of: {expected}")]
    InvalidEnum {
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl FieldError {
    fn code(&self) -> ErrorCode {
        match self {
            FieldError::Missing { .. } => ErrorCode::E102,
            FieldError::CoordinateArity { .. } | FieldError::CoordinateComponent { .. } => {
                ErrorCode::E103
            }
            FieldError::MissingCoordinate { .. } => ErrorCode::E104,
            FieldError::InvalidNumber { .. } | FieldError::NonPositive { .. } => ErrorCode::E105,
            FieldError::InvalidEnum { .. } => ErrorCode::E106,
        }
    }
}

/// Parse a finite `f64`, trimming surrounding whitespace.
fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Borrowed view over a record that converts fields into typed values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecordFields<'r> {
    record: &'r RawRecord,
}

impl<'r> RecordFields<'r> {
    pub fn new(record: &'r RawRecord) -> Self {
        Self { record }
    }

    /// Convert a field error into an issue located at `field`, or at the
    /// whole record when the field is absent.
    fn issue(&self, error: FieldError, field: Option<&RawField>) -> ParseIssue {
        let span = field.map_or(self.record.span, |field| field.span);
        let mut issue = ParseIssue::error(error.to_string())
            .with_code(error.code())
            .with_record_code(self.record.code.as_str())
            .at_line(self.record.line_number)
            .with_span(span);
        if let Some(field) = field {
            issue = issue.with_details(format!("{}={}", field.key, field.raw_value));
        }
        issue
    }

    /// Returns the field, or a "missing required field" issue.
    pub fn required(&self, key: &str) -> Result<&'r RawField, ParseIssue> {
        self.record.field(key).ok_or_else(|| {
            self.issue(
                FieldError::Missing {
                    key: key.to_string(),
                    code: self.record.code.clone(),
                },
                None,
            )
        })
    }

    /// Read a required point reference.
    pub fn point(&self, key: &str) -> Result<PointRef, ParseIssue> {
        let field = self.required(key)?;
        self.read_point(field)
    }

    /// Read an optional point reference.
    pub fn optional_point(&self, key: &str) -> Result<Option<PointRef>, ParseIssue> {
        self.record
            .field(key)
            .map(|field| self.read_point(field))
            .transpose()
    }

    /// Quoted values are `x,y,z` coordinates; unquoted values name a node.
    fn read_point(&self, field: &RawField) -> Result<PointRef, ParseIssue> {
        if !field.quoted {
            let id = field.value.trim();
            if id.is_empty() {
                return Err(self.issue(
                    FieldError::MissingCoordinate {
                        key: field.key.clone(),
                    },
                    Some(field),
                ));
            }
            return Ok(PointRef::NamedNode(id.to_string()));
        }

        let parts: Vec<&str> = field.value.split(',').collect();
        if parts.len() != AXES.len() {
            return Err(self.issue(
                FieldError::CoordinateArity {
                    key: field.key.clone(),
                    count: parts.len(),
                },
                Some(field),
            ));
        }

        let mut components = [0.0; 3];
        for ((component, part), axis) in components.iter_mut().zip(&parts).zip(AXES) {
            *component = parse_finite(part).ok_or_else(|| {
                self.issue(
                    FieldError::CoordinateComponent {
                        key: field.key.clone(),
                        axis,
                        value: part.trim().to_string(),
                    },
                    Some(field),
                )
            })?;
        }

        Ok(PointRef::Coordinate(Vec3::from(components)))
    }

    /// Read a required, non-empty code such as a nominal-diameter reference.
    pub fn code(&self, key: &str) -> Result<String, ParseIssue> {
        let field = self.required(key)?;
        let value = field.value.trim();
        if value.is_empty() {
            return Err(self.issue(
                FieldError::Missing {
                    key: key.to_string(),
                    code: self.record.code.clone(),
                },
                Some(field),
            ));
        }
        Ok(value.to_string())
    }

    /// Read an optional text field; empty values count as absent.
    pub fn optional_text(&self, key: &str) -> Option<String> {
        self.record
            .field(key)
            .map(|field| field.value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Read a required number that must be strictly positive.
    pub fn positive_number(&self, key: &str) -> Result<f64, ParseIssue> {
        let field = self.required(key)?;
        let value = self.read_number(field)?;
        if value <= 0.0 {
            return Err(self.issue(
                FieldError::NonPositive {
                    key: field.key.clone(),
                    value,
                },
                Some(field),
            ));
        }
        Ok(value)
    }

    /// Read an optional finite number; absent means `None`, not zero.
    pub fn optional_number(&self, key: &str) -> Result<Option<f64>, ParseIssue> {
        self.record
            .field(key)
            .map(|field| self.read_number(field))
            .transpose()
    }

    fn read_number(&self, field: &RawField) -> Result<f64, ParseIssue> {
        parse_finite(&field.value).ok_or_else(|| {
            self.issue(
                FieldError::InvalidNumber {
                    key: field.key.clone(),
                    value: field.value.clone(),
                },
                Some(field),
            )
        })
    }

    /// Read a comma-separated list; entries are trimmed and empty ones dropped.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.record
            .field(key)
            .map(|field| {
                field
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Read a required enumeration value.
    pub fn enumeration<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<T, ParseIssue> {
        let field = self.required(key)?;
        field.value.parse::<T>().map_err(|_| {
            self.issue(
                FieldError::InvalidEnum {
                    key: field.key.clone(),
                    value: field.value.clone(),
                    expected,
                },
                Some(field),
            )
        })
    }

    /// Read the attributes shared by every element kind.
    pub fn attributes(&self) -> Result<ElementAttributes, ParseIssue> {
        Ok(ElementAttributes {
            material: self.optional_text("MAT"),
            load_cases: self.list("LAST"),
            description: self.optional_text("TEXT"),
            reference: self.optional_text("REF"),
            pipeline: self.optional_text("LTG"),
            component_tag: self.optional_text("BEZ"),
            norm: self.optional_text("NORM"),
            series: self.optional_text("SERIE"),
            schedule: self.optional_text("SCHED"),
            weight: self.optional_number("GEW")?,
            raw_fields: self.raw_snapshot(),
        })
    }

    /// Every field as written, in source order; the first of repeated keys wins.
    pub fn raw_snapshot(&self) -> IndexMap<String, String> {
        let mut snapshot = IndexMap::with_capacity(self.record.fields.len());
        for field in &self.record.fields {
            snapshot
                .entry(field.key.clone())
                .or_insert_with(|| field.raw_value.clone());
        }
        snapshot
    }

    /// One warning per field whose key already appeared earlier in the record.
    pub fn duplicate_field_warnings(&self) -> Vec<ParseIssue> {
        let mut seen = HashSet::new();
        self.record
            .fields
            .iter()
            .filter(|field| !seen.insert(field.key.as_str()))
            .map(|field| {
                ParseIssue::warning(format!(
                    "duplicate field `{}` in {} record, the first value is used",
                    field.key, self.record.code
                ))
                .with_code(ErrorCode::E108)
                .with_record_code(self.record.code.as_str())
                .at_line(self.record.line_number)
                .with_span(field.span)
            })
            .collect()
    }
}
