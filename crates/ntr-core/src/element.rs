//! Piping element types.
//!
//! An [`Element`] is one interpreted record of an NTR file. The enum is closed:
//! every supported record code maps to exactly one variant, and consumers
//! match on it exhaustively.
//!
//! | record | variant                    |
//! |--------|----------------------------|
//! | `RO`   | [`Element::StraightPipe`]  |
//! | `BOG`  | [`Element::Bend`]          |
//! | `TEE`  | [`Element::Tee`]           |
//! | `ARM`  | [`Element::Arm`]           |
//! | `PROF` | [`Element::Profile`]       |
//! | `RED`  | [`Element::Reducer`]       |
//!
//! Fields are public so that documents can be assembled directly (for example
//! in tests or from a deserialised payload). Such documents are only trusted
//! after they pass document validation.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// A reference to a position: either an explicit coordinate or a named node
/// defined elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PointRef {
    /// An explicit position in source coordinates.
    Coordinate(Vec3),
    /// The identifier of a node that is not defined in this document.
    NamedNode(String),
}

impl PointRef {
    /// Returns the coordinate, if this is an explicit position.
    pub fn coordinate(&self) -> Option<Vec3> {
        match self {
            PointRef::Coordinate(v) => Some(*v),
            PointRef::NamedNode(_) => None,
        }
    }

    /// Returns the node identifier, if this is a named reference.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            PointRef::Coordinate(_) => None,
            PointRef::NamedNode(id) => Some(id),
        }
    }
}

impl fmt::Display for PointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointRef::Coordinate(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            PointRef::NamedNode(id) => write!(f, "{id}"),
        }
    }
}

/// Local axis along which a structural profile is oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileAxis {
    Y,
    Z,
}

impl ProfileAxis {
    /// The accepted spellings, used in diagnostics.
    pub const EXPECTED: &'static str = "Y, Z";
}

impl FromStr for ProfileAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Y" => Ok(ProfileAxis::Y),
            "Z" => Ok(ProfileAxis::Z),
            _ => Err(format!("invalid profile axis `{s}`")),
        }
    }
}

impl fmt::Display for ProfileAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileAxis::Y => write!(f, "Y"),
            ProfileAxis::Z => write!(f, "Z"),
        }
    }
}

/// Attributes shared by every element kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementAttributes {
    pub material: Option<String>,
    /// Load cases the element belongs to, in source order.
    #[serde(default)]
    pub load_cases: Vec<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub pipeline: Option<String>,
    pub component_tag: Option<String>,
    pub norm: Option<String>,
    pub series: Option<String>,
    pub schedule: Option<String>,
    pub weight: Option<f64>,
    /// Every field of the source record as written (`key -> raw value`).
    #[serde(default)]
    pub raw_fields: IndexMap<String, String>,
}

/// A straight pipe run (`RO`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightPipe {
    pub start: PointRef,
    pub end: PointRef,
    pub nominal_diameter: String,
    #[serde(default)]
    pub attributes: ElementAttributes,
}

/// A pipe bend (`BOG`).
///
/// `tangent_point` is the intersection of the straight legs that the bend
/// connects; the arc is tangent to `start -> tangent_point` at `start` and
/// to `tangent_point -> end` at `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bend {
    pub start: PointRef,
    pub tangent_point: PointRef,
    pub end: PointRef,
    pub nominal_diameter: String,
    #[serde(default)]
    pub attributes: ElementAttributes,
}

/// A tee (`TEE`) made of a main run and a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tee {
    pub main_start: PointRef,
    pub main_end: PointRef,
    pub branch_start: PointRef,
    pub branch_end: PointRef,
    pub main_diameter: String,
    pub branch_diameter: String,
    /// Tee type designation (`TYP`).
    pub tee_type: Option<String>,
    #[serde(default)]
    pub attributes: ElementAttributes,
}

/// A valve or other inline armature (`ARM`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arm {
    pub start: PointRef,
    pub end: PointRef,
    pub middle: Option<PointRef>,
    pub inlet_diameter: String,
    /// Outlet size; the inlet size applies when absent.
    pub outlet_diameter: Option<String>,
    #[serde(default)]
    pub attributes: ElementAttributes,
}

/// A structural profile (`PROF`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub start: PointRef,
    pub end: PointRef,
    pub axis: ProfileAxis,
    /// Section designation (`TYP`), e.g. `HEB200`.
    pub section: Option<String>,
    pub nominal_diameter: Option<String>,
    #[serde(default)]
    pub attributes: ElementAttributes,
}

/// A concentric reducer (`RED`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reducer {
    pub start: PointRef,
    pub end: PointRef,
    pub inlet_diameter: String,
    pub outlet_diameter: String,
    #[serde(default)]
    pub attributes: ElementAttributes,
}

/// Discriminant of [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    StraightPipe,
    Bend,
    Tee,
    Arm,
    Profile,
    Reducer,
}

impl ElementKind {
    /// All kinds, in record-table order.
    pub const ALL: [ElementKind; 6] = [
        ElementKind::StraightPipe,
        ElementKind::Bend,
        ElementKind::Tee,
        ElementKind::Arm,
        ElementKind::Profile,
        ElementKind::Reducer,
    ];

    /// Returns the record code that produces this kind.
    pub fn record_code(self) -> &'static str {
        match self {
            ElementKind::StraightPipe => "RO",
            ElementKind::Bend => "BOG",
            ElementKind::Tee => "TEE",
            ElementKind::Arm => "ARM",
            ElementKind::Profile => "PROF",
            ElementKind::Reducer => "RED",
        }
    }

    /// Looks up the kind for an (upper-case) record code.
    pub fn from_record_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.record_code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::StraightPipe => "straight pipe",
            ElementKind::Bend => "bend",
            ElementKind::Tee => "tee",
            ElementKind::Arm => "arm",
            ElementKind::Profile => "profile",
            ElementKind::Reducer => "reducer",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One interpreted piping element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Element {
    StraightPipe(StraightPipe),
    Bend(Bend),
    Tee(Tee),
    Arm(Arm),
    Profile(Profile),
    Reducer(Reducer),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::StraightPipe(_) => ElementKind::StraightPipe,
            Element::Bend(_) => ElementKind::Bend,
            Element::Tee(_) => ElementKind::Tee,
            Element::Arm(_) => ElementKind::Arm,
            Element::Profile(_) => ElementKind::Profile,
            Element::Reducer(_) => ElementKind::Reducer,
        }
    }

    /// Borrow the attributes shared by all kinds.
    pub fn attributes(&self) -> &ElementAttributes {
        match self {
            Element::StraightPipe(e) => &e.attributes,
            Element::Bend(e) => &e.attributes,
            Element::Tee(e) => &e.attributes,
            Element::Arm(e) => &e.attributes,
            Element::Profile(e) => &e.attributes,
            Element::Reducer(e) => &e.attributes,
        }
    }

    /// Returns the nominal-diameter codes the element refers to, in
    /// inlet-to-outlet order.
    pub fn diameter_codes(&self) -> Vec<&str> {
        match self {
            Element::StraightPipe(e) => vec![e.nominal_diameter.as_str()],
            Element::Bend(e) => vec![e.nominal_diameter.as_str()],
            Element::Tee(e) => vec![e.main_diameter.as_str(), e.branch_diameter.as_str()],
            Element::Arm(e) => std::iter::once(e.inlet_diameter.as_str())
                .chain(e.outlet_diameter.as_deref())
                .collect(),
            Element::Profile(e) => e.nominal_diameter.as_deref().into_iter().collect(),
            Element::Reducer(e) => vec![e.inlet_diameter.as_str(), e.outlet_diameter.as_str()],
        }
    }
}
