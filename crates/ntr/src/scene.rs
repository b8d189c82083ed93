//! Geometry derivation: validated documents to scene graphs.
//!
//! [`derive_scene`] walks the elements of an [`NtrDocument`] in order and
//! resolves every point reference into scene space, fits arcs for bends,
//! looks up outer diameters, and grows a bounding box over every resolved
//! coordinate. It never fails: missing diameters become `None` and bends that
//! cannot be fitted fall back to two straight segments.

mod bend;

pub use bend::BendArc;

use indexmap::IndexSet;
use log::{debug, trace};
use serde::Serialize;

use ntr_core::{
    diameter::{self, DiameterTable},
    element::{Element, ElementKind, PointRef},
    geometry::{Bounds, Vec3},
};
use ntr_parser::NtrDocument;

use crate::config::GeometryConfig;

/// A point reference resolved into scene space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenePoint {
    /// An explicit coordinate with its scene-space image.
    Resolved { source: Vec3, position: Vec3 },
    /// A named node that this document does not define.
    Unresolved { reference: String },
}

impl ScenePoint {
    /// Returns the scene-space position, if resolved.
    pub fn position(&self) -> Option<Vec3> {
        match self {
            ScenePoint::Resolved { position, .. } => Some(*position),
            ScenePoint::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ScenePoint::Resolved { .. })
    }
}

/// A straight piece of an element between two scene points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSegment {
    pub start: ScenePoint,
    pub end: ScenePoint,
    /// Outer diameter at the start; `None` when the size is not defined.
    pub start_diameter: Option<f64>,
    /// Outer diameter at the end; differs from the start only for reducers.
    pub end_diameter: Option<f64>,
}

impl SceneSegment {
    fn new(start: ScenePoint, end: ScenePoint, diameter: Option<f64>) -> Self {
        Self::tapered(start, end, diameter, diameter)
    }

    fn tapered(
        start: ScenePoint,
        end: ScenePoint,
        start_diameter: Option<f64>,
        end_diameter: Option<f64>,
    ) -> Self {
        Self {
            start,
            end,
            start_diameter,
            end_diameter,
        }
    }

    /// Length in scene units, when both ends are resolved.
    pub fn length(&self) -> Option<f64> {
        Some(self.start.position()?.distance(self.end.position()?))
    }
}

/// Geometry of a bend: a fitted arc, or the two legs when no arc fits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BendGeometry {
    Arc(BendArc),
    Segments([SceneSegment; 2]),
}

/// The shape of one scene element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SceneShape {
    /// Straight segments, in element order (two for tees, one or two for arms).
    Segments(Vec<SceneSegment>),
    /// A bend with its control points.
    Bend {
        start: ScenePoint,
        tangent_point: ScenePoint,
        end: ScenePoint,
        geometry: BendGeometry,
    },
}

/// The derived geometry of one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneElement {
    /// Position of the element in the document.
    pub index: usize,
    pub kind: ElementKind,
    pub shape: SceneShape,
}

/// Derived geometry of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneGraph {
    pub elements: Vec<SceneElement>,
    /// Scene-space bounds of every resolved coordinate; `None` if there is none.
    pub bounds: Option<Bounds>,
}

impl SceneGraph {
    /// Number of bends drawn as arcs.
    pub fn arc_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| {
                matches!(
                    e.shape,
                    SceneShape::Bend {
                        geometry: BendGeometry::Arc(_),
                        ..
                    }
                )
            })
            .count()
    }

    /// Distinct named-node references that could not be resolved, in order
    /// of first appearance.
    pub fn unresolved_references(&self) -> Vec<&str> {
        self.elements
            .iter()
            .flat_map(SceneElement::points)
            .filter_map(|point| match point {
                ScenePoint::Unresolved { reference } => Some(reference.as_str()),
                ScenePoint::Resolved { .. } => None,
            })
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

impl SceneElement {
    /// Every distinct point of the element.
    pub fn points(&self) -> Vec<&ScenePoint> {
        match &self.shape {
            SceneShape::Segments(segments) => {
                let mut points = Vec::with_capacity(segments.len() * 2);
                for segment in segments {
                    if points.last() != Some(&&segment.start) {
                        points.push(&segment.start);
                    }
                    points.push(&segment.end);
                }
                points
            }
            SceneShape::Bend {
                start,
                tangent_point,
                end,
                ..
            } => vec![start, tangent_point, end],
        }
    }
}

/// Accumulates bounds while resolving points.
struct SceneBuilder<'a> {
    diameters: &'a DiameterTable,
    config: &'a GeometryConfig,
    bounds: Option<Bounds>,
}

impl<'a> SceneBuilder<'a> {
    fn new(diameters: &'a DiameterTable, config: &'a GeometryConfig) -> Self {
        Self {
            diameters,
            config,
            bounds: None,
        }
    }

    /// Resolve a point reference, folding coordinates into the bounds.
    fn resolve(&mut self, point: &PointRef) -> ScenePoint {
        match point {
            PointRef::Coordinate(source) => {
                let position = source.to_scene();
                self.bounds = Some(match self.bounds {
                    Some(bounds) => bounds.include(position),
                    None => Bounds::from_point(position),
                });
                ScenePoint::Resolved {
                    source: *source,
                    position,
                }
            }
            PointRef::NamedNode(reference) => ScenePoint::Unresolved {
                reference: reference.clone(),
            },
        }
    }

    fn outer_diameter(&self, code: &str) -> Option<f64> {
        diameter::lookup(self.diameters, code).map(|d| d.outside_diameter)
    }

    fn segment(&mut self, start: &PointRef, end: &PointRef, code: Option<&str>) -> SceneSegment {
        let diameter = code.and_then(|code| self.outer_diameter(code));
        SceneSegment::new(self.resolve(start), self.resolve(end), diameter)
    }

    fn element(&mut self, index: usize, element: &Element) -> SceneElement {
        let shape = match element {
            Element::StraightPipe(e) => SceneShape::Segments(vec![self.segment(
                &e.start,
                &e.end,
                Some(e.nominal_diameter.as_str()),
            )]),
            Element::Bend(e) => {
                let start = self.resolve(&e.start);
                let tangent_point = self.resolve(&e.tangent_point);
                let end = self.resolve(&e.end);
                let diameter = self.outer_diameter(&e.nominal_diameter);
                let geometry = self.bend(index, &start, &tangent_point, &end, diameter);
                SceneShape::Bend {
                    start,
                    tangent_point,
                    end,
                    geometry,
                }
            }
            Element::Tee(e) => SceneShape::Segments(vec![
                self.segment(&e.main_start, &e.main_end, Some(e.main_diameter.as_str())),
                self.segment(&e.branch_start, &e.branch_end, Some(e.branch_diameter.as_str())),
            ]),
            Element::Arm(e) => {
                let inlet = self.outer_diameter(&e.inlet_diameter);
                let outlet = e
                    .outlet_diameter
                    .as_deref()
                    .map_or(inlet, |code| self.outer_diameter(code));
                let start = self.resolve(&e.start);
                let end = self.resolve(&e.end);
                let segments = match &e.middle {
                    Some(middle) => {
                        let middle = self.resolve(middle);
                        vec![
                            SceneSegment::new(start, middle.clone(), inlet),
                            SceneSegment::new(middle, end, outlet),
                        ]
                    }
                    None => vec![SceneSegment::tapered(start, end, inlet, outlet)],
                };
                SceneShape::Segments(segments)
            }
            Element::Profile(e) => SceneShape::Segments(vec![self.segment(
                &e.start,
                &e.end,
                e.nominal_diameter.as_deref(),
            )]),
            Element::Reducer(e) => {
                let inlet = self.outer_diameter(&e.inlet_diameter);
                let outlet = self.outer_diameter(&e.outlet_diameter);
                let start = self.resolve(&e.start);
                let end = self.resolve(&e.end);
                SceneShape::Segments(vec![SceneSegment::tapered(start, end, inlet, outlet)])
            }
        };

        SceneElement {
            index,
            kind: element.kind(),
            shape,
        }
    }

    fn bend(
        &self,
        index: usize,
        start: &ScenePoint,
        tangent_point: &ScenePoint,
        end: &ScenePoint,
        diameter: Option<f64>,
    ) -> BendGeometry {
        let arc = match (start.position(), tangent_point.position(), end.position()) {
            (Some(s), Some(t), Some(e)) => BendArc::fit(s, t, e, diameter, self.config),
            _ => None,
        };

        match arc {
            Some(arc) => {
                trace!(index, radius = arc.radius(), sweep = arc.sweep(); "Fitted bend arc");
                BendGeometry::Arc(arc)
            }
            None => {
                debug!(index; "Bend arc could not be fitted, using two segments");
                BendGeometry::Segments([
                    SceneSegment::new(start.clone(), tangent_point.clone(), diameter),
                    SceneSegment::new(tangent_point.clone(), end.clone(), diameter),
                ])
            }
        }
    }

    fn finish(self, elements: Vec<SceneElement>) -> SceneGraph {
        SceneGraph {
            elements,
            bounds: self.bounds,
        }
    }
}

/// Derive the scene graph of a validated document.
pub fn derive_scene(document: &NtrDocument, config: &GeometryConfig) -> SceneGraph {
    let mut builder = SceneBuilder::new(document.nominal_diameters(), config);

    let elements = document
        .elements()
        .iter()
        .enumerate()
        .map(|(index, element)| builder.element(index, element))
        .collect();

    let scene = builder.finish(elements);
    debug!(
        elements = scene.elements.len(),
        arcs = scene.arc_count(),
        bounded = scene.bounds.is_some();
        "Derived scene"
    );
    scene
}
