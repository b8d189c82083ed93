//! Integration tests for the DocumentBuilder API
//!
//! These tests verify that the public API works end to end.

use float_cmp::approx_eq;
use ntr::{
    DocumentBuilder, ErrorCode, NtrError,
    config::{AppConfig, GeometryConfig, ReportConfig},
    element::ElementKind,
    geometry::Vec3,
    metadata::Metadata,
    scene::{BendGeometry, SceneShape},
};

const PLANT: &str = r#"
C test plant
DN NAME=DN150 DA=168.3 S=4.5
DN NAME=DN100 DA=114.3
RO  P1='0, 0, 0'      P2='5000, 0, 0'     DN=DN150 MAT=P235GH LAST='LF1, LF2'
BOG P1='5000, 0, 0'   PT='5500, 0, 0'     P2='5500, 500, 0' DN=DN150
TEE PH1='5500, 500, 0' PH2='5500, 1500, 0' PA1='5500, 1000, 0' PA2='6000, 1000, 0' DNH=DN150 DNA=DN100
RED P1='6000, 1000, 0' P2='6300, 1000, 0' DN1=DN100 DN2=DN80
ARM P1=K10 P2=K11 DN1=DN100
"#;

#[test]
fn test_parse_and_derive_scene() {
    let builder = DocumentBuilder::default();
    let document = builder.parse(PLANT, "plant").expect("Failed to parse");

    assert_eq!(document.elements().len(), 5);
    assert_eq!(document.error_count(), 0);

    let scene = builder.derive_scene(&document);
    let kinds: Vec<_> = scene.elements.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::StraightPipe,
            ElementKind::Bend,
            ElementKind::Tee,
            ElementKind::Reducer,
            ElementKind::Arm,
        ]
    );

    let bounds = scene.bounds.expect("bounds");
    assert_eq!(bounds.min(), Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(bounds.max(), Vec3::new(6300.0, 0.0, 1500.0));

    match &scene.elements[1].shape {
        SceneShape::Bend {
            geometry: BendGeometry::Arc(arc),
            ..
        } => {
            assert!(approx_eq!(f64, arc.radius(), 500.0, epsilon = 1e-9));
            assert_eq!(arc.outer_diameter(), Some(168.3));
        }
        other => panic!("Expected fitted bend, got {other:?}"),
    }

    assert_eq!(scene.unresolved_references(), vec!["K10", "K11"]);
}

#[test]
fn test_missing_diameter_definition_degrades_to_none() {
    let builder = DocumentBuilder::default();
    let document = builder.parse(PLANT, "plant").unwrap();
    let scene = builder.derive_scene(&document);

    match &scene.elements[3].shape {
        SceneShape::Segments(segments) => {
            assert_eq!(segments[0].start_diameter, Some(114.3));
            assert_eq!(segments[0].end_diameter, None);
        }
        other => panic!("Expected segments, got {other:?}"),
    }
}

#[test]
fn test_parse_error_keeps_source_and_issues() {
    let builder = DocumentBuilder::default();
    let result = builder.parse("RO P1=A\nXYZ", " ");

    match result {
        Err(NtrError::Parse { err, src }) => {
            assert_eq!(src, "RO P1=A\nXYZ");
            let codes: Vec<_> = err.issues().iter().map(|i| i.code()).collect();
            assert_eq!(
                codes,
                vec![
                    Some(ErrorCode::E102),
                    Some(ErrorCode::E100),
                    Some(ErrorCode::E200)
                ]
            );
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn test_metadata_is_passed_through() {
    let builder = DocumentBuilder::default();
    let metadata = Metadata::default().with_source("plant.ntr");
    let document = builder
        .parse_with_metadata("", "plant", Some(metadata))
        .unwrap();
    assert_eq!(document.metadata().source.as_deref(), Some("plant.ntr"));
}

#[test]
fn test_colinear_tolerance_from_config() {
    // The end point is 1e-6 off the start tangent line over a chord of ~2.
    let source = "BOG P1='0,0,0' PT='1,0,0' P2='2,0.000001,0' DN=DN100";

    let strict = DocumentBuilder::default();
    let document = strict.parse(source, "bend").unwrap();
    let scene = strict.derive_scene(&document);
    assert_eq!(scene.arc_count(), 1);

    let loose = DocumentBuilder::new(AppConfig::new(
        GeometryConfig::new(1e-3, 1e-9),
        ReportConfig::default(),
    ));
    let scene = loose.derive_scene(&document);
    assert_eq!(scene.arc_count(), 0);
}

#[test]
fn test_export_json() {
    let builder = DocumentBuilder::default();
    let document = builder.parse(PLANT, "plant").unwrap();
    let scene = builder.derive_scene(&document);

    let json = builder.export_json(&document, &scene, false).unwrap();
    assert!(json.starts_with("{\"document\":{\"id\":\"plant\""));
    assert!(json.contains("\"scene\":"));
    assert!(json.contains("\"type\":\"arc\""));
    assert!(json.contains("\"type\":\"unresolved\""));

    let pretty = builder.export_json(&document, &scene, true).unwrap();
    assert!(pretty.contains('\n'));
}
