//! Plain-text report of a parsed document and its scene graph.

use std::fmt::Write;

use ntr::{NtrDocument, element::ElementKind, geometry::Vec3, scene::SceneGraph};

/// Render a short human-readable summary.
pub fn render(document: &NtrDocument, scene: &SceneGraph) -> String {
    let mut out = String::new();
    write_summary(&mut out, document, scene).expect("Writing to String buffer is infallible");
    out
}

fn write_summary(
    out: &mut String,
    document: &NtrDocument,
    scene: &SceneGraph,
) -> std::fmt::Result {
    writeln!(out, "Document: {}", document.id())?;
    if let Some(title) = &document.metadata().title {
        writeln!(out, "Title: {title}")?;
    }
    if let Some(source) = &document.metadata().source {
        writeln!(out, "Source: {source}")?;
    }

    writeln!(
        out,
        "Nominal diameters: {}",
        document.nominal_diameters().len()
    )?;
    writeln!(out, "Elements: {}", document.elements().len())?;
    for kind in ElementKind::ALL {
        let count = document
            .elements()
            .iter()
            .filter(|e| e.kind() == kind)
            .count();
        if count > 0 {
            writeln!(out, "  {:<5} {:<14} {count}", kind.record_code(), kind.name())?;
        }
    }

    let bends = scene
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Bend)
        .count();
    if bends > 0 {
        writeln!(out, "Bends drawn as arcs: {} of {bends}", scene.arc_count())?;
    }

    let unresolved = scene.unresolved_references();
    if !unresolved.is_empty() {
        writeln!(out, "Unresolved nodes: {}", unresolved.join(", "))?;
    }

    match scene.bounds {
        Some(bounds) => {
            writeln!(
                out,
                "Bounds: {} .. {}",
                point(bounds.min()),
                point(bounds.max())
            )?;
            writeln!(out, "Extent: {}", point(bounds.size()))?;
        }
        None => writeln!(out, "Bounds: none")?,
    }

    writeln!(
        out,
        "Issues: {} errors, {} warnings",
        document.error_count(),
        document.warning_count()
    )
}

fn point(p: Vec3) -> String {
    format!("({}, {}, {})", p.x, p.y, p.z)
}
