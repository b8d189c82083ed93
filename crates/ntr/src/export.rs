//! JSON export of a document and its scene graph.

use serde::Serialize;
use thiserror::Error;

use ntr_parser::NtrDocument;

use crate::scene::SceneGraph;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Export<'a> {
    document: &'a NtrDocument,
    scene: &'a SceneGraph,
}

/// Serialize `{ "document": ..., "scene": ... }`.
pub fn to_json(document: &NtrDocument, scene: &SceneGraph, pretty: bool) -> Result<String, Error> {
    let export = Export { document, scene };
    let json = if pretty {
        serde_json::to_string_pretty(&export)?
    } else {
        serde_json::to_string(&export)?
    };
    Ok(json)
}
