//! NTR - Parsing and geometry derivation for NTR piping interchange files.
//!
//! This library reads the line-oriented "Neutral" format that describes a
//! piping system (pipes, bends, tees, valves, profiles, reducers), validates
//! it into a typed document, and derives scene geometry for viewers.

pub mod config;
pub mod scene;

mod error;
mod export;

pub use ntr_core::{diameter, element, geometry, metadata};
pub use ntr_parser::{
    Definitions, DocumentCandidate, ErrorCode, NtrDocument, ParseError, ParseIssue, Severity,
    Span,
};

pub use error::NtrError;

use log::{debug, info, trace};

use config::AppConfig;
use metadata::Metadata;
use scene::SceneGraph;

/// Builder for parsing NTR documents and deriving their geometry.
///
/// # Examples
///
/// ```rust
/// use ntr::{DocumentBuilder, config::AppConfig};
///
/// let source = "DN NAME=DN150 DA=168.3\nRO P1='0,0,0' P2='5,0,0' DN=DN150";
///
/// let builder = DocumentBuilder::new(AppConfig::default());
///
/// // Parse source to a validated document
/// let document = builder.parse(source, "line-1")
///     .expect("Failed to parse");
///
/// // Derive scene geometry
/// let scene = builder.derive_scene(&document);
/// assert_eq!(scene.elements.len(), 1);
/// assert!(scene.bounds.is_some());
///
/// // Or use default config
/// let builder = DocumentBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    config: AppConfig,
}

impl DocumentBuilder {
    /// Create a new document builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including geometry tolerances
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a validated document.
    ///
    /// # Arguments
    ///
    /// * `source` - NTR source text
    /// * `id` - Document identifier, typically the file name
    ///
    /// # Errors
    ///
    /// Returns `NtrError::Parse` with every collected issue and the source
    /// text when the document is rejected.
    pub fn parse(&self, source: &str, id: &str) -> Result<NtrDocument, NtrError> {
        self.parse_with_metadata(source, id, None)
    }

    /// Parse source text into a validated document with caller metadata.
    ///
    /// # Errors
    ///
    /// See [`DocumentBuilder::parse`].
    pub fn parse_with_metadata(
        &self,
        source: &str,
        id: &str,
        metadata: Option<Metadata>,
    ) -> Result<NtrDocument, NtrError> {
        info!(id; "Parsing document");

        let document = ntr_parser::parse_with_metadata(source, id, metadata)
            .map_err(|err| NtrError::new_parse_error(err, source))?;

        debug!(
            elements = document.elements().len(),
            errors = document.error_count(),
            warnings = document.warning_count();
            "Document parsed successfully"
        );
        trace!(document:?; "Parsed document");

        Ok(document)
    }

    /// Derive the scene graph of a document.
    ///
    /// Never fails; see [`scene::derive_scene`].
    pub fn derive_scene(&self, document: &NtrDocument) -> SceneGraph {
        info!(id = document.id(); "Deriving scene geometry");
        scene::derive_scene(document, self.config.geometry())
    }

    /// Export a document and its scene graph as JSON.
    ///
    /// # Errors
    ///
    /// Returns `NtrError::Export` if serialization fails.
    pub fn export_json(
        &self,
        document: &NtrDocument,
        scene: &SceneGraph,
        pretty: bool,
    ) -> Result<String, NtrError> {
        let json = export::to_json(document, scene, pretty)?;
        info!(bytes = json.len(); "JSON exported");
        Ok(json)
    }
}
