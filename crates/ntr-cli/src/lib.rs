//! NTR CLI library
//!
//! This module contains the core CLI logic for inspecting NTR files.

pub mod error_adapter;

mod args;
mod config;
mod decode;
mod summary;

pub use args::{Args, OutputFormat};
pub use decode::decode_bytes;

use std::{fs, path::Path};

use log::{info, warn};

use ntr::{DocumentBuilder, NtrError, metadata::Metadata};

/// Run the NTR CLI application
///
/// This function reads and decodes the input file, parses it into a
/// validated document, derives its scene geometry, and writes a report in
/// the requested format to the output file or stdout. Issues of an accepted
/// document are rendered to stderr unless the configuration hides warnings.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `NtrError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Decoding errors
/// - Documents rejected by validation
/// - Export errors
pub fn run(args: &Args) -> Result<(), NtrError> {
    info!(
        input_path = args.input,
        format:? = args.format;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let show_warnings = app_config.report().show_warnings();

    let bytes = fs::read(&args.input)?;
    let source = decode::decode_bytes(&bytes)?;

    let input = Path::new(&args.input);
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.clone());
    let id = args.id.clone().unwrap_or_else(|| stem.clone());
    let metadata = Metadata::default()
        .with_title(stem)
        .with_source(args.input.as_str());

    let builder = DocumentBuilder::new(app_config);
    let document = builder.parse_with_metadata(&source, &id, Some(metadata))?;

    let shown: Vec<_> = document
        .issues()
        .iter()
        .filter(|issue| show_warnings || issue.severity().is_error())
        .cloned()
        .collect();
    if !shown.is_empty() {
        let reportables = error_adapter::issue_reportables(&shown, &source);
        warn!("Document has issues\n{}", error_adapter::render(&reportables));
    }

    let scene = builder.derive_scene(&document);

    let report = match args.format {
        OutputFormat::Text => summary::render(&document, &scene),
        OutputFormat::Json => builder.export_json(&document, &scene, true)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, report)?;
            info!(output_file = path; "Report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}
