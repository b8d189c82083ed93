//! Command-line argument definitions for the NTR CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input file, the report format and
//! destination, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the NTR inspection tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input NTR file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Document identifier; defaults to the input file name
    #[arg(long)]
    pub id: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Path to the output file; the report goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Format of the report written by [`crate::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary of the document and its geometry.
    #[default]
    Text,
    /// The validated document and its scene graph as JSON.
    Json,
}
