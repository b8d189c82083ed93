//! Configuration types for NTR processing.
//!
//! All types implement [`serde::Deserialize`] so front ends can load them
//! from a configuration file. Every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining geometry and report settings.
//! - [`GeometryConfig`] - Tolerances used when deriving scene geometry.
//! - [`ReportConfig`] - Controls which issues front ends show.
//!
//! Geometry tolerances must be finite and non-negative; anything else is
//! rejected while deserializing.
//!
//! # Example
//!
//! ```
//! # use ntr::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.geometry().colinear_tolerance(), 1e-9);
//! assert!(config.report().show_warnings());
//! ```

use serde::{Deserialize, Deserializer, de};

const DEFAULT_COLINEAR_TOLERANCE: f64 = 1e-9;
const DEFAULT_MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Geometry derivation section.
    #[serde(default)]
    geometry: GeometryConfig,

    /// Issue reporting section.
    #[serde(default)]
    report: ReportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(geometry: GeometryConfig, report: ReportConfig) -> Self {
        Self { geometry, report }
    }

    /// Returns the geometry configuration.
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Returns the report configuration.
    pub fn report(&self) -> &ReportConfig {
        &self.report
    }
}

/// Tolerances for bend-arc fitting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Bend control points count as colinear when the end point's distance
    /// from the start tangent is below this fraction of the chord length.
    #[serde(deserialize_with = "tolerance")]
    colinear_tolerance: f64,

    /// Control segments shorter than this are degenerate.
    #[serde(deserialize_with = "tolerance")]
    min_segment_length: f64,
}

impl GeometryConfig {
    /// Creates a new [`GeometryConfig`].
    ///
    /// # Arguments
    ///
    /// * `colinear_tolerance` - Relative tolerance for colinear bend points.
    /// * `min_segment_length` - Minimum length of a bend control segment.
    pub fn new(colinear_tolerance: f64, min_segment_length: f64) -> Self {
        Self {
            colinear_tolerance,
            min_segment_length,
        }
    }

    pub fn colinear_tolerance(&self) -> f64 {
        self.colinear_tolerance
    }

    pub fn min_segment_length(&self) -> f64 {
        self.min_segment_length
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLINEAR_TOLERANCE, DEFAULT_MIN_SEGMENT_LENGTH)
    }
}

fn tolerance<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(de::Error::custom(format!(
            "tolerance must be a finite, non-negative number, got {value}"
        )))
    }
}

/// Issue reporting options for front ends.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Show warning-severity issues in addition to errors.
    show_warnings: bool,
}

impl ReportConfig {
    pub fn new(show_warnings: bool) -> Self {
        Self { show_warnings }
    }

    /// Returns `true` if warnings should be shown.
    pub fn show_warnings(&self) -> bool {
        self.show_warnings
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(true)
    }
}
