//! NTR Core Types and Definitions
//!
//! This crate provides the foundational types for NTR piping interchange
//! files. It includes:
//!
//! - **Geometry**: 3-D vectors and bounding boxes ([`geometry`] module)
//! - **Elements**: The six piping element kinds and point references ([`element`] module)
//! - **Diameters**: Nominal-diameter definitions and code normalization ([`diameter`] module)
//! - **Metadata**: Caller-supplied document information ([`metadata`] module)

pub mod diameter;
pub mod element;
pub mod geometry;
pub mod metadata;
