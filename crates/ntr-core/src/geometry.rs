//! Geometric primitives for piping models.
//!
//! This module provides the small set of 3-D types used when interpreting
//! element coordinates and deriving scene geometry.
//!
//! # Overview
//!
//! - [`Vec3`] - A 3-D vector or position
//! - [`Bounds`] - An axis-aligned bounding box defined by minimum and maximum corners
//!
//! # Coordinate Systems
//!
//! Source files use an engineering convention with `Z` pointing up. Scene
//! space (what renderers consume) uses `Y` up:
//!
//! ```text
//!   source            scene
//!     Z                 Y
//!     │                 │
//!     └──── X           └──── X
//!    ╱                 ╱
//!   Y                 Z
//! ```
//!
//! [`Vec3::to_scene`] performs the mapping by swapping the `Y` and `Z`
//! components.

use serde::{Deserialize, Serialize};

/// A 3-D vector with `f64` components.
///
/// # Examples
///
/// ```
/// # use ntr_core::geometry::Vec3;
/// let a = Vec3::new(1.0, 2.0, 3.0);
/// let b = Vec3::new(4.0, 5.0, 6.0);
///
/// assert_eq!(a.add_vec(b), Vec3::new(5.0, 7.0, 9.0));
/// assert_eq!(a.dot(b), 32.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new vector with the specified components
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the vector with all components set to zero
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns `true` if every component is finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn add_vec(self, other: Vec3) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub_vec(self, other: Vec3) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Multiplies every component by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product.
    ///
    /// ```
    /// # use ntr_core::geometry::Vec3;
    /// let x = Vec3::new(1.0, 0.0, 0.0);
    /// let y = Vec3::new(0.0, 1.0, 0.0);
    /// assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn cross(self, other: Vec3) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        self.sub_vec(other).length()
    }

    /// Returns the unit vector in the same direction.
    ///
    /// Returns `None` when the length is not above `min_length` or is not
    /// finite, so callers never divide by (almost) zero.
    pub fn normalize(self, min_length: f64) -> Option<Self> {
        let length = self.length();
        if !length.is_finite() || length <= min_length {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Component-wise minimum
    pub fn min(self, other: Vec3) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum
    pub fn max(self, other: Vec3) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Maps a source-space position into scene space by swapping `Y` and `Z`.
    ///
    /// The mapping is its own inverse.
    ///
    /// ```
    /// # use ntr_core::geometry::Vec3;
    /// let source = Vec3::new(1.0, 2.0, 3.0);
    /// assert_eq!(source.to_scene(), Vec3::new(1.0, 3.0, 2.0));
    /// assert_eq!(source.to_scene().to_scene(), source);
    /// ```
    pub fn to_scene(self) -> Self {
        Self::new(self.x, self.z, self.y)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// An axis-aligned bounding box with minimum and maximum corners.
///
/// Bounds only ever grow: [`Bounds::include`] returns a box containing the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: Vec3,
    max: Vec3,
}

impl Bounds {
    /// Creates a degenerate bounds containing exactly one point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Returns the minimum corner
    pub fn min(self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner
    pub fn max(self) -> Vec3 {
        self.max
    }

    /// Returns the extent along each axis
    pub fn size(self) -> Vec3 {
        self.max.sub_vec(self.min)
    }

    /// Returns `true` if `point` lies inside or on the boundary
    pub fn contains(self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x <= self.max.x
            && point.y <= self.max.y
            && point.z <= self.max.z
    }

    /// Grows the bounds so that it contains `point`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ntr_core::geometry::{Bounds, Vec3};
    /// let bounds = Bounds::from_point(Vec3::new(0.0, 0.0, 0.0))
    ///     .include(Vec3::new(5.0, -1.0, 2.0));
    ///
    /// assert_eq!(bounds.min(), Vec3::new(0.0, -1.0, 0.0));
    /// assert_eq!(bounds.max(), Vec3::new(5.0, 0.0, 2.0));
    /// ```
    pub fn include(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }
}
