//! Circular-arc fitting for bends.
//!
//! A bend is given by its start `S`, the intersection `T` of its two
//! straight legs, and its end `E`. The fitted circle passes through `S` and
//! `E` and is tangent to `S -> T` at `S`. When `|S - T| == |T - E|` it is
//! also tangent to `T -> E` at `E`.
//!
//! The arc is expressed in an orthonormal basis `(u, v)` of the bend plane:
//! `u` points from `S` to `T`, `v` points from `S` towards the center.
//!
//! ```text
//!          v
//!          ▲      E
//!          │    ╱
//!     C ●  │  ╱
//!          │╱
//!          S ──────▶ T    u
//! ```

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Serialize;

use ntr_core::geometry::Vec3;

use crate::config::GeometryConfig;

/// A circular bend arc in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BendArc {
    center: Vec3,
    radius: f64,
    /// Unit vector along `S -> T`.
    u: Vec3,
    /// Unit vector in the bend plane, orthogonal to `u`, towards the center.
    v: Vec3,
    /// Plane normal `u x v`.
    normal: Vec3,
    start_angle: f64,
    end_angle: f64,
    /// Angle travelled from start to end, in `(0, 2π)`.
    sweep: f64,
    outer_diameter: Option<f64>,
}

impl BendArc {
    /// Fit an arc through three control points.
    ///
    /// Returns `None` when no well-defined arc exists: the points are
    /// colinear, a control segment is degenerate, or the radius is not a
    /// positive finite number.
    pub fn fit(
        start: Vec3,
        tangent_point: Vec3,
        end: Vec3,
        outer_diameter: Option<f64>,
        config: &GeometryConfig,
    ) -> Option<Self> {
        let min_length = config.min_segment_length();
        if tangent_point.distance(end) <= min_length {
            return None;
        }
        let u = tangent_point.sub_vec(start).normalize(min_length)?;

        let chord = end.sub_vec(start);
        let chord_length = chord.length();
        let ex = chord.dot(u);
        let perpendicular = chord.sub_vec(u.scale(ex));
        let ey = perpendicular.length();

        if !(ey.is_finite() && chord_length.is_finite())
            || ey <= config.colinear_tolerance() * chord_length
        {
            return None;
        }
        let v = perpendicular.scale(1.0 / ey);

        let radius = (ex * ex + ey * ey) / (2.0 * ey);
        if !radius.is_finite() || radius <= 0.0 {
            return None;
        }

        let center = start.add_vec(v.scale(radius));
        let start_angle = -FRAC_PI_2;
        let end_angle = (ey - radius).atan2(ex);
        // Increasing angle moves along +u at the start point.
        let sweep = (end_angle - start_angle).rem_euclid(TAU);
        if !(sweep > 0.0 && sweep < TAU) {
            return None;
        }

        Some(Self {
            center,
            radius,
            u,
            v,
            normal: u.cross(v),
            start_angle,
            end_angle,
            sweep,
            outer_diameter,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The in-plane basis `(u, v)`.
    pub fn basis(&self) -> (Vec3, Vec3) {
        (self.u, self.v)
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    pub fn outer_diameter(&self) -> Option<f64> {
        self.outer_diameter
    }

    /// Arc length along the centerline.
    pub fn length(&self) -> f64 {
        self.radius * self.sweep
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.sweep * t.clamp(0.0, 1.0)
    }

    /// Point at parameter `t` in `[0, 1]` from start to end.
    pub fn point_at(&self, t: f64) -> Vec3 {
        let angle = self.angle_at(t);
        self.center
            .add_vec(self.u.scale(self.radius * angle.cos()))
            .add_vec(self.v.scale(self.radius * angle.sin()))
    }

    /// Unit tangent, in the direction of travel, at parameter `t`.
    pub fn tangent_at(&self, t: f64) -> Vec3 {
        let angle = self.angle_at(t);
        self.u
            .scale(-angle.sin())
            .add_vec(self.v.scale(angle.cos()))
    }

    /// `segments + 1` evenly spaced points from start to end.
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn fit(start: Vec3, tangent_point: Vec3, end: Vec3) -> Option<BendArc> {
        BendArc::fit(start, tangent_point, end, None, &GeometryConfig::default())
    }

    fn assert_vec_eq(actual: Vec3, expected: Vec3) {
        assert!(
            approx_eq!(f64, actual.distance(expected), 0.0, epsilon = 1e-9),
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_quarter_bend() {
        let arc = fit(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        )
        .unwrap();

        assert!(approx_eq!(f64, arc.radius(), 1.0, epsilon = 1e-12));
        assert_vec_eq(arc.center(), Vec3::new(0.0, 1.0, 0.0));
        assert!(approx_eq!(f64, arc.sweep(), FRAC_PI_2, epsilon = 1e-12));
        assert_vec_eq(arc.normal(), Vec3::new(0.0, 0.0, 1.0));
        assert_vec_eq(arc.point_at(0.0), Vec3::new(0.0, 0.0, 0.0));
        assert_vec_eq(arc.point_at(1.0), Vec3::new(1.0, 1.0, 0.0));
        assert!(approx_eq!(f64, arc.length(), FRAC_PI_2, epsilon = 1e-12));
    }

    #[test]
    fn test_tangents_follow_control_legs() {
        let start = Vec3::new(2.0, 0.0, 1.0);
        let tangent_point = Vec3::new(2.0, 3.0, 1.0);
        let end = Vec3::new(2.0, 3.0, 4.0);
        let arc = fit(start, tangent_point, end).unwrap();

        assert_vec_eq(arc.tangent_at(0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_vec_eq(arc.tangent_at(1.0), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_obtuse_bend_sweep() {
        // 45 degree change of direction.
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let arc = fit(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(s, s, 0.0),
        )
        .unwrap();

        assert!(approx_eq!(
            f64,
            arc.sweep(),
            std::f64::consts::FRAC_PI_4,
            epsilon = 1e-12
        ));
        assert!(approx_eq!(
            f64,
            arc.center().distance(Vec3::new(-1.0, 0.0, 0.0)),
            arc.center().distance(Vec3::new(s, s, 0.0)),
            epsilon = 1e-9
        ));
    }

    #[test]
    fn test_colinear_points_do_not_fit() {
        assert!(
            fit(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(2.0, 2.0, 2.0),
            )
            .is_none()
        );
        // Reversal: the end point lies behind the start on the same line.
        assert!(
            fit(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(-3.0, 0.0, 0.0),
            )
            .is_none()
        );
    }

    #[test]
    fn test_degenerate_segments_do_not_fit() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let q = Vec3::new(2.0, 2.0, 3.0);
        assert!(fit(p, p, q).is_none());
        assert!(fit(p, q, q).is_none());
        assert!(fit(p, q, p).is_none());
    }

    #[test]
    fn test_non_finite_points_do_not_fit() {
        assert!(
            fit(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(f64::INFINITY, 1.0, 0.0),
            )
            .is_none()
        );
    }

    #[test]
    fn test_sample_includes_both_ends() {
        let arc = fit(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        )
        .unwrap();

        let points = arc.sample(8);
        assert_eq!(points.len(), 9);
        assert_vec_eq(points[0], Vec3::new(0.0, 0.0, 0.0));
        assert_vec_eq(points[8], Vec3::new(1.0, 1.0, 0.0));
        for point in points {
            assert!(approx_eq!(
                f64,
                point.distance(arc.center()),
                arc.radius(),
                epsilon = 1e-12
            ));
        }
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        /// A symmetric bend: both legs have the same length, so the fitted
        /// arc is tangent to both.
        fn symmetric_bend_strategy() -> impl Strategy<Value = (Vec3, Vec3, Vec3)> {
            (
                (-100.0..100.0f64, -100.0..100.0f64, -100.0..100.0f64),
                (0.1..50.0f64),
                (0.2..3.0f64),
                (0.0..TAU),
            )
                .prop_map(|((x, y, z), leg, turn, roll)| {
                    let tangent_point = Vec3::new(x, y, z);
                    // Incoming direction rotated by `roll` around Z, outgoing
                    // direction turned by `turn` within a tilted plane.
                    let d1 = Vec3::new(roll.cos(), roll.sin(), 0.3).normalize(0.0).unwrap();
                    let side = d1.cross(Vec3::new(0.0, 0.0, 1.0)).normalize(0.0).unwrap();
                    let d2 = d1.scale(turn.cos()).add_vec(side.scale(turn.sin()));
                    let start = tangent_point.sub_vec(d1.scale(leg));
                    let end = tangent_point.add_vec(d2.scale(leg));
                    (start, tangent_point, end)
                })
        }

        fn check_center_is_equidistant(
            start: Vec3,
            tangent_point: Vec3,
            end: Vec3,
        ) -> Result<(), TestCaseError> {
            let arc = fit(start, tangent_point, end);
            prop_assert!(arc.is_some());
            let arc = arc.unwrap();
            let scale = arc.radius().max(1.0);
            prop_assert!(approx_eq!(
                f64,
                arc.center().distance(start),
                arc.center().distance(end),
                epsilon = 1e-9 * scale
            ));
            prop_assert!(approx_eq!(
                f64,
                arc.center().distance(start),
                arc.radius(),
                epsilon = 1e-9 * scale
            ));
            Ok(())
        }

        fn check_tangents_match_legs(
            start: Vec3,
            tangent_point: Vec3,
            end: Vec3,
        ) -> Result<(), TestCaseError> {
            let arc = fit(start, tangent_point, end);
            prop_assert!(arc.is_some());
            let arc = arc.unwrap();

            let incoming = tangent_point.sub_vec(start).normalize(0.0).unwrap();
            let outgoing = end.sub_vec(tangent_point).normalize(0.0).unwrap();
            prop_assert!(arc.tangent_at(0.0).distance(incoming) < 1e-6);
            prop_assert!(arc.tangent_at(1.0).distance(outgoing) < 1e-6);
            prop_assert!(arc.point_at(1.0).distance(end) < 1e-6 * arc.radius().max(1.0));
            Ok(())
        }

        fn check_colinear_falls_back(
            start: Vec3,
            direction: Vec3,
            t1: f64,
            t2: f64,
        ) -> Result<(), TestCaseError> {
            let tangent_point = start.add_vec(direction.scale(t1));
            let end = start.add_vec(direction.scale(t2));
            prop_assert!(fit(start, tangent_point, end).is_none());
            Ok(())
        }

        proptest! {
            #[test]
            fn center_is_equidistant((start, tangent_point, end) in symmetric_bend_strategy()) {
                check_center_is_equidistant(start, tangent_point, end)?;
            }

            #[test]
            fn tangents_match_legs((start, tangent_point, end) in symmetric_bend_strategy()) {
                check_tangents_match_legs(start, tangent_point, end)?;
            }

            #[test]
            fn colinear_falls_back(
                x in -100i32..100,
                y in -100i32..100,
                z in -100i32..100,
                axis in 0usize..3,
                t1 in 1i32..50,
                t2 in 51i32..100,
            ) {
                let mut direction = [0.0; 3];
                direction[axis] = 1.0;
                check_colinear_falls_back(
                    Vec3::new(f64::from(x), f64::from(y), f64::from(z)),
                    Vec3::from(direction),
                    f64::from(t1),
                    f64::from(t2),
                )?;
            }
        }
    }
}
