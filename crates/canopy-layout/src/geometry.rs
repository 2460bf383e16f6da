//! Point rotation helpers.
//!
//! Angles are in degrees. Rotations go through unit quaternions, so any angle (including full
//! turns) is exact up to floating-point rounding.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

const AXIS_EPSILON: f64 = 1e-12;

/// Unit rotation axis for `axis`, falling back to world Z when `axis` has no usable direction.
pub fn normalized_axis(axis: &Vector3<f64>) -> Unit<Vector3<f64>> {
    if !axis.iter().all(|v| v.is_finite()) {
        return Vector3::z_axis();
    }
    Unit::try_new(*axis, AXIS_EPSILON).unwrap_or_else(Vector3::z_axis)
}

pub fn rotation(axis: &Vector3<f64>, angle_deg: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&normalized_axis(axis), angle_deg.to_radians())
}

/// Rotates `point` about `axis` (through the origin) by `angle_deg`.
pub fn rotate(point: Point3<f64>, axis: &Vector3<f64>, angle_deg: f64) -> Point3<f64> {
    rotation(axis, angle_deg) * point
}

/// Rotates `point` about the line through `center` along `axis` by `angle_deg`.
pub fn rotate_about_center(
    point: Point3<f64>,
    center: Point3<f64>,
    axis: &Vector3<f64>,
    angle_deg: f64,
) -> Point3<f64> {
    center + rotation(axis, angle_deg) * (point - center)
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// A unit vector perpendicular to `v`.
///
/// Uses `v × Z`, or `v × X` when `v` is (anti)parallel to Z. A zero `v` yields world X.
pub fn perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let candidate = v.cross(&Vector3::z());
    if let Some(unit) = Unit::try_new(candidate, AXIS_EPSILON) {
        return unit.into_inner();
    }
    let candidate = v.cross(&Vector3::x());
    Unit::try_new(candidate, AXIS_EPSILON)
        .map(Unit::into_inner)
        .unwrap_or_else(Vector3::x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_handles_z_aligned_input() {
        for v in [Vector3::z(), -Vector3::z() * 3.0, Vector3::new(0.0, 0.0, 1e-20)] {
            let p = perpendicular(&v);
            assert!((p.norm() - 1.0).abs() < 1e-12);
            assert!(p.dot(&v).abs() < 1e-12);
        }
        assert_eq!(perpendicular(&Vector3::zeros()), Vector3::x());
    }
}
