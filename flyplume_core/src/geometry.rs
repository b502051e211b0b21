//! Angle helpers shared by the kinematics and turn models.
//!
//! All stored angles are radians in `[0, 2π)`.

use nalgebra::Vector2;
use std::f64::consts::{PI, TAU};

/// Wraps an angle into `[0, 2π)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly `2π`; those
/// are folded back to 0 so the half-open interval holds.
pub fn standardize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Returns `(cos a, sin a)`.
pub fn angle_to_unit_vector(angle: f64) -> Vector2<f64> {
    Vector2::new(angle.cos(), angle.sin())
}

/// Heading of a vector, standardized. The zero vector maps to 0.
pub fn unit_vector_to_angle(direction: &Vector2<f64>) -> f64 {
    standardize_angle(direction.y.atan2(direction.x))
}

/// Signed rotation from `from` to `to`, in `(-π, π]`.
pub fn signed_angle_difference(from: f64, to: f64) -> f64 {
    let delta = standardize_angle(to - from);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}
