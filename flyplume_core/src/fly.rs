//! Fly spatial state: position and heading.

use crate::geometry::{angle_to_unit_vector, standardize_angle};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Position and orientation of a single simulated fly.
///
/// Orientation is always standardized to `[0, 2π)`. Fields are read-only
/// from outside; the movement primitives are the only mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlySpatialParameters {
    /// Position in plume pixel coordinates
    position: Vector2<f64>,

    /// Heading in radians
    orientation: f64,
}

impl FlySpatialParameters {
    /// Creates a fly at `position` facing `orientation`.
    pub fn new(position: Vector2<f64>, orientation: f64) -> Self {
        Self {
            position,
            orientation: standardize_angle(orientation),
        }
    }

    /// Current position.
    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    /// Current heading in radians.
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Unit vector along the current heading.
    pub fn heading(&self) -> Vector2<f64> {
        angle_to_unit_vector(self.orientation)
    }

    /// Rotates by `delta_angle`. Any magnitude or sign is accepted.
    pub fn turn(&mut self, delta_angle: f64) {
        self.orientation = standardize_angle(self.orientation + delta_angle);
    }

    /// Translates by `direction` as given; the step is not normalized.
    pub fn update_position(&mut self, direction: Vector2<f64>) {
        self.position += direction;
    }

    /// Turns, then takes one unit step along the new heading.
    pub fn turn_and_walk(&mut self, delta_angle: f64) {
        self.turn(delta_angle);
        self.update_position(self.heading());
    }
}

impl Default for FlySpatialParameters {
    fn default() -> Self {
        Self::new(Vector2::zeros(), 0.0)
    }
}
