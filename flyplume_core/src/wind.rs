//! Wind reference directions.

use crate::geometry::standardize_angle;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Wind angle of the default westerly wind (blowing toward +x).
pub const DEFAULT_WIND_ANGLE: f64 = 0.0;

/// Reference directions derived from a single wind angle.
///
/// `wind_angle` is the direction the air moves toward; `upwind` points back
/// at the source. All five angles are fixed at construction. A change of
/// wind means building a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindDirections {
    /// Direction the wind blows toward
    pub wind_angle: f64,

    /// Toward the wind's origin (`wind_angle + π`)
    pub upwind: f64,

    /// Along the wind (`wind_angle`)
    pub downwind: f64,

    /// `wind_angle + π/2`
    pub crosswind_a: f64,

    /// `wind_angle - π/2`
    pub crosswind_b: f64,
}

impl WindDirections {
    /// Derives all reference directions from `wind_angle`.
    pub fn new(wind_angle: f64) -> Self {
        let wind_angle = standardize_angle(wind_angle);
        Self {
            wind_angle,
            upwind: standardize_angle(wind_angle + PI),
            downwind: wind_angle,
            crosswind_a: standardize_angle(wind_angle + FRAC_PI_2),
            crosswind_b: standardize_angle(wind_angle - FRAC_PI_2),
        }
    }
}

impl Default for WindDirections {
    fn default() -> Self {
        Self::new(DEFAULT_WIND_ANGLE)
    }
}
