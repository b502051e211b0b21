//! Fly plume-navigation core.
//!
//! The physics of a fly walking through a 2-D odor plume under a steady wind:
//! 1. **Kinematics**: position and heading, turned and walked one step per tick
//! 2. **Turn policy**: discrete actions coupled to upwind/downwind/crosswind references
//! 3. **Plume**: concentration frames (constant, rolling-random, video) and their sampling
//!
//! Per tick the driver applies a turn rule, walks, advances the plume,
//! samples the new frame and pushes into the odor history. Everything here is
//! synchronous and allocation-light; randomness only enters through an
//! injected, seeded generator.

pub mod error;
pub mod fly;
pub mod geometry;
pub mod plume;
pub mod senses;
pub mod turn;
pub mod wind;

// Re-export key types for convenience
pub use error::PlumeError;
pub use fly::FlySpatialParameters;
pub use geometry::{angle_to_unit_vector, standardize_angle};
pub use plume::{
    OdorPlume, PlumeBounds, PlumeFrame, PlumeKind, PLUME_VIDEO_X_BOUNDS, PLUME_VIDEO_Y_BOUNDS,
};
pub use senses::{detect_local_odor_concentration, OdorHistory, MAX_HISTORY_LENGTH};
pub use turn::{TurnAction, TurnFunctions};
pub use wind::WindDirections;
