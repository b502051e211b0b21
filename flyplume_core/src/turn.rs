//! Turn actions and the wind-coupled turn table.
//!
//! Each [`TurnAction`] maps to a pure `orientation -> orientation` rule. The
//! table is built once from a [`WindDirections`] and never mutated.
//!
//! Sign policy: a turn rotates by a fixed magnitude in whichever direction
//! shortens the angular distance to its reference heading. The signed
//! difference is taken in `(-π, π]`, so a fly facing exactly away from the
//! reference (difference `π`) turns counter-clockwise, and a fly already
//! on the reference (difference `0`) also turns counter-clockwise.

use crate::error::PlumeError;
use crate::geometry::{signed_angle_difference, standardize_angle};
use crate::wind::WindDirections;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_6, PI};

/// Default turn step: one-twelfth of a full rotation.
pub const DEFAULT_TURN_MAGNITUDE: f64 = FRAC_PI_6;

/// Discrete turn choices available to the fly each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnAction {
    /// Keep the current heading
    NoTurn,

    /// Step toward the wind source
    UpwindTurn,

    /// Step away from the wind source
    DownwindTurn,

    /// Step toward `wind_angle + π/2`
    CrosswindTurnA,

    /// Step toward `wind_angle - π/2`
    CrosswindTurnB,
}

impl TurnAction {
    /// All actions, in table order.
    pub const ALL: [TurnAction; 5] = [
        TurnAction::NoTurn,
        TurnAction::UpwindTurn,
        TurnAction::DownwindTurn,
        TurnAction::CrosswindTurnA,
        TurnAction::CrosswindTurnB,
    ];

    /// Position of this action in [`TurnAction::ALL`].
    pub fn index(self) -> usize {
        match self {
            TurnAction::NoTurn => 0,
            TurnAction::UpwindTurn => 1,
            TurnAction::DownwindTurn => 2,
            TurnAction::CrosswindTurnA => 3,
            TurnAction::CrosswindTurnB => 4,
        }
    }

    /// Returns the action name.
    pub fn name(&self) -> &'static str {
        match self {
            TurnAction::NoTurn => "no_turn",
            TurnAction::UpwindTurn => "upwind_turn",
            TurnAction::DownwindTurn => "downwind_turn",
            TurnAction::CrosswindTurnA => "crosswind_turn_a",
            TurnAction::CrosswindTurnB => "crosswind_turn_b",
        }
    }
}

impl std::fmt::Display for TurnAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for TurnAction {
    type Err = PlumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "no_turn" | "none" => Ok(TurnAction::NoTurn),
            "upwind_turn" | "upwind" => Ok(TurnAction::UpwindTurn),
            "downwind_turn" | "downwind" => Ok(TurnAction::DownwindTurn),
            "crosswind_turn_a" | "crosswind_a" => Ok(TurnAction::CrosswindTurnA),
            "crosswind_turn_b" | "crosswind_b" => Ok(TurnAction::CrosswindTurnB),
            _ => Err(PlumeError::UnknownTurnAction(s.to_string())),
        }
    }
}

/// Sign (`+1` or `-1`) of the rotation that brings `orientation` closer to `target`.
pub fn turn_toward_sign(orientation: f64, target: f64) -> i8 {
    if signed_angle_difference(orientation, target) >= 0.0 {
        1
    } else {
        -1
    }
}

/// A single entry of the turn table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRule {
    /// Reference heading, or `None` for the identity rule
    target: Option<f64>,

    /// Step size in radians
    magnitude: f64,
}

impl TurnRule {
    /// Maps a current orientation to the new orientation.
    pub fn apply(&self, orientation: f64) -> f64 {
        match self.target {
            None => orientation,
            Some(target) => {
                let sign = f64::from(turn_toward_sign(orientation, target));
                standardize_angle(orientation + sign * self.magnitude)
            }
        }
    }

    /// Rotation this rule would add to `orientation`, in `(-π, π]`.
    pub fn delta(&self, orientation: f64) -> f64 {
        signed_angle_difference(orientation, self.apply(orientation))
    }
}

/// Immutable action → rule table for one wind configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnFunctions {
    wind: WindDirections,
    magnitude: f64,
    turn_functions: [TurnRule; 5],
}

impl TurnFunctions {
    /// Builds the table with [`DEFAULT_TURN_MAGNITUDE`].
    pub fn new(wind: WindDirections) -> Self {
        Self::build(wind, DEFAULT_TURN_MAGNITUDE)
    }

    /// Builds the table with a custom step size.
    pub fn with_magnitude(wind: WindDirections, magnitude: f64) -> Result<Self, PlumeError> {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(PlumeError::InvalidTurnMagnitude(magnitude));
        }
        Ok(Self::build(wind, magnitude))
    }

    fn build(wind: WindDirections, magnitude: f64) -> Self {
        let step = |target: f64| TurnRule { target: Some(target), magnitude };
        let turn_functions = [
            TurnRule { target: None, magnitude },
            step(wind.upwind),
            step(wind.downwind),
            step(wind.crosswind_a),
            step(wind.crosswind_b),
        ];
        tracing::debug!(
            wind_angle = wind.wind_angle,
            magnitude,
            "Built turn table"
        );
        Self { wind, magnitude, turn_functions }
    }

    /// Rule for `action`.
    pub fn rule(&self, action: TurnAction) -> &TurnRule {
        &self.turn_functions[action.index()]
    }

    /// Applies `action` to `orientation`.
    pub fn apply(&self, action: TurnAction, orientation: f64) -> f64 {
        self.rule(action).apply(orientation)
    }

    /// Sign of the rotation toward the upwind direction of `wind_angle`.
    ///
    /// Takes the wind angle explicitly (not this table's wind) so callers
    /// can query arbitrary winds.
    pub fn turn_against_orientation_sign(&self, orientation: f64, wind_angle: f64) -> i8 {
        turn_toward_sign(orientation, standardize_angle(wind_angle + PI))
    }

    /// Wind this table was built for.
    pub fn wind(&self) -> &WindDirections {
        &self.wind
    }

    /// Step size in radians.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fly::FlySpatialParameters;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn fly_at_origin() -> FlySpatialParameters {
        FlySpatialParameters::new(Vector2::zeros(), 0.0)
    }

    #[test]
    fn test_upwind_quarter_turn_in_southerly_wind_faces_south() {
        let wind_angle = FRAC_PI_2;
        let turns = TurnFunctions::new(WindDirections::new(wind_angle));
        let mut fly = fly_at_origin();

        let sign = turns.turn_against_orientation_sign(fly.orientation(), wind_angle);
        fly.turn(f64::from(sign) * FRAC_PI_2);

        assert_eq!(sign, -1);
        assert_relative_eq!(fly.orientation(), 3.0 * FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_upwind_quarter_turn_in_northerly_wind_faces_north() {
        let wind_angle = 3.0 * FRAC_PI_2;
        let turns = TurnFunctions::new(WindDirections::new(wind_angle));
        let mut fly = fly_at_origin();

        let sign = turns.turn_against_orientation_sign(fly.orientation(), wind_angle);
        fly.turn(f64::from(sign) * FRAC_PI_2);

        assert_eq!(sign, 1);
        assert_eq!(fly.orientation(), FRAC_PI_2);
    }

    #[test]
    fn test_no_turn_leaves_orientation_alone() {
        let turns = TurnFunctions::new(WindDirections::new(3.0 * FRAC_PI_2));
        let mut fly = fly_at_origin();
        fly.turn(turns.rule(TurnAction::NoTurn).delta(fly.orientation()));
        assert_eq!(fly.orientation(), 0.0);
    }

    #[test]
    fn test_upwind_turn_in_northerly_wind_steps_to_pi_over_six() {
        let turns = TurnFunctions::new(WindDirections::new(3.0 * FRAC_PI_2));
        let mut fly = fly_at_origin();
        fly.turn(turns.rule(TurnAction::UpwindTurn).delta(fly.orientation()));
        assert_eq!(fly.orientation(), FRAC_PI_6);
    }

    #[test]
    fn test_downwind_turn_steps_toward_wind_angle() {
        // Northerly reference: wind toward 3π/2, so downwind is reached clockwise from 0
        let turns = TurnFunctions::new(WindDirections::new(3.0 * FRAC_PI_2));
        let turned = turns.apply(TurnAction::DownwindTurn, 0.0);
        assert_relative_eq!(turned, standardize_angle(-FRAC_PI_6), epsilon = 1e-12);
    }

    #[test]
    fn test_crosswind_turns_target_opposite_sides() {
        let turns = TurnFunctions::new(WindDirections::new(0.0));
        // Facing downwind (0): crosswind_a is π/2 (ccw), crosswind_b is 3π/2 (cw)
        assert_relative_eq!(turns.apply(TurnAction::CrosswindTurnA, 0.0), FRAC_PI_6, epsilon = 1e-12);
        assert_relative_eq!(
            turns.apply(TurnAction::CrosswindTurnB, 0.0),
            standardize_angle(-FRAC_PI_6),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sign_tie_facing_directly_downwind_turns_ccw() {
        // Wind toward 0, upwind π: a fly at 0 is exactly opposite upwind
        let turns = TurnFunctions::new(WindDirections::new(0.0));
        assert_eq!(turns.turn_against_orientation_sign(0.0, 0.0), 1);
        assert_relative_eq!(turns.apply(TurnAction::UpwindTurn, 0.0), FRAC_PI_6, epsilon = 1e-12);
    }

    #[test]
    fn test_sign_when_already_aligned_is_positive() {
        assert_eq!(turn_toward_sign(1.0, 1.0), 1);
    }

    #[test]
    fn test_repeated_upwind_turns_oscillate_around_upwind() {
        let turns = TurnFunctions::new(WindDirections::new(3.0 * FRAC_PI_2));
        let mut orientation = 0.0;
        for _ in 0..3 {
            orientation = turns.apply(TurnAction::UpwindTurn, orientation);
        }
        assert_relative_eq!(orientation, FRAC_PI_2, epsilon = 1e-12);

        // Once aligned, further steps dither within one step of upwind
        for _ in 0..4 {
            orientation = turns.apply(TurnAction::UpwindTurn, orientation);
            let off = signed_angle_difference(orientation, turns.wind().upwind).abs();
            assert!(off <= FRAC_PI_6 + 1e-9);
        }
    }

    #[test]
    fn test_rule_delta_matches_magnitude() {
        let turns = TurnFunctions::with_magnitude(WindDirections::default(), 0.25).unwrap();
        assert_relative_eq!(turns.rule(TurnAction::UpwindTurn).delta(0.5).abs(), 0.25, epsilon = 1e-12);
        assert_eq!(turns.rule(TurnAction::NoTurn).delta(0.5), 0.0);
    }

    #[test]
    fn test_invalid_magnitude_rejected() {
        assert_eq!(
            TurnFunctions::with_magnitude(WindDirections::default(), 0.0),
            Err(PlumeError::InvalidTurnMagnitude(0.0))
        );
        assert!(TurnFunctions::with_magnitude(WindDirections::default(), f64::NAN).is_err());
    }

    #[test]
    fn test_action_names_parse_back() {
        for action in TurnAction::ALL {
            assert_eq!(action.name().parse::<TurnAction>().unwrap(), action);
            assert_eq!(TurnAction::ALL[action.index()], action);
        }
        assert!("sideways".parse::<TurnAction>().is_err());
    }

    proptest! {
        #[test]
        fn prop_turn_rules_are_total_and_bounded(
            wind_angle in 0.0f64..TAU,
            orientation in 0.0f64..TAU,
            action_index in 0usize..5,
        ) {
            let turns = TurnFunctions::new(WindDirections::new(wind_angle));
            let action = TurnAction::ALL[action_index];
            let turned = turns.apply(action, orientation);
            prop_assert!(turned >= 0.0 && turned < TAU);
            let step = signed_angle_difference(orientation, turned).abs();
            prop_assert!(step <= turns.magnitude() + 1e-9);
        }

        #[test]
        fn prop_upwind_turn_never_overshoots_by_more_than_one_step(
            wind_angle in 0.0f64..TAU,
            orientation in 0.0f64..TAU,
        ) {
            let turns = TurnFunctions::new(WindDirections::new(wind_angle));
            let upwind = turns.wind().upwind;
            let before = signed_angle_difference(orientation, upwind).abs();
            let after = signed_angle_difference(turns.apply(TurnAction::UpwindTurn, orientation), upwind).abs();
            prop_assert!(after <= before.max(turns.magnitude()) + 1e-9);
        }
    }
}
