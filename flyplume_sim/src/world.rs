//! FlyWorld - one fly, one plume, one odor history.

use crate::error::SimError;

use flyplume_core::geometry::standardize_angle;
use flyplume_core::plume::DEFAULT_ROLL_SHIFT_SIZE;
use flyplume_core::senses::{
    detect_antennae_concentrations, detect_local_odor_concentration, DEFAULT_ANTENNA_OFFSET,
};
use flyplume_core::turn::DEFAULT_TURN_MAGNITUDE;
use flyplume_core::{
    FlySpatialParameters, OdorHistory, OdorPlume, PlumeBounds, PlumeFrame, PlumeKind, TurnAction,
    TurnFunctions, WindDirections, MAX_HISTORY_LENGTH,
};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Multiplier deriving the plume seed from the master seed.
pub const PLUME_SEED_MIX: u64 = 0x9e3779b97f4a7c15;

/// Multiplier deriving the policy seed from the master seed.
pub const POLICY_SEED_MIX: u64 = 0x517cc1b727220a95;

/// Folds the mix into the seed before multiplying so seed 0 still splits.
fn derive_seed(seed: u64, mix: u64) -> u64 {
    (seed ^ mix).wrapping_mul(mix)
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Direction the wind blows toward, in radians
    pub wind_angle: f64,

    /// Step size of every non-trivial turn action
    pub turn_magnitude: f64,

    /// Plume variant to build
    pub plume: PlumeKind,

    /// Per-tick shift of the rolling plume
    pub roll_shift_size: i64,

    /// Plume grid dimensions
    pub bounds: PlumeBounds,

    /// Odor samples remembered
    pub history_capacity: usize,

    /// Starting position `[x, y]`
    pub start_position: [f64; 2],

    /// Starting heading in radians
    pub start_orientation: f64,

    /// Distance from the body to each antenna
    pub antenna_offset: f64,

    /// Ticks per episode
    pub num_ticks: u64,

    /// Concentration above which the surge policy heads upwind
    pub surge_threshold: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        let bounds = PlumeBounds::default();
        Self {
            seed: 42,
            wind_angle: 0.0,
            turn_magnitude: DEFAULT_TURN_MAGNITUDE,
            plume: PlumeKind::RollingRandom,
            roll_shift_size: DEFAULT_ROLL_SHIFT_SIZE,
            bounds,
            history_capacity: MAX_HISTORY_LENGTH,
            start_position: [bounds.width as f64 / 2.0, bounds.height as f64 / 2.0],
            start_orientation: 0.0,
            antenna_offset: DEFAULT_ANTENNA_OFFSET,
            num_ticks: 500,
            surge_threshold: 0.5,
        }
    }
}

impl SimConfig {
    /// Seed for the plume generator.
    pub fn plume_seed(&self) -> u64 {
        derive_seed(self.seed, PLUME_SEED_MIX)
    }

    /// Seed for stochastic policies.
    pub fn policy_seed(&self) -> u64 {
        derive_seed(self.seed, POLICY_SEED_MIX)
    }

    /// Loads a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the synthetic plume named by `plume`.
    pub fn build_plume(&self) -> Result<OdorPlume, SimError> {
        let bounds = PlumeBounds::new(self.bounds.width, self.bounds.height)?;
        match self.plume {
            PlumeKind::AllOnes => Ok(OdorPlume::all_ones(bounds)),
            PlumeKind::AllZeros => Ok(OdorPlume::all_zeros(bounds)),
            PlumeKind::RollingRandom => Ok(OdorPlume::rolling_random_from_seed(
                bounds,
                self.roll_shift_size,
                self.plume_seed(),
            )),
            PlumeKind::Video => Err(SimError::VideoRequiresFrames),
        }
    }

    fn start_fly(&self) -> FlySpatialParameters {
        FlySpatialParameters::new(
            Vector2::new(self.start_position[0], self.start_position[1]),
            self.start_orientation,
        )
    }
}

/// What the fly sensed after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickObservation {
    /// Tick number, starting at 1
    pub tick: u64,

    /// Action applied this tick
    pub action: TurnAction,

    /// Position after walking
    pub position: [f64; 2],

    /// Heading after turning
    pub orientation: f64,

    /// Concentration sampled at the new position
    pub concentration: f64,

    /// Left and right antenna readings
    pub antennae: [f64; 2],
}

/// The simulation container for a single fly.
pub struct FlyWorld {
    /// Configuration
    pub config: SimConfig,

    fly: FlySpatialParameters,
    turns: TurnFunctions,
    plume: OdorPlume,
    history: OdorHistory,
    tick_count: u64,
    path_length: f64,
}

impl FlyWorld {
    /// Creates a world with the synthetic plume named by the config.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let plume = config.build_plume()?;
        Self::with_plume(config, plume)
    }

    /// Creates a world around an externally built plume (e.g. loaded video).
    pub fn with_plume(config: SimConfig, plume: OdorPlume) -> Result<Self, SimError> {
        let wind = WindDirections::new(config.wind_angle);
        let turns = TurnFunctions::with_magnitude(wind, config.turn_magnitude)?;
        let history = OdorHistory::with_capacity(config.history_capacity)?;

        info!(
            seed = config.seed,
            plume = %plume.kind(),
            wind_angle = standardize_angle(config.wind_angle),
            "FlyWorld created"
        );

        Ok(Self {
            fly: config.start_fly(),
            config,
            turns,
            plume,
            history,
            tick_count: 0,
            path_length: 0.0,
        })
    }

    /// Advances one tick: turn, walk, advance plume, sample, remember.
    pub fn tick(&mut self, action: TurnAction) -> TickObservation {
        let before = self.fly.position();
        let delta = self.turns.rule(action).delta(self.fly.orientation());
        self.fly.turn_and_walk(delta);
        self.path_length += (self.fly.position() - before).norm();

        self.plume.advance();

        let frame = self.plume.frame();
        let concentration = detect_local_odor_concentration(&self.fly.position(), frame);
        let (left, right) = detect_antennae_concentrations(&self.fly, frame, self.config.antenna_offset);
        self.history.push(concentration);
        self.tick_count += 1;

        let position = self.fly.position();
        debug!(
            tick = self.tick_count,
            %action,
            x = position.x,
            y = position.y,
            concentration,
            "tick"
        );

        TickObservation {
            tick: self.tick_count,
            action,
            position: [position.x, position.y],
            orientation: self.fly.orientation(),
            concentration,
            antennae: [left, right],
        }
    }

    /// Returns the fly to its start pose and the plume to its first frame.
    pub fn reset(&mut self) {
        self.fly = self.config.start_fly();
        self.plume.reset();
        self.history.clear();
        self.tick_count = 0;
        self.path_length = 0.0;
    }

    /// The fly's spatial state.
    pub fn fly(&self) -> &FlySpatialParameters {
        &self.fly
    }

    /// The plume's current frame.
    pub fn frame(&self) -> &PlumeFrame {
        self.plume.frame()
    }

    /// The plume.
    pub fn plume(&self) -> &OdorPlume {
        &self.plume
    }

    /// The turn table in use.
    pub fn turns(&self) -> &TurnFunctions {
        &self.turns
    }

    /// Recent concentration samples.
    pub fn history(&self) -> &OdorHistory {
        &self.history
    }

    /// Returns the current tick count.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Distance walked since the last reset.
    pub fn path_length(&self) -> f64 {
        self.path_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

    fn small_config(plume: PlumeKind) -> SimConfig {
        SimConfig {
            plume,
            bounds: PlumeBounds::new(40, 30).unwrap(),
            start_position: [20.0, 15.0],
            history_capacity: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_world_creation() {
        let world = FlyWorld::new(small_config(PlumeKind::AllOnes)).unwrap();
        assert_eq!(world.tick_count(), 0);
        assert_eq!(world.fly().position(), Vector2::new(20.0, 15.0));
        assert!(world.history().is_empty());
    }

    #[test]
    fn test_tick_walks_turns_and_samples() {
        let mut world = FlyWorld::new(small_config(PlumeKind::AllOnes)).unwrap();
        // Default wind blows toward 0, so upwind is π; a fly at 0 turns ccw by π/6
        let obs = world.tick(TurnAction::UpwindTurn);

        assert_eq!(obs.tick, 1);
        assert_relative_eq!(obs.orientation, FRAC_PI_6, epsilon = 1e-12);
        assert_relative_eq!(obs.position[0], 20.0 + FRAC_PI_6.cos(), epsilon = 1e-12);
        assert_relative_eq!(obs.position[1], 15.0 + FRAC_PI_6.sin(), epsilon = 1e-12);
        assert_eq!(obs.concentration, 1.0);
        assert_eq!(obs.antennae, [1.0, 1.0]);
        assert_eq!(world.history().latest(), Some(1.0));
    }

    #[test]
    fn test_repeated_upwind_ticks_converge_to_upwind_heading() {
        let mut world = FlyWorld::new(small_config(PlumeKind::AllZeros)).unwrap();
        for _ in 0..6 {
            world.tick(TurnAction::UpwindTurn);
        }
        assert_relative_eq!(world.fly().orientation(), PI, epsilon = 1e-9);
    }

    #[test]
    fn test_walking_off_the_plume_reads_sentinel() {
        let mut world = FlyWorld::new(small_config(PlumeKind::AllOnes)).unwrap();
        for _ in 0..24 {
            world.tick(TurnAction::NoTurn);
        }
        let obs = world.tick(TurnAction::NoTurn);
        assert_eq!(obs.antennae, [0.0, 0.0]);
        assert_relative_eq!(world.fly().position().x, 45.0, epsilon = 1e-9);
        assert_eq!(world.history().latest(), Some(0.0));
        assert_eq!(world.history().len(), 5);
        assert_relative_eq!(world.path_length(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rolling_plume_advances_every_tick() {
        let mut world = FlyWorld::new(small_config(PlumeKind::RollingRandom)).unwrap();
        let expected = world.frame().rolled(1);
        world.tick(TurnAction::NoTurn);
        assert_eq!(world.frame(), &expected);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut world = FlyWorld::new(small_config(PlumeKind::AllOnes)).unwrap();
        world.tick(TurnAction::CrosswindTurnA);
        world.tick(TurnAction::CrosswindTurnA);
        world.reset();
        assert_eq!(world.tick_count(), 0);
        assert_eq!(world.fly().position(), Vector2::new(20.0, 15.0));
        assert_eq!(world.fly().orientation(), 0.0);
        assert!(world.history().is_empty());
        assert_eq!(world.path_length(), 0.0);
    }

    #[test]
    fn test_video_plume_via_with_plume() {
        let bounds = PlumeBounds::new(10, 10).unwrap();
        let frames = vec![
            PlumeFrame::constant(bounds, 0.2).unwrap(),
            PlumeFrame::constant(bounds, 0.8).unwrap(),
        ];
        let plume = OdorPlume::video(frames).unwrap();
        let config = SimConfig {
            start_position: [2.0, 2.0],
            start_orientation: FRAC_PI_2,
            bounds,
            ..Default::default()
        };
        let mut world = FlyWorld::with_plume(config, plume).unwrap();
        assert_eq!(world.tick(TurnAction::NoTurn).concentration, 0.8);
        assert_eq!(world.tick(TurnAction::NoTurn).concentration, 0.8);
    }

    #[test]
    fn test_video_kind_needs_frames() {
        let config = small_config(PlumeKind::Video);
        assert!(matches!(FlyWorld::new(config), Err(SimError::VideoRequiresFrames)));
    }

    #[test]
    fn test_bad_config_is_rejected_at_construction() {
        let config = SimConfig {
            history_capacity: 0,
            ..small_config(PlumeKind::AllOnes)
        };
        assert!(matches!(FlyWorld::new(config), Err(SimError::Plume(_))));

        let config = SimConfig {
            turn_magnitude: -1.0,
            ..small_config(PlumeKind::AllOnes)
        };
        assert!(FlyWorld::new(config).is_err());
    }

    #[test]
    fn test_config_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "seed": 7, "plume": "all_zeros" }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.plume, PlumeKind::AllZeros);
        assert_eq!(config.history_capacity, MAX_HISTORY_LENGTH);
        assert_eq!(config.bounds, PlumeBounds::default());
    }

    #[test]
    fn test_subsystem_seeds_differ() {
        for seed in [0, 1, 42, u64::MAX] {
            let config = SimConfig { seed, ..Default::default() };
            assert_ne!(config.plume_seed(), config.policy_seed());
            assert_ne!(config.plume_seed(), config.seed);
            assert_ne!(config.policy_seed(), 0);
        }
    }

    #[test]
    fn test_policy_choice_does_not_change_plume() {
        let mut upwind = FlyWorld::new(small_config(PlumeKind::RollingRandom)).unwrap();
        let mut crosswind = FlyWorld::new(small_config(PlumeKind::RollingRandom)).unwrap();
        assert_eq!(upwind.frame(), crosswind.frame());

        upwind.tick(TurnAction::UpwindTurn);
        crosswind.tick(TurnAction::CrosswindTurnB);
        assert_eq!(upwind.frame(), crosswind.frame());
    }

    #[test]
    fn test_reset_then_replay_matches_for_constant_plume() {
        let mut world = FlyWorld::new(small_config(PlumeKind::AllOnes)).unwrap();
        let actions = [
            TurnAction::UpwindTurn,
            TurnAction::CrosswindTurnA,
            TurnAction::DownwindTurn,
        ];
        let first: Vec<_> = actions.iter().map(|&a| world.tick(a)).collect();
        world.reset();
        let second: Vec<_> = actions.iter().map(|&a| world.tick(a)).collect();
        assert_eq!(first, second);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_history_and_ticks_stay_bounded(seed in any::<u64>(), ticks in 0u64..60) {
            let config = SimConfig {
                seed,
                history_capacity: 8,
                ..small_config(PlumeKind::RollingRandom)
            };
            let mut world = FlyWorld::new(config).unwrap();
            for _ in 0..ticks {
                let obs = world.tick(TurnAction::UpwindTurn);
                prop_assert!(obs.orientation >= 0.0 && obs.orientation < TAU);
                prop_assert!((0.0..1.0).contains(&obs.concentration));
            }
            prop_assert_eq!(world.tick_count(), ticks);
            prop_assert_eq!(world.history().len(), (ticks as usize).min(8));
        }
    }
}
