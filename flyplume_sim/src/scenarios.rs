//! Named run presets.

use crate::error::SimError;
use crate::policy::PolicyKind;
use crate::world::SimConfig;

use flyplume_core::{PlumeKind, TurnAction};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Uniform odor, fly steers upwind every tick
    UpwindOnes,

    /// No odor anywhere, fly casts crosswind forever
    BlankCast,

    /// Rolling random plume with cast-and-surge steering
    RollingSurge,

    /// Rolling random plume, uniformly random actions
    RandomWalk,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::UpwindOnes,
            ScenarioId::BlankCast,
            ScenarioId::RollingSurge,
            ScenarioId::RandomWalk,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::UpwindOnes => "upwind_ones",
            ScenarioId::BlankCast => "blank_cast",
            ScenarioId::RollingSurge => "rolling_surge",
            ScenarioId::RandomWalk => "random_walk",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::UpwindOnes => "All-ones plume, upwind turn every tick",
            ScenarioId::BlankCast => "All-zeros plume, crosswind casting never finds odor",
            ScenarioId::RollingSurge => "Rolling random plume, surge upwind above threshold",
            ScenarioId::RandomWalk => "Rolling random plume, random turn actions",
        }
    }

    /// Plume and policy for this scenario on top of `base`.
    pub fn configure(&self, base: SimConfig) -> (SimConfig, PolicyKind) {
        match self {
            ScenarioId::UpwindOnes => (
                SimConfig { plume: PlumeKind::AllOnes, ..base },
                PolicyKind::Fixed(TurnAction::UpwindTurn),
            ),
            ScenarioId::BlankCast => (
                SimConfig { plume: PlumeKind::AllZeros, ..base },
                PolicyKind::CastAndSurge,
            ),
            ScenarioId::RollingSurge => (
                SimConfig { plume: PlumeKind::RollingRandom, ..base },
                PolicyKind::CastAndSurge,
            ),
            ScenarioId::RandomWalk => (
                SimConfig { plume: PlumeKind::RollingRandom, ..base },
                PolicyKind::Random,
            ),
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upwind_ones" | "upwindones" => Ok(ScenarioId::UpwindOnes),
            "blank_cast" | "blankcast" => Ok(ScenarioId::BlankCast),
            "rolling_surge" | "rollingsurge" => Ok(ScenarioId::RollingSurge),
            "random_walk" | "randomwalk" => Ok(ScenarioId::RandomWalk),
            _ => Err(SimError::UnknownScenario(s.to_string())),
        }
    }
}
