//! Turn-action selection strategies used to drive headless runs.

use crate::error::SimError;

use flyplume_core::{OdorHistory, TurnAction};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Ticks spent on each crosswind leg while casting.
pub const CAST_LEG_TICKS: u32 = 8;

/// How actions are chosen each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Always the same action
    Fixed(TurnAction),

    /// Uniformly random action from a seeded generator
    Random,

    /// Surge upwind on odor, otherwise cast crosswind in alternating legs
    CastAndSurge,
}

impl PolicyKind {
    /// Returns the policy name.
    pub fn name(&self) -> String {
        match self {
            PolicyKind::Fixed(action) => action.name().to_string(),
            PolicyKind::Random => "random".to_string(),
            PolicyKind::CastAndSurge => "cast_and_surge".to_string(),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(PolicyKind::Random),
            "cast_and_surge" | "surge" => Ok(PolicyKind::CastAndSurge),
            other => other
                .parse::<TurnAction>()
                .map(PolicyKind::Fixed)
                .map_err(|_| SimError::UnknownPolicy(s.to_string())),
        }
    }
}

/// A stateful action chooser.
#[derive(Debug, Clone)]
pub struct Policy {
    kind: PolicyKind,
    rng: ChaCha8Rng,
    surge_threshold: f64,
    cast_toward_a: bool,
    leg_ticks: u32,
}

impl Policy {
    /// Creates a policy; `seed` only matters for [`PolicyKind::Random`].
    pub fn new(kind: PolicyKind, seed: u64, surge_threshold: f64) -> Self {
        Self {
            kind,
            rng: ChaCha8Rng::seed_from_u64(seed),
            surge_threshold,
            cast_toward_a: true,
            leg_ticks: 0,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    /// Picks the next action given what the fly has smelled so far.
    pub fn choose(&mut self, history: &OdorHistory) -> TurnAction {
        match self.kind {
            PolicyKind::Fixed(action) => action,
            PolicyKind::Random => TurnAction::ALL[self.rng.gen_range(0..TurnAction::ALL.len())],
            PolicyKind::CastAndSurge => self.cast_or_surge(history),
        }
    }

    fn cast_or_surge(&mut self, history: &OdorHistory) -> TurnAction {
        if history.latest().is_some_and(|c| c > self.surge_threshold) {
            self.leg_ticks = 0;
            return TurnAction::UpwindTurn;
        }

        if self.leg_ticks == CAST_LEG_TICKS {
            self.cast_toward_a = !self.cast_toward_a;
            self.leg_ticks = 0;
        }
        self.leg_ticks += 1;

        if self.cast_toward_a {
            TurnAction::CrosswindTurnA
        } else {
            TurnAction::CrosswindTurnB
        }
    }
}
