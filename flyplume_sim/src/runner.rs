//! Scenario runner - drives a FlyWorld with a policy for a fixed tick budget.

use crate::error::SimError;
use crate::exporter::TrajectoryExport;
use crate::policy::{Policy, PolicyKind};
use crate::scenarios::ScenarioId;
use crate::world::{FlyWorld, SimConfig};

use flyplume_core::angle_to_unit_vector;
use flyplume_core::geometry::unit_vector_to_angle;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// End-of-episode statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Seed used
    pub seed: u64,

    /// Policy that chose the actions
    pub policy: String,

    /// Total ticks executed
    pub total_ticks: u64,

    /// Final position `[x, y]`
    pub final_position: [f64; 2],

    /// Final heading in radians
    pub final_orientation: f64,

    /// Net displacement along the upwind direction
    pub upwind_progress: f64,

    /// Heading of the net displacement, 0 if the fly ended where it began
    pub travel_heading: f64,

    /// Distance walked
    pub path_length: f64,

    /// Mean of all sampled concentrations
    pub mean_concentration: f64,

    /// Largest sampled concentration
    pub max_concentration: f64,
}

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Episode statistics
    pub summary: EpisodeSummary,
}

/// Runs one episode of `config.num_ticks` ticks, optionally recording it.
pub fn run_episode(
    config: SimConfig,
    policy_kind: PolicyKind,
    mut export: Option<&mut TrajectoryExport>,
) -> Result<EpisodeSummary, SimError> {
    let mut policy = Policy::new(policy_kind, config.policy_seed(), config.surge_threshold);
    let mut world = FlyWorld::new(config)?;
    let start = world.fly().position();

    let mut total = 0.0;
    let mut max_concentration = 0.0_f64;

    for _ in 0..world.config.num_ticks {
        let action = policy.choose(world.history());
        let observation = world.tick(action);

        total += observation.concentration;
        max_concentration = max_concentration.max(observation.concentration);

        if let Some(export) = export.as_deref_mut() {
            export.record(observation);
        }
    }

    let end = world.fly().position();
    let upwind = angle_to_unit_vector(world.turns().wind().upwind);
    let ticks = world.tick_count();

    let summary = EpisodeSummary {
        seed: world.config.seed,
        policy: policy.kind().name(),
        total_ticks: ticks,
        final_position: [end.x, end.y],
        final_orientation: world.fly().orientation(),
        upwind_progress: (end - start).dot(&upwind),
        travel_heading: unit_vector_to_angle(&(end - start)),
        path_length: world.path_length(),
        mean_concentration: if ticks == 0 { 0.0 } else { total / ticks as f64 },
        max_concentration,
    };

    debug!(?summary, "Episode finished");
    Ok(summary)
}

/// Runs named scenarios against a shared base configuration.
pub struct ScenarioRunner {
    base: SimConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(base: SimConfig) -> Self {
        Self { base }
    }

    /// Sets the episode length.
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.base.num_ticks = ticks;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> Result<ScenarioResult, SimError> {
        self.run_inner(scenario, None)
    }

    /// Runs a scenario, recording every `interval`-th tick.
    pub fn run_with_export(
        &self,
        scenario: ScenarioId,
        interval: u64,
    ) -> Result<(ScenarioResult, TrajectoryExport), SimError> {
        let (_, policy) = scenario.configure(self.base.clone());
        let mut export = TrajectoryExport::new(scenario.name(), self.base.seed, &policy.name(), interval);
        let result = self.run_inner(scenario, Some(&mut export))?;
        export.finalize(result.summary.clone());
        Ok((result, export))
    }

    fn run_inner(
        &self,
        scenario: ScenarioId,
        export: Option<&mut TrajectoryExport>,
    ) -> Result<ScenarioResult, SimError> {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.base.seed);

        let (config, policy) = scenario.configure(self.base.clone());
        let summary = run_episode(config, policy, export)?;

        info!(
            "  {} ticks | upwind progress {:.1} | mean odor {:.3}",
            summary.total_ticks, summary.upwind_progress, summary.mean_concentration
        );

        Ok(ScenarioResult { scenario, summary })
    }
}

/// Straight-line distance between the start and end of a summary.
pub fn net_displacement(config: &SimConfig, summary: &EpisodeSummary) -> f64 {
    let start = Vector2::new(config.start_position[0], config.start_position[1]);
    let end = Vector2::new(summary.final_position[0], summary.final_position[1]);
    (end - start).norm()
}
