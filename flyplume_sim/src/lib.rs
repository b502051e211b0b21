//! Deterministic headless harness for the fly plume-navigation core.
//!
//! Wires the core's per-tick sequence into an episode loop and runs named
//! scenarios from a single master seed.
//!
//! # Tick
//!
//! ```text
//!   Policy ──action──► TurnFunctions ──delta──► FlySpatialParameters::turn_and_walk
//!                                                        │
//!   OdorHistory ◄──push── detect_local_odor_concentration ◄── OdorPlume::advance
//! ```
//!
//! # Determinism
//!
//! The master seed is split into a plume seed and a policy seed, so
//! switching policies never perturbs the plume a fly walks through.
//!
//! # Usage
//!
//! ```ignore
//! use flyplume_sim::{ScenarioRunner, SimConfig};
//! use flyplume_sim::scenarios::ScenarioId;
//!
//! let runner = ScenarioRunner::new(SimConfig::default()).with_ticks(200);
//! let result = runner.run(ScenarioId::RollingSurge)?;
//! ```

mod error;
mod exporter;
mod policy;
mod runner;
mod world;
pub mod scenarios;

pub use error::SimError;
pub use exporter::TrajectoryExport;
pub use policy::{Policy, PolicyKind, CAST_LEG_TICKS};
pub use runner::{net_displacement, run_episode, EpisodeSummary, ScenarioResult, ScenarioRunner};
pub use world::{FlyWorld, SimConfig, TickObservation};
