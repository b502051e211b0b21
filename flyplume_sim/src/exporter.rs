//! JSON trajectory exporter.
//!
//! Dumps per-tick observations so plotting tools outside this workspace can
//! draw the fly over the plume.

use crate::error::SimError;
use crate::runner::EpisodeSummary;
use crate::world::TickObservation;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete trajectory export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Policy name
    pub policy: String,

    /// Every `interval`-th tick
    pub frames: Vec<TickObservation>,

    /// Export stride in ticks
    pub interval: u64,

    /// Final results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<EpisodeSummary>,
}

impl TrajectoryExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, policy: &str, interval: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            policy: policy.to_string(),
            frames: Vec::new(),
            interval: interval.max(1),
            summary: None,
        }
    }

    /// Records `observation` if it falls on the export stride.
    pub fn record(&mut self, observation: TickObservation) {
        if observation.tick % self.interval == 0 {
            self.frames.push(observation);
        }
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, summary: EpisodeSummary) {
        self.summary = Some(summary);
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
