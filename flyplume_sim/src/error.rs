//! Error types for the simulation harness.

use flyplume_core::PlumeError;
use thiserror::Error;

/// Errors that can occur while configuring or exporting a run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid core configuration (bounds, capacities, magnitudes)
    #[error("Plume error: {0}")]
    Plume(#[from] PlumeError),

    /// Video plumes cannot be built from a config alone
    #[error("Video plumes must be supplied with their frames")]
    VideoRequiresFrames,

    /// Unrecognised policy name
    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),

    /// Unrecognised scenario name
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Trajectory export runs one scenario at a time
    #[error("--export only supports a single scenario, not 'all'")]
    ExportNeedsSingleScenario,

    /// Reading a config or writing an export failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config or export (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
