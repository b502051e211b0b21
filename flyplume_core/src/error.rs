//! Error types for the plume navigation core.
//!
//! Every variant is a construction-time configuration mistake. Per-tick
//! operations (turning, walking, sampling, history pushes) never fail.

use thiserror::Error;

/// Errors raised while building plumes, histories or turn tables.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlumeError {
    /// A video-backed plume was given no frames
    #[error("Video plume requires at least one frame")]
    EmptyVideo,

    /// A frame in a sequence does not match the first frame's dimensions
    #[error("Frame {index} is {found:?}, expected {expected:?}")]
    FrameDimensionMismatch {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Plume bounds must be non-zero in both axes
    #[error("Invalid plume bounds {0}x{1}")]
    InvalidBounds(usize, usize),

    /// Frame cells must be finite, non-negative concentrations
    #[error("Invalid concentration {value} at ({x}, {y})")]
    InvalidConcentration { x: usize, y: usize, value: f64 },

    /// Odor history needs room for at least one sample
    #[error("Odor history capacity must be at least 1")]
    ZeroHistoryCapacity,

    /// Turn magnitudes must be finite and positive
    #[error("Invalid turn magnitude: {0}")]
    InvalidTurnMagnitude(f64),

    /// Action name did not match any turn action
    #[error("Unknown turn action: {0}")]
    UnknownTurnAction(String),

    /// Plume kind name did not match any plume variant
    #[error("Unknown plume kind: {0}")]
    UnknownPlumeKind(String),
}

impl PlumeError {
    /// Creates a dimension mismatch error.
    pub fn mismatch(index: usize, expected: (usize, usize), found: (usize, usize)) -> Self {
        Self::FrameDimensionMismatch { index, expected, found }
    }
}
