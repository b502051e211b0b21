//! Odor sensing: sampling a plume frame and remembering recent samples.

use crate::error::PlumeError;
use crate::fly::FlySpatialParameters;
use crate::geometry::angle_to_unit_vector;
use crate::plume::PlumeFrame;
use nalgebra::Vector2;
use std::collections::VecDeque;
use std::f64::consts::FRAC_PI_2;

/// Default number of samples kept by [`OdorHistory`].
pub const MAX_HISTORY_LENGTH: usize = 100;

/// Concentration reported for positions outside the frame.
pub const OUT_OF_BOUNDS_CONCENTRATION: f64 = 0.0;

/// Default distance from the body to each antenna.
pub const DEFAULT_ANTENNA_OFFSET: f64 = 1.0;

/// Concentration at the cell nearest `position`.
///
/// Each coordinate is rounded to the nearest cell index (nearest-neighbour
/// sampling). Positions that land outside the grid, including non-finite
/// ones, read [`OUT_OF_BOUNDS_CONCENTRATION`].
pub fn detect_local_odor_concentration(position: &Vector2<f64>, frame: &PlumeFrame) -> f64 {
    match nearest_cell(position, frame) {
        Some((x, y)) => frame.get(x, y).unwrap_or(OUT_OF_BOUNDS_CONCENTRATION),
        None => OUT_OF_BOUNDS_CONCENTRATION,
    }
}

fn nearest_cell(position: &Vector2<f64>, frame: &PlumeFrame) -> Option<(usize, usize)> {
    let x = position.x.round();
    let y = position.y.round();
    // NaN fails both comparisons
    if !(x >= 0.0 && y >= 0.0) {
        return None;
    }
    if x >= frame.width() as f64 || y >= frame.height() as f64 {
        return None;
    }
    Some((x as usize, y as usize))
}

/// Concentrations at the left and right antennae.
///
/// Antennae sit `antenna_offset` units either side of the fly, perpendicular
/// to its heading. Returns `(left, right)`.
pub fn detect_antennae_concentrations(
    fly: &FlySpatialParameters,
    frame: &PlumeFrame,
    antenna_offset: f64,
) -> (f64, f64) {
    let left = fly.position() + angle_to_unit_vector(fly.orientation() + FRAC_PI_2) * antenna_offset;
    let right = fly.position() + angle_to_unit_vector(fly.orientation() - FRAC_PI_2) * antenna_offset;
    (
        detect_local_odor_concentration(&left, frame),
        detect_local_odor_concentration(&right, frame),
    )
}

/// Bounded FIFO of recent concentration samples, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct OdorHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl OdorHistory {
    /// History holding [`MAX_HISTORY_LENGTH`] samples.
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_HISTORY_LENGTH),
            capacity: MAX_HISTORY_LENGTH,
        }
    }

    /// History holding `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Result<Self, PlumeError> {
        if capacity == 0 {
            return Err(PlumeError::ZeroHistoryCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Appends a sample, evicting the oldest when full.
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Samples in arrival order, oldest first.
    pub fn as_sequence(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.samples.iter()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Mean of the stored samples, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all samples; capacity is kept.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for OdorHistory {
    fn default() -> Self {
        Self::new()
    }
}
