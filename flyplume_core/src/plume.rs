//! Odor plume frames and the plume variants the fly samples from.
//!
//! A [`PlumeFrame`] is an immutable concentration grid indexed `(x, y)`.
//! [`OdorPlume`] is a closed set of frame sources sharing one protocol:
//! read the current frame, `advance()` to the next, `reset()` to the start.
//!
//! The rolling plume drifts by circularly shifting its grid along the y axis
//! (crosswind of the default wind):
//!
//! ```text
//! reset:    previous = random()        frame = roll(previous, shift)
//! advance:  previous = frame           frame = roll(previous, shift)
//! ```

use crate::error::PlumeError;
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Width of the recorded plume videos, in pixels.
pub const PLUME_VIDEO_X_BOUNDS: usize = 1500;

/// Height of the recorded plume videos, in pixels.
pub const PLUME_VIDEO_Y_BOUNDS: usize = 900;

/// Default per-tick shift of the rolling plume.
pub const DEFAULT_ROLL_SHIFT_SIZE: i64 = 1;

/// Grid dimensions of a plume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlumeBounds {
    /// Number of cells along x
    pub width: usize,

    /// Number of cells along y
    pub height: usize,
}

impl PlumeBounds {
    /// Creates bounds, rejecting empty grids.
    pub fn new(width: usize, height: usize) -> Result<Self, PlumeError> {
        if width == 0 || height == 0 {
            return Err(PlumeError::InvalidBounds(width, height));
        }
        Ok(Self { width, height })
    }

    /// Returns `(width, height)`.
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl Default for PlumeBounds {
    fn default() -> Self {
        Self {
            width: PLUME_VIDEO_X_BOUNDS,
            height: PLUME_VIDEO_Y_BOUNDS,
        }
    }
}

fn is_valid_concentration(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// An immutable 2-D concentration snapshot. Rows are x, columns are y.
#[derive(Debug, Clone, PartialEq)]
pub struct PlumeFrame {
    data: DMatrix<f64>,
}

impl PlumeFrame {
    /// Wraps a matrix of concentrations.
    ///
    /// Every cell must be finite and non-negative.
    pub fn from_matrix(data: DMatrix<f64>) -> Result<Self, PlumeError> {
        PlumeBounds::new(data.nrows(), data.ncols())?;
        // Column-major: flat index i is cell (i % rows, i / rows)
        if let Some((i, &value)) = data
            .iter()
            .enumerate()
            .find(|(_, v)| !is_valid_concentration(**v))
        {
            return Err(PlumeError::InvalidConcentration {
                x: i % data.nrows(),
                y: i / data.nrows(),
                value,
            });
        }
        Ok(Self { data })
    }

    /// A grid filled with `value`.
    pub fn constant(bounds: PlumeBounds, value: f64) -> Result<Self, PlumeError> {
        if !is_valid_concentration(value) {
            return Err(PlumeError::InvalidConcentration { x: 0, y: 0, value });
        }
        Ok(Self::filled(bounds, value))
    }

    fn filled(bounds: PlumeBounds, value: f64) -> Self {
        Self {
            data: DMatrix::from_element(bounds.width, bounds.height, value),
        }
    }

    /// A grid of independent uniform `[0, 1)` samples drawn from `rng`.
    pub fn random<R: Rng>(bounds: PlumeBounds, rng: &mut R) -> Self {
        Self {
            data: DMatrix::from_fn(bounds.width, bounds.height, |_, _| rng.gen::<f64>()),
        }
    }

    /// Number of cells along x.
    pub fn width(&self) -> usize {
        self.data.nrows()
    }

    /// Number of cells along y.
    pub fn height(&self) -> usize {
        self.data.ncols()
    }

    /// Grid dimensions.
    pub fn bounds(&self) -> PlumeBounds {
        PlumeBounds {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Concentration at cell `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.data.get((x, y)).copied()
    }

    /// Underlying matrix, for renderers.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Smallest concentration in the frame.
    pub fn min(&self) -> f64 {
        self.data.min()
    }

    /// Largest concentration in the frame.
    pub fn max(&self) -> f64 {
        self.data.max()
    }

    /// Circular shift along y: cell `(x, y)` moves to `(x, (y + shift) mod height)`.
    ///
    /// Negative shifts roll toward smaller y.
    pub fn rolled(&self, shift: i64) -> Self {
        let height = self.height();
        let offset = shift.rem_euclid(height as i64) as usize;
        if offset == 0 {
            return self.clone();
        }

        let mut data = DMatrix::zeros(self.width(), height);
        for y in 0..height {
            data.column_mut((y + offset) % height)
                .copy_from(&self.data.column(y));
        }
        Self { data }
    }
}

/// Plume variant identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlumeKind {
    /// Uniform concentration 1
    AllOnes,

    /// Uniform concentration 0
    AllZeros,

    /// Random frame drifting by circular shifts
    RollingRandom,

    /// Pre-recorded frame sequence
    Video,
}

impl PlumeKind {
    /// Returns the plume kind name.
    pub fn name(&self) -> &'static str {
        match self {
            PlumeKind::AllOnes => "all_ones",
            PlumeKind::AllZeros => "all_zeros",
            PlumeKind::RollingRandom => "rolling_random",
            PlumeKind::Video => "video",
        }
    }
}

impl std::fmt::Display for PlumeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for PlumeKind {
    type Err = PlumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all_ones" | "ones" => Ok(PlumeKind::AllOnes),
            "all_zeros" | "zeros" => Ok(PlumeKind::AllZeros),
            "rolling_random" | "rolling" => Ok(PlumeKind::RollingRandom),
            "video" => Ok(PlumeKind::Video),
            _ => Err(PlumeError::UnknownPlumeKind(s.to_string())),
        }
    }
}

/// A plume whose frame never changes.
#[derive(Debug, Clone)]
pub struct ConstantPlume {
    frame: PlumeFrame,
}

impl ConstantPlume {
    fn new(bounds: PlumeBounds, value: f64) -> Self {
        Self {
            frame: PlumeFrame::filled(bounds, value),
        }
    }
}

/// Synthetic plume: a seeded random frame that rolls every tick.
#[derive(Debug, Clone)]
pub struct RollingRandomPlume {
    bounds: PlumeBounds,
    roll_shift_size: i64,
    rng: ChaCha8Rng,
    frame: PlumeFrame,
    previous_frame: PlumeFrame,
}

impl RollingRandomPlume {
    /// Creates the plume and draws its first frame from `rng`.
    pub fn new(bounds: PlumeBounds, roll_shift_size: i64, mut rng: ChaCha8Rng) -> Self {
        let previous_frame = PlumeFrame::random(bounds, &mut rng);
        let frame = previous_frame.rolled(roll_shift_size);
        debug!(
            width = bounds.width,
            height = bounds.height,
            roll_shift_size,
            "Seeded rolling plume"
        );
        Self {
            bounds,
            roll_shift_size,
            rng,
            frame,
            previous_frame,
        }
    }

    fn reset(&mut self) {
        self.previous_frame = PlumeFrame::random(self.bounds, &mut self.rng);
        self.frame = self.previous_frame.rolled(self.roll_shift_size);
    }

    fn advance(&mut self) {
        let next = self.frame.rolled(self.roll_shift_size);
        self.previous_frame = std::mem::replace(&mut self.frame, next);
    }
}

/// A pre-loaded frame sequence. Advancing past the end holds the last frame.
#[derive(Debug, Clone)]
pub struct VideoPlume {
    frames: Vec<PlumeFrame>,
    index: usize,
    previous_index: usize,
    exhausted: bool,
}

impl VideoPlume {
    /// Validates that the sequence is non-empty and uniformly sized.
    pub fn new(frames: Vec<PlumeFrame>) -> Result<Self, PlumeError> {
        let expected = frames.first().ok_or(PlumeError::EmptyVideo)?.bounds();
        for (index, frame) in frames.iter().enumerate() {
            if frame.bounds() != expected {
                return Err(PlumeError::mismatch(
                    index,
                    expected.as_tuple(),
                    frame.bounds().as_tuple(),
                ));
            }
        }
        Ok(Self {
            frames,
            index: 0,
            previous_index: 0,
            exhausted: false,
        })
    }

    fn advance(&mut self) {
        self.previous_index = self.index;
        if self.index + 1 < self.frames.len() {
            self.index += 1;
        } else if !self.exhausted {
            self.exhausted = true;
            debug!(frames = self.frames.len(), "Video plume exhausted, holding last frame");
        }
    }

    fn reset(&mut self) {
        self.previous_index = self.index;
        self.index = 0;
        self.exhausted = false;
    }
}

/// The plume variants, dispatched by `match`.
#[derive(Debug, Clone)]
pub enum OdorPlume {
    AllOnes(ConstantPlume),
    AllZeros(ConstantPlume),
    RollingRandom(RollingRandomPlume),
    Video(VideoPlume),
}

impl OdorPlume {
    /// Uniform-one plume of the given bounds.
    pub fn all_ones(bounds: PlumeBounds) -> Self {
        OdorPlume::AllOnes(ConstantPlume::new(bounds, 1.0))
    }

    /// Uniform-zero plume of the given bounds.
    pub fn all_zeros(bounds: PlumeBounds) -> Self {
        OdorPlume::AllZeros(ConstantPlume::new(bounds, 0.0))
    }

    /// Rolling plume seeded by an injected generator.
    pub fn rolling_random(bounds: PlumeBounds, roll_shift_size: i64, rng: ChaCha8Rng) -> Self {
        OdorPlume::RollingRandom(RollingRandomPlume::new(bounds, roll_shift_size, rng))
    }

    /// Rolling plume seeded from a 64-bit seed.
    pub fn rolling_random_from_seed(bounds: PlumeBounds, roll_shift_size: i64, seed: u64) -> Self {
        Self::rolling_random(bounds, roll_shift_size, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Plume backed by a pre-loaded frame sequence.
    pub fn video(frames: Vec<PlumeFrame>) -> Result<Self, PlumeError> {
        Ok(OdorPlume::Video(VideoPlume::new(frames)?))
    }

    /// Variant of this plume.
    pub fn kind(&self) -> PlumeKind {
        match self {
            OdorPlume::AllOnes(_) => PlumeKind::AllOnes,
            OdorPlume::AllZeros(_) => PlumeKind::AllZeros,
            OdorPlume::RollingRandom(_) => PlumeKind::RollingRandom,
            OdorPlume::Video(_) => PlumeKind::Video,
        }
    }

    /// The current frame.
    pub fn frame(&self) -> &PlumeFrame {
        match self {
            OdorPlume::AllOnes(p) | OdorPlume::AllZeros(p) => &p.frame,
            OdorPlume::RollingRandom(p) => &p.frame,
            OdorPlume::Video(p) => &p.frames[p.index],
        }
    }

    /// The frame before the most recent advance or reset.
    ///
    /// Constant plumes return their only frame. A video that has not moved
    /// yet returns its first frame.
    pub fn previous_frame(&self) -> &PlumeFrame {
        match self {
            OdorPlume::AllOnes(p) | OdorPlume::AllZeros(p) => &p.frame,
            OdorPlume::RollingRandom(p) => &p.previous_frame,
            OdorPlume::Video(p) => &p.frames[p.previous_index],
        }
    }

    /// Returns to the canonical starting frame.
    ///
    /// The rolling plume draws a fresh random frame from its generator.
    pub fn reset(&mut self) {
        match self {
            OdorPlume::AllOnes(_) | OdorPlume::AllZeros(_) => {}
            OdorPlume::RollingRandom(p) => p.reset(),
            OdorPlume::Video(p) => p.reset(),
        }
    }

    /// Moves to the next frame.
    pub fn advance(&mut self) {
        match self {
            OdorPlume::AllOnes(_) | OdorPlume::AllZeros(_) => {}
            OdorPlume::RollingRandom(p) => p.advance(),
            OdorPlume::Video(p) => p.advance(),
        }
    }

    /// Grid dimensions, constant for the plume's lifetime.
    pub fn bounds(&self) -> PlumeBounds {
        self.frame().bounds()
    }
}
