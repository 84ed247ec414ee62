//! Shape-bias weights for candidate path cells
//!
//! Each candidate is scored by two exponential falloffs measured along the
//! entry edge: distance from the chunk's center line (shaped by the expansion
//! factor) and distance from the entry cell's own line (shaped by the
//! irregularity factor).

use crate::io::configuration::{MIN_DIRECTION_WEIGHT, WEIGHT_FALLOFF, WEIGHT_SCALE};
use crate::spatial::bounds::ChunkBounds;
use crate::spatial::coordinate::{Coordinate, Direction};

/// Tunable biases applied to every direction choice in a chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParameters {
    /// Pull toward the chunk center line; 1.0 removes the pull entirely
    pub expansion_factor: f64,
    /// Pull toward the entry line; 1.0 removes the pull entirely
    pub irregularity_factor: f64,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            expansion_factor: 0.5,
            irregularity_factor: 0.5,
        }
    }
}

/// Precomputed weighting terms for one chunk entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionWeighting {
    entry_edge: Option<Direction>,
    start_line: f64,
    max_distance_to_center_line: f64,
    max_distance_to_start_line: f64,
    shape: ShapeParameters,
}

impl DirectionWeighting {
    /// Derive the weighting for a chunk entered at `entry`
    pub fn new(bounds: &ChunkBounds, entry: Coordinate, shape: ShapeParameters) -> Self {
        let entry_edge = bounds.edge_of(entry);

        let (start_line, max_distance_to_center_line) = match entry_edge {
            Some(Direction::Up | Direction::Down) => (f64::from(entry.x), f64::from(bounds.x.max)),
            Some(Direction::Left | Direction::Right) => {
                (f64::from(entry.y), f64::from(bounds.y.max))
            }
            None => (0.0, f64::from(bounds.x.max.max(bounds.y.max))),
        };
        let max_distance_to_start_line = max_distance_to_center_line + start_line.abs() - 1.0;

        Self {
            entry_edge,
            start_line,
            max_distance_to_center_line,
            max_distance_to_start_line,
            shape,
        }
    }

    /// Signed position of a cell measured along the entry edge
    pub fn line(&self, cell: Coordinate) -> f64 {
        match self.entry_edge {
            Some(Direction::Up | Direction::Down) => f64::from(cell.x),
            Some(Direction::Left | Direction::Right) => f64::from(cell.y),
            None => 0.0,
        }
    }

    /// Line of the entry cell
    pub const fn start_line(&self) -> f64 {
        self.start_line
    }

    /// Denominator of the expansion term, before clamping
    pub const fn max_distance_to_center_line(&self) -> f64 {
        self.max_distance_to_center_line
    }

    /// Denominator of the alignment term, before clamping
    pub const fn max_distance_to_start_line(&self) -> f64 {
        self.max_distance_to_start_line
    }

    /// Real-valued weight of moving into `cell`, never below the floor
    pub fn raw_weight(&self, cell: Coordinate) -> f64 {
        let line = self.line(cell);

        // Minimum-size chunks can yield a zero denominator
        let center_span = self.max_distance_to_center_line.max(1.0);
        let start_span = self.max_distance_to_start_line.max(1.0);

        let expansion =
            (-line.abs() / center_span * (1.0 - self.shape.expansion_factor) * WEIGHT_FALLOFF).exp();
        let alignment = (-(self.start_line - line).abs() / start_span
            * (1.0 - self.shape.irregularity_factor)
            * WEIGHT_FALLOFF)
            .exp();

        (expansion + alignment).max(MIN_DIRECTION_WEIGHT)
    }

    /// Integer weight used for cumulative sampling
    pub fn weight(&self, cell: Coordinate) -> u32 {
        (self.raw_weight(cell) * WEIGHT_SCALE).round_ties_even() as u32
    }
}
