//! Algorithm constants, runtime defaults and layout parameter validation

use crate::io::error::{Result, invalid_parameter};
use crate::math::weighting::ShapeParameters;

// Iteration fuses
/// Maximum counted iterations for one chunk generation pass
pub const PATH_ITERATION_LIMIT: usize = 100_000;
/// Maximum orchestrator loop iterations for one layout
pub const LAYOUT_ITERATION_LIMIT: usize = 100_000;

// Chunk size limits
/// Smallest permitted chunk dimension on either axis
pub const MIN_CHUNK_DIMENSION: u32 = 3;
/// Largest permitted chunk dimension on either axis
pub const MAX_CHUNK_DIMENSION: u32 = 1024;

// Direction weighting
/// Steepness of the exponential weighting falloff
pub const WEIGHT_FALLOFF: f64 = 10.0;
/// Scale applied before rounding weights to integers
pub const WEIGHT_SCALE: f64 = 10.0;
/// Floor on the real-valued weight of any direction
pub const MIN_DIRECTION_WEIGHT: f64 = 0.1;

/// Tail cells of the primary path never used as secondary branch origins
pub const SECONDARY_ORIGIN_TAIL_SKIP: usize = 2;
/// Head cells of the primary path never used as secondary branch origins
pub const SECONDARY_ORIGIN_HEAD_SKIP: usize = 2;
/// Roll steps per percent of secondary path chance
pub const ROLL_STEPS_PER_PERCENT: i32 = 10_000;
/// Exclusive upper bound of the secondary path roll
pub const SECONDARY_ROLL_RANGE: i32 = 100 * ROLL_STEPS_PER_PERCENT;

// Default values for configurable parameters
/// Default chunk width and height
pub const DEFAULT_CHUNK_DIMENSION: u32 = 13;
/// Default number of chunks to place
pub const DEFAULT_CHUNK_COUNT: usize = 4;
/// Default seed text
pub const DEFAULT_SEED: &str = "42";
/// Default expansion factor
pub const DEFAULT_EXPANSION_FACTOR: f64 = 0.5;
/// Default irregularity factor
pub const DEFAULT_IRREGULARITY_FACTOR: f64 = 0.5;
/// Default secondary path chance in percent
pub const DEFAULT_SECONDARY_PATH_CHANCE: f64 = 10.0;
/// Default number of layouts generated by one CLI invocation
pub const DEFAULT_RUNS: usize = 1;

// Output settings
/// Default PNG output path
pub const DEFAULT_OUTPUT: &str = "layout.png";
/// Suffix added to visualization filenames
pub const VISUALIZATION_SUFFIX: &str = "_generation";
/// Color of path tiles
pub const PATH_COLOR: [u8; 4] = [214, 178, 122, 255];
/// Color of terrain tiles
pub const TERRAIN_COLOR: [u8; 4] = [86, 140, 72, 255];
/// Color of cells outside any chunk
pub const EMPTY_COLOR: [u8; 4] = [0, 0, 0, 0];
/// Color of forbidden chunk positions in visualizations
pub const FORBIDDEN_COLOR: [u8; 4] = [64, 40, 40, 255];
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 60;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Maximum number of run lines shown below the batch bar
pub const MAX_VISIBLE_RUNS: usize = 5;

/// Chunk size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDimensions {
    /// Cells along x
    pub width: u32,
    /// Cells along y
    pub height: u32,
}

impl ChunkDimensions {
    /// Create dimensions from width and height
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ChunkDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_DIMENSION, DEFAULT_CHUNK_DIMENSION)
    }
}

/// Every input the layout is a pure function of
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Number of chunks to place
    pub chunk_count: usize,
    /// Size of every chunk
    pub chunk_dimensions: ChunkDimensions,
    /// Seed text, numeric or arbitrary
    pub seed: String,
    /// Pull toward each chunk's center line, in `[0, 1]`
    pub expansion_factor: f64,
    /// Meandering relative to the entry line, in `[0, 1]`
    pub irregularity_factor: f64,
    /// Percent chance of attempting a secondary path per chunk, in `[0, 100]`
    pub secondary_path_chance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chunk_count: DEFAULT_CHUNK_COUNT,
            chunk_dimensions: ChunkDimensions::default(),
            seed: DEFAULT_SEED.to_string(),
            expansion_factor: DEFAULT_EXPANSION_FACTOR,
            irregularity_factor: DEFAULT_IRREGULARITY_FACTOR,
            secondary_path_chance: DEFAULT_SECONDARY_PATH_CHANCE,
        }
    }
}

impl LayoutConfig {
    /// Check every parameter against its permitted range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first parameter that is missing
    /// or out of range
    pub fn validate(&self) -> Result<()> {
        validate_dimension("chunk_width", self.chunk_dimensions.width)?;
        validate_dimension("chunk_height", self.chunk_dimensions.height)?;

        if self.seed.trim().is_empty() {
            return Err(invalid_parameter(
                "seed",
                &self.seed,
                &"seed must not be blank",
            ));
        }

        validate_unit_interval("expansion_factor", self.expansion_factor)?;
        validate_unit_interval("irregularity_factor", self.irregularity_factor)?;

        if !(0.0..=100.0).contains(&self.secondary_path_chance) {
            return Err(invalid_parameter(
                "secondary_path_chance",
                &self.secondary_path_chance,
                &"must be a percentage between 0 and 100",
            ));
        }

        Ok(())
    }

    /// Shape biases shared by every chunk
    pub const fn shape(&self) -> ShapeParameters {
        ShapeParameters {
            expansion_factor: self.expansion_factor,
            irregularity_factor: self.irregularity_factor,
        }
    }
}

fn validate_dimension(parameter: &'static str, value: u32) -> Result<()> {
    if value < MIN_CHUNK_DIMENSION {
        return Err(invalid_parameter(
            parameter,
            &value,
            &format!("chunk dimensions must be at least {MIN_CHUNK_DIMENSION}"),
        ));
    }
    if value > MAX_CHUNK_DIMENSION {
        return Err(invalid_parameter(
            parameter,
            &value,
            &format!("chunk dimensions must not exceed {MAX_CHUNK_DIMENSION}"),
        ));
    }
    Ok(())
}

fn validate_unit_interval(parameter: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid_parameter(
            parameter,
            &value,
            &"must be between 0 and 1",
        ))
    }
}
