//! Seeded chunk-by-chunk path layout generation
//!
//! A layout is grown one fixed-size chunk at a time on an unbounded chunk
//! grid. Inside each chunk a weighted, backtracking walk carves a path from
//! the entry cell to a boundary exit; the exit decides where the next chunk
//! goes. When an exit has nowhere to go the orchestrator backtracks across
//! chunks, regenerating or removing earlier chunks until the layout can
//! continue. The same seed and parameters always reproduce the same layout.

#![forbid(unsafe_code)]

/// Path walk, frontier management and cross-chunk orchestration
pub mod algorithm;
/// Statistics and structural checks of finished layouts
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Seeded randomness and direction weighting
pub mod math;
/// Coordinates, chunk bounds, chunk records and tiles
pub mod spatial;

pub use algorithm::executor::{Layout, LayoutGenerator, generate_layout};
pub use io::configuration::LayoutConfig;
pub use io::error::{LayoutError, Result};
