//! Spatial data structures for chunks, cells and the world raster
//!
//! This module contains spatial-related functionality including:
//! - Coordinates, directions and direction sets
//! - Chunk bounds, edges and entry mirroring
//! - Chunk records and path/terrain tile classification

/// Chunk cell ranges, boundary edges and entry mirroring
pub mod bounds;
/// Placed chunk records and exit references
pub mod chunk;
/// Integer coordinates and the four axis directions
pub mod coordinate;
/// World raster assembled from classified chunks
pub mod grid;
/// Path/terrain classification of chunk cells
pub mod tiles;

pub use bounds::ChunkBounds;
pub use chunk::{ChunkId, ChunkRecord};
pub use coordinate::{Coordinate, Direction, DirectionSet};
