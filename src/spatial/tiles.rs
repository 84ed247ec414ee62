//! Path/terrain classification of every cell in a finished chunk
//!
//! Consumers outside the generator (renderers, exporters) only ever see the
//! layout through these records: one [`Tile`] per cell of the chunk bounds,
//! tagged by whether a generated path passes through it.

use std::collections::HashSet;
use std::fmt;

use crate::spatial::chunk::{ChunkId, ChunkRecord};
use crate::spatial::coordinate::Coordinate;

/// Classification tag of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Part of a primary or secondary path
    Path,
    /// Any cell no path passes through
    Terrain,
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Terrain => write!(f, "terrain"),
        }
    }
}

/// One classified cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Position relative to the chunk center
    pub local: Coordinate,
    /// Position in world cells
    pub world: Coordinate,
    /// Path or terrain
    pub kind: TileKind,
}

/// Every cell of one chunk, classified
#[derive(Debug, Clone)]
pub struct ChunkTiles {
    chunk: ChunkId,
    position: Coordinate,
    tiles: Vec<Tile>,
    path_count: usize,
}

impl ChunkTiles {
    /// Classify the cells of a finished chunk
    ///
    /// Tiles are listed column by column, from the lowest x and lowest y.
    pub fn classify(record: &ChunkRecord) -> Self {
        let bounds = record.bounds();
        let path: HashSet<Coordinate> = record.path_cells().collect();
        let position = record.position();

        let tiles: Vec<Tile> = bounds
            .cells()
            .map(|local| Tile {
                local,
                world: bounds.world_position(position, local),
                kind: if path.contains(&local) {
                    TileKind::Path
                } else {
                    TileKind::Terrain
                },
            })
            .collect();
        let path_count = tiles
            .iter()
            .filter(|tile| tile.kind == TileKind::Path)
            .count();

        Self {
            chunk: record.id(),
            position,
            tiles,
            path_count,
        }
    }

    /// Chunk the tiles belong to
    pub const fn chunk(&self) -> ChunkId {
        self.chunk
    }

    /// Chunk-grid position of the chunk
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// All classified cells
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of path tiles
    pub const fn path_count(&self) -> usize {
        self.path_count
    }

    /// Number of terrain tiles
    pub fn terrain_count(&self) -> usize {
        self.tiles.len() - self.path_count
    }

    /// Classification of a chunk-local cell, `None` outside the chunk
    pub fn kind_at(&self, local: Coordinate) -> Option<TileKind> {
        self.tiles
            .iter()
            .find(|tile| tile.local == local)
            .map(|tile| tile.kind)
    }
}
