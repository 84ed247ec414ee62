//! Summary statistics of a finished layout

use std::fmt;

use crate::algorithm::executor::{Layout, LayoutEvent};
use crate::spatial::grid::BoundingBox;

/// Aggregate counts describing one layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStatistics {
    /// Placed chunks
    pub chunk_count: usize,
    /// Path tiles across every chunk
    pub path_cells: usize,
    /// Terrain tiles across every chunk
    pub terrain_cells: usize,
    /// Mean primary path length in cells
    pub mean_primary_length: f64,
    /// Longest primary path in cells
    pub max_primary_length: usize,
    /// Chunks carrying a secondary branch
    pub secondary_paths: usize,
    /// Regenerations recorded in the event journal
    pub regenerations: usize,
    /// Chunk removals recorded in the event journal
    pub removals: usize,
    /// Exits dropped because their target was blocked
    pub dropped_exits: usize,
    /// Chunk-grid extent of the placed chunks
    pub chunk_extent: Option<BoundingBox>,
}

impl LayoutStatistics {
    /// Gather statistics from a finished layout
    pub fn from_layout(layout: &Layout) -> Self {
        let chunks = layout.chunks();
        let tiles = layout.chunk_tiles();

        let path_cells = tiles.iter().map(|chunk| chunk.path_count()).sum();
        let terrain_cells = tiles.iter().map(|chunk| chunk.terrain_count()).sum();

        let primary_lengths: Vec<usize> = chunks.iter().map(|c| c.primary().len()).collect();
        let max_primary_length = primary_lengths.iter().copied().max().unwrap_or(0);
        let mean_primary_length = if primary_lengths.is_empty() {
            0.0
        } else {
            primary_lengths.iter().sum::<usize>() as f64 / primary_lengths.len() as f64
        };

        let count_events = |matches: fn(&LayoutEvent) -> bool| {
            layout.events().iter().filter(|event| matches(event)).count()
        };

        Self {
            chunk_count: chunks.len(),
            path_cells,
            terrain_cells,
            mean_primary_length,
            max_primary_length,
            secondary_paths: chunks.iter().filter(|c| c.secondary().is_some()).count(),
            regenerations: count_events(|e| matches!(e, LayoutEvent::ChunkRegenerated { .. })),
            removals: count_events(|e| matches!(e, LayoutEvent::ChunkRemoved { .. })),
            dropped_exits: count_events(|e| matches!(e, LayoutEvent::ExitDropped { .. })),
            chunk_extent: BoundingBox::enclosing(chunks.iter().map(|c| c.position())),
        }
    }

    /// Share of chunk cells that carry a path, in `[0, 1]`
    pub fn path_ratio(&self) -> f64 {
        let total = self.path_cells + self.terrain_cells;
        if total == 0 {
            0.0
        } else {
            self.path_cells as f64 / total as f64
        }
    }
}

impl fmt::Display for LayoutStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "chunks:          {}", self.chunk_count)?;
        writeln!(
            f,
            "path cells:      {} ({:.1}%)",
            self.path_cells,
            self.path_ratio() * 100.0
        )?;
        writeln!(f, "terrain cells:   {}", self.terrain_cells)?;
        writeln!(
            f,
            "primary length:  mean {:.1}, max {}",
            self.mean_primary_length, self.max_primary_length
        )?;
        writeln!(f, "secondary paths: {}", self.secondary_paths)?;
        writeln!(
            f,
            "backtracking:    {} regenerated, {} removed, {} exits dropped",
            self.regenerations, self.removals, self.dropped_exits
        )?;
        match self.chunk_extent {
            Some(extent) => write!(f, "chunk extent:    {} to {}", extent.min, extent.max),
            None => write!(f, "chunk extent:    empty"),
        }
    }
}
