//! Chunk extents in chunk-local coordinates
//!
//! Chunks are centered on the origin. An even width drops one column on the
//! negative x side and an even height drops one row on the positive y side, so
//! every edge always owns a boundary row or column.

use crate::spatial::coordinate::{Coordinate, Direction};

/// Inclusive integer range along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    /// Smallest coordinate on the axis
    pub min: i32,
    /// Largest coordinate on the axis
    pub max: i32,
}

impl AxisRange {
    /// Whether `value` lies within `[min, max]`
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether `value` lies within `(min, max)`
    pub const fn contains_strictly(&self, value: i32) -> bool {
        value > self.min && value < self.max
    }
}

/// Cell ranges of a chunk of fixed dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    /// Chunk width in cells
    pub width: i32,
    /// Chunk height in cells
    pub height: i32,
    /// Horizontal cell range
    pub x: AxisRange,
    /// Vertical cell range
    pub y: AxisRange,
}

impl ChunkBounds {
    /// Derive the cell ranges for a `width` x `height` chunk
    pub const fn new(width: i32, height: i32) -> Self {
        let half_width = width / 2;
        let half_height = height / 2;

        let x = AxisRange {
            min: if width % 2 == 0 {
                -half_width + 1
            } else {
                -half_width
            },
            max: half_width,
        };
        let y = AxisRange {
            min: -half_height,
            max: if height % 2 == 0 {
                half_height - 1
            } else {
                half_height
            },
        };

        Self {
            width,
            height,
            x,
            y,
        }
    }

    /// Whether the cell lies inside the chunk, boundary included
    pub const fn contains(&self, cell: Coordinate) -> bool {
        self.x.contains(cell.x) && self.y.contains(cell.y)
    }

    /// Whether the cell lies inside the chunk and off every boundary edge
    pub const fn is_interior(&self, cell: Coordinate) -> bool {
        self.x.contains_strictly(cell.x) && self.y.contains_strictly(cell.y)
    }

    /// The boundary edge a cell lies on
    ///
    /// Corners resolve to the horizontal edge (right before left before up
    /// before down). Cells outside the chunk have no edge.
    pub const fn edge_of(&self, cell: Coordinate) -> Option<Direction> {
        if !self.contains(cell) {
            return None;
        }
        if cell.x == self.x.max {
            Some(Direction::Right)
        } else if cell.x == self.x.min {
            Some(Direction::Left)
        } else if cell.y == self.y.max {
            Some(Direction::Up)
        } else if cell.y == self.y.min {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Entry cell of the neighboring chunk reached through `exit` by `direction`
    ///
    /// Odd dimensions mirror the coordinate on the exit axis; even dimensions
    /// mirror and shift by one so the entry lands on the opposite boundary.
    pub const fn mirrored_entry(&self, exit: Coordinate, direction: Direction) -> Coordinate {
        if direction.is_horizontal() && self.width % 2 == 0 {
            Coordinate::new(-(exit.x - 1), exit.y)
        } else if !direction.is_horizontal() && self.height % 2 == 0 {
            Coordinate::new(exit.x, -(exit.y + 1))
        } else if direction.is_horizontal() {
            Coordinate::new(-exit.x, exit.y)
        } else {
            Coordinate::new(exit.x, -exit.y)
        }
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Every cell, column by column from the minimum corner
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> + use<> {
        let (x, y) = (self.x, self.y);
        (x.min..=x.max).flat_map(move |cx| (y.min..=y.max).map(move |cy| Coordinate::new(cx, cy)))
    }

    /// World-space position of a chunk-local cell in the chunk at `chunk_position`
    pub const fn world_position(&self, chunk_position: Coordinate, cell: Coordinate) -> Coordinate {
        Coordinate::new(
            cell.x + self.width * chunk_position.x,
            cell.y + self.height * chunk_position.y,
        )
    }
}
