//! World raster of classified tiles spanning every placed chunk
//!
//! The raster is an `Array2` indexed by `(row, col)`. Row 0 holds the highest
//! world y so that `Up` points up when the raster is drawn; column 0 holds the
//! lowest world x.

use ndarray::Array2;

use crate::spatial::coordinate::Coordinate;
use crate::spatial::tiles::{ChunkTiles, TileKind};

/// Axis-aligned bounding box of world cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Minimum coordinates (inclusive)
    pub min: Coordinate,
    /// Maximum coordinates (inclusive)
    pub max: Coordinate,
}

impl BoundingBox {
    /// Smallest box containing every point, `None` when there are none
    pub fn enclosing(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        points.into_iter().fold(None, |acc, point| {
            Some(match acc {
                None => Self {
                    min: point,
                    max: point,
                },
                Some(bbox) => Self {
                    min: Coordinate::new(bbox.min.x.min(point.x), bbox.min.y.min(point.y)),
                    max: Coordinate::new(bbox.max.x.max(point.x), bbox.max.y.max(point.y)),
                },
            })
        })
    }

    /// Check if a position is within the bounds
    pub const fn contains(&self, pos: Coordinate) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        (self.max.x - self.min.x + 1) as usize
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        (self.max.y - self.min.y + 1) as usize
    }
}

/// Raster of every classified world cell
#[derive(Debug, Clone)]
pub struct WorldGrid {
    bounds: Option<BoundingBox>,
    cells: Array2<Option<TileKind>>,
}

impl WorldGrid {
    /// Build the raster covering all tiles of the given chunks
    ///
    /// Cells no chunk covers hold `None`.
    pub fn from_chunks(chunks: &[ChunkTiles]) -> Self {
        let bounds = BoundingBox::enclosing(
            chunks
                .iter()
                .flat_map(|chunk| chunk.tiles().iter().map(|tile| tile.world)),
        );

        let Some(bbox) = bounds else {
            return Self {
                bounds: None,
                cells: Array2::from_elem((0, 0), None),
            };
        };

        let mut cells = Array2::from_elem((bbox.height(), bbox.width()), None);
        for tile in chunks.iter().flat_map(ChunkTiles::tiles) {
            let index = Self::index_in(&bbox, tile.world);
            if let Some(cell) = index.and_then(|index| cells.get_mut(index)) {
                *cell = Some(tile.kind);
            }
        }

        Self { bounds, cells }
    }

    /// World-cell extent, `None` for an empty layout
    pub const fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Underlying `(row, col)` raster
    pub const fn cells(&self) -> &Array2<Option<TileKind>> {
        &self.cells
    }

    /// Classification at a world cell, `None` where no chunk lies
    pub fn kind_at(&self, world: Coordinate) -> Option<TileKind> {
        let bbox = self.bounds?;
        Self::index_in(&bbox, world)
            .and_then(|index| self.cells.get(index))
            .copied()
            .flatten()
    }

    /// Number of cells holding the given classification
    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(kind)).count()
    }

    fn index_in(bbox: &BoundingBox, world: Coordinate) -> Option<(usize, usize)> {
        bbox.contains(world).then(|| {
            let row = (bbox.max.y - world.y) as usize;
            let col = (world.x - bbox.min.x) as usize;
            (row, col)
        })
    }
}
