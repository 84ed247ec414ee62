//! Tests for bounding boxes and the world raster

#[cfg(test)]
mod tests {
    use chunkwalk::algorithm::path::PathRequest;
    use chunkwalk::io::configuration::{ChunkDimensions, LayoutConfig};
    use chunkwalk::math::random::SeededRandom;
    use chunkwalk::math::weighting::ShapeParameters;
    use chunkwalk::spatial::bounds::ChunkBounds;
    use chunkwalk::spatial::chunk::{ChunkId, ChunkRecord};
    use chunkwalk::spatial::coordinate::{Coordinate, DirectionSet};
    use chunkwalk::spatial::grid::{BoundingBox, WorldGrid};
    use chunkwalk::spatial::tiles::{ChunkTiles, TileKind};
    use chunkwalk::generate_layout;

    // Tests the enclosing box of a point cloud
    // Verified by taking max for the minimum corner
    #[test]
    fn test_bounding_box_enclosing() {
        assert_eq!(BoundingBox::enclosing(Vec::new()), None);

        let bbox = BoundingBox::enclosing([
            Coordinate::new(2, -1),
            Coordinate::new(-3, 4),
            Coordinate::new(0, 0),
        ])
        .expect("points were given");

        assert_eq!(bbox.min, Coordinate::new(-3, -1));
        assert_eq!(bbox.max, Coordinate::new(2, 4));
        assert_eq!(bbox.width(), 6);
        assert_eq!(bbox.height(), 6);
        assert!(bbox.contains(Coordinate::new(-3, 4)));
        assert!(!bbox.contains(Coordinate::new(3, 0)));
    }

    // Tests an empty layout yields an empty raster
    // Verified by allocating a 1x1 raster when no tiles exist
    #[test]
    fn test_empty_grid() {
        let grid = WorldGrid::from_chunks(&[]);

        assert_eq!(grid.bounds(), None);
        assert_eq!((grid.rows(), grid.cols()), (0, 0));
        assert_eq!(grid.kind_at(Coordinate::ZERO), None);
    }

    // Tests row 0 holds the highest world y
    // Verified by indexing rows from the minimum y
    #[test]
    fn test_single_chunk_raster_orientation() {
        let request = PathRequest {
            bounds: ChunkBounds::new(5, 5),
            entry: Coordinate::ZERO,
            permitted_exits: DirectionSet::ALL,
            shape: ShapeParameters::default(),
        };
        let record = ChunkRecord::generate(
            ChunkId(0),
            Coordinate::ZERO,
            None,
            &request,
            &mut SeededRandom::new(42),
        )
        .expect("5x5 chunk should generate");
        let grid = WorldGrid::from_chunks(&[ChunkTiles::classify(&record)]);

        assert_eq!((grid.rows(), grid.cols()), (5, 5));
        assert_eq!(grid.count(TileKind::Path), 4);
        assert_eq!(grid.count(TileKind::Terrain), 21);
        // Exit (-1, 2) lies on the top row, second column
        assert_eq!(grid.cells().get((0, 1)), Some(&Some(TileKind::Path)));
        assert_eq!(grid.cells().get((4, 1)), Some(&Some(TileKind::Terrain)));
        assert_eq!(grid.kind_at(Coordinate::new(-1, 2)), Some(TileKind::Path));
    }

    // Tests a multi-chunk raster holds every tile of every chunk
    // Verified by skipping chunks after the first
    #[test]
    fn test_multi_chunk_raster_covers_all_tiles() {
        let config = LayoutConfig {
            chunk_count: 6,
            chunk_dimensions: ChunkDimensions::new(5, 5),
            ..LayoutConfig::default()
        };
        let layout = generate_layout(&config).expect("layout should generate");
        let grid = layout.world_grid();

        let path_tiles: usize = layout
            .chunk_tiles()
            .iter()
            .map(ChunkTiles::path_count)
            .sum();
        assert_eq!(grid.count(TileKind::Path), path_tiles);
        assert_eq!(
            grid.count(TileKind::Path) + grid.count(TileKind::Terrain),
            6 * 25
        );
        assert!(grid.rows() * grid.cols() >= 6 * 25);
    }
}
