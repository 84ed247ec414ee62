//! Tests for path/terrain classification of chunk cells

#[cfg(test)]
mod tests {
    use chunkwalk::algorithm::path::PathRequest;
    use chunkwalk::math::random::SeededRandom;
    use chunkwalk::math::weighting::ShapeParameters;
    use chunkwalk::spatial::bounds::ChunkBounds;
    use chunkwalk::spatial::chunk::{ChunkId, ChunkRecord};
    use chunkwalk::spatial::coordinate::{Coordinate, DirectionSet};
    use chunkwalk::spatial::tiles::{ChunkTiles, TileKind};

    fn golden_record(position: Coordinate) -> ChunkRecord {
        let request = PathRequest {
            bounds: ChunkBounds::new(5, 5),
            entry: Coordinate::ZERO,
            permitted_exits: DirectionSet::ALL,
            shape: ShapeParameters::default(),
        };
        ChunkRecord::generate(
            ChunkId(0),
            position,
            None,
            &request,
            &mut SeededRandom::new(42),
        )
        .expect("5x5 chunk should generate")
    }

    // Tests every cell is classified exactly once
    // Verified by classifying only path cells
    #[test]
    fn test_classify_covers_every_cell() {
        let tiles = ChunkTiles::classify(&golden_record(Coordinate::ZERO));

        assert_eq!(tiles.tiles().len(), 25);
        assert_eq!(tiles.path_count(), 4);
        assert_eq!(tiles.terrain_count(), 21);
        assert_eq!(tiles.chunk(), ChunkId(0));
    }

    // Tests classification follows path membership
    // Verified by inverting the membership check
    #[test]
    fn test_kind_at() {
        let tiles = ChunkTiles::classify(&golden_record(Coordinate::ZERO));

        assert_eq!(tiles.kind_at(Coordinate::ZERO), Some(TileKind::Path));
        assert_eq!(tiles.kind_at(Coordinate::new(-1, 2)), Some(TileKind::Path));
        assert_eq!(tiles.kind_at(Coordinate::new(2, 2)), Some(TileKind::Terrain));
        assert_eq!(tiles.kind_at(Coordinate::new(3, 0)), None);
    }

    // Tests world positions are offset by the chunk's grid position
    // Verified by using the local cell as the world position
    #[test]
    fn test_world_positions_follow_chunk_position() {
        let tiles = ChunkTiles::classify(&golden_record(Coordinate::new(1, -2)));

        assert_eq!(tiles.position(), Coordinate::new(1, -2));
        for tile in tiles.tiles() {
            assert_eq!(tile.world.x, tile.local.x + 5);
            assert_eq!(tile.world.y, tile.local.y - 10);
        }
        assert_eq!(
            tiles.tiles().first().map(|tile| tile.local),
            Some(Coordinate::new(-2, -2))
        );
    }

    // Tests tile kind labels
    // Verified by swapping the labels
    #[test]
    fn test_tile_kind_display() {
        assert_eq!(TileKind::Path.to_string(), "path");
        assert_eq!(TileKind::Terrain.to_string(), "terrain");
    }
}
