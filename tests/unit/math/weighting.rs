//! Tests for shape-bias direction weights

#[cfg(test)]
mod tests {
    use chunkwalk::math::weighting::{DirectionWeighting, ShapeParameters};
    use chunkwalk::spatial::bounds::ChunkBounds;
    use chunkwalk::spatial::coordinate::Coordinate;

    // Tests an interior entry weighs every cell the same
    // Verified by measuring the line along x for interior entries
    #[test]
    fn test_interior_entry_is_uniform() {
        let bounds = ChunkBounds::new(13, 13);
        let weighting = DirectionWeighting::new(&bounds, Coordinate::ZERO, ShapeParameters::default());

        for cell in bounds.cells() {
            assert_eq!(weighting.weight(cell), 20);
        }
    }

    // Tests factors of 1 disable both falloffs
    // Verified by dropping the (1 - factor) terms
    #[test]
    fn test_unit_factors_disable_bias() {
        let bounds = ChunkBounds::new(13, 13);
        let shape = ShapeParameters {
            expansion_factor: 1.0,
            irregularity_factor: 1.0,
        };
        let weighting = DirectionWeighting::new(&bounds, Coordinate::new(-6, 4), shape);

        for cell in bounds.cells() {
            assert_eq!(weighting.weight(cell), 20);
        }
    }

    // Tests drift away from the entry line costs weight
    // Verified by flipping the sign of the exponent
    #[test]
    fn test_drift_is_penalized() {
        let bounds = ChunkBounds::new(13, 13);
        let weighting = DirectionWeighting::new(&bounds, Coordinate::new(-6, 0), ShapeParameters::default());

        assert!(weighting.weight(Coordinate::new(-5, 0)) > weighting.weight(Coordinate::new(-5, 3)));
        assert_eq!(
            weighting.weight(Coordinate::new(-5, 2)),
            weighting.weight(Coordinate::new(-5, -2))
        );
    }

    // Tests the entry edge decides which axis is measured
    // Verified by always measuring along y
    #[test]
    fn test_line_follows_entry_edge() {
        let bounds = ChunkBounds::new(9, 9);
        let from_top = DirectionWeighting::new(&bounds, Coordinate::new(2, 4), ShapeParameters::default());
        let from_left = DirectionWeighting::new(&bounds, Coordinate::new(-4, 3), ShapeParameters::default());

        assert!((from_top.line(Coordinate::new(-1, 0)) + 1.0).abs() < f64::EPSILON);
        assert!((from_top.start_line() - 2.0).abs() < f64::EPSILON);
        assert!((from_left.line(Coordinate::new(-1, -2)) + 2.0).abs() < f64::EPSILON);
        assert!((from_left.start_line() - 3.0).abs() < f64::EPSILON);
    }

    // Tests minimum-size chunks keep weights finite despite a zero span
    // Verified by removing the denominator clamp
    #[test]
    fn test_degenerate_span_is_clamped() {
        let bounds = ChunkBounds::new(3, 3);
        let weighting = DirectionWeighting::new(&bounds, Coordinate::new(-1, 0), ShapeParameters::default());

        assert!(weighting.max_distance_to_start_line().abs() < f64::EPSILON);
        for cell in bounds.cells() {
            assert!(weighting.raw_weight(cell).is_finite());
            assert!(weighting.weight(cell) >= 1);
        }
        assert_eq!(weighting.weight(Coordinate::ZERO), 20);
        // Both falloffs reach e^-5 one row off the entry line
        assert_eq!(weighting.weight(Coordinate::new(0, 1)), 1);
    }

    // Tests the weight floor
    // Verified by removing the floor
    #[test]
    fn test_weight_floor() {
        let bounds = ChunkBounds::new(101, 101);
        let shape = ShapeParameters {
            expansion_factor: 0.0,
            irregularity_factor: 0.0,
        };
        let weighting = DirectionWeighting::new(&bounds, Coordinate::new(-50, 0), shape);

        assert!((weighting.raw_weight(Coordinate::new(0, 50)) - 0.1).abs() < 1e-12);
        assert_eq!(weighting.weight(Coordinate::new(0, 50)), 1);
    }
}
