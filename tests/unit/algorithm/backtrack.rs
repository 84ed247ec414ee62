//! Tests for cross-chunk backtracking of the last pending exit

#[cfg(test)]
mod tests {
    use chunkwalk::algorithm::backtrack::{BacktrackOutcome, resolve_blocked_exit};
    use chunkwalk::algorithm::executor::{LayoutEvent, LayoutState};
    use chunkwalk::io::error::LayoutError;
    use chunkwalk::math::random::SeededRandom;
    use chunkwalk::math::weighting::ShapeParameters;
    use chunkwalk::spatial::bounds::ChunkBounds;
    use chunkwalk::spatial::chunk::{ChunkId, ExitKind};
    use chunkwalk::spatial::coordinate::{Coordinate, Direction, DirectionSet};

    fn state(size: i32) -> LayoutState {
        LayoutState::new(ChunkBounds::new(size, size), ShapeParameters::default())
    }

    /// Places the first chunk and queues its primary exit as the only lane
    fn place_first(
        state: &mut LayoutState,
        permitted: DirectionSet,
        rng: &mut SeededRandom,
    ) -> ChunkId {
        let record = state
            .generate_chunk(Coordinate::ZERO, None, permitted, rng)
            .expect("first chunk should generate");
        let id = state.place(record);
        let exit = state
            .pending_exit(id, ExitKind::Primary)
            .expect("first chunk is placed");
        state.frontier_mut().reset_to(exit);
        id
    }

    // Tests the owner rewalks toward another edge when one remains
    // Verified by removing the owner even when exits remain
    #[test]
    fn test_blocked_exit_regenerates_owner() {
        let mut state = state(5);
        let mut rng = SeededRandom::new(42);
        let first = place_first(&mut state, DirectionSet::ALL, &mut rng);
        let blocked = state
            .pending_exit(first, ExitKind::Primary)
            .expect("first chunk is placed");
        assert_eq!(blocked.direction, Direction::Up);

        let outcome = resolve_blocked_exit(&mut state, &mut rng).expect("three edges remain");
        assert_eq!(outcome, BacktrackOutcome::Regenerated(first));

        let record = state.chunk(first).expect("owner stays placed");
        assert_eq!(record.regenerations(), 1);
        assert!(!record.permitted_exits().contains(Direction::Up));
        assert_eq!(
            record.primary().cells,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(1, 0),
                Coordinate::new(2, 0),
            ]
        );
        assert_eq!(record.primary().exit_edge, Direction::Right);

        assert!(state.is_forbidden(blocked.target));
        assert_eq!(state.frontier().len(), 1);
        assert_eq!(
            state.frontier().current().map(|pending| pending.direction),
            Some(Direction::Right)
        );
        assert!(matches!(
            state.events().last(),
            Some(LayoutEvent::ChunkRegenerated { chunk, .. }) if *chunk == first
        ));
    }

    // Tests an owner without remaining edges is removed and its parent exit pends
    // Verified by leaving the removed position unforbidden
    #[test]
    fn test_blocked_exit_removes_exhausted_owner() {
        let mut state = state(13);
        let mut rng = SeededRandom::new(42);
        let first = place_first(&mut state, DirectionSet::ALL, &mut rng);

        // A child that may only continue straight on
        let exit = state
            .pending_exit(first, ExitKind::Primary)
            .expect("first chunk is placed");
        let straight: DirectionSet = [exit.direction].into_iter().collect();
        let record = state
            .generate_chunk(exit.target, Some(&exit), straight, &mut rng)
            .expect("child should generate");
        let child = state.place(record);
        let child_exit = state
            .pending_exit(child, ExitKind::Primary)
            .expect("child is placed");
        state.frontier_mut().reset_to(child_exit);

        let outcome = resolve_blocked_exit(&mut state, &mut rng).expect("parent remains");
        assert_eq!(outcome, BacktrackOutcome::Removed(child));

        assert!(state.chunk(child).is_none());
        assert!(state.is_forbidden(child_exit.target));
        assert!(state.is_forbidden(exit.target));
        assert!(!state.is_occupied(exit.target));
        assert_eq!(state.frontier().current().copied(), Some(exit));

        // The parent's exit now leads into a forbidden position
        let outcome = resolve_blocked_exit(&mut state, &mut rng).expect("three edges remain");
        assert_eq!(outcome, BacktrackOutcome::Regenerated(first));
        let record = state.chunk(first).expect("first chunk stays placed");
        assert_ne!(record.primary().exit_edge, exit.direction);
    }

    // Tests descendants of a regenerated owner are removed newest first
    // Verified by keeping descendants when the owner regenerates
    #[test]
    fn test_descendants_removed_before_regeneration() {
        let mut state = state(13);
        let mut rng = SeededRandom::new(42);
        let first = place_first(&mut state, DirectionSet::ALL, &mut rng);

        let exit = state
            .pending_exit(first, ExitKind::Primary)
            .expect("first chunk is placed");
        let sides = state.available_sides(exit.target);
        let record = state
            .generate_chunk(exit.target, Some(&exit), sides, &mut rng)
            .expect("child should generate");
        let child = state.place(record);
        // Block the first chunk's exit while its child still exists
        state.frontier_mut().reset_to(exit);

        let outcome = resolve_blocked_exit(&mut state, &mut rng).expect("three edges remain");
        assert_eq!(outcome, BacktrackOutcome::Regenerated(first));
        assert!(state.chunk(child).is_none());
        assert_eq!(state.chunk_count(), 1);
        assert!(state.events().iter().any(|event| matches!(
            event,
            LayoutEvent::ChunkRemoved { chunk, .. } if *chunk == child
        )));
    }

    // Tests removing the first chunk is a generation failure
    // Verified by removing the first chunk like any other
    #[test]
    fn test_exhausted_first_chunk_fails() {
        let mut state = state(5);
        let mut rng = SeededRandom::new(42);
        let only_up: DirectionSet = [Direction::Up].into_iter().collect();
        place_first(&mut state, only_up, &mut rng);

        let error = resolve_blocked_exit(&mut state, &mut rng)
            .expect_err("no edge remains on the first chunk");
        assert!(matches!(
            error,
            LayoutError::GenerationFailure {
                chunk: Some(Coordinate::ZERO),
                ..
            }
        ));
    }

    // Tests an empty frontier cannot be backtracked
    // Verified by returning a default outcome for an empty frontier
    #[test]
    fn test_empty_frontier_fails() {
        let mut state = state(5);
        let mut rng = SeededRandom::new(42);

        let error = resolve_blocked_exit(&mut state, &mut rng).expect_err("nothing is pending");
        assert!(error.is_generation_failure());
    }
}
