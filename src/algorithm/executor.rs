//! Chunk layout orchestration
//!
//! Places chunks one at a time on an unbounded chunk grid. Every placed chunk
//! contributes its primary exit (and possibly a secondary exit) to a
//! round-robin [`Frontier`]; each loop iteration resolves the exit under the
//! cursor by generating the chunk it leads into, dropping the exit, or
//! backtracking across chunks when it is the last exit left.

use std::collections::{BTreeMap, HashSet};

use log::{debug, info, trace};

use crate::algorithm::backtrack::{BacktrackOutcome, resolve_blocked_exit};
use crate::algorithm::frontier::{Frontier, PendingExit};
use crate::algorithm::path::PathRequest;
use crate::io::configuration::{
    LAYOUT_ITERATION_LIMIT, LayoutConfig, ROLL_STEPS_PER_PERCENT, SECONDARY_ROLL_RANGE,
};
use crate::io::error::{LayoutError, Result, WithChunkContext, generation_failure};
use crate::math::random::{RandomSource, SeededRandom, derive_seed};
use crate::math::weighting::ShapeParameters;
use crate::spatial::bounds::ChunkBounds;
use crate::spatial::chunk::{ChunkId, ChunkRecord, ExitKind};
use crate::spatial::coordinate::{Coordinate, Direction, DirectionSet};
use crate::spatial::grid::WorldGrid;
use crate::spatial::tiles::ChunkTiles;

/// One state change of the layout, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A chunk was generated and placed
    ChunkPlaced {
        /// New chunk
        chunk: ChunkId,
        /// Chunk-grid position
        position: Coordinate,
        /// Primary path cells
        cells: Vec<Coordinate>,
    },
    /// A chunk gained a secondary branch
    SecondaryPathAdded {
        /// Owning chunk
        chunk: ChunkId,
        /// Branch cells, excluding the origin
        cells: Vec<Coordinate>,
    },
    /// A chunk rewalked its primary path in place
    ChunkRegenerated {
        /// Regenerated chunk
        chunk: ChunkId,
        /// Chunk-grid position
        position: Coordinate,
        /// New primary path cells
        cells: Vec<Coordinate>,
    },
    /// A chunk was taken out of the layout
    ChunkRemoved {
        /// Removed chunk
        chunk: ChunkId,
        /// Position it occupied
        position: Coordinate,
    },
    /// A blocked exit was abandoned while other exits remained
    ExitDropped {
        /// Chunk owning the exit
        owner: ChunkId,
        /// Position the exit led into
        target: Coordinate,
    },
    /// A chunk position was ruled out for the rest of the layout
    PositionForbidden {
        /// Forbidden chunk-grid position
        position: Coordinate,
    },
}

/// Mutable state of a layout under construction
#[derive(Debug, Clone)]
pub struct LayoutState {
    bounds: ChunkBounds,
    shape: ShapeParameters,
    occupied: HashSet<Coordinate>,
    forbidden: HashSet<Coordinate>,
    chunks: BTreeMap<ChunkId, ChunkRecord>,
    frontier: Frontier,
    events: Vec<LayoutEvent>,
    next_id: u32,
}

impl LayoutState {
    /// An empty layout of chunks with the given bounds and shape biases
    pub fn new(bounds: ChunkBounds, shape: ShapeParameters) -> Self {
        Self {
            bounds,
            shape,
            occupied: HashSet::new(),
            forbidden: HashSet::new(),
            chunks: BTreeMap::new(),
            frontier: Frontier::new(),
            events: Vec::new(),
            next_id: 0,
        }
    }

    /// Bounds shared by every chunk
    pub const fn bounds(&self) -> &ChunkBounds {
        &self.bounds
    }

    /// Placed chunks in generation order
    pub fn chunks(&self) -> impl Iterator<Item = &ChunkRecord> {
        self.chunks.values()
    }

    /// Number of placed chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Look up a placed chunk
    pub fn chunk(&self, id: ChunkId) -> Option<&ChunkRecord> {
        self.chunks.get(&id)
    }

    /// First placed chunk still in the layout
    pub fn first_chunk(&self) -> Option<&ChunkRecord> {
        self.chunks.values().next()
    }

    /// Whether a chunk occupies `position`
    pub fn is_occupied(&self, position: Coordinate) -> bool {
        self.occupied.contains(&position)
    }

    /// Whether `position` has been ruled out
    pub fn is_forbidden(&self, position: Coordinate) -> bool {
        self.forbidden.contains(&position)
    }

    /// Pending exits
    pub const fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Mutable access to the pending exits
    pub const fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    /// Events recorded so far
    pub fn events(&self) -> &[LayoutEvent] {
        &self.events
    }

    /// Directions out of `target` that lead neither to a placed chunk nor
    /// to a forbidden position
    ///
    /// A target that is itself occupied or forbidden has no available sides.
    pub fn available_sides(&self, target: Coordinate) -> DirectionSet {
        if self.is_occupied(target) || self.is_forbidden(target) {
            return DirectionSet::EMPTY;
        }
        Direction::ALL
            .into_iter()
            .filter(|&direction| {
                let neighbor = target.offset(direction);
                !self.is_occupied(neighbor) && !self.is_forbidden(neighbor)
            })
            .collect()
    }

    /// Pending exit for one of a placed chunk's paths
    pub fn pending_exit(&self, id: ChunkId, kind: ExitKind) -> Option<PendingExit> {
        let record = self.chunks.get(&id)?;
        let (cell, direction) = record.exit(kind)?;
        Some(PendingExit {
            owner: id,
            kind,
            cell,
            direction,
            target: record.position().offset(direction),
        })
    }

    /// Generate a chunk at `target` without placing it
    ///
    /// The first chunk (no `via` exit) is entered at its center; every other
    /// chunk is entered at the mirror image of the exit leading into it.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` carrying `target` when no primary path
    /// exists, or `SafetyLimitExceeded`
    pub fn generate_chunk<R: RandomSource + ?Sized>(
        &self,
        target: Coordinate,
        via: Option<&PendingExit>,
        permitted_exits: DirectionSet,
        rng: &mut R,
    ) -> Result<ChunkRecord> {
        let entry = via.map_or(Coordinate::ZERO, |exit| {
            self.bounds.mirrored_entry(exit.cell, exit.direction)
        });
        let request = PathRequest {
            bounds: self.bounds,
            entry,
            permitted_exits,
            shape: self.shape,
        };
        ChunkRecord::generate(
            ChunkId(self.next_id),
            target,
            via.map(PendingExit::exit_ref),
            &request,
            rng,
        )
        .with_chunk(target)
    }

    /// Add a generated chunk to the layout
    pub fn place(&mut self, record: ChunkRecord) -> ChunkId {
        let id = record.id();
        let position = record.position();
        debug!(
            "placed chunk {id} at {position}: {} cells, exit {}",
            record.primary().len(),
            record.primary().exit_edge
        );
        self.events.push(LayoutEvent::ChunkPlaced {
            chunk: id,
            position,
            cells: record.primary().cells.clone(),
        });
        self.occupied.insert(position);
        self.next_id = self.next_id.max(id.0 + 1);
        self.chunks.insert(id, record);
        id
    }

    /// Roll for and attempt a secondary branch on a freshly placed chunk
    ///
    /// One draw is always consumed, resolving `chance` to a ten-thousandth of
    /// a percent. Returns the branch's pending exit when a branch was
    /// generated.
    ///
    /// # Errors
    ///
    /// Returns `SafetyLimitExceeded` if the branch search trips its fuse
    pub fn roll_secondary<R: RandomSource + ?Sized>(
        &mut self,
        id: ChunkId,
        chance: f64,
        rng: &mut R,
    ) -> Result<Option<PendingExit>> {
        let roll = rng.next_int(0, SECONDARY_ROLL_RANGE);
        if f64::from(roll) >= chance * f64::from(ROLL_STEPS_PER_PERCENT) {
            return Ok(None);
        }

        let Some(record) = self.chunks.get_mut(&id) else {
            return Ok(None);
        };
        let position = record.position();
        if record.attempt_secondary(rng).with_chunk(position)?.is_none() {
            trace!("chunk {id} found no secondary branch");
            return Ok(None);
        }

        if let Some(branch) = record.secondary() {
            debug!(
                "chunk {id} branched at {} toward {}",
                branch.origin, branch.path.exit_edge
            );
            self.events.push(LayoutEvent::SecondaryPathAdded {
                chunk: id,
                cells: branch.path.cells.clone(),
            });
        }
        Ok(self.pending_exit(id, ExitKind::Secondary))
    }

    /// Rewalk a chunk's primary path in place, dropping its secondary branch
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` when no path exists under the remaining
    /// permitted exits, or `SafetyLimitExceeded`
    pub fn regenerate<R: RandomSource + ?Sized>(&mut self, id: ChunkId, rng: &mut R) -> Result<()> {
        let record = self
            .chunks
            .get_mut(&id)
            .ok_or_else(|| generation_failure(&format!("chunk {id} is not placed")))?;
        let position = record.position();
        record.regenerate(rng).with_chunk(position)?;

        debug!(
            "regenerated chunk {id} at {position}: exit {} (permitted {})",
            record.primary().exit_edge,
            record.permitted_exits()
        );
        self.events.push(LayoutEvent::ChunkRegenerated {
            chunk: id,
            position,
            cells: record.primary().cells.clone(),
        });
        Ok(())
    }

    /// Withdraw an exit edge from a placed chunk
    pub fn restrict_exit(&mut self, id: ChunkId, edge: Direction) -> bool {
        self.chunks
            .get_mut(&id)
            .is_some_and(|record| record.restrict_exit(edge))
    }

    /// Chunks reached, directly or transitively, through `id`'s exits
    ///
    /// Listed in generation order.
    pub fn descendants(&self, id: ChunkId) -> Vec<ChunkId> {
        let mut lineage: HashSet<ChunkId> = HashSet::from([id]);
        let mut found = Vec::new();
        // Parents always precede their children
        for record in self.chunks.range(id..).map(|(_, record)| record) {
            if let Some(parent) = record.parent()
                && lineage.contains(&parent.chunk)
            {
                lineage.insert(record.id());
                found.push(record.id());
            }
        }
        found
    }

    /// Take a chunk out of the layout
    ///
    /// Its position stops being occupied; forbidding it is up to the caller.
    pub fn remove_chunk(&mut self, id: ChunkId) -> Option<ChunkRecord> {
        let record = self.chunks.remove(&id)?;
        let position = record.position();
        self.occupied.remove(&position);
        debug!("removed chunk {id} at {position}");
        self.events.push(LayoutEvent::ChunkRemoved {
            chunk: id,
            position,
        });
        Some(record)
    }

    /// Rule out a chunk position for the rest of the layout
    pub fn forbid(&mut self, position: Coordinate) {
        if self.forbidden.insert(position) {
            trace!("forbade chunk position {position}");
            self.events.push(LayoutEvent::PositionForbidden { position });
        }
    }

    /// Drop the blocked exit under the frontier cursor
    pub fn drop_current_exit(&mut self) -> Option<PendingExit> {
        let dropped = self.frontier.drop_current()?;
        debug!(
            "dropped exit of chunk {} toward {}",
            dropped.owner, dropped.target
        );
        self.events.push(LayoutEvent::ExitDropped {
            owner: dropped.owner,
            target: dropped.target,
        });
        Some(dropped)
    }

    fn into_parts(self) -> (Vec<ChunkRecord>, Vec<LayoutEvent>) {
        (self.chunks.into_values().collect(), self.events)
    }
}

/// A finished layout
#[derive(Debug, Clone)]
pub struct Layout {
    config: LayoutConfig,
    seed: i32,
    bounds: ChunkBounds,
    chunks: Vec<ChunkRecord>,
    events: Vec<LayoutEvent>,
}

impl Layout {
    /// Configuration the layout was generated from
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Integer seed value derived from the seed text
    pub const fn seed(&self) -> i32 {
        self.seed
    }

    /// Bounds shared by every chunk
    pub const fn bounds(&self) -> &ChunkBounds {
        &self.bounds
    }

    /// Chunks in generation order
    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.chunks
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk was placed
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk at a chunk-grid position
    pub fn chunk_at(&self, position: Coordinate) -> Option<&ChunkRecord> {
        self.chunks
            .iter()
            .find(|record| record.position() == position)
    }

    /// Journal of every state change during generation
    pub fn events(&self) -> &[LayoutEvent] {
        &self.events
    }

    /// Classified tiles of every chunk, in generation order
    pub fn chunk_tiles(&self) -> Vec<ChunkTiles> {
        self.chunks.iter().map(ChunkTiles::classify).collect()
    }

    /// World raster of every classified tile
    pub fn world_grid(&self) -> WorldGrid {
        WorldGrid::from_chunks(&self.chunk_tiles())
    }
}

/// Drives chunk placement for one configuration
#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    config: LayoutConfig,
    iteration_limit: usize,
}

impl LayoutGenerator {
    /// Validate the configuration and prepare a generator
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration fails validation
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            iteration_limit: LAYOUT_ITERATION_LIMIT,
        })
    }

    /// Override the placement loop fuse
    #[must_use]
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    /// Validated configuration
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Bounds of every chunk under this configuration
    pub const fn chunk_bounds(&self) -> ChunkBounds {
        ChunkBounds::new(
            self.config.chunk_dimensions.width as i32,
            self.config.chunk_dimensions.height as i32,
        )
    }

    /// Generate a layout drawing from `rng`
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` when the first chunk must be removed or
    /// cannot be generated, and `SafetyLimitExceeded` when a fuse trips
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Layout> {
        let bounds = self.chunk_bounds();
        let target_count = self.config.chunk_count;
        let mut state = LayoutState::new(bounds, self.config.shape());

        if target_count > 0 {
            let first = state.generate_chunk(Coordinate::ZERO, None, DirectionSet::ALL, rng)?;
            self.admit(&mut state, first, rng)?;
        }

        let mut iterations = 0;
        while state.chunk_count() < target_count {
            iterations += 1;
            if iterations > self.iteration_limit {
                return Err(LayoutError::SafetyLimitExceeded {
                    operation: "chunk layout",
                    limit: self.iteration_limit,
                });
            }

            let Some(exit) = state.frontier().current().copied() else {
                return Err(generation_failure(&"no pending exits remain"));
            };

            if self.try_place(&mut state, &exit, rng)? {
                continue;
            }

            if state.frontier().len() > 1 {
                state.drop_current_exit();
                continue;
            }

            match resolve_blocked_exit(&mut state, rng)? {
                BacktrackOutcome::Regenerated(id) => trace!("backtracked into chunk {id}"),
                BacktrackOutcome::Removed(id) => trace!("backtracked past chunk {id}"),
            }
        }

        info!(
            "generated layout of {} chunks ({} events)",
            state.chunk_count(),
            state.events().len()
        );

        let (chunks, events) = state.into_parts();
        Ok(Layout {
            config: self.config.clone(),
            seed: derive_seed(&self.config.seed),
            bounds,
            chunks,
            events,
        })
    }

    /// Generate the chunk `exit` leads into and place it, returning whether
    /// the exit was resolved
    ///
    /// A position whose chunk cannot be generated is forbidden.
    fn try_place<R: RandomSource + ?Sized>(
        &self,
        state: &mut LayoutState,
        exit: &PendingExit,
        rng: &mut R,
    ) -> Result<bool> {
        let sides = state.available_sides(exit.target);
        if sides.is_empty() {
            return Ok(false);
        }

        match state.generate_chunk(exit.target, Some(exit), sides, rng) {
            Ok(record) => {
                self.admit(state, record, rng)?;
                Ok(true)
            }
            Err(error) if error.is_generation_failure() => {
                debug!("{error}");
                state.forbid(exit.target);
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    /// Place a generated chunk and queue its exits
    fn admit<R: RandomSource + ?Sized>(
        &self,
        state: &mut LayoutState,
        record: ChunkRecord,
        rng: &mut R,
    ) -> Result<()> {
        let is_first = state.chunk_count() == 0;
        let id = state.place(record);
        let secondary = state.roll_secondary(id, self.config.secondary_path_chance, rng)?;

        let primary = state
            .pending_exit(id, ExitKind::Primary)
            .ok_or_else(|| generation_failure(&format!("chunk {id} has no primary exit")))?;
        let frontier = state.frontier_mut();
        if is_first {
            frontier.reset_to(primary);
        } else {
            frontier.replace_current(primary);
        }
        if let Some(branch) = secondary {
            frontier.push(branch);
        }
        frontier.advance();
        Ok(())
    }
}

/// Validate `config`, seed a random source from its seed text and generate
///
/// # Errors
///
/// Returns `InvalidParameter` before any draw when the configuration is
/// invalid, otherwise any error of [`LayoutGenerator::generate`]
pub fn generate_layout(config: &LayoutConfig) -> Result<Layout> {
    let generator = LayoutGenerator::new(config.clone())?;
    let mut rng = SeededRandom::from_text(&config.seed);
    generator.generate(&mut rng)
}
