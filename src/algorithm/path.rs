//! Randomized, weight-biased backtracking walk inside a single chunk
//!
//! The walk keeps an explicit stack of [`PathStep`]s. Each step owns the
//! directions it has not tried yet; choices are drawn by weight, invalid
//! targets are discarded, and a step that runs out of directions is popped and
//! its cell forbidden for the rest of the pass. The walk ends on the first
//! valid boundary cell.

use std::collections::HashSet;

use crate::algorithm::selection::weighted_index;
use crate::io::configuration::{
    PATH_ITERATION_LIMIT, SECONDARY_ORIGIN_HEAD_SKIP, SECONDARY_ORIGIN_TAIL_SKIP,
};
use crate::io::error::{LayoutError, Result, computation_error, generation_failure};
use crate::math::random::RandomSource;
use crate::math::weighting::{DirectionWeighting, ShapeParameters};
use crate::spatial::bounds::ChunkBounds;
use crate::spatial::coordinate::{Coordinate, Direction, DirectionSet};

/// One cell of the path under construction and the directions still untried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    position: Coordinate,
    remaining: Vec<Direction>,
}

impl PathStep {
    /// A fresh step with every direction available
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            remaining: Direction::ALL.to_vec(),
        }
    }

    /// Cell occupied by this step
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Directions not yet tried from this step
    pub fn remaining(&self) -> &[Direction] {
        &self.remaining
    }

    /// Whether every direction has been tried
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Inputs of one chunk's path generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRequest {
    /// Cell ranges of the chunk
    pub bounds: ChunkBounds,
    /// First path cell; its boundary edge, if any, is the entry edge
    pub entry: Coordinate,
    /// Edges the path may exit through
    pub permitted_exits: DirectionSet,
    /// Shape biases for direction choices
    pub shape: ShapeParameters,
}

/// A finished walk from its first cell to a boundary exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPath {
    /// Ordered, duplicate-free cells; the last one is the exit
    pub cells: Vec<Coordinate>,
    /// Boundary cell the walk ended on
    pub exit: Coordinate,
    /// Edge the exit cell lies on
    pub exit_edge: Direction,
}

impl GeneratedPath {
    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the path has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Branch leaving the primary path at `origin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryPath {
    /// Primary path cell the branch departs from
    pub origin: Coordinate,
    /// Branch cells, excluding the origin
    pub path: GeneratedPath,
}

/// Result of one forward attempt of the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A valid interior cell to push next
    Continue(PathStep),
    /// A valid exit cell; pushing it completes the walk
    Done(PathStep, Direction),
    /// Backtracking reached the floor of the stack with nothing left to try
    BacktrackExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assessment {
    Rejected,
    Interior,
    Exit(Direction),
}

/// Search state for one chunk's primary and secondary paths
#[derive(Debug, Clone)]
pub struct PathGenerator {
    bounds: ChunkBounds,
    entry: Coordinate,
    entry_edge: Option<Direction>,
    permitted: DirectionSet,
    shape: ShapeParameters,
    weighting: DirectionWeighting,
    iteration_limit: usize,

    steps: Vec<PathStep>,
    occupied: HashSet<Coordinate>,
    forbidden: HashSet<Coordinate>,
    branch_forbidden: HashSet<Coordinate>,
    /// Set while a branch is being walked
    branching: bool,
    excluded_edge: Option<Direction>,
    /// Latch releasing the cannot-end-yet zone
    may_end: bool,
    iterations: usize,
    primary_len: usize,
    primary_exit_edge: Option<Direction>,
}

impl PathGenerator {
    /// Prepare a generator for the given request without drawing anything
    pub fn new(request: &PathRequest) -> Self {
        Self {
            bounds: request.bounds,
            entry: request.entry,
            entry_edge: request.bounds.edge_of(request.entry),
            permitted: request.permitted_exits,
            shape: request.shape,
            weighting: DirectionWeighting::new(&request.bounds, request.entry, request.shape),
            iteration_limit: PATH_ITERATION_LIMIT,
            steps: Vec::new(),
            occupied: HashSet::new(),
            forbidden: HashSet::new(),
            branch_forbidden: HashSet::new(),
            branching: false,
            excluded_edge: None,
            may_end: false,
            iterations: 0,
            primary_len: 0,
            primary_exit_edge: None,
        }
    }

    /// Override the iteration fuse
    #[must_use]
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    /// Cell ranges of the chunk
    pub const fn bounds(&self) -> &ChunkBounds {
        &self.bounds
    }

    /// First path cell
    pub const fn entry(&self) -> Coordinate {
        self.entry
    }

    /// Boundary edge of the entry cell, `None` for an interior entry
    pub const fn entry_edge(&self) -> Option<Direction> {
        self.entry_edge
    }

    /// Edges the primary path may still exit through
    pub const fn permitted_exits(&self) -> DirectionSet {
        self.permitted
    }

    /// Shape biases used for direction choices
    pub const fn shape(&self) -> ShapeParameters {
        self.shape
    }

    /// Cells ruled out for the current primary pass
    pub const fn forbidden_cells(&self) -> &HashSet<Coordinate> {
        &self.forbidden
    }

    /// Iterations consumed by the current pass
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Cells currently on the step stack, in order
    pub fn path_cells(&self) -> Vec<Coordinate> {
        self.positions_from(0)
    }

    /// Withdraw an exit edge, returning whether it was permitted
    pub const fn restrict_exit(&mut self, edge: Direction) -> bool {
        self.permitted.remove(edge)
    }

    /// Walk a primary path from the entry cell
    ///
    /// Discards any earlier path, forbidden cells and branch before starting.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` when backtracking empties the stack down to
    /// the entry cell, and `SafetyLimitExceeded` when the iteration fuse trips
    pub fn generate<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<GeneratedPath> {
        self.reset();
        self.push(PathStep::new(self.entry));

        loop {
            match self.advance(1, rng)? {
                Advance::Continue(step) => self.push(step),
                Advance::Done(step, exit_edge) => {
                    let exit = step.position;
                    self.push(step);
                    self.primary_len = self.steps.len();
                    self.primary_exit_edge = Some(exit_edge);
                    return Ok(GeneratedPath {
                        cells: self.path_cells(),
                        exit,
                        exit_edge,
                    });
                }
                Advance::BacktrackExhausted => {
                    return Err(generation_failure(&format!(
                        "no remaining paths from entry {} ({} cells forbidden)",
                        self.entry,
                        self.forbidden.len()
                    )));
                }
            }
        }
    }

    /// Try to branch a secondary path off the finished primary path
    ///
    /// Branch origins are taken from the tail of the primary path backward,
    /// skipping its last and first cells. The branch must leave through a
    /// permitted edge other than the entry and primary exit edges. Returns
    /// `None`, leaving the primary path untouched, when no branch is found.
    ///
    /// # Errors
    ///
    /// Returns `SafetyLimitExceeded` when the iteration fuse trips
    pub fn generate_secondary<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<SecondaryPath>> {
        let Some(primary_exit_edge) = self.primary_exit_edge else {
            return Ok(None);
        };
        if self.steps.len() != self.primary_len {
            return Ok(None);
        }

        self.branching = true;
        self.excluded_edge = Some(primary_exit_edge);

        let primary_len = self.primary_len;
        let last_origin = primary_len.saturating_sub(SECONDARY_ORIGIN_TAIL_SKIP + 1);
        let mut start = None;
        for index in (SECONDARY_ORIGIN_HEAD_SKIP..=last_origin).rev() {
            if let Some(advance) = self.try_directions(index, rng)? {
                let origin = self.steps.get(index).map(PathStep::position);
                start = origin.map(|cell| (cell, advance));
                break;
            }
        }

        let Some((origin, mut next)) = start else {
            self.abandon_branch();
            return Ok(None);
        };

        let floor = primary_len + 1;
        loop {
            match next {
                Advance::Continue(step) => self.push(step),
                Advance::Done(step, exit_edge) => {
                    let exit = step.position;
                    self.push(step);
                    let cells = self.positions_from(primary_len);
                    self.finish_branch();
                    return Ok(Some(SecondaryPath {
                        origin,
                        path: GeneratedPath {
                            cells,
                            exit,
                            exit_edge,
                        },
                    }));
                }
                Advance::BacktrackExhausted => {
                    self.abandon_branch();
                    return Ok(None);
                }
            }
            next = self.advance(floor, rng)?;
        }
    }

    fn reset(&mut self) {
        self.steps.clear();
        self.occupied.clear();
        self.forbidden.clear();
        self.branch_forbidden.clear();
        self.branching = false;
        self.excluded_edge = None;
        self.may_end = false;
        self.iterations = 0;
        self.primary_len = 0;
        self.primary_exit_edge = None;
    }

    fn push(&mut self, step: PathStep) {
        self.occupied.insert(step.position);
        self.steps.push(step);
    }

    fn positions_from(&self, start: usize) -> Vec<Coordinate> {
        self.steps
            .get(start..)
            .map(|steps| steps.iter().map(PathStep::position).collect())
            .unwrap_or_default()
    }

    fn finish_branch(&mut self) {
        self.branching = false;
        self.excluded_edge = None;
        self.branch_forbidden.clear();
    }

    fn abandon_branch(&mut self) {
        while self.steps.len() > self.primary_len {
            if let Some(step) = self.steps.pop() {
                self.occupied.remove(&step.position);
            }
        }
        self.finish_branch();
    }

    fn tick(&mut self) -> Result<()> {
        self.iterations += 1;
        if self.iterations > self.iteration_limit {
            return Err(LayoutError::SafetyLimitExceeded {
                operation: "path generation",
                limit: self.iteration_limit,
            });
        }
        Ok(())
    }

    /// Move forward from the top of the stack, backtracking as needed
    ///
    /// Steps at or below `floor` are never popped.
    fn advance<R: RandomSource + ?Sized>(&mut self, floor: usize, rng: &mut R) -> Result<Advance> {
        loop {
            let Some(top) = self.steps.len().checked_sub(1) else {
                return Ok(Advance::BacktrackExhausted);
            };

            if let Some(advance) = self.try_directions(top, rng)? {
                return Ok(advance);
            }

            if self.steps.len() <= floor {
                return Ok(Advance::BacktrackExhausted);
            }

            self.backtrack();
        }
    }

    fn backtrack(&mut self) {
        if let Some(step) = self.steps.pop() {
            self.occupied.remove(&step.position);
            if self.branching {
                self.branch_forbidden.insert(step.position);
            } else {
                self.forbidden.insert(step.position);
            }
        }
    }

    /// Draw directions from the step at `index` until one yields a valid cell
    fn try_directions<R: RandomSource + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
    ) -> Result<Option<Advance>> {
        loop {
            let Some(position) = self
                .steps
                .get(index)
                .filter(|step| !step.is_exhausted())
                .map(PathStep::position)
            else {
                return Ok(None);
            };

            self.tick()?;

            let weights: Vec<u32> = self
                .steps
                .get(index)
                .map(|step| {
                    step.remaining
                        .iter()
                        .map(|&direction| self.weighting.weight(position.offset(direction)))
                        .collect()
                })
                .unwrap_or_default();
            let choice = weighted_index(&weights, rng)?;

            let Some(step) = self.steps.get_mut(index) else {
                return Ok(None);
            };
            if choice >= step.remaining.len() {
                return Err(computation_error(
                    "direction selection",
                    &format!("index {choice} outside {} directions", step.remaining.len()),
                ));
            }
            let direction = step.remaining.remove(choice);
            let candidate = position.offset(direction);

            match self.assess(candidate) {
                Assessment::Rejected => {}
                Assessment::Interior => {
                    return Ok(Some(Advance::Continue(PathStep::new(candidate))));
                }
                Assessment::Exit(edge) => {
                    return Ok(Some(Advance::Done(PathStep::new(candidate), edge)));
                }
            }
        }
    }

    fn assess(&mut self, cell: Coordinate) -> Assessment {
        if self.occupied.contains(&cell)
            || self.forbidden.contains(&cell)
            || self.branch_forbidden.contains(&cell)
        {
            return Assessment::Rejected;
        }

        // The predecessor is the only path neighbor allowed
        let used_neighbors = cell
            .neighbors()
            .filter(|neighbor| self.occupied.contains(neighbor))
            .count();
        if used_neighbors > 1 {
            return Assessment::Rejected;
        }

        if let Some(edge) = self.exit_edge_at(cell) {
            return Assessment::Exit(edge);
        }

        if self.bounds.is_interior(cell) {
            Assessment::Interior
        } else {
            Assessment::Rejected
        }
    }

    /// Edge through which the walk may end at `cell`
    fn exit_edge_at(&mut self, cell: Coordinate) -> Option<Direction> {
        if let Some(entry_edge) = self.entry_edge
            && !self.may_end
        {
            let toward_entry = entry_edge.vector();
            if cell.x * toward_entry.x > 0 || cell.y * toward_entry.y > 0 {
                return None;
            }
            self.may_end = true;
        }

        let edge = self.bounds.edge_of(cell)?;
        let allowed = Some(edge) != self.entry_edge
            && Some(edge) != self.excluded_edge
            && self.permitted.contains(edge);
        allowed.then_some(edge)
    }
}
