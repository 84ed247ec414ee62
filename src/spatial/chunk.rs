//! Chunk records placed by the layout orchestrator

use std::collections::HashSet;
use std::fmt;

use crate::algorithm::path::{GeneratedPath, PathGenerator, PathRequest, SecondaryPath};
use crate::io::error::Result;
use crate::math::random::RandomSource;
use crate::math::weighting::ShapeParameters;
use crate::spatial::bounds::ChunkBounds;
use crate::spatial::coordinate::{Coordinate, Direction, DirectionSet};

/// Stable identifier of a chunk; ascending order is generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u32);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of a chunk's paths an exit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitKind {
    /// End of the primary path
    Primary,
    /// End of the secondary branch
    Secondary,
}

/// Reference to one exit of a placed chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitRef {
    /// Chunk owning the exit
    pub chunk: ChunkId,
    /// Path the exit ends
    pub kind: ExitKind,
}

/// One placed chunk with its generated paths
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    id: ChunkId,
    position: Coordinate,
    parent: Option<ExitRef>,
    generator: PathGenerator,
    primary: GeneratedPath,
    secondary: Option<SecondaryPath>,
    regenerations: usize,
}

impl ChunkRecord {
    /// Generate a chunk's primary path and wrap it in a record
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` if no primary path exists, or
    /// `SafetyLimitExceeded` if the path search trips its fuse
    pub fn generate<R: RandomSource + ?Sized>(
        id: ChunkId,
        position: Coordinate,
        parent: Option<ExitRef>,
        request: &PathRequest,
        rng: &mut R,
    ) -> Result<Self> {
        let mut generator = PathGenerator::new(request);
        let primary = generator.generate(rng)?;

        Ok(Self {
            id,
            position,
            parent,
            generator,
            primary,
            secondary: None,
            regenerations: 0,
        })
    }

    /// Attempt a secondary branch, returning its exit when one is found
    ///
    /// # Errors
    ///
    /// Returns `SafetyLimitExceeded` if the branch search trips its fuse
    pub fn attempt_secondary<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<(Coordinate, Direction)>> {
        if self.secondary.is_some() {
            return Ok(None);
        }
        self.secondary = self.generator.generate_secondary(rng)?;
        Ok(self
            .secondary
            .as_ref()
            .map(|branch| (branch.path.exit, branch.path.exit_edge)))
    }

    /// Discard both paths and walk a new primary path from the same entry
    ///
    /// Position, entry and the remaining permitted exits are kept. On error
    /// the record still reports its previous paths but is no longer usable.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` if no primary path exists under the
    /// remaining permitted exits, or `SafetyLimitExceeded`
    pub fn regenerate<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.secondary = None;
        self.primary = self.generator.generate(rng)?;
        self.regenerations += 1;
        Ok(())
    }

    /// Withdraw a permitted exit edge, returning whether it was permitted
    pub const fn restrict_exit(&mut self, edge: Direction) -> bool {
        self.generator.restrict_exit(edge)
    }

    /// Stable identifier
    pub const fn id(&self) -> ChunkId {
        self.id
    }

    /// Position on the chunk grid
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Exit of the chunk this one was entered from
    pub const fn parent(&self) -> Option<ExitRef> {
        self.parent
    }

    /// Cell ranges
    pub const fn bounds(&self) -> &ChunkBounds {
        self.generator.bounds()
    }

    /// First cell of the primary path
    pub const fn entry(&self) -> Coordinate {
        self.generator.entry()
    }

    /// Edge the chunk was entered through, `None` for the first chunk
    pub const fn entry_edge(&self) -> Option<Direction> {
        self.generator.entry_edge()
    }

    /// Edges the primary path may still exit through
    pub const fn permitted_exits(&self) -> DirectionSet {
        self.generator.permitted_exits()
    }

    /// Cells ruled out during the latest generation pass
    pub const fn forbidden_cells(&self) -> &HashSet<Coordinate> {
        self.generator.forbidden_cells()
    }

    /// Shape biases used for this chunk
    pub const fn shape(&self) -> ShapeParameters {
        self.generator.shape()
    }

    /// Primary path from entry to exit
    pub const fn primary(&self) -> &GeneratedPath {
        &self.primary
    }

    /// Secondary branch, if one was generated
    pub const fn secondary(&self) -> Option<&SecondaryPath> {
        self.secondary.as_ref()
    }

    /// Number of in-place regenerations caused by backtracking
    pub const fn regenerations(&self) -> usize {
        self.regenerations
    }

    /// Exit cell and edge of the given path
    pub fn exit(&self, kind: ExitKind) -> Option<(Coordinate, Direction)> {
        match kind {
            ExitKind::Primary => Some((self.primary.exit, self.primary.exit_edge)),
            ExitKind::Secondary => self
                .secondary
                .as_ref()
                .map(|branch| (branch.path.exit, branch.path.exit_edge)),
        }
    }

    /// Every path cell, primary first then branch
    pub fn path_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let branch = self
            .secondary
            .iter()
            .flat_map(|branch| branch.path.cells.iter().copied());
        self.primary.cells.iter().copied().chain(branch)
    }

    /// Whether `cell` belongs to either path
    pub fn is_path_cell(&self, cell: Coordinate) -> bool {
        self.path_cells().any(|c| c == cell)
    }

    /// Number of path cells across both paths
    pub fn path_len(&self) -> usize {
        self.primary.len() + self.secondary.as_ref().map_or(0, |branch| branch.path.len())
    }
}
