//! Structural checks over a finished layout
//!
//! Each check re-derives a property from the chunk records alone, without
//! trusting the generator's bookkeeping. An empty result means the layout is
//! sound.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::algorithm::executor::Layout;
use crate::spatial::chunk::{ChunkId, ChunkRecord};
use crate::spatial::coordinate::{Coordinate, Direction};

/// A broken structural property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A path visits the same cell twice
    RevisitedCell {
        /// Offending chunk
        chunk: ChunkId,
        /// Repeated cell
        cell: Coordinate,
    },
    /// Consecutive path cells are not 4-adjacent
    NonAdjacentStep {
        /// Offending chunk
        chunk: ChunkId,
        /// Earlier cell
        from: Coordinate,
        /// Later cell
        to: Coordinate,
    },
    /// A path cell touches an earlier path cell other than its predecessor
    BraidedCell {
        /// Offending chunk
        chunk: ChunkId,
        /// Cell with the extra neighbor
        cell: Coordinate,
    },
    /// A path does not start where it should
    MisplacedStart {
        /// Offending chunk
        chunk: ChunkId,
        /// Expected first cell
        expected: Coordinate,
    },
    /// An exit cell is not on the edge recorded for it
    ExitOffEdge {
        /// Offending chunk
        chunk: ChunkId,
        /// Exit cell
        cell: Coordinate,
        /// Recorded edge
        edge: Direction,
    },
    /// An exit reuses an edge it must differ from
    RepeatedExitEdge {
        /// Offending chunk
        chunk: ChunkId,
        /// Reused edge
        edge: Direction,
    },
    /// Two chunks share a position
    DuplicatePosition {
        /// Shared position
        position: Coordinate,
    },
    /// A chunk is not reached through an exit of its parent
    DetachedChunk {
        /// Offending chunk
        chunk: ChunkId,
    },
    /// The chunk positions do not form one connected region
    DisconnectedLayout,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RevisitedCell { chunk, cell } => {
                write!(f, "chunk {chunk}: cell {cell} visited twice")
            }
            Self::NonAdjacentStep { chunk, from, to } => {
                write!(f, "chunk {chunk}: step {from} -> {to} is not adjacent")
            }
            Self::BraidedCell { chunk, cell } => {
                write!(f, "chunk {chunk}: cell {cell} touches an earlier path cell")
            }
            Self::MisplacedStart { chunk, expected } => {
                write!(f, "chunk {chunk}: path does not start at {expected}")
            }
            Self::ExitOffEdge { chunk, cell, edge } => {
                write!(f, "chunk {chunk}: exit {cell} is not on the {edge} edge")
            }
            Self::RepeatedExitEdge { chunk, edge } => {
                write!(f, "chunk {chunk}: exit reuses the {edge} edge")
            }
            Self::DuplicatePosition { position } => {
                write!(f, "several chunks at {position}")
            }
            Self::DetachedChunk { chunk } => {
                write!(f, "chunk {chunk} is not entered through its parent's exit")
            }
            Self::DisconnectedLayout => write!(f, "chunk positions are not connected"),
        }
    }
}

/// Verify every structural property of a layout
pub fn check_layout(layout: &Layout) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for record in layout.chunks() {
        check_chunk(record, &mut violations);
    }
    check_placement(layout, &mut violations);
    violations
}

/// Verify the paths of a single chunk
pub fn check_chunk(record: &ChunkRecord, violations: &mut Vec<InvariantViolation>) {
    let chunk = record.id();
    let primary = record.primary();

    if primary.cells.first() != Some(&record.entry()) {
        violations.push(InvariantViolation::MisplacedStart {
            chunk,
            expected: record.entry(),
        });
    }

    let mut placed = HashSet::new();
    check_walk(chunk, None, &primary.cells, &mut placed, violations);
    check_exit(record, primary.cells.last(), primary.exit, primary.exit_edge, violations);
    if record.entry_edge() == Some(primary.exit_edge) {
        violations.push(InvariantViolation::RepeatedExitEdge {
            chunk,
            edge: primary.exit_edge,
        });
    }

    let Some(branch) = record.secondary() else {
        return;
    };
    if !primary.cells.contains(&branch.origin) {
        violations.push(InvariantViolation::MisplacedStart {
            chunk,
            expected: branch.origin,
        });
    }
    check_walk(
        chunk,
        Some(branch.origin),
        &branch.path.cells,
        &mut placed,
        violations,
    );
    check_exit(
        record,
        branch.path.cells.last(),
        branch.path.exit,
        branch.path.exit_edge,
        violations,
    );
    let edge = branch.path.exit_edge;
    if edge == primary.exit_edge || record.entry_edge() == Some(edge) {
        violations.push(InvariantViolation::RepeatedExitEdge { chunk, edge });
    }
}

fn check_walk(
    chunk: ChunkId,
    origin: Option<Coordinate>,
    cells: &[Coordinate],
    placed: &mut HashSet<Coordinate>,
    violations: &mut Vec<InvariantViolation>,
) {
    let mut previous = origin;
    for &cell in cells {
        if let Some(from) = previous
            && !from.is_adjacent(cell)
        {
            violations.push(InvariantViolation::NonAdjacentStep {
                chunk,
                from,
                to: cell,
            });
        }

        let extra_neighbors = cell
            .neighbors()
            .filter(|neighbor| Some(*neighbor) != previous && placed.contains(neighbor))
            .count();
        if extra_neighbors > 0 {
            violations.push(InvariantViolation::BraidedCell { chunk, cell });
        }

        if !placed.insert(cell) {
            violations.push(InvariantViolation::RevisitedCell { chunk, cell });
        }
        previous = Some(cell);
    }
}

fn check_exit(
    record: &ChunkRecord,
    last: Option<&Coordinate>,
    exit: Coordinate,
    edge: Direction,
    violations: &mut Vec<InvariantViolation>,
) {
    if last != Some(&exit) || record.bounds().edge_of(exit) != Some(edge) {
        violations.push(InvariantViolation::ExitOffEdge {
            chunk: record.id(),
            cell: exit,
            edge,
        });
    }
}

fn check_placement(layout: &Layout, violations: &mut Vec<InvariantViolation>) {
    let mut by_position: HashMap<Coordinate, &ChunkRecord> = HashMap::new();
    let by_id: HashMap<ChunkId, &ChunkRecord> =
        layout.chunks().iter().map(|c| (c.id(), c)).collect();

    for record in layout.chunks() {
        if by_position.insert(record.position(), record).is_some() {
            violations.push(InvariantViolation::DuplicatePosition {
                position: record.position(),
            });
        }

        let Some(link) = record.parent() else {
            continue;
        };
        let attached = by_id
            .get(&link.chunk)
            .and_then(|parent| parent.exit(link.kind).map(|exit| (parent, exit)))
            .is_some_and(|(parent, (cell, direction))| {
                parent.position().offset(direction) == record.position()
                    && layout.bounds().mirrored_entry(cell, direction) == record.entry()
            });
        if !attached {
            violations.push(InvariantViolation::DetachedChunk { chunk: record.id() });
        }
    }

    if !is_connected(&by_position) {
        violations.push(InvariantViolation::DisconnectedLayout);
    }
}

fn is_connected(by_position: &HashMap<Coordinate, &ChunkRecord>) -> bool {
    let Some(&start) = by_position.keys().next() else {
        return true;
    };

    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(position) = queue.pop_front() {
        for neighbor in position.neighbors() {
            if by_position.contains_key(&neighbor) && seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    seen.len() == by_position.len()
}
