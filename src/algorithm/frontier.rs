//! Round-robin queue of unresolved chunk exits
//!
//! Exits are resolved in rounds. A round covers the lanes present when it
//! began; exits appended during a round wait for the next one. Resolving an
//! exit either replaces it in its lane with the new chunk's primary exit or
//! drops the lane entirely.

use crate::spatial::chunk::{ChunkId, ExitKind, ExitRef};
use crate::spatial::coordinate::{Coordinate, Direction};

/// An exit waiting for the chunk it leads into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingExit {
    /// Chunk the exit leaves
    pub owner: ChunkId,
    /// Path of the owner the exit ends
    pub kind: ExitKind,
    /// Chunk-local exit cell
    pub cell: Coordinate,
    /// Edge the exit leaves through
    pub direction: Direction,
    /// Chunk-grid position the exit leads into
    pub target: Coordinate,
}

impl PendingExit {
    /// Reference to the owning chunk's exit
    pub const fn exit_ref(&self) -> ExitRef {
        ExitRef {
            chunk: self.owner,
            kind: self.kind,
        }
    }
}

/// Ordered set of pending exits with a rotating cursor
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    exits: Vec<PendingExit>,
    cursor: usize,
    round_len: usize,
}

impl Frontier {
    /// An empty frontier
    pub const fn new() -> Self {
        Self {
            exits: Vec::new(),
            cursor: 0,
            round_len: 0,
        }
    }

    /// Exit under the cursor
    pub fn current(&self) -> Option<&PendingExit> {
        self.exits.get(self.cursor)
    }

    /// Replace the exit under the cursor, returning the one it displaced
    pub fn replace_current(&mut self, exit: PendingExit) -> Option<PendingExit> {
        self.exits
            .get_mut(self.cursor)
            .map(|slot| std::mem::replace(slot, exit))
    }

    /// Append an exit to be resolved from the next round on
    pub fn push(&mut self, exit: PendingExit) {
        self.exits.push(exit);
    }

    /// Remove the exit under the cursor
    ///
    /// The cursor stays put so it lands on the following exit.
    pub fn drop_current(&mut self) -> Option<PendingExit> {
        if self.cursor >= self.exits.len() {
            return None;
        }
        let dropped = self.exits.remove(self.cursor);
        self.round_len = self.round_len.saturating_sub(1);
        self.wrap_if_needed();
        Some(dropped)
    }

    /// Move the cursor to the next exit of the round
    pub fn advance(&mut self) {
        self.cursor += 1;
        self.wrap_if_needed();
    }

    /// Discard every exit and continue from `exit` alone
    pub fn reset_to(&mut self, exit: PendingExit) {
        self.exits.clear();
        self.exits.push(exit);
        self.cursor = 0;
        self.round_len = 1;
    }

    /// Number of pending exits
    pub fn len(&self) -> usize {
        self.exits.len()
    }

    /// Whether no exits remain
    pub fn is_empty(&self) -> bool {
        self.exits.is_empty()
    }

    /// Pending exits in lane order
    pub fn iter(&self) -> impl Iterator<Item = &PendingExit> {
        self.exits.iter()
    }

    fn wrap_if_needed(&mut self) {
        if self.cursor >= self.round_len || self.cursor >= self.exits.len() {
            self.cursor = 0;
            self.round_len = self.exits.len();
        }
    }
}
