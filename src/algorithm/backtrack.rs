//! Cross-chunk backtracking for the last pending exit
//!
//! When the only pending exit leads nowhere, its owner gives up that exit
//! edge. The owner keeps its position and rewalks its path toward another
//! permitted edge if one remains; otherwise the owner itself is removed and
//! the exit of its parent that led to it becomes the pending exit, which the
//! next placement attempt will find blocked in turn.

use log::debug;

use crate::algorithm::executor::LayoutState;
use crate::algorithm::frontier::PendingExit;
use crate::io::error::{LayoutError, Result, generation_failure};
use crate::math::random::RandomSource;
use crate::spatial::chunk::{ChunkId, ExitKind};

/// How the blocked exit was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktrackOutcome {
    /// The owner regenerated its path; its new primary exit is pending
    Regenerated(ChunkId),
    /// The owner was removed; its parent's exit toward it is pending
    Removed(ChunkId),
}

/// Resolve the blocked exit under the frontier cursor
///
/// The exit's target is forbidden and its edge withdrawn from the owner.
/// Chunks reached through the owner are removed first: with the blocked exit
/// as the only pending exit they are dead ends, and regenerating the owner
/// would cut them off its paths.
///
/// # Errors
///
/// Returns `GenerationFailure` when the first chunk would have to be removed,
/// and `SafetyLimitExceeded` if a regeneration trips its fuse
pub fn resolve_blocked_exit<R: RandomSource + ?Sized>(
    state: &mut LayoutState,
    rng: &mut R,
) -> Result<BacktrackOutcome> {
    let Some(blocked) = state.frontier().current().copied() else {
        return Err(generation_failure(&"no pending exit to backtrack from"));
    };
    let owner = blocked.owner;

    state.forbid(blocked.target);
    state.restrict_exit(owner, blocked.direction);

    for descendant in state.descendants(owner).into_iter().rev() {
        state.remove_chunk(descendant);
    }

    let has_exits = state
        .chunk(owner)
        .is_some_and(|record| !record.permitted_exits().is_empty());
    if has_exits {
        match state.regenerate(owner, rng) {
            Ok(()) => {
                let exit = state
                    .pending_exit(owner, ExitKind::Primary)
                    .ok_or_else(|| generation_failure(&format!("chunk {owner} lost its exit")))?;
                state.frontier_mut().reset_to(exit);
                return Ok(BacktrackOutcome::Regenerated(owner));
            }
            Err(error) if error.is_generation_failure() => {
                debug!("{error}");
            }
            Err(error) => return Err(error),
        }
    }

    remove_owner(state, owner)
}

fn remove_owner(state: &mut LayoutState, owner: ChunkId) -> Result<BacktrackOutcome> {
    let Some(record) = state.chunk(owner) else {
        return Err(generation_failure(&format!("chunk {owner} is not placed")));
    };
    let position = record.position();
    let Some(parent) = record.parent() else {
        return Err(LayoutError::GenerationFailure {
            chunk: Some(position),
            reason: "first chunk has no remaining exits".to_string(),
        });
    };

    state.remove_chunk(owner);
    state.forbid(position);

    let exit: PendingExit = state
        .pending_exit(parent.chunk, parent.kind)
        .ok_or_else(|| generation_failure(&format!("parent {} lost its exit", parent.chunk)))?;
    state.frontier_mut().reset_to(exit);
    Ok(BacktrackOutcome::Removed(owner))
}
