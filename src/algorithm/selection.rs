//! Cumulative-weight sampling over integer weights

use crate::io::error::{Result, computation_error};
use crate::math::random::RandomSource;

/// Pick an index with probability proportional to its weight
///
/// Draws one integer in `[0, total)` and returns the first index whose
/// cumulative weight exceeds it.
///
/// # Errors
///
/// Returns an error if the weights are empty, sum to zero, or overflow the
/// range of a single draw
pub fn weighted_index<R: RandomSource + ?Sized>(weights: &[u32], rng: &mut R) -> Result<usize> {
    let total = weights
        .iter()
        .try_fold(0_u32, |acc, &w| acc.checked_add(w))
        .and_then(|sum| i32::try_from(sum).ok())
        .ok_or_else(|| computation_error("weighted selection", &"total weight overflow"))?;

    if total == 0 {
        return Err(computation_error(
            "weighted selection",
            &"no weighted directions available",
        ));
    }

    let draw = rng.next_int(0, total);
    let mut cumulative = 0_i64;
    for (index, &weight) in weights.iter().enumerate() {
        cumulative += i64::from(weight);
        if i64::from(draw) < cumulative {
            return Ok(index);
        }
    }

    Err(computation_error(
        "weighted selection",
        &format!("draw {draw} outside cumulative total {total}"),
    ))
}
