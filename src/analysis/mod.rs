//! Analysis of finished layouts

/// Structural invariant checks
pub mod invariants;
/// Summary statistics for reporting
pub mod statistics;
