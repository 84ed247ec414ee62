//! Mathematical utilities for the algorithm

/// Seeded random source and seed derivation
pub mod random;
/// Expansion and alignment weighting of direction choices
pub mod weighting;
