/// Cross-chunk backtracking for a blocked last exit
pub mod backtrack;
/// Chunk layout orchestration and the finished layout
pub mod executor;
/// Round-robin queue of pending exits
pub mod frontier;
/// Backtracking path walk inside one chunk
pub mod path;
/// Cumulative-weight direction sampling
pub mod selection;
