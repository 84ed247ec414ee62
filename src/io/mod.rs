//! Input/output operations, configuration and error handling

/// Command-line front end
pub mod cli;
/// Algorithm constants, defaults and parameter validation
pub mod configuration;
/// Error taxonomy and context helpers
pub mod error;
/// PNG export of the world raster
pub mod image;
/// Progress display for multi-run invocations
pub mod progress;
/// Animated GIF replay of generation events
pub mod visualization;
