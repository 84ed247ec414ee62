//! Error types and context management for layout generation

use crate::spatial::coordinate::Coordinate;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
#[derive(Debug)]
pub enum LayoutError {
    /// Layout parameter validation failed
    ///
    /// Raised before any random draw is taken.
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Path search or chunk placement exhausted every backtracking option
    GenerationFailure {
        /// Chunk-grid position of the chunk being generated, when known
        chunk: Option<Coordinate>,
        /// Description of what ran out
        reason: String,
    },

    /// Iteration fuse tripped
    SafetyLimitExceeded {
        /// Loop that exceeded its budget
        operation: &'static str,
        /// Configured iteration ceiling
        limit: usize,
    },

    /// Numerical computation produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl LayoutError {
    /// Whether the error rejects the configuration
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Whether the error reports exhausted backtracking
    pub const fn is_generation_failure(&self) -> bool {
        matches!(self, Self::GenerationFailure { .. })
    }

    /// Whether the error reports a tripped iteration fuse
    pub const fn is_safety_limit(&self) -> bool {
        matches!(self, Self::SafetyLimitExceeded { .. })
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::GenerationFailure { chunk, reason } => match chunk {
                Some(position) => write!(f, "Generation failed in chunk {position}: {reason}"),
                None => write!(f, "Generation failed: {reason}"),
            },
            Self::SafetyLimitExceeded { operation, limit } => {
                write!(
                    f,
                    "Safety limit of {limit} iterations exceeded during {operation}"
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Attaches the chunk being generated to failures raised below the orchestrator
pub trait WithChunkContext<T> {
    /// Fill in the chunk position of a `GenerationFailure` that lacks one
    ///
    /// # Errors
    ///
    /// Propagates the original error with the chunk position applied
    fn with_chunk(self, position: Coordinate) -> Result<T>;
}

impl<T, E> WithChunkContext<T> for std::result::Result<T, E>
where
    E: Into<LayoutError>,
{
    fn with_chunk(self, position: Coordinate) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only generation failures carry a chunk position
            if let LayoutError::GenerationFailure { chunk, .. } = &mut error
                && chunk.is_none()
            {
                *chunk = Some(position);
            }
            error
        })
    }
}

impl From<std::io::Error> for LayoutError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> LayoutError {
    LayoutError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a generation failure without chunk context
pub fn generation_failure(reason: &impl ToString) -> LayoutError {
    LayoutError::GenerationFailure {
        chunk: None,
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> LayoutError {
    LayoutError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
