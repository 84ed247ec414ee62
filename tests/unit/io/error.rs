//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use chunkwalk::LayoutError;
    use chunkwalk::io::error::{
        WithChunkContext, computation_error, generation_failure, invalid_parameter,
    };
    use chunkwalk::spatial::coordinate::Coordinate;
    use std::error::Error;

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = LayoutError::FileSystem {
            path: "/tmp/layout.png".into(),
            operation: "create file",
            source: io_error,
        };

        assert!(error.source().is_some());
        assert!(generation_failure(&"stuck").source().is_none());
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("chunk_width", &2, &"too small");

        assert!(error.is_configuration_error());
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'chunk_width' = '2': too small"
        );
    }

    // Tests generation failures mention the chunk when known
    // Verified by always printing the positionless form
    #[test]
    fn test_generation_failure_display() {
        let bare = generation_failure(&"no remaining paths");
        assert!(bare.is_generation_failure());
        assert_eq!(bare.to_string(), "Generation failed: no remaining paths");

        let placed = LayoutError::GenerationFailure {
            chunk: Some(Coordinate::new(-1, 3)),
            reason: "no remaining paths".to_string(),
        };
        assert_eq!(
            placed.to_string(),
            "Generation failed in chunk (-1, 3): no remaining paths"
        );
    }

    // Tests chunk context never overwrites an existing position
    // Verified by assigning the position unconditionally
    #[test]
    fn test_chunk_context_keeps_existing_position() {
        let result: Result<(), LayoutError> = Err(LayoutError::GenerationFailure {
            chunk: Some(Coordinate::new(5, 5)),
            reason: "inner".to_string(),
        });

        let error = result
            .with_chunk(Coordinate::ZERO)
            .expect_err("error passes through");
        assert!(matches!(
            error,
            LayoutError::GenerationFailure {
                chunk: Some(Coordinate { x: 5, y: 5 }),
                ..
            }
        ));
    }

    // Tests chunk context leaves other errors untouched
    // Verified by converting every error into a generation failure
    #[test]
    fn test_chunk_context_ignores_other_errors() {
        let result: Result<(), LayoutError> = Err(LayoutError::SafetyLimitExceeded {
            operation: "path generation",
            limit: 10,
        });

        let error = result
            .with_chunk(Coordinate::ZERO)
            .expect_err("error passes through");
        assert!(error.is_safety_limit());
        assert_eq!(
            error.to_string(),
            "Safety limit of 10 iterations exceeded during path generation"
        );
    }

    // Tests computation errors carry the operation name
    // Verified by omitting the operation from the message
    #[test]
    fn test_computation_error() {
        let error = computation_error("weighted selection", &"total weight overflow");

        assert_eq!(
            error.to_string(),
            "Computation error in weighted selection: total weight overflow"
        );
        assert!(!error.is_generation_failure());
    }

    // Tests I/O errors convert into file system errors
    // Verified by mapping I/O errors to computation errors
    #[test]
    fn test_from_io_error() {
        let error = LayoutError::from(std::io::Error::other("disk full"));

        assert!(matches!(error, LayoutError::FileSystem { .. }));
    }
}
