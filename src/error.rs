//! Error types for the BigDiff library
//!
//! This module defines all error types that can occur during a comparison
//! run. Errors are designed to be informative and actionable: input
//! validation failures carry the offending paths, and pattern/size parsing
//! failures echo the rejected input.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the BigDiff library
pub type Result<T> = std::result::Result<T, BigDiffError>;

/// Main error type for all BigDiff operations
#[derive(Debug, Error)]
pub enum BigDiffError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An input root is missing or is not a directory
    #[error("Input root is not a directory: {path:?}")]
    InputNotADirectory {
        /// Path that failed validation
        path: PathBuf,
    },

    /// Base and target roots resolve to the same directory
    #[error("Base and target must be different directories: {path:?}")]
    SameInputRoots {
        /// The shared path
        path: PathBuf,
    },

    /// The output root is equal to, or nested inside, an input root
    #[error("Output root {output:?} is contained in input root {input:?}")]
    OutputInsideInput {
        /// Configured output root
        output: PathBuf,
        /// The input root that contains it
        input: PathBuf,
    },

    /// An ignore pattern failed to compile as a glob
    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Underlying glob compilation error
        source: globset::Error,
    },

    /// A size string could not be parsed into a byte count
    #[error("Invalid size value: '{0}'")]
    InvalidSize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BigDiffError::OutputInsideInput {
            output: PathBuf::from("/a/out"),
            input: PathBuf::from("/a"),
        };
        let msg = err.to_string();
        assert!(msg.contains("out"));
        assert!(msg.contains("contained"));

        let err = BigDiffError::InvalidSize("5XB".to_string());
        assert!(err.to_string().contains("5XB"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BigDiffError = io.into();
        assert!(matches!(err, BigDiffError::Io(_)));
    }
}
