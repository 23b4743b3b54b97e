//! Application error types

use std::path::PathBuf;

use thiserror::Error;

use crate::interpolation::InterpolationFailure;
use crate::ports::CodecError;

/// Application-level errors.
///
/// Collaborator failures (reading or writing a descriptor) are kept apart
/// from interpolation failures.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The descriptor could not be read.
    #[error("Failed to read descriptor: {}", path.display())]
    Read {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying codec error.
        source: CodecError,
    },

    /// Placeholder resolution recorded a fatal problem.
    #[error(transparent)]
    Interpolation(#[from] InterpolationFailure),

    /// The resolved descriptor could not be written.
    #[error("Failed to write deployable descriptor: {}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying codec error.
        source: CodecError,
    },
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
