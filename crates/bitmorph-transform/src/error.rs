//! Error types for bitmorph-transform

use thiserror::Error;

/// Errors that can occur during geometric transformations
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] bitmorph_core::Error),

    /// Rectangle rotation by an angle that is not a multiple of 90 degrees
    #[error("rotation angle must be a multiple of 90 degrees, got {0}")]
    InvalidAngle(i32),

    /// Invalid transformation parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
