//! Error types for bitmorph-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] bitmorph_core::Error),

    /// Error from a geometric transform used internally
    #[error("transform error: {0}")]
    Transform(#[from] bitmorph_transform::TransformError),

    /// Invalid structuring element
    #[error("invalid structuring element: {0}")]
    InvalidSel(String),

    /// Unexpected character in structuring element text
    #[error("invalid structuring element: unexpected {ch:?} at line {line}, column {column}")]
    SelSyntax {
        ch: char,
        line: usize,
        column: usize,
    },

    /// A pixel is both a hit and a miss
    #[error("hit and miss masks overlap at ({i}, {j})")]
    OverlappingHitMiss { i: usize, j: usize },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
