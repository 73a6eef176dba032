//! Error types for bitmorph-core
//!
//! Caller mistakes (bad coordinates, mismatched sizes, unknown strategy
//! selectors) come back as [`Error`] values. Overrunning a bit cursor or
//! indexing a row that does not exist is an engine bug and panics instead.

use thiserror::Error;

/// bitmorph error type
#[derive(Error, Debug)]
pub enum Error {
    /// Pixel coordinate outside the image
    #[error("pixel ({i}, {j}) outside {width}x{height} image")]
    PixelOutOfBounds {
        i: usize,
        j: usize,
        width: usize,
        height: usize,
    },

    /// Two images that must have equal sizes do not
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Strategy selector outside the known range
    #[error("unknown {kind} strategy: {index}")]
    UnknownStrategy { kind: &'static str, index: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for bitmorph-core operations
pub type Result<T> = std::result::Result<T, Error>;
