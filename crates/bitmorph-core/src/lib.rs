//! bitmorph core - packed binary images and compositing
//!
//! This crate provides the storage and compositing layer the morphology
//! and transform crates are built on:
//!
//! - [`BitImage`] - one bit per pixel, rows of `u32` words
//! - [`BitSrc`] / [`BitSnk`] - sequential read / write bit cursors
//! - [`LineBlit`] - row compositing strategies ([`BitwiseLineBlit`],
//!   [`WordwiseLineBlit`])
//! - [`Blitter`] - 2D compositing at a pixel offset with boundary filling
//! - [`config`] - process-wide default strategies
//! - conversion to and from `ndarray` byte and float arrays

pub mod bithacks;
pub mod bitmap;
pub mod config;
pub mod error;

pub use bitmap::{
    BitImage, BitSnk, BitSrc, BitwiseLineBlit, BlitOp, Blitter, Boundary, LineBlit,
    RunLengthHistogram, WordwiseLineBlit, total_blit_count,
};
pub use config::{Decomposition, LineBlitKind};
pub use error::{Error, Result};
