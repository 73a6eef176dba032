//! bitmorph-transform - geometric transforms of packed 1-bit images
//!
//! - [`transpose`] via 32x32 block bit transposition
//! - [`flip_v`] (row order) and [`flip_h`] (bit order, built from transposes)
//! - [`rotate_rect`] for multiples of 90 degrees
//! - [`skew`], a per-row integer shear
//! - [`rotate`], three-shear rotation by an arbitrary angle
//!
//! Skew and rotation composite rows through a
//! [`LineBlit`](bitmorph_core::LineBlit); the `_with` variants take one
//! explicitly, the plain functions use the process-wide default.

mod error;
pub mod flip;
pub mod rotate;
pub mod skew;
pub mod transpose;

pub use error::{TransformError, TransformResult};
pub use flip::{flip_h, flip_h_in_place, flip_v, flip_v_in_place};
pub use rotate::{
    reduce_angle, rotate, rotate_quarters_in_place, rotate_rect, rotate_rect_in_place,
    rotate_with,
};
pub use skew::{skew, skew_offset, skew_with};
pub use transpose::{transpose, transpose_in_place, transpose_into};
