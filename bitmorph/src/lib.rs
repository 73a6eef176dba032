//! bitmorph - morphology on bit-packed binary images
//!
//! Images are stored one bit per pixel in rows of `u32` words and every
//! operation works on the packed words directly.
//!
//! # Overview
//!
//! - Packed images, bit cursors and 2D compositing ([`BitImage`],
//!   [`Blitter`])
//! - Rectangle morphology in `O(log R)` blits, arbitrary structuring
//!   elements through run decomposition, hit-and-miss and thinning
//!   ([`morph`])
//! - Transpose, flips, skew and rotation ([`transform`])
//! - PNG and PBM pass-through ([`io`])
//!
//! # Example
//!
//! ```
//! use bitmorph::BitImage;
//! use bitmorph::morph::{Sel, dilate_mask, erode_rect};
//!
//! let mut img = BitImage::with_size(8, 8);
//! img.set(3, 3, true).unwrap();
//!
//! let grown = dilate_mask(&img, &Sel::rect(3, 3));
//! assert_eq!(grown.count(), 9);
//! assert_eq!(erode_rect(&grown, 3, 3), img);
//! ```

// Re-export core types (used everywhere)
pub use bitmorph_core::*;

// Re-export the other crates as modules to avoid name conflicts
pub use bitmorph_io as io;
pub use bitmorph_morph as morph;
pub use bitmorph_transform as transform;
