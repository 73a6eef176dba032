//! bitmorph-morph - binary morphology on packed 1-bit images
//!
//! This crate provides:
//!
//! - Structuring elements ([`Sel`]) with hit and miss masks, parsed from
//!   text or built as rectangles, discs and lines
//! - Rectangle erosion, dilation, opening and closing in `O(log R)` blits
//!   through one of three [`Decomposition`](bitmorph_core::Decomposition)s
//! - Erosion and dilation by arbitrary elements through run decomposition
//! - Hit-and-miss transform and connectivity-preserving thinning
//! - Circle, rotated-rectangle and line elements
//! - Brute-force references with one blit per element pixel
//!
//! Every operation is a method on [`Morphology`], which carries the
//! compositing strategy and decomposition. The free functions copy their
//! input and run with the process-wide defaults.

pub mod brute;
mod error;
pub mod mask;
pub mod morphology;
pub mod rect;
pub mod sel;
pub mod shapes;
pub mod thin;

pub use error::{MorphError, MorphResult};
pub use morphology::{Axis, MorphOp, Morphology};
pub use sel::{Run, RunDecomposition, Sel};

pub use brute::{dilate_mask_brute, dilate_rect_brute, erode_mask_brute, erode_rect_brute};
pub use mask::{close_mask, dilate_mask, erode_mask, hit_miss, hit_miss_masks, open_mask};
pub use rect::{close_rect, dilate_rect, erode_rect, open_rect};
pub use shapes::{
    close_circ, close_line, close_line_mask, close_rrect, dilate_circ, dilate_line,
    dilate_line_mask, dilate_rrect, erode_circ, erode_line, erode_line_mask, erode_rrect,
    open_circ, open_line, open_line_mask, open_rrect,
};
pub use thin::{thin, thin_to_skeleton, thinning_sels};
