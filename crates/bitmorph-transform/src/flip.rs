//! Mirror images along either axis

use crate::transpose::{transpose, transpose_in_place};
use bitmorph_core::BitImage;

/// Reverse the row order in place: row `i` swaps with row `width - 1 - i`.
pub fn flip_v_in_place(image: &mut BitImage) {
    let n = image.width();
    for i in 0..n / 2 {
        image.swap_lines(i, n - 1 - i);
    }
}

/// Copy of `image` with the row order reversed.
pub fn flip_v(image: &BitImage) -> BitImage {
    let mut out = image.clone();
    flip_v_in_place(&mut out);
    out
}

/// Reverse the bits of every row in place.
///
/// Done as transpose, row flip, transpose.
pub fn flip_h_in_place(image: &mut BitImage) {
    transpose_in_place(image);
    flip_v_in_place(image);
    transpose_in_place(image);
}

/// Copy of `image` with the bits of every row reversed.
pub fn flip_h(image: &BitImage) -> BitImage {
    let mut out = transpose(image);
    flip_v_in_place(&mut out);
    transpose_in_place(&mut out);
    out
}
