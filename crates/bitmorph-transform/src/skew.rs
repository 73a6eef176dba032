//! Row skew (shear)
//!
//! Row `i` is shifted along the bit axis by an integer offset that grows
//! linearly with `i - center`. Bits shifted out of the row are lost and the
//! vacated bits are cleared.

use crate::{TransformError, TransformResult};
use bitmorph_core::config;
use bitmorph_core::{BitImage, BitSnk, BlitOp, LineBlit};

/// Offset applied to row `i`.
///
/// The forward skew rounds `slope * (i - center)` down; the backward skew
/// rounds it up. A forward skew by `s` followed by a backward skew by `-s`
/// with the same center therefore moves every surviving bit back where it
/// started.
pub fn skew_offset(i: usize, slope: f64, center: f64, backwards: bool) -> isize {
    let x = slope * (i as f64 - center);
    if backwards {
        x.ceil() as isize
    } else {
        x.floor() as isize
    }
}

/// Skew `image` in place with an explicit row strategy.
///
/// After the call, `image(i, j)` holds what `image(i, j - offset(i))` held
/// before.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if `slope` or `center` is
/// not finite.
pub fn skew_with(
    line: &dyn LineBlit,
    image: &mut BitImage,
    slope: f64,
    center: f64,
    backwards: bool,
) -> TransformResult<()> {
    if !slope.is_finite() || !center.is_finite() {
        return Err(TransformError::InvalidParameters(format!(
            "skew needs a finite slope and center, got {slope} and {center}"
        )));
    }
    let (width, bits) = image.dims();
    for i in 0..width {
        let offset = skew_offset(i, slope, center, backwards);
        if offset == 0 {
            continue;
        }
        let row = image.line_mut(i);
        line.blit_row_in_place(row, bits, offset, BlitOp::Set);
        let vacated = offset.unsigned_abs().min(bits);
        let start = if offset > 0 { 0 } else { bits - vacated };
        BitSnk::new(row, bits, start).put_run(vacated, false);
    }
    Ok(())
}

/// Skew `image` in place using the default row strategy.
pub fn skew(image: &mut BitImage, slope: f64, center: f64, backwards: bool) -> TransformResult<()> {
    let line = config::default_line_blit().create();
    skew_with(line.as_ref(), image, slope, center, backwards)
}
