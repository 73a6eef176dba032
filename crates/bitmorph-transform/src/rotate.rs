//! Rotation by quarter turns and by arbitrary angles
//!
//! Quarter turns are compositions of [`flip_v`](crate::flip_v) and
//! [`transpose`](crate::transpose) and are exact. A rotation by 90 degrees
//! maps pixel `(i, j)` of a `W x H` image to `(j, W - 1 - i)`.
//!
//! Arbitrary angles first take out whole quarter turns so the remainder lies
//! in `(-pi/4, pi/4]`, then apply the three-shear decomposition
//!
//! ```text
//! skew(-tan(a/2)), transpose, skew(sin a), transpose, skew(-tan(a/2))
//! ```
//!
//! which maps `(u, v)` to `(u cos a + v sin a, -u sin a + v cos a)` about
//! the image center. Pixels carried past the edges are lost.

use crate::flip::flip_v_in_place;
use crate::skew::skew_with;
use crate::transpose::transpose_in_place;
use crate::{TransformError, TransformResult};
use bitmorph_core::config;
use bitmorph_core::{BitImage, LineBlit};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

/// Rotate in place by `quarters` quarter turns (any sign).
pub fn rotate_quarters_in_place(image: &mut BitImage, quarters: i32) {
    match quarters.rem_euclid(4) {
        1 => {
            flip_v_in_place(image);
            transpose_in_place(image);
        }
        2 => {
            for _ in 0..2 {
                flip_v_in_place(image);
                transpose_in_place(image);
            }
        }
        3 => {
            transpose_in_place(image);
            flip_v_in_place(image);
        }
        _ => {}
    }
}

/// Rotated copy of `image` for a multiple of 90 degrees.
///
/// Negative angles and angles of a full turn or more are accepted:
/// `-90` is the same as `270`.
///
/// # Errors
///
/// Returns [`TransformError::InvalidAngle`] if `degrees` is not a multiple
/// of 90.
pub fn rotate_rect(image: &BitImage, degrees: i32) -> TransformResult<BitImage> {
    let mut out = image.clone();
    rotate_rect_in_place(&mut out, degrees)?;
    Ok(out)
}

/// In-place form of [`rotate_rect`].
pub fn rotate_rect_in_place(image: &mut BitImage, degrees: i32) -> TransformResult<()> {
    if degrees % 90 != 0 {
        return Err(TransformError::InvalidAngle(degrees));
    }
    rotate_quarters_in_place(image, degrees / 90);
    Ok(())
}

/// Split `radians` into whole quarter turns in `0..4` and a remainder in
/// `(-pi/4, pi/4]`.
///
/// The angle is first taken modulo a full turn, so any finite value is
/// reduced in constant time.
pub fn reduce_angle(radians: f64) -> (i32, f64) {
    let turn = radians.rem_euclid(TAU);
    let q = (turn / FRAC_PI_2).round();
    let mut a = turn - q * FRAC_PI_2;
    let mut quarters = q as i32;
    // rounding can leave the remainder just outside the half-open range
    if a <= -FRAC_PI_4 {
        a += FRAC_PI_2;
        quarters -= 1;
    } else if a > FRAC_PI_4 {
        a -= FRAC_PI_2;
        quarters += 1;
    }
    (quarters.rem_euclid(4), a)
}

/// Rotate in place by `radians` using an explicit row strategy.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if the angle is not finite.
pub fn rotate_with(line: &dyn LineBlit, image: &mut BitImage, radians: f64) -> TransformResult<()> {
    if !radians.is_finite() {
        return Err(TransformError::InvalidParameters(format!(
            "rotation angle must be finite, got {radians}"
        )));
    }
    let (quarters, a) = reduce_angle(radians);
    log::trace!("rotate {radians}: {quarters} quarter turns then {a}");
    rotate_quarters_in_place(image, quarters);
    // remainders left over from reducing exact quarter turns
    if a.abs() < 1e-12 {
        return Ok(());
    }
    let xshear = -(a / 2.0).tan();
    let yshear = a.sin();
    let center = |img: &BitImage| (img.width() / 2) as f64;
    skew_with(line, image, xshear, center(image), false)?;
    transpose_in_place(image);
    skew_with(line, image, yshear, center(image), false)?;
    transpose_in_place(image);
    skew_with(line, image, xshear, center(image), false)?;
    Ok(())
}

/// Rotate in place by `radians` using the default row strategy.
pub fn rotate(image: &mut BitImage, radians: f64) -> TransformResult<()> {
    let line = config::default_line_blit().create();
    rotate_with(line.as_ref(), image, radians)
}
