//! Rectangle morphology by logarithmic decomposition
//!
//! A line element of length `R` along one axis is the union (dilation) or
//! intersection (erosion) of `R` shifted copies of the image. Every
//! [`Decomposition`] builds that from `O(log R)` blits by composing a
//! working image with itself at doubling offsets:
//!
//! - **telescope**: double a mask until it spans at least `R / 2`, then
//!   combine it into the result twice, at `0` and at `R - width`
//! - **bit pattern**: walk the bits of `R`; for each set bit combine the
//!   current mask into the result at the running offset
//! - **shifted**: shift the image itself into place, then double in place
//!
//! A line operation at offset `d` leaves `image(p)` holding the operator
//! applied to `image(p - d - k)` for `k` in `0..R`. Pixels outside the image
//! act as the operator's identity, so all three agree bit for bit.
//!
//! Erosion of length `R` reads `[-R/2, (R-1)/2]` around each pixel, and
//! dilation the reflected range, so opening never adds pixels and closing
//! never removes them, for even `R` as well as odd.

use crate::morphology::{Axis, MorphOp, Morphology};
use bitmorph_core::{BitImage, BlitOp, Decomposition};

/// Offset of a centered erosion of length `r`.
#[inline]
pub(crate) fn erode_offset(r: usize) -> isize {
    -(((r as isize) - 1) / 2)
}

/// Offset of a centered dilation of length `r`.
#[inline]
pub(crate) fn dilate_offset(r: usize) -> isize {
    -((r as isize) / 2)
}

impl Morphology {
    /// Combine `r` shifted copies of `image` along `axis`:
    /// `image(p) = op over k in 0..r of image(p - (offset + k))`.
    ///
    /// `r == 0` leaves the image unchanged.
    pub fn rect_op_line(
        &mut self,
        image: &mut BitImage,
        axis: Axis,
        op: MorphOp,
        r: usize,
        offset: isize,
    ) {
        if r == 0 {
            log::debug!("line {:?} of length 0 skipped", op);
            return;
        }
        let before = self.blit_count();
        match self.decomposition() {
            Decomposition::Telescope => self.line_telescope(image, axis, op, r, offset),
            Decomposition::BitPattern => self.line_bit_pattern(image, axis, op, r, offset),
            Decomposition::Shifted => self.line_shifted(image, axis, op, r, offset),
        }
        log::trace!(
            "{:?} line of {} along {:?} took {} blits ({})",
            op,
            r,
            axis,
            self.blit_count() - before,
            self.decomposition()
        );
    }

    /// Move the pixels into a mask and reset `image` to the identity.
    fn start_accumulator(image: &mut BitImage, op: MorphOp) -> BitImage {
        let mask = image.take();
        *image = BitImage::with_size(mask.width(), mask.height());
        image.fill(op.identity());
        mask
    }

    fn line_telescope(
        &mut self,
        image: &mut BitImage,
        axis: Axis,
        op: MorphOp,
        r: usize,
        d: isize,
    ) {
        let mut mask = Self::start_accumulator(image, op);
        let mut width = 1;
        while 2 * width < r {
            self.combine_self(&mut mask, axis, width as isize, op);
            width *= 2;
        }
        self.combine(image, &mask, axis, d, op);
        if r > width {
            self.combine(image, &mask, axis, (r - width) as isize + d, op);
        }
    }

    fn line_bit_pattern(
        &mut self,
        image: &mut BitImage,
        axis: Axis,
        op: MorphOp,
        r: usize,
        d: isize,
    ) {
        let mut mask = Self::start_accumulator(image, op);
        let mut rest = r;
        let mut width = 1usize;
        let mut at = 0isize;
        loop {
            if rest & width != 0 {
                self.combine(image, &mask, axis, at + d, op);
                at += width as isize;
            }
            rest &= !width;
            if rest == 0 {
                break;
            }
            self.combine_self(&mut mask, axis, width as isize, op);
            width <<= 1;
        }
    }

    fn line_shifted(&mut self, image: &mut BitImage, axis: Axis, op: MorphOp, r: usize, d: isize) {
        if d != 0 {
            let (dx, dy) = axis.offset(d);
            self.blitter
                .blit_self(image, dx, dy, BlitOp::Set, op.identity_boundary());
        }
        let mut width = 1;
        while 2 * width < r {
            self.combine_self(image, axis, width as isize, op);
            width *= 2;
        }
        if r > width {
            self.combine_self(image, axis, (r - width) as isize, op);
        }
    }

    /// Erode by a centered `rx x ry` rectangle. Sizes of 0 or 1 leave that
    /// axis alone.
    pub fn erode_rect(&mut self, image: &mut BitImage, rx: usize, ry: usize) {
        if rx > 1 {
            self.rect_op_line(image, Axis::X, MorphOp::Erode, rx, erode_offset(rx));
        }
        if ry > 1 {
            self.rect_op_line(image, Axis::Y, MorphOp::Erode, ry, erode_offset(ry));
        }
    }

    /// Dilate by a centered `rx x ry` rectangle.
    pub fn dilate_rect(&mut self, image: &mut BitImage, rx: usize, ry: usize) {
        if rx > 1 {
            self.rect_op_line(image, Axis::X, MorphOp::Dilate, rx, dilate_offset(rx));
        }
        if ry > 1 {
            self.rect_op_line(image, Axis::Y, MorphOp::Dilate, ry, dilate_offset(ry));
        }
    }

    /// Erode then dilate.
    pub fn open_rect(&mut self, image: &mut BitImage, rx: usize, ry: usize) {
        self.erode_rect(image, rx, ry);
        self.dilate_rect(image, rx, ry);
    }

    /// Dilate then erode.
    pub fn close_rect(&mut self, image: &mut BitImage, rx: usize, ry: usize) {
        self.dilate_rect(image, rx, ry);
        self.erode_rect(image, rx, ry);
    }
}

/// Erosion by a centered `rx x ry` rectangle with the default context.
pub fn erode_rect(image: &BitImage, rx: usize, ry: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().erode_rect(&mut out, rx, ry);
    out
}

/// Dilation by a centered `rx x ry` rectangle with the default context.
pub fn dilate_rect(image: &BitImage, rx: usize, ry: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().dilate_rect(&mut out, rx, ry);
    out
}

/// Opening by a centered `rx x ry` rectangle with the default context.
pub fn open_rect(image: &BitImage, rx: usize, ry: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().open_rect(&mut out, rx, ry);
    out
}

/// Closing by a centered `rx x ry` rectangle with the default context.
pub fn close_rect(image: &BitImage, rx: usize, ry: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().close_rect(&mut out, rx, ry);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitmorph_core::LineBlitKind;

    fn dot(w: usize, h: usize, i: usize, j: usize) -> BitImage {
        let mut img = BitImage::with_size(w, h);
        img.set(i, j, true).unwrap();
        img
    }

    #[test]
    fn test_offsets() {
        assert_eq!(erode_offset(1), 0);
        assert_eq!(erode_offset(4), -1);
        assert_eq!(erode_offset(5), -2);
        assert_eq!(dilate_offset(4), -2);
        assert_eq!(dilate_offset(5), -2);
    }

    #[test]
    fn test_dilate_dot_every_decomposition() {
        for d in Decomposition::ALL {
            let mut m = Morphology::new(LineBlitKind::Wordwise, d);
            let mut img = dot(20, 40, 10, 20);
            m.dilate_rect(&mut img, 5, 3);
            assert_eq!(img.count(), 15, "{d}");
            assert_eq!(img.count_rect(8, 19, 5, 3), 15, "{d}");
        }
    }

    #[test]
    fn test_even_dilation_is_reflected_erosion_window() {
        // dilation of length 4 covers source offsets -1..=2, so the dot
        // spreads over p - 2 ..= p + 1
        let mut img = dot(1, 40, 0, 20);
        Morphology::new(LineBlitKind::Bitwise, Decomposition::Telescope)
            .dilate_rect(&mut img, 1, 4);
        assert_eq!(img.count_rect(0, 18, 1, 4), 4);
        assert_eq!(img.count(), 4);
    }

    #[test]
    fn test_erosion_treats_outside_as_set() {
        let mut img = BitImage::with_size(6, 6);
        img.fill(true);
        for d in Decomposition::ALL {
            let mut out = img.clone();
            Morphology::new(LineBlitKind::Wordwise, d).erode_rect(&mut out, 5, 5);
            assert_eq!(out, img, "{d}");
        }
    }

    #[test]
    fn test_line_length_zero_and_one() {
        let img = dot(5, 5, 2, 2);
        let mut m = Morphology::default();
        let mut out = img.clone();
        m.rect_op_line(&mut out, Axis::X, MorphOp::Erode, 0, 3);
        assert_eq!(out, img);
        m.rect_op_line(&mut out, Axis::Y, MorphOp::Dilate, 1, 1);
        assert_eq!(out, dot(5, 5, 2, 3));
    }

    #[test]
    fn test_blit_count_is_logarithmic() {
        let mut m = Morphology::new(LineBlitKind::Wordwise, Decomposition::Telescope);
        let mut img = BitImage::with_size(8, 300);
        m.rect_op_line(&mut img, Axis::Y, MorphOp::Dilate, 200, 0);
        // 7 doublings + 2 combines
        assert_eq!(m.blit_count(), 9);
    }
}
