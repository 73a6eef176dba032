//! Brute-force references
//!
//! One blit per element pixel. These exist to check the decompositions
//! against; they follow the same centering and boundary rules, so results
//! must match bit for bit.

use crate::morphology::{MorphOp, Morphology};
use crate::rect::{dilate_offset, erode_offset};
use crate::sel::Sel;
use bitmorph_core::{BitImage, Boundary};

impl Morphology {
    fn rect_brute(&mut self, image: &mut BitImage, rx: usize, ry: usize, op: MorphOp) {
        let (rx, ry) = (rx.max(1), ry.max(1));
        let (ox, oy) = match op {
            MorphOp::Erode => (erode_offset(rx), erode_offset(ry)),
            MorphOp::Dilate => (dilate_offset(rx), dilate_offset(ry)),
        };
        let source = image.clone();
        image.fill(op.identity());
        for kx in 0..rx as isize {
            for ky in 0..ry as isize {
                self.blitter
                    .blit(image, &source, ox + kx, oy + ky, op.blit_op(), Boundary::Keep);
            }
        }
    }

    /// Erosion by a centered `rx x ry` rectangle, one blit per pixel.
    pub fn erode_rect_brute(&mut self, image: &mut BitImage, rx: usize, ry: usize) {
        self.rect_brute(image, rx, ry, MorphOp::Erode);
    }

    /// Dilation by a centered `rx x ry` rectangle, one blit per pixel.
    pub fn dilate_rect_brute(&mut self, image: &mut BitImage, rx: usize, ry: usize) {
        self.rect_brute(image, rx, ry, MorphOp::Dilate);
    }

    fn mask_brute(&mut self, image: &mut BitImage, sel: &Sel, op: MorphOp) {
        let source = image.clone();
        image.fill(op.identity());
        for (bi, bj) in sel.hit_offsets() {
            // erosion reads in(p + b), dilation in(p - b)
            let (dx, dy) = match op {
                MorphOp::Erode => (-bi, -bj),
                MorphOp::Dilate => (bi, bj),
            };
            self.blitter
                .blit(image, &source, dx, dy, op.blit_op(), Boundary::Keep);
        }
    }

    /// Erosion by the hits of `sel`, one blit per hit.
    pub fn erode_mask_brute(&mut self, image: &mut BitImage, sel: &Sel) {
        self.mask_brute(image, sel, MorphOp::Erode);
    }

    /// Dilation by the hits of `sel`, one blit per hit.
    pub fn dilate_mask_brute(&mut self, image: &mut BitImage, sel: &Sel) {
        self.mask_brute(image, sel, MorphOp::Dilate);
    }
}

/// Reference rectangle erosion with the default context.
pub fn erode_rect_brute(image: &BitImage, rx: usize, ry: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().erode_rect_brute(&mut out, rx, ry);
    out
}

/// Reference rectangle dilation with the default context.
pub fn dilate_rect_brute(image: &BitImage, rx: usize, ry: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().dilate_rect_brute(&mut out, rx, ry);
    out
}

/// Reference erosion by `sel` with the default context.
pub fn erode_mask_brute(image: &BitImage, sel: &Sel) -> BitImage {
    let mut out = image.clone();
    Morphology::default().erode_mask_brute(&mut out, sel);
    out
}

/// Reference dilation by `sel` with the default context.
pub fn dilate_mask_brute(image: &BitImage, sel: &Sel) -> BitImage {
    let mut out = image.clone();
    Morphology::default().dilate_mask_brute(&mut out, sel);
    out
}
