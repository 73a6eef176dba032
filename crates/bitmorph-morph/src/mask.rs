//! Morphology by arbitrary structuring elements
//!
//! The hit mask of a [`Sel`] is split into maximal runs along the second
//! coordinate. A working copy of the image is doubled in place (`w = 1, 2,
//! 4, ...`) so that after each step it holds the operator applied over `w`
//! consecutive pixels. Every run with `w <= len < 2w` is then covered by
//! at most two blits of that working copy, one flush with each end of the
//! run. The blit count grows with the number of runs plus `log2` of the
//! longest one, not with the number of element pixels.
//!
//! Hit-and-miss erodes the image by the hits and its complement by the
//! misses, and keeps the pixels where both match.

use crate::morphology::{MorphOp, Morphology};
use crate::sel::{RunDecomposition, Sel};
use crate::MorphResult;
use bitmorph_core::{BitImage, BlitOp, Boundary};

impl Morphology {
    /// Erode or dilate `image` by the runs of an element with center
    /// `(cx, cy)`.
    fn run_op(
        &mut self,
        image: &mut BitImage,
        runs: &RunDecomposition,
        center: (usize, usize),
        op: MorphOp,
    ) {
        let (cx, cy) = (center.0 as isize, center.1 as isize);
        let mut work = image.take();
        *image = BitImage::with_size(work.width(), work.height());
        image.fill(op.identity());

        let mut width = 1usize;
        loop {
            let w = width as isize;
            for run in runs.in_bucket(width) {
                let (i, s, e) = (run.i as isize, run.start as isize, run.end as isize);
                let placements = match op {
                    MorphOp::Erode => [(cx - i, cy - s - w + 1), (cx - i, cy - e + 1)],
                    MorphOp::Dilate => [(i - cx, s - cy), (i - cx, e - w - cy)],
                };
                let n = if run.length() == width { 1 } else { 2 };
                for &(dx, dy) in &placements[..n] {
                    self.blitter
                        .blit(image, &work, dx, dy, op.blit_op(), Boundary::Keep);
                }
            }
            if runs.max_len < 2 * width {
                break;
            }
            self.blitter
                .blit_self(&mut work, 0, w, op.blit_op(), Boundary::Keep);
            width *= 2;
        }
        log::trace!(
            "{:?} by {} runs up to length {}",
            op,
            runs.runs.len(),
            runs.max_len
        );
    }

    /// Erode or dilate by the hits of `sel` through its run decomposition.
    pub fn mask_op(&mut self, image: &mut BitImage, sel: &Sel, op: MorphOp) {
        if sel.hit_count() == 0 {
            log::debug!("element has no hits; {:?} fills with the identity", op);
        }
        let runs = sel.runs();
        self.run_op(image, &runs, sel.center(), op);
    }

    /// Erode by the hits of `sel` using its run decomposition.
    pub fn erode_mask(&mut self, image: &mut BitImage, sel: &Sel) {
        self.mask_op(image, sel, MorphOp::Erode);
    }

    /// Dilate by the hits of `sel` using its run decomposition.
    pub fn dilate_mask(&mut self, image: &mut BitImage, sel: &Sel) {
        self.mask_op(image, sel, MorphOp::Dilate);
    }

    /// Erode then dilate by `sel`.
    pub fn open_mask(&mut self, image: &mut BitImage, sel: &Sel) {
        self.erode_mask(image, sel);
        self.dilate_mask(image, sel);
    }

    /// Dilate then erode by `sel`.
    pub fn close_mask(&mut self, image: &mut BitImage, sel: &Sel) {
        self.dilate_mask(image, sel);
        self.erode_mask(image, sel);
    }

    /// Keep the pixels where every hit of `sel` lands on foreground and
    /// every miss on background. Pixels outside the image are background.
    pub fn hit_miss(&mut self, image: &mut BitImage, sel: &Sel) {
        let mut misses = image.clone();
        misses.invert();
        self.run_op(&mut misses, &sel.miss_runs(), sel.center(), MorphOp::Erode);

        self.run_op(image, &sel.runs(), sel.center(), MorphOp::Erode);
        clear_unreachable(image, &sel.hit_offsets());

        self.blitter
            .blit(image, &misses, 0, 0, BlitOp::And, Boundary::Keep);
    }
}

/// Clear the pixels for which some offset in `offsets` lands outside the
/// image; erosion counted those as matching.
fn clear_unreachable(image: &mut BitImage, offsets: &[(isize, isize)]) {
    let Some(&(i0, j0)) = offsets.first() else {
        return;
    };
    let (mut lo_i, mut hi_i, mut lo_j, mut hi_j) = (i0, i0, j0, j0);
    for &(i, j) in offsets {
        lo_i = lo_i.min(i);
        hi_i = hi_i.max(i);
        lo_j = lo_j.min(j);
        hi_j = hi_j.max(j);
    }
    let (w, h) = image.dims();
    let (wi, hi) = (w as isize, h as isize);
    if lo_i < 0 {
        image.set_rect(0, 0, (-lo_i) as usize, h, false);
    }
    if hi_i > 0 {
        image.set_rect(wi - hi_i, 0, hi_i as usize, h, false);
    }
    if lo_j < 0 {
        image.set_rect(0, 0, w, (-lo_j) as usize, false);
    }
    if hi_j > 0 {
        image.set_rect(0, hi - hi_j, w, hi_j as usize, false);
    }
}

/// Erosion by `sel` with the default context.
pub fn erode_mask(image: &BitImage, sel: &Sel) -> BitImage {
    let mut out = image.clone();
    Morphology::default().erode_mask(&mut out, sel);
    out
}

/// Dilation by `sel` with the default context.
pub fn dilate_mask(image: &BitImage, sel: &Sel) -> BitImage {
    let mut out = image.clone();
    Morphology::default().dilate_mask(&mut out, sel);
    out
}

/// Opening by `sel` with the default context.
pub fn open_mask(image: &BitImage, sel: &Sel) -> BitImage {
    let mut out = image.clone();
    Morphology::default().open_mask(&mut out, sel);
    out
}

/// Closing by `sel` with the default context.
pub fn close_mask(image: &BitImage, sel: &Sel) -> BitImage {
    let mut out = image.clone();
    Morphology::default().close_mask(&mut out, sel);
    out
}

/// Hit-and-miss transform with the default context.
pub fn hit_miss(image: &BitImage, sel: &Sel) -> BitImage {
    let mut out = image.clone();
    Morphology::default().hit_miss(&mut out, sel);
    out
}

/// Hit-and-miss with an element built from separate hit and miss masks,
/// centered at `(w / 2, h / 2)`.
///
/// # Errors
///
/// The masks must have the same size and must not share a pixel.
pub fn hit_miss_masks(image: &BitImage, hit: BitImage, miss: BitImage) -> MorphResult<BitImage> {
    let sel = Sel::from_masks(hit, miss)?;
    Ok(hit_miss(image, &sel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MorphError;
    use bitmorph_core::{Decomposition, LineBlitKind};

    fn dot(w: usize, h: usize, i: usize, j: usize) -> BitImage {
        let mut img = BitImage::with_size(w, h);
        img.set(i, j, true).unwrap();
        img
    }

    #[test]
    fn test_dilate_dot_by_square() {
        let img = dot(8, 8, 3, 3);
        let out = dilate_mask(&img, &Sel::rect(3, 3));
        assert_eq!(out.count(), 9);
        assert_eq!(out.count_rect(2, 2, 3, 3), 9);
    }

    #[test]
    fn test_long_run_uses_few_blits() {
        let mut m = Morphology::new(LineBlitKind::Wordwise, Decomposition::Telescope);
        let mut img = BitImage::with_size(4, 200);
        let sel = Sel::rect(1, 100);
        m.dilate_mask(&mut img, &sel);
        // 6 doublings, two placements of the 64-wide copy
        assert_eq!(m.blit_count(), 8);
    }

    #[test]
    fn test_mask_matches_brute_on_plus() {
        let sel = Sel::parse(" + \n+++\n + \n").unwrap();
        let mut img = BitImage::with_size(9, 9);
        img.set_rect(2, 2, 4, 3, true);
        img.set(8, 0, true).unwrap();
        assert_eq!(dilate_mask(&img, &sel), crate::brute::dilate_mask_brute(&img, &sel));
        assert_eq!(erode_mask(&img, &sel), crate::brute::erode_mask_brute(&img, &sel));
    }

    #[test]
    fn test_empty_element_gives_identity_fill() {
        let img = dot(5, 5, 1, 1);
        let sel = Sel::from_hits(BitImage::with_size(3, 3));
        assert_eq!(dilate_mask(&img, &sel).count(), 0);
        assert_eq!(erode_mask(&img, &sel).count(), 25);
    }

    #[test]
    fn test_hit_miss_finds_isolated_pixels() {
        let sel = Sel::parse_hit_miss("---\n-+-\n---\n").unwrap();
        let mut img = BitImage::with_size(6, 6);
        img.set(1, 1, true).unwrap();
        img.set_rect(3, 3, 2, 2, true);
        img.set(5, 0, true).unwrap();
        let out = hit_miss(&img, &sel);
        assert_eq!(out.get(1, 1), Some(true));
        // misses beyond the edge count as background
        assert_eq!(out.get(5, 0), Some(true));
        assert_eq!(out.count(), 2);
    }

    #[test]
    fn test_hit_outside_never_matches() {
        let sel = Sel::parse("++\n").unwrap().with_center(0, 0);
        let mut img = BitImage::with_size(3, 2);
        img.fill(true);
        let out = hit_miss(&img, &sel);
        // the hit at offset (1, 0) falls off the last row
        assert_eq!(out.count_rect(2, 0, 1, 2), 0);
        assert_eq!(out.count(), 4);
    }

    #[test]
    fn test_hit_miss_masks_rejects_overlap() {
        let mut hit = BitImage::with_size(3, 3);
        hit.set(1, 1, true).unwrap();
        let miss = hit.clone();
        let err = hit_miss_masks(&BitImage::with_size(4, 4), hit, miss).unwrap_err();
        assert!(matches!(err, MorphError::OverlappingHitMiss { i: 1, j: 1 }));
    }
}
