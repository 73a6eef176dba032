//! Structuring Element (SEL) for morphological operations
//!
//! A [`Sel`] holds two disjoint masks of the same size: the *hit* pixels,
//! which must be foreground, and the *miss* pixels, which must be
//! background (only hit-and-miss uses them). The center `(cx, cy)` is the
//! element pixel placed over the pixel being computed; element pixel `e`
//! therefore looks at image offset `e - center`.
//!
//! # Text form
//!
//! ```text
//!   +
//! -++
//!  -
//! ```
//!
//! `+` is a hit, `-` a miss, space or `.` don't care; each text line is one
//! value of the second coordinate. Text column `c` is element row `i = c`
//! and the first text line is the highest `j`, so the picture reads the same
//! way as [`BitImage`]'s `Display` output.

use crate::{MorphError, MorphResult};
use bitmorph_core::{BitImage, BitSrc, BlitOp, Blitter, Boundary, LineBlitKind};
use bitmorph_transform::rotate_quarters_in_place;
use std::fmt;

const LINE_STEP: f64 = 0.3;

/// Line angles must be finite; any finite value is accepted.
pub(crate) fn finite_angle(angle: f64) -> MorphResult<f64> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(MorphError::InvalidParameters(format!(
            "line angle must be finite, got {angle}"
        )))
    }
}

/// One maximal run of hit pixels: element row `i`, bits `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub i: usize,
    pub start: usize,
    pub end: usize,
}

impl Run {
    /// Number of pixels in the run.
    #[inline]
    pub fn length(&self) -> usize {
        self.end - self.start
    }
}

/// Runs of a mask along its second coordinate, with the longest length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDecomposition {
    pub runs: Vec<Run>,
    pub max_len: usize,
}

impl RunDecomposition {
    /// Decompose every row of `mask` into maximal runs of set bits.
    pub fn of(mask: &BitImage) -> Self {
        let (width, height) = mask.dims();
        let mut runs = Vec::new();
        let mut max_len = 0;
        for i in 0..width {
            let mut src = BitSrc::new(mask.line(i), height, 0);
            while let Some((start, end)) = src.get_run() {
                max_len = max_len.max(end - start);
                runs.push(Run { i, start, end });
            }
        }
        Self { runs, max_len }
    }

    /// Runs with `width <= length < 2 * width`.
    pub fn in_bucket(&self, width: usize) -> impl Iterator<Item = &Run> + '_ {
        self.runs
            .iter()
            .filter(move |r| width <= r.length() && r.length() < 2 * width)
    }

    /// `true` if the element has no hits.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Structuring element with hit and miss masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    hit: BitImage,
    miss: BitImage,
    cx: usize,
    cy: usize,
}

impl Sel {
    /// Element from a hit mask alone, centered at `(w / 2, h / 2)`.
    pub fn from_hits(hit: BitImage) -> Self {
        let (w, h) = hit.dims();
        Self {
            miss: BitImage::with_size(w, h),
            hit,
            cx: w / 2,
            cy: h / 2,
        }
    }

    /// Element from hit and miss masks, centered at `(w / 2, h / 2)`.
    ///
    /// # Errors
    ///
    /// Fails with a dimension mismatch if the masks differ in size and with
    /// [`MorphError::OverlappingHitMiss`] if any pixel is in both.
    pub fn from_masks(hit: BitImage, miss: BitImage) -> MorphResult<Self> {
        hit.check_same_size(&miss)?;
        if let Some((i, j)) = first_overlap(&hit, &miss) {
            return Err(MorphError::OverlappingHitMiss { i, j });
        }
        let (w, h) = hit.dims();
        Ok(Self {
            hit,
            miss,
            cx: w / 2,
            cy: h / 2,
        })
    }

    /// Parse a hits-only element; `-` is rejected.
    pub fn parse(text: &str) -> MorphResult<Self> {
        let (hit, _) = parse_text(text, false)?;
        Ok(Self::from_hits(hit))
    }

    /// Parse an element with hits (`+`) and misses (`-`).
    pub fn parse_hit_miss(text: &str) -> MorphResult<Self> {
        let (hit, miss) = parse_text(text, true)?;
        Self::from_masks(hit, miss)
    }

    /// Solid `w x h` rectangle.
    pub fn rect(w: usize, h: usize) -> Self {
        let mut hit = BitImage::with_size(w, h);
        hit.fill(true);
        Self::from_hits(hit)
    }

    /// Disc of radius `r` in a `(2r + 1) x (2r + 1)` element: every offset
    /// with `di^2 + dj^2 <= r^2`.
    pub fn circle(r: usize) -> Self {
        let n = 2 * r + 1;
        let mut hit = BitImage::with_size(n, n);
        let r = r as isize;
        let r2 = r * r;
        for di in -r..=r {
            // widest dj with di^2 + dj^2 <= r^2
            let mut dj = 0;
            while (dj + 1) * (dj + 1) + di * di <= r2 {
                dj += 1;
            }
            hit.set_rect(di + r, r - dj, 1, (2 * dj + 1) as usize, true);
        }
        Self::from_hits(hit)
    }

    /// Line of half-length `r` through the center of a `(2r + 1)` square
    /// element, pointing along `(cos angle, sin angle)`.
    ///
    /// The line is sampled every 0.3 pixels from end to end and each sample
    /// is truncated toward the center.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidParameters`] if `angle` is not finite.
    pub fn line(r: usize, angle: f64) -> MorphResult<Self> {
        let angle = finite_angle(angle)?;
        let n = 2 * r + 1;
        let mut hit = BitImage::with_size(n, n);
        let (dy, dx) = angle.sin_cos();
        let rf = r as f64;
        let steps = (2.0 * rf / LINE_STEP).ceil() as usize;
        for k in 0..=steps {
            let l = (k as f64 * LINE_STEP - rf).min(rf);
            let i = (l * dx) as isize + r as isize;
            let j = (l * dy) as isize + r as isize;
            if (0..n as isize).contains(&i) && (0..n as isize).contains(&j) {
                hit.set_rect(i, j, 1, 1, true);
            }
        }
        let mut sel = Self::from_hits(hit);
        sel.set_center(r, r);
        Ok(sel)
    }

    /// Move the center.
    pub fn set_center(&mut self, cx: usize, cy: usize) {
        self.cx = cx;
        self.cy = cy;
    }

    /// Builder form of [`set_center`](Sel::set_center).
    pub fn with_center(mut self, cx: usize, cy: usize) -> Self {
        self.set_center(cx, cy);
        self
    }

    /// The element pixel placed over the pixel being computed.
    #[inline]
    pub fn center(&self) -> (usize, usize) {
        (self.cx, self.cy)
    }

    /// `(width, height)` of both masks.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        self.hit.dims()
    }

    /// Pixels that must be foreground.
    #[inline]
    pub fn hit(&self) -> &BitImage {
        &self.hit
    }

    /// Pixels that must be background.
    #[inline]
    pub fn miss(&self) -> &BitImage {
        &self.miss
    }

    /// Number of hit pixels.
    pub fn hit_count(&self) -> usize {
        self.hit.count()
    }

    /// Number of miss pixels.
    pub fn miss_count(&self) -> usize {
        self.miss.count()
    }

    /// Run decomposition of the hit mask.
    pub fn runs(&self) -> RunDecomposition {
        RunDecomposition::of(&self.hit)
    }

    /// Run decomposition of the miss mask.
    pub fn miss_runs(&self) -> RunDecomposition {
        RunDecomposition::of(&self.miss)
    }

    /// Offsets `e - center` of the hit pixels.
    pub fn hit_offsets(&self) -> Vec<(isize, isize)> {
        offsets(&self.hit, self.cx, self.cy)
    }

    /// Offsets `e - center` of the miss pixels.
    pub fn miss_offsets(&self) -> Vec<(isize, isize)> {
        offsets(&self.miss, self.cx, self.cy)
    }

    /// The element turned by `quarters` quarter turns, center included.
    pub fn rotated(&self, quarters: i32) -> Self {
        let mut hit = self.hit.clone();
        let mut miss = self.miss.clone();
        rotate_quarters_in_place(&mut hit, quarters);
        rotate_quarters_in_place(&mut miss, quarters);
        let (mut w, mut h) = self.dims();
        let (mut cx, mut cy) = self.center();
        for _ in 0..quarters.rem_euclid(4) {
            // (i, j) -> (j, w - 1 - i)
            (cx, cy) = (cy, w.saturating_sub(cx + 1));
            (w, h) = (h, w);
        }
        Self { hit, miss, cx, cy }
    }
}

impl fmt::Display for Sel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dims();
        for j in (0..h).rev() {
            for i in 0..w {
                let c = if self.hit.get(i, j) == Some(true) {
                    '+'
                } else if self.miss.get(i, j) == Some(true) {
                    '-'
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn parse_text(text: &str, allow_miss: bool) -> MorphResult<(BitImage, BitImage)> {
    if text.is_empty() {
        return Err(MorphError::InvalidSel("empty element text".to_string()));
    }
    let lines: Vec<&str> = text.strip_suffix('\n').unwrap_or(text).split('\n').collect();
    let rows = lines.len();
    let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    if cols == 0 {
        return Err(MorphError::InvalidSel("element text has no columns".to_string()));
    }
    let mut hit = BitImage::with_size(cols, rows);
    let mut miss = BitImage::with_size(cols, rows);
    for (row, line) in lines.iter().enumerate() {
        let j = rows - row - 1;
        for (col, ch) in line.chars().enumerate() {
            match ch {
                '+' => hit.set(col, j, true)?,
                '-' if allow_miss => miss.set(col, j, true)?,
                ' ' | '.' => {}
                _ => {
                    return Err(MorphError::SelSyntax {
                        ch,
                        line: row + 1,
                        column: col + 1,
                    });
                }
            }
        }
    }
    Ok((hit, miss))
}

fn offsets(mask: &BitImage, cx: usize, cy: usize) -> Vec<(isize, isize)> {
    let mut out = Vec::new();
    for run in RunDecomposition::of(mask).runs {
        for j in run.start..run.end {
            out.push((run.i as isize - cx as isize, j as isize - cy as isize));
        }
    }
    out
}

fn first_overlap(hit: &BitImage, miss: &BitImage) -> Option<(usize, usize)> {
    let mut both = hit.clone();
    Blitter::new(LineBlitKind::Wordwise).blit(&mut both, miss, 0, 0, BlitOp::And, Boundary::Keep);
    RunDecomposition::of(&both)
        .runs
        .first()
        .map(|r| (r.i, r.start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout_is_mirrored() {
        let sel = Sel::parse("+..\n.+.\n").unwrap();
        assert_eq!(sel.dims(), (3, 2));
        // first text line is the highest j
        assert_eq!(sel.hit().get(0, 1), Some(true));
        assert_eq!(sel.hit().get(1, 0), Some(true));
        assert_eq!(sel.hit_count(), 2);
        assert_eq!(sel.center(), (1, 1));
    }

    #[test]
    fn test_parse_ragged_lines_and_missing_newline() {
        let sel = Sel::parse("+\n  +").unwrap();
        assert_eq!(sel.dims(), (3, 2));
        assert_eq!(sel.hit().get(0, 1), Some(true));
        assert_eq!(sel.hit().get(2, 0), Some(true));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Sel::parse(""), Err(MorphError::InvalidSel(_))));
        let err = Sel::parse("++\n+x\n").unwrap_err();
        assert!(matches!(
            err,
            MorphError::SelSyntax {
                ch: 'x',
                line: 2,
                column: 2
            }
        ));
        assert!(matches!(
            Sel::parse("+-"),
            Err(MorphError::SelSyntax { ch: '-', .. })
        ));
    }

    #[test]
    fn test_parse_hit_miss_and_display() {
        let text = "..+\n-++\n..+\n";
        let sel = Sel::parse_hit_miss(text).unwrap();
        assert_eq!(sel.hit_count(), 4);
        assert_eq!(sel.miss_count(), 1);
        assert_eq!(sel.miss().get(0, 1), Some(true));
        assert_eq!(sel.to_string(), text);
        assert_eq!(Sel::parse_hit_miss(&sel.to_string()).unwrap(), sel);
    }

    #[test]
    fn test_from_masks_rejects_overlap_and_size_mismatch() {
        let mut hit = BitImage::with_size(3, 3);
        let mut miss = BitImage::with_size(3, 3);
        hit.set(1, 2, true).unwrap();
        miss.set(1, 2, true).unwrap();
        miss.set(0, 0, true).unwrap();
        assert!(matches!(
            Sel::from_masks(hit.clone(), miss),
            Err(MorphError::OverlappingHitMiss { i: 1, j: 2 })
        ));
        assert!(matches!(
            Sel::from_masks(hit, BitImage::with_size(3, 4)),
            Err(MorphError::Core(_))
        ));
    }

    #[test]
    fn test_circle() {
        let sel = Sel::circle(2);
        assert_eq!(sel.dims(), (5, 5));
        assert_eq!(sel.center(), (2, 2));
        // rows of 1, 3, 5, 3 and 1 pixels
        assert_eq!(sel.hit_count(), 13);
        assert_eq!(sel.hit().get(0, 2), Some(true));
        assert_eq!(sel.hit().get(0, 1), Some(false));
        assert_eq!(Sel::circle(0).hit_count(), 1);
    }

    #[test]
    fn test_line_element() {
        let h = Sel::line(3, 0.0).unwrap();
        assert_eq!(h.dims(), (7, 7));
        assert_eq!(h.center(), (3, 3));
        assert_eq!(h.hit_count(), 7);
        assert_eq!(h.runs().runs.len(), 7);
        let v = Sel::line(3, std::f64::consts::FRAC_PI_2).unwrap();
        assert_eq!(v.runs().max_len, 7);
    }

    #[test]
    fn test_line_element_angle() {
        let far = Sel::line(4, 1.0e12).unwrap();
        assert_eq!(far.dims(), (9, 9));
        assert!(far.hit_count() >= 5);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Sel::line(4, bad),
                Err(MorphError::InvalidParameters(_))
            ));
        }
    }

    #[test]
    fn test_runs() {
        let sel = Sel::parse("+.+\n+++\n.++\n").unwrap();
        let runs = sel.runs();
        assert_eq!(runs.max_len, 3);
        assert_eq!(
            runs.runs,
            vec![
                Run { i: 0, start: 1, end: 3 },
                Run { i: 1, start: 0, end: 2 },
                Run { i: 2, start: 0, end: 3 },
            ]
        );
        assert_eq!(runs.in_bucket(2).count(), 3);
        assert_eq!(runs.in_bucket(1).count(), 0);
    }

    #[test]
    fn test_rotated_moves_center() {
        let sel = Sel::parse_hit_miss("  +\n-++\n  +\n").unwrap();
        let r = sel.rotated(1);
        assert_eq!(r.center(), (1, 1));
        assert_eq!(r.hit_count(), 4);
        // miss at (0, 1) moves to (1, 2)
        assert_eq!(r.miss().get(1, 2), Some(true));
        assert_eq!(sel.rotated(4), sel);
        let off = Sel::rect(4, 2).with_center(0, 0).rotated(1);
        assert_eq!(off.dims(), (2, 4));
        assert_eq!(off.center(), (0, 3));
    }
}
