//! Packed 1-bit image
//!
//! [`BitImage`] stores one bit per pixel in rows of `u32` words:
//!
//! - dimension 0 (`width`) counts rows
//! - dimension 1 (`height`) counts bits within a row
//! - each row is `wpl = ceil(height / 32)` words, most significant bit first
//!
//! Pixel `(i, j)` is bit `j` of row `i`. Bits past `height` in the last word
//! of a row are padding; whole-word writers keep them clear and equality
//! ignores them.

mod blit;
mod convert;
mod cursor;
mod stats;

pub use blit::{
    BitwiseLineBlit, BlitOp, Blitter, Boundary, LineBlit, WordwiseLineBlit, total_blit_count,
};
pub use cursor::{BitSnk, BitSrc};
pub use stats::RunLengthHistogram;

use crate::bithacks::left_mask;
use crate::error::{Error, Result};
use std::fmt;

/// Bit-packed binary image.
///
/// Cloning allocates a fresh buffer; [`take`](BitImage::take) moves the
/// buffer out and leaves an empty image behind.
#[derive(Debug, Clone, Default)]
pub struct BitImage {
    width: usize,
    height: usize,
    wpl: usize,
    data: Vec<u32>,
}

impl BitImage {
    /// Create an empty (0x0) image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cleared image of the given size.
    pub fn with_size(width: usize, height: usize) -> Self {
        let wpl = height.div_ceil(32);
        Self {
            width,
            height,
            wpl,
            data: vec![0; width * wpl],
        }
    }

    /// Change the size.
    ///
    /// Keeps the contents when the size is unchanged; otherwise the image is
    /// reallocated and cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::with_size(width, height);
    }

    /// Number of rows (dimension 0).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of bits per row (dimension 1).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Words per row.
    #[inline]
    pub fn wpl(&self) -> usize {
        self.wpl
    }

    /// `(width, height)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// `true` if either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whole word buffer, row after row.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Mutable word buffer.
    ///
    /// Callers writing whole words must keep the padding bits of each row clear.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Approximate memory held by the pixel buffer, in megabytes.
    pub fn megabytes(&self) -> f64 {
        (self.data.len() * 4) as f64 / (1024.0 * 1024.0)
    }

    /// Words of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width()`.
    #[inline]
    pub fn line(&self, i: usize) -> &[u32] {
        assert!(i < self.width, "row {i} outside image of {} rows", self.width);
        &self.data[i * self.wpl..(i + 1) * self.wpl]
    }

    /// Mutable words of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width()`.
    #[inline]
    pub fn line_mut(&mut self, i: usize) -> &mut [u32] {
        assert!(i < self.width, "row {i} outside image of {} rows", self.width);
        &mut self.data[i * self.wpl..(i + 1) * self.wpl]
    }

    /// Row `dst` for writing together with a different row `src` for
    /// reading.
    pub(crate) fn line_pair_mut(&mut self, dst: usize, src: usize) -> (&mut [u32], &[u32]) {
        assert_ne!(dst, src, "line_pair_mut needs two distinct rows");
        assert!(dst < self.width && src < self.width);
        let wpl = self.wpl;
        if dst < src {
            let (head, tail) = self.data.split_at_mut(src * wpl);
            (&mut head[dst * wpl..(dst + 1) * wpl], &tail[..wpl])
        } else {
            let (head, tail) = self.data.split_at_mut(dst * wpl);
            (&mut tail[..wpl], &head[src * wpl..(src + 1) * wpl])
        }
    }

    /// Exchange two rows.
    pub fn swap_lines(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let wpl = self.wpl;
        let (head, tail) = self.data.split_at_mut(hi * wpl);
        head[lo * wpl..(lo + 1) * wpl].swap_with_slice(&mut tail[..wpl]);
    }

    /// Pixel value, or `None` outside the image.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<bool> {
        if i >= self.width || j >= self.height {
            return None;
        }
        let w = self.data[i * self.wpl + j / 32];
        Some(w >> (31 - j % 32) & 1 != 0)
    }

    /// Set pixel `(i, j)` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] outside the image.
    pub fn set(&mut self, i: usize, j: usize, value: bool) -> Result<()> {
        if i >= self.width || j >= self.height {
            return Err(Error::PixelOutOfBounds {
                i,
                j,
                width: self.width,
                height: self.height,
            });
        }
        let w = &mut self.data[i * self.wpl + j / 32];
        let bit = 1u32 << (31 - j % 32);
        if value {
            *w |= bit;
        } else {
            *w &= !bit;
        }
        Ok(())
    }

    /// Set pixel `(i, j)`.
    #[inline]
    pub fn set_bit(&mut self, i: usize, j: usize) -> Result<()> {
        self.set(i, j, true)
    }

    /// Clear pixel `(i, j)`.
    #[inline]
    pub fn clear_bit(&mut self, i: usize, j: usize) -> Result<()> {
        self.set(i, j, false)
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: bool) {
        self.data.fill(if value { u32::MAX } else { 0 });
        self.clear_unused_bits();
    }

    /// Move the pixels out, leaving an empty image.
    pub fn take(&mut self) -> BitImage {
        std::mem::take(self)
    }

    /// Check that `other` has the same size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn check_same_size(&self, other: &BitImage) -> Result<()> {
        if self.dims() != other.dims() {
            return Err(Error::DimensionMismatch {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        Ok(())
    }

    /// Mask of the visible bits in the last word of a row.
    #[inline]
    pub(crate) fn last_word_mask(&self) -> u32 {
        match self.height % 32 {
            0 => u32::MAX,
            r => left_mask(r as u32),
        }
    }

    /// Clear the padding bits past `height` in every row.
    pub fn clear_unused_bits(&mut self) {
        if self.wpl == 0 {
            return;
        }
        let mask = self.last_word_mask();
        if mask == u32::MAX {
            return;
        }
        for row in self.data.chunks_exact_mut(self.wpl) {
            row[self.wpl - 1] &= mask;
        }
    }

    /// Flip every pixel.
    pub fn invert(&mut self) {
        for w in self.data.iter_mut() {
            *w = !*w;
        }
        self.clear_unused_bits();
    }

    /// Set the pixels of a rectangle to `value`.
    ///
    /// The rectangle starts at `(i0, j0)` and spans `w` rows and `h` bits.
    /// Parts outside the image are ignored, including negative origins.
    pub fn set_rect(&mut self, i0: isize, j0: isize, w: usize, h: usize, value: bool) {
        let Some((rows, bits)) = self.clip_rect(i0, j0, w, h) else {
            return;
        };
        let height = self.height;
        for i in rows {
            let mut snk = BitSnk::new(self.line_mut(i), height, bits.start);
            snk.put_run(bits.len(), value);
        }
    }

    /// Intersect a rectangle with the image.
    pub(crate) fn clip_rect(
        &self,
        i0: isize,
        j0: isize,
        w: usize,
        h: usize,
    ) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let clip = |start: isize, len: usize, limit: usize| {
            let lo = start.max(0) as usize;
            let len = isize::try_from(len).unwrap_or(isize::MAX);
            let hi = start.saturating_add(len).clamp(0, limit as isize) as usize;
            (lo < hi).then_some(lo..hi)
        };
        Some((clip(i0, w, self.width)?, clip(j0, h, self.height)?))
    }
}

impl PartialEq for BitImage {
    fn eq(&self, other: &Self) -> bool {
        if self.dims() != other.dims() {
            return false;
        }
        if self.wpl == 0 {
            return true;
        }
        let mask = self.last_word_mask();
        let last = self.wpl - 1;
        self.data
            .chunks_exact(self.wpl)
            .zip(other.data.chunks_exact(other.wpl))
            .all(|(a, b)| a[..last] == b[..last] && (a[last] ^ b[last]) & mask == 0)
    }
}

impl Eq for BitImage {}

/// Text rendering in the structuring-element notation: one text line per
/// bit index, highest first, with `+` for set and `.` for clear pixels.
impl fmt::Display for BitImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for j in (0..self.height).rev() {
            for i in 0..self.width {
                let c = if self.get(i, j) == Some(true) { '+' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
