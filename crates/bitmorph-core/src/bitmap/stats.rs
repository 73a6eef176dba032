//! Pixel counting and run statistics

use super::{BitImage, BitSrc};
use crate::error::Result;

/// Histogram of run lengths, gathered row by row.
///
/// `on[k]` counts runs of exactly `k` set pixels and `off[k]` runs of `k`
/// clear pixels; the last bucket also collects every longer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLengthHistogram {
    pub on: Vec<u32>,
    pub off: Vec<u32>,
}

impl RunLengthHistogram {
    fn new(max_len: usize) -> Self {
        Self {
            on: vec![0; max_len + 1],
            off: vec![0; max_len + 1],
        }
    }

    fn add(bins: &mut [u32], len: usize) {
        if len == 0 {
            return;
        }
        let last = bins.len() - 1;
        bins[len.min(last)] += 1;
    }

    /// Total number of set runs.
    pub fn on_runs(&self) -> u32 {
        self.on.iter().sum()
    }

    /// Total number of clear runs.
    pub fn off_runs(&self) -> u32 {
        self.off.iter().sum()
    }
}

impl BitImage {
    /// Number of set pixels.
    pub fn count(&self) -> usize {
        if self.wpl == 0 {
            return 0;
        }
        let mask = self.last_word_mask();
        let last = self.wpl - 1;
        self.data
            .chunks_exact(self.wpl)
            .map(|row| {
                let head: u32 = row[..last].iter().map(|w| w.count_ones()).sum();
                (head + (row[last] & mask).count_ones()) as usize
            })
            .sum()
    }

    /// Number of set pixels inside a rectangle, clipped to the image.
    pub fn count_rect(&self, i0: isize, j0: isize, w: usize, h: usize) -> usize {
        let Some((rows, bits)) = self.clip_rect(i0, j0, w, h) else {
            return 0;
        };
        let mut total = 0usize;
        for i in rows {
            let mut src = BitSrc::new(self.line(i), bits.end, bits.start);
            while src.has_bits() {
                let n = src.remaining().min(32) as u32;
                total += src.get_bits(n).count_ones() as usize;
            }
        }
        total
    }

    /// At least one pixel is set.
    pub fn is_non_empty(&self) -> bool {
        if self.wpl == 0 {
            return false;
        }
        let mask = self.last_word_mask();
        let last = self.wpl - 1;
        self.data
            .chunks_exact(self.wpl)
            .any(|row| row[..last].iter().any(|&w| w != 0) || row[last] & mask != 0)
    }

    /// Number of pixels where `self` and `other` differ.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// when the sizes differ.
    pub fn difference(&self, other: &BitImage) -> Result<usize> {
        self.check_same_size(other)?;
        if self.wpl == 0 {
            return Ok(0);
        }
        let mask = self.last_word_mask();
        let last = self.wpl - 1;
        let total = self
            .data
            .chunks_exact(self.wpl)
            .zip(other.data.chunks_exact(self.wpl))
            .map(|(a, b)| {
                let head: u32 = a[..last]
                    .iter()
                    .zip(&b[..last])
                    .map(|(x, y)| (x ^ y).count_ones())
                    .sum();
                (head + ((a[last] ^ b[last]) & mask).count_ones()) as usize
            })
            .sum();
        Ok(total)
    }

    /// Histogram of run lengths along each row.
    ///
    /// Runs never continue from one row into the next. Lengths above
    /// `max_len` land in the last bucket.
    pub fn run_length_histogram(&self, max_len: usize) -> RunLengthHistogram {
        let mut hist = RunLengthHistogram::new(max_len.max(1));
        for i in 0..self.width {
            let mut src = BitSrc::new(self.line(i), self.height, 0);
            let mut prev_end = 0;
            while let Some((start, end)) = src.get_run() {
                RunLengthHistogram::add(&mut hist.off, start - prev_end);
                RunLengthHistogram::add(&mut hist.on, end - start);
                prev_end = end;
            }
            RunLengthHistogram::add(&mut hist.off, self.height - prev_end);
        }
        hist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped() -> BitImage {
        let mut img = BitImage::with_size(3, 70);
        img.set_rect(0, 2, 1, 5, true);
        img.set_rect(0, 40, 1, 30, true);
        img.set_rect(2, 0, 1, 70, true);
        img
    }

    #[test]
    fn test_count_ignores_padding() {
        let mut img = striped();
        assert_eq!(img.count(), 5 + 30 + 70);
        img.data_mut()[2] |= 0x0000_0001;
        assert_eq!(img.count(), 105);
        assert!(img.is_non_empty());
        assert!(!BitImage::with_size(4, 9).is_non_empty());
    }

    #[test]
    fn test_count_rect() {
        let img = striped();
        assert_eq!(img.count_rect(0, 0, 1, 70), 35);
        assert_eq!(img.count_rect(0, 3, 3, 40), 4 + 3 + 40);
        assert_eq!(img.count_rect(-5, -5, 100, 100), img.count());
        assert_eq!(img.count_rect(1, 0, 1, 70), 0);
    }

    #[test]
    fn test_difference() {
        let a = striped();
        let mut b = a.clone();
        b.set(1, 1, true).unwrap();
        b.set(0, 3, false).unwrap();
        assert_eq!(a.difference(&b).unwrap(), 2);
        assert_eq!(a.count(), 105);
        assert!(a.difference(&BitImage::with_size(3, 71)).is_err());
    }

    #[test]
    fn test_run_length_histogram() {
        let img = striped();
        let hist = img.run_length_histogram(32);
        // row 0: off 2, on 5, off 33, on 30; row 1: off 70; row 2: on 70
        assert_eq!(hist.on[5], 1);
        assert_eq!(hist.on[30], 1);
        assert_eq!(hist.on[32], 1);
        assert_eq!(hist.off[2], 1);
        assert_eq!(hist.off[32], 2);
        assert_eq!(hist.on_runs(), 3);
        assert_eq!(hist.off_runs(), 3);
    }
}
