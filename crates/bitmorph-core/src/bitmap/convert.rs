//! Conversion between packed images and `ndarray` arrays
//!
//! Arrays are indexed `[i, j]` with the same meaning as [`BitImage`]
//! coordinates: axis 0 is the row, axis 1 the bit within the row.

use super::{BitImage, BitSnk, BitSrc};
use crate::error::{Error, Result};
use ndarray::Array2;

impl BitImage {
    /// Pack a byte image; any nonzero byte becomes a set pixel.
    pub fn from_bytes(bytes: &Array2<u8>) -> Self {
        let (width, height) = bytes.dim();
        let mut image = BitImage::with_size(width, height);
        for (i, row) in bytes.rows().into_iter().enumerate() {
            let mut snk = BitSnk::new(image.line_mut(i), height, 0);
            for &b in row.iter() {
                snk.put_bit(b != 0);
            }
        }
        image
    }

    /// Unpack into 0 / 255 bytes.
    pub fn to_bytes(&self) -> Array2<u8> {
        let mut out = Array2::<u8>::zeros(self.dims());
        for (i, mut row) in out.rows_mut().into_iter().enumerate() {
            let mut src = BitSrc::new(self.line(i), self.height, 0);
            for b in row.iter_mut() {
                *b = if src.get_bit() { 255 } else { 0 };
            }
        }
        out
    }

    /// Pack a float image; values above `threshold` become set pixels.
    pub fn from_floats(values: &Array2<f32>, threshold: f32) -> Self {
        let (width, height) = values.dim();
        let mut image = BitImage::with_size(width, height);
        for (i, row) in values.rows().into_iter().enumerate() {
            let mut snk = BitSnk::new(image.line_mut(i), height, 0);
            for &v in row.iter() {
                snk.put_bit(v > threshold);
            }
        }
        image
    }

    /// Unpack into 0.0 / 1.0 floats.
    pub fn to_floats(&self) -> Array2<f32> {
        let mut out = Array2::<f32>::zeros(self.dims());
        for (i, mut row) in out.rows_mut().into_iter().enumerate() {
            let mut src = BitSrc::new(self.line(i), self.height, 0);
            for v in row.iter_mut() {
                *v = if src.get_bit() { 1.0 } else { 0.0 };
            }
        }
        out
    }

    /// Box-filter down to gray levels.
    ///
    /// Every `scale x scale` block becomes one byte holding its number of set
    /// pixels (saturated at 255). Partial blocks at the right and bottom
    /// edges count only the pixels they contain. With `normalize`, the
    /// counts are stretched linearly so the smallest maps to 0 and the
    /// largest to 255.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `1 <= scale <= 32`.
    pub fn resample_to_bytes(&self, scale: usize, normalize: bool) -> Result<Array2<u8>> {
        if !(1..=32).contains(&scale) {
            return Err(Error::InvalidParameter(format!(
                "resample scale must be in 1..=32, got {scale}"
            )));
        }
        let ow = self.width.div_ceil(scale);
        let oh = self.height.div_ceil(scale);
        let mut counts = Array2::<u32>::zeros((ow, oh));
        for i in 0..self.width {
            let mut src = BitSrc::new(self.line(i), self.height, 0);
            let mut oj = 0;
            while src.has_bits() {
                let n = src.remaining().min(scale) as u32;
                counts[[i / scale, oj]] += src.get_bits(n).count_ones();
                oj += 1;
            }
        }
        let (lo, hi) = if normalize {
            let lo = counts.iter().copied().min().unwrap_or(0);
            let hi = counts.iter().copied().max().unwrap_or(0);
            (lo, hi)
        } else {
            (0, 0)
        };
        let span = (hi - lo).max(1);
        Ok(counts.mapv(|c| {
            if normalize {
                ((c - lo) * 255 / span) as u8
            } else {
                c.min(255) as u8
            }
        }))
    }

    /// Halve both dimensions; an output pixel is set only when all four
    /// pixels of its 2x2 block are set. An odd last row or bit is dropped.
    pub fn reduce2_and(&self) -> BitImage {
        let mut out = BitImage::with_size(self.width / 2, self.height / 2);
        let bits = out.height;
        for i in 0..out.width {
            let mut a = BitSrc::new(self.line(2 * i), bits * 2, 0);
            let mut b = BitSrc::new(self.line(2 * i + 1), bits * 2, 0);
            let mut snk = BitSnk::new(out.line_mut(i), bits, 0);
            while a.has_bits() {
                snk.put_bit(a.get_bits(2) & b.get_bits(2) == 0b11);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_bytes_round_trip_layout() {
        let bytes = array![[0u8, 7, 0], [255, 0, 1]];
        let img = BitImage::from_bytes(&bytes);
        assert_eq!(img.dims(), (2, 3));
        assert_eq!(img.get(0, 1), Some(true));
        assert_eq!(img.get(1, 0), Some(true));
        assert_eq!(img.count(), 3);
        assert_eq!(img.to_bytes(), array![[0u8, 255, 0], [255, 0, 255]]);
    }

    #[test]
    fn test_floats_threshold() {
        let values = array![[0.2f32, 0.7], [0.5, 0.51]];
        let img = BitImage::from_floats(&values, 0.5);
        assert_eq!(img.to_floats(), array![[0.0f32, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_resample_counts_blocks() {
        let mut img = BitImage::with_size(5, 5);
        img.set_rect(0, 0, 2, 2, true);
        img.set(4, 4, true).unwrap();
        let out = img.resample_to_bytes(2, false).unwrap();
        assert_eq!(out.dim(), (3, 3));
        assert_eq!(out[[0, 0]], 4);
        assert_eq!(out[[2, 2]], 1);
        assert_eq!(out[[1, 1]], 0);
        let norm = img.resample_to_bytes(2, true).unwrap();
        assert_eq!(norm[[0, 0]], 255);
        assert_eq!(norm[[2, 2]], 63);
        assert!(img.resample_to_bytes(0, false).is_err());
        assert!(img.resample_to_bytes(33, false).is_err());
    }

    #[test]
    fn test_reduce2_and() {
        let mut img = BitImage::with_size(5, 6);
        img.set_rect(0, 0, 2, 2, true);
        img.set_rect(2, 2, 2, 1, true);
        let out = img.reduce2_and();
        assert_eq!(out.dims(), (2, 3));
        assert_eq!(out.get(0, 0), Some(true));
        assert_eq!(out.get(1, 1), Some(false));
        assert_eq!(out.count(), 1);
    }
}
