//! Transposition of packed images
//!
//! The image is cut into 32x32 blocks (32 rows by one word); each block is
//! flipped about its diagonal with [`transpose32`] and stored at the mirrored
//! block position. Blocks on the last row band are padded with zero rows, so
//! the padding bits of the result stay clear.

use bitmorph_core::BitImage;
use bitmorph_core::bithacks::transpose32;

/// Write the transpose of `src` into `dst`, resizing `dst` to
/// `(src.height(), src.width())`.
///
/// Pixel `(i, j)` of `src` becomes pixel `(j, i)` of `dst`.
pub fn transpose_into(src: &BitImage, dst: &mut BitImage) {
    let (width, height) = src.dims();
    dst.resize(height, width);
    let mut block = [0u32; 32];
    for band in 0..width.div_ceil(32) {
        let rows = (width - band * 32).min(32);
        for word in 0..src.wpl() {
            for (k, slot) in block.iter_mut().enumerate() {
                *slot = if k < rows {
                    src.line(band * 32 + k)[word]
                } else {
                    0
                };
            }
            transpose32(&mut block);
            let cols = (height - word * 32).min(32);
            for (m, &w) in block.iter().take(cols).enumerate() {
                dst.line_mut(word * 32 + m)[band] = w;
            }
        }
    }
}

/// Transposed copy of `image`.
pub fn transpose(image: &BitImage) -> BitImage {
    let mut out = BitImage::new();
    transpose_into(image, &mut out);
    out
}

/// Transpose `image`, replacing its buffer.
pub fn transpose_in_place(image: &mut BitImage) {
    let src = image.take();
    transpose_into(&src, image);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> BitImage {
        let mut img = BitImage::with_size(width, height);
        for i in 0..width {
            for j in 0..height {
                if (i * 7 + j * 3) % 5 == 0 {
                    img.set(i, j, true).unwrap();
                }
            }
        }
        img
    }

    #[test]
    fn test_transpose_moves_pixels() {
        for (w, h) in [(1, 1), (3, 70), (33, 5), (64, 64), (40, 97)] {
            let img = checker(w, h);
            let t = transpose(&img);
            assert_eq!(t.dims(), (h, w));
            for i in 0..w {
                for j in 0..h {
                    assert_eq!(t.get(j, i), img.get(i, j), "{w}x{h} at ({i}, {j})");
                }
            }
        }
    }

    #[test]
    fn test_transpose_keeps_padding_clear() {
        let mut img = BitImage::with_size(5, 40);
        img.fill(true);
        let t = transpose(&img);
        assert_eq!(t.line(0), &[0xf800_0000]);
        assert_eq!(t.count(), 200);
    }

    #[test]
    fn test_transpose_in_place_and_empty() {
        let mut img = checker(9, 35);
        let expected = transpose(&img);
        transpose_in_place(&mut img);
        assert_eq!(img, expected);
        let empty = transpose(&BitImage::with_size(0, 12));
        assert_eq!(empty.dims(), (12, 0));
    }
}
