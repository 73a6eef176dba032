//! PNG image format support
//!
//! Bit images are written as 1-bit grayscale with set pixels black.
//! Reading accepts 8-bit or 1-bit grayscale (with or without alpha) and
//! 8-bit RGB(A); a pixel is set when its luminance is below mid-gray.
//! Orientation matches the PBM module: the top PNG row is the highest bit
//! index.

use crate::{IoError, IoResult};
use bitmorph_core::BitImage;
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image and threshold it to one bit per pixel.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<BitImage> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width as usize;
    let height = info.height as usize;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let samples = match (color_type, bit_depth) {
        (ColorType::Grayscale, BitDepth::One) => 0,
        (ColorType::Grayscale, BitDepth::Eight) => 1,
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => 2,
        (ColorType::Rgb, BitDepth::Eight) => 3,
        (ColorType::Rgba, BitDepth::Eight) => 4,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG format: {:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let mut image = BitImage::with_size(width, height);

    for r in 0..height {
        let row = &data[r * bytes_per_row..(r + 1) * bytes_per_row];
        for c in 0..width {
            let dark = match samples {
                0 => row[c / 8] >> (7 - c % 8) & 1 == 0,
                1 | 2 => row[c * samples] < 128,
                _ => {
                    let p = &row[c * samples..c * samples + 3];
                    let luma = (299 * p[0] as u32 + 587 * p[1] as u32 + 114 * p[2] as u32) / 1000;
                    luma < 128
                }
            };
            if dark {
                image.set(c, height - 1 - r, true)?;
            }
        }
    }

    log::debug!("read {}x{} PNG ({:?} {:?})", width, height, color_type, bit_depth);
    Ok(image)
}

/// Write a bit image as a 1-bit grayscale PNG.
pub fn write_png<W: Write>(image: &BitImage, writer: W) -> IoResult<()> {
    let (width, height) = image.dims();

    let mut encoder = Encoder::new(writer, width as u32, height as u32);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::One);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let bytes_per_row = width.div_ceil(8);
    let mut data = vec![0xffu8; bytes_per_row * height];

    for r in 0..height {
        let row_start = r * bytes_per_row;
        for c in 0..width {
            if image.get(c, height - 1 - r) == Some(true) {
                data[row_start + c / 8] &= !(0x80 >> (c % 8));
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_round_trip() {
        let mut img = BitImage::with_size(13, 9);
        img.set_rect(2, 1, 5, 3, true);
        img.set(12, 8, true).unwrap();
        let mut buf = Vec::new();
        write_png(&img, &mut buf).unwrap();
        let back = read_png(Cursor::new(buf)).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_read_gray8_thresholds() {
        let mut buf = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buf, 2, 1);
            encoder.set_color(ColorType::Grayscale);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[10, 200]).unwrap();
        }
        let img = read_png(Cursor::new(buf)).unwrap();
        assert_eq!(img.dims(), (2, 1));
        assert_eq!(img.get(0, 0), Some(true));
        assert_eq!(img.get(1, 0), Some(false));
    }
}
