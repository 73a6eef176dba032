//! PBM (portable bitmap) support
//!
//! Reads ASCII (P1) and binary (P4) bitmaps and writes P4. In PBM a 1 is
//! black, which maps to a set pixel.
//!
//! File column `c` is image row `i = c`; file line `r` (top first) is bit
//! `j = height - 1 - r`, so the top of the file is the highest bit index.

use crate::{IoError, IoResult};
use bitmorph_core::BitImage;
use std::io::{Read, Write};

struct Header {
    binary: bool,
    width: usize,
    height: usize,
    data_start: usize,
}

fn parse_header(data: &[u8]) -> IoResult<Header> {
    let binary = match data.get(..2) {
        Some(b"P1") => false,
        Some(b"P4") => true,
        _ => {
            return Err(IoError::UnsupportedFormat(
                "not a PBM file (expected P1 or P4)".to_string(),
            ));
        }
    };
    let mut pos = 2;
    let mut fields = [0usize; 2];
    for field in fields.iter_mut() {
        pos = skip_space_and_comments(data, pos);
        let start = pos;
        while pos < data.len() && data[pos].is_ascii_digit() {
            pos += 1;
        }
        if start == pos {
            return Err(IoError::InvalidData("missing PBM dimension".to_string()));
        }
        let text = std::str::from_utf8(&data[start..pos])
            .map_err(|e| IoError::InvalidData(e.to_string()))?;
        *field = text
            .parse()
            .map_err(|e| IoError::InvalidData(format!("bad PBM dimension {text:?}: {e}")))?;
    }
    // exactly one whitespace byte separates the header from the data
    let data_start = match data.get(pos) {
        Some(b) if b.is_ascii_whitespace() => pos + 1,
        Some(_) => {
            return Err(IoError::InvalidData(
                "PBM header not followed by whitespace".to_string(),
            ));
        }
        None => pos,
    };
    Ok(Header {
        binary,
        width: fields[0],
        height: fields[1],
        data_start,
    })
}

fn skip_space_and_comments(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() {
        if data[pos] == b'#' {
            while pos < data.len() && data[pos] != b'\n' {
                pos += 1;
            }
        } else if data[pos].is_ascii_whitespace() {
            pos += 1;
        } else {
            break;
        }
    }
    pos
}

/// Read a PBM image (P1 or P4).
///
/// The declared size is checked against the length of the pixel data
/// before anything is allocated.
pub fn read_pbm<R: Read>(mut reader: R) -> IoResult<BitImage> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let header = parse_header(&data)?;
    let (w, h) = (header.width, header.height);
    let body = data.get(header.data_start..).unwrap_or(&[]);
    let too_large = || IoError::InvalidData(format!("PBM size {w}x{h} is too large"));

    if header.binary {
        let bytes_per_row = w.div_ceil(8);
        let needed = bytes_per_row.checked_mul(h).ok_or_else(too_large)?;
        if body.len() < needed {
            return Err(IoError::InvalidData(format!(
                "PBM body has {} bytes, expected {}",
                body.len(),
                needed
            )));
        }
        let mut image = BitImage::with_size(w, h);
        if w > 0 {
            for (r, row) in body.chunks_exact(bytes_per_row).take(h).enumerate() {
                for c in 0..w {
                    if row[c / 8] >> (7 - c % 8) & 1 != 0 {
                        image.set(c, h - 1 - r, true)?;
                    }
                }
            }
        }
        log::debug!("read {}x{} PBM", w, h);
        Ok(image)
    } else {
        let needed = w.checked_mul(h).ok_or_else(too_large)?;
        let mut digits = body.iter().filter(|b| !b.is_ascii_whitespace());
        if digits.clone().count() < needed {
            return Err(IoError::InvalidData("P1 data ends early".to_string()));
        }
        let mut image = BitImage::with_size(w, h);
        for k in 0..needed {
            let (r, c) = (k / w, k % w);
            match digits.next() {
                Some(b'1') => image.set(c, h - 1 - r, true)?,
                Some(b'0') => {}
                Some(&other) => {
                    return Err(IoError::InvalidData(format!(
                        "unexpected byte {other:#04x} in P1 data"
                    )));
                }
                None => {
                    return Err(IoError::InvalidData("P1 data ends early".to_string()));
                }
            }
        }
        log::debug!("read {}x{} PBM", w, h);
        Ok(image)
    }
}

/// Write an image as binary PBM (P4).
pub fn write_pbm<W: Write>(image: &BitImage, mut writer: W) -> IoResult<()> {
    let (w, h) = image.dims();
    write!(writer, "P4\n{} {}\n", w, h)?;
    let bytes_per_row = w.div_ceil(8);
    let mut row = vec![0u8; bytes_per_row];
    for r in 0..h {
        row.fill(0);
        for c in 0..w {
            if image.get(c, h - 1 - r) == Some(true) {
                row[c / 8] |= 0x80 >> (c % 8);
            }
        }
        writer.write_all(&row)?;
    }
    writer.flush()?;
    Ok(())
}
