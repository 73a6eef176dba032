//! bitmorph-io - file I/O for 1-bit images
//!
//! Formats are enabled by cargo features:
//!
//! | Format | Feature      | Read | Write |
//! |--------|--------------|------|-------|
//! | PBM    | `pnm`        | P1, P4 | P4  |
//! | PNG    | `png-format` | gray / RGB, thresholded | 1-bit gray |
//!
//! In every format a set pixel is black. The file's horizontal axis is the
//! image row index `i` and the file's vertical axis runs from the highest bit
//! index `j` at the top down to 0.

mod error;
mod format;

#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

#[cfg(feature = "png-format")]
pub use self::png::{read_png, write_png};
#[cfg(feature = "pnm")]
pub use pnm::{read_pbm, write_pbm};

use bitmorph_core::BitImage;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Read an image file, detecting its format from the header.
pub fn read_bits<P: AsRef<Path>>(path: P) -> IoResult<BitImage> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let reader = BufReader::new(File::open(path)?);
    log::debug!("reading {} as {:?}", path.display(), format);
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => read_png(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Pbm => read_pbm(reader),
        #[allow(unreachable_patterns)]
        other => {
            drop(reader);
            Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                other
            )))
        }
    }
}

/// Write an image file in the given format.
pub fn write_bits<P: AsRef<Path>>(image: &BitImage, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    log::debug!(
        "writing {}x{} image to {} as {:?}",
        image.width(),
        image.height(),
        path.display(),
        format
    );
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => write_png(image, &mut writer)?,
        #[cfg(feature = "pnm")]
        ImageFormat::Pbm => write_pbm(image, &mut writer)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                other
            )));
        }
    }
    writer.flush()?;
    Ok(())
}
