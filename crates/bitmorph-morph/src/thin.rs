//! Connectivity-preserving thinning
//!
//! One pass runs twelve hit-and-miss elements, three patterns in each of
//! the four quarter-turn orientations, and removes the matches of each
//! element before the next one looks at the image. A foreground pixel is
//! removed only when it has a background neighbour on one side and a solid
//! run of three on the other, so a pass never empties a non-empty image.
//! Passes are repeated until nothing changes.

use crate::morphology::Morphology;
use crate::sel::Sel;
use crate::MorphResult;
use bitmorph_core::{BitImage, BlitOp, Boundary};

const PATTERNS: [&str; 3] = ["  +\n-++\n  +\n", "  +\n-++\n - \n", " - \n-++\n  +\n"];

/// The twelve thinning elements in the order they are applied.
pub fn thinning_sels() -> MorphResult<Vec<Sel>> {
    let base = PATTERNS
        .iter()
        .map(|text| Sel::parse_hit_miss(text))
        .collect::<MorphResult<Vec<_>>>()?;
    let mut sels = Vec::with_capacity(4 * base.len());
    for quarters in 0..4 {
        sels.extend(base.iter().map(|sel| sel.rotated(quarters)));
    }
    Ok(sels)
}

impl Morphology {
    /// One thinning pass. Returns whether any pixel was removed.
    pub fn thin(&mut self, image: &mut BitImage) -> MorphResult<bool> {
        let mut changed = false;
        for sel in thinning_sels()? {
            let mut matches = image.clone();
            self.hit_miss(&mut matches, &sel);
            if matches.is_non_empty() {
                self.blitter
                    .blit(image, &matches, 0, 0, BlitOp::AndNot, Boundary::Keep);
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Thin until stable, or for at most `max_iters` passes when it is
    /// nonzero. Returns the number of passes that removed pixels.
    pub fn thin_to_skeleton(
        &mut self,
        image: &mut BitImage,
        max_iters: usize,
    ) -> MorphResult<usize> {
        let mut passes = 0;
        while max_iters == 0 || passes < max_iters {
            if !self.thin(image)? {
                break;
            }
            passes += 1;
        }
        log::debug!(
            "thinning stopped after {} passes, {} pixels left",
            passes,
            image.count()
        );
        Ok(passes)
    }
}

/// One thinning pass with the default context.
pub fn thin(image: &BitImage) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().thin(&mut out)?;
    Ok(out)
}

/// Thin to a skeleton with the default context; `max_iters == 0` runs
/// until stable.
pub fn thin_to_skeleton(image: &BitImage, max_iters: usize) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().thin_to_skeleton(&mut out, max_iters)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitmorph_core::Blitter;

    fn subset(a: &BitImage, b: &BitImage) -> bool {
        let mut extra = a.clone();
        Blitter::default().blit(&mut extra, b, 0, 0, BlitOp::AndNot, Boundary::Keep);
        !extra.is_non_empty()
    }

    #[test]
    fn test_twelve_elements() {
        let sels = thinning_sels().unwrap();
        assert_eq!(sels.len(), 12);
        for sel in &sels {
            assert_eq!(sel.center(), (1, 1));
            assert_eq!(sel.hit().get(1, 1), Some(true));
        }
    }

    #[test]
    fn test_thin_line_is_unchanged() {
        let mut img = BitImage::with_size(20, 10);
        img.set_rect(3, 5, 12, 1, true);
        let mut out = img.clone();
        assert!(!Morphology::default().thin(&mut out).unwrap());
        assert_eq!(out, img);
    }

    #[test]
    fn test_thin_bar_to_skeleton() {
        let mut img = BitImage::with_size(20, 12);
        img.set_rect(2, 4, 16, 3, true);
        let mut m = Morphology::default();
        let mut out = img.clone();
        let passes = m.thin_to_skeleton(&mut out, 0).unwrap();
        assert!(passes >= 1);
        assert!(out.count() < img.count());
        assert!(out.is_non_empty());
        assert!(subset(&out, &img));
        assert!(!m.thin(&mut out).unwrap());
    }

    #[test]
    fn test_max_iters_limits_passes() {
        let mut img = BitImage::with_size(30, 30);
        img.set_rect(5, 5, 20, 20, true);
        let passes = Morphology::default().thin_to_skeleton(&mut img, 1).unwrap();
        assert_eq!(passes, 1);
    }
}
