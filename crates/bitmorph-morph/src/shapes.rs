//! Circles, rotated rectangles and lines
//!
//! Circles and rasterised lines are built as a [`Sel`] and go through the
//! run decomposition in [`crate::mask`]. Rotated rectangles and thick lines
//! instead move the image into a frame where the element is axis aligned,
//! apply the rectangle decomposition there and move it back:
//!
//! - rotated rectangle: rotate by `-angle`, rectangle op, rotate by `angle`
//! - line: skew rows so the line lies along the first axis, rectangle op,
//!   skew back. Steep lines are turned a quarter first.
//!
//! Rotation and skew drop pixels that leave the image, so near the border
//! the transformed paths are approximations of the mask path.

use crate::morphology::Morphology;
use crate::sel::{Sel, finite_angle};
use crate::MorphResult;
use bitmorph_core::BitImage;
use bitmorph_transform::{rotate_quarters_in_place, rotate_with, skew_with};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

type RectFn = fn(&mut Morphology, &mut BitImage, usize, usize);

impl Morphology {
    /// Erode by a disc of radius `r`.
    pub fn erode_circ(&mut self, image: &mut BitImage, r: usize) {
        self.erode_mask(image, &Sel::circle(r));
    }

    /// Dilate by a disc of radius `r`.
    pub fn dilate_circ(&mut self, image: &mut BitImage, r: usize) {
        self.dilate_mask(image, &Sel::circle(r));
    }

    /// Open by a disc of radius `r`.
    pub fn open_circ(&mut self, image: &mut BitImage, r: usize) {
        self.open_mask(image, &Sel::circle(r));
    }

    /// Close by a disc of radius `r`.
    pub fn close_circ(&mut self, image: &mut BitImage, r: usize) {
        self.close_mask(image, &Sel::circle(r));
    }

    fn rrect_op(
        &mut self,
        image: &mut BitImage,
        w: usize,
        h: usize,
        angle: f64,
        op: RectFn,
    ) -> MorphResult<()> {
        rotate_with(self.blitter.line_blit(), image, -angle)?;
        op(self, image, w, h);
        rotate_with(self.blitter.line_blit(), image, angle)?;
        Ok(())
    }

    /// Erode by a `w x h` rectangle turned by `angle` radians.
    ///
    /// # Errors
    ///
    /// Fails if `angle` is not finite.
    pub fn erode_rrect(
        &mut self,
        image: &mut BitImage,
        w: usize,
        h: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.rrect_op(image, w, h, angle, Morphology::erode_rect)
    }

    /// Dilate by a `w x h` rectangle turned by `angle` radians.
    ///
    /// # Errors
    ///
    /// Fails if `angle` is not finite.
    pub fn dilate_rrect(
        &mut self,
        image: &mut BitImage,
        w: usize,
        h: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.rrect_op(image, w, h, angle, Morphology::dilate_rect)
    }

    /// Open by a turned rectangle. See [`Morphology::erode_rrect`].
    pub fn open_rrect(
        &mut self,
        image: &mut BitImage,
        w: usize,
        h: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.rrect_op(image, w, h, angle, Morphology::open_rect)
    }

    /// Close by a turned rectangle. See [`Morphology::erode_rrect`].
    pub fn close_rrect(
        &mut self,
        image: &mut BitImage,
        w: usize,
        h: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.rrect_op(image, w, h, angle, Morphology::close_rect)
    }

    fn line_op(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
        rp: usize,
        op: RectFn,
    ) -> MorphResult<()> {
        // lines are undirected: bring the angle into (-pi/4, 3pi/4]
        let mut a = finite_angle(angle)?.rem_euclid(PI);
        if a > 3.0 * FRAC_PI_4 {
            a -= PI;
        }
        let steep = a > FRAC_PI_4;
        if steep {
            rotate_quarters_in_place(image, 1);
            a -= FRAC_PI_2;
        }
        let slope = a.tan();
        let length = (2.0 * r as f64 * a.cos()) as usize;
        log::trace!("line {r} at {angle}: slope {slope}, run {length}, steep {steep}");

        let center = (image.width() / 2) as f64;
        skew_with(self.blitter.line_blit(), image, -slope, center, false)?;
        op(self, image, length, rp);
        skew_with(self.blitter.line_blit(), image, slope, center, true)?;

        if steep {
            rotate_quarters_in_place(image, 3);
        }
        Ok(())
    }

    /// Erode by a line of half-length `r` and thickness `rp` pointing along
    /// `(cos angle, sin angle)`.
    ///
    /// # Errors
    ///
    /// Fails if `angle` is not finite.
    pub fn erode_line(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
        rp: usize,
    ) -> MorphResult<()> {
        self.line_op(image, r, angle, rp, Morphology::erode_rect)
    }

    /// Dilate by a thick line. See [`Morphology::erode_line`].
    pub fn dilate_line(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
        rp: usize,
    ) -> MorphResult<()> {
        self.line_op(image, r, angle, rp, Morphology::dilate_rect)
    }

    /// Open by a thick line.
    pub fn open_line(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
        rp: usize,
    ) -> MorphResult<()> {
        self.line_op(image, r, angle, rp, Morphology::open_rect)
    }

    /// Close by a thick line.
    pub fn close_line(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
        rp: usize,
    ) -> MorphResult<()> {
        self.line_op(image, r, angle, rp, Morphology::close_rect)
    }

    /// Erode by the rasterised line element [`Sel::line`].
    ///
    /// # Errors
    ///
    /// Fails if `angle` is not finite.
    pub fn erode_line_mask(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.erode_mask(image, &Sel::line(r, angle)?);
        Ok(())
    }

    /// Dilate by the rasterised line element [`Sel::line`].
    pub fn dilate_line_mask(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.dilate_mask(image, &Sel::line(r, angle)?);
        Ok(())
    }

    /// Open by the rasterised line element.
    pub fn open_line_mask(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.open_mask(image, &Sel::line(r, angle)?);
        Ok(())
    }

    /// Close by the rasterised line element.
    pub fn close_line_mask(
        &mut self,
        image: &mut BitImage,
        r: usize,
        angle: f64,
    ) -> MorphResult<()> {
        self.close_mask(image, &Sel::line(r, angle)?);
        Ok(())
    }
}

/// Erosion by a disc with the default context.
pub fn erode_circ(image: &BitImage, r: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().erode_circ(&mut out, r);
    out
}

/// Dilation by a disc with the default context.
pub fn dilate_circ(image: &BitImage, r: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().dilate_circ(&mut out, r);
    out
}

/// Opening by a disc with the default context.
pub fn open_circ(image: &BitImage, r: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().open_circ(&mut out, r);
    out
}

/// Closing by a disc with the default context.
pub fn close_circ(image: &BitImage, r: usize) -> BitImage {
    let mut out = image.clone();
    Morphology::default().close_circ(&mut out, r);
    out
}

/// Erosion by a turned rectangle with the default context.
pub fn erode_rrect(image: &BitImage, w: usize, h: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().erode_rrect(&mut out, w, h, angle)?;
    Ok(out)
}

/// Dilation by a turned rectangle with the default context.
pub fn dilate_rrect(image: &BitImage, w: usize, h: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().dilate_rrect(&mut out, w, h, angle)?;
    Ok(out)
}

/// Opening by a turned rectangle with the default context.
pub fn open_rrect(image: &BitImage, w: usize, h: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().open_rrect(&mut out, w, h, angle)?;
    Ok(out)
}

/// Closing by a turned rectangle with the default context.
pub fn close_rrect(image: &BitImage, w: usize, h: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().close_rrect(&mut out, w, h, angle)?;
    Ok(out)
}

/// Erosion by a thick line with the default context.
pub fn erode_line(image: &BitImage, r: usize, angle: f64, rp: usize) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().erode_line(&mut out, r, angle, rp)?;
    Ok(out)
}

/// Dilation by a thick line with the default context.
pub fn dilate_line(image: &BitImage, r: usize, angle: f64, rp: usize) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().dilate_line(&mut out, r, angle, rp)?;
    Ok(out)
}

/// Opening by a thick line with the default context.
pub fn open_line(image: &BitImage, r: usize, angle: f64, rp: usize) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().open_line(&mut out, r, angle, rp)?;
    Ok(out)
}

/// Closing by a thick line with the default context.
pub fn close_line(image: &BitImage, r: usize, angle: f64, rp: usize) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().close_line(&mut out, r, angle, rp)?;
    Ok(out)
}

/// Erosion by a rasterised line with the default context.
pub fn erode_line_mask(image: &BitImage, r: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().erode_line_mask(&mut out, r, angle)?;
    Ok(out)
}

/// Dilation by a rasterised line with the default context.
pub fn dilate_line_mask(image: &BitImage, r: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().dilate_line_mask(&mut out, r, angle)?;
    Ok(out)
}

/// Opening by a rasterised line with the default context.
pub fn open_line_mask(image: &BitImage, r: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().open_line_mask(&mut out, r, angle)?;
    Ok(out)
}

/// Closing by a rasterised line with the default context.
pub fn close_line_mask(image: &BitImage, r: usize, angle: f64) -> MorphResult<BitImage> {
    let mut out = image.clone();
    Morphology::default().close_line_mask(&mut out, r, angle)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::{dilate_rect, erode_rect};

    fn blob() -> BitImage {
        let mut img = BitImage::with_size(40, 40);
        img.set_rect(10, 12, 18, 15, true);
        img.set_rect(5, 30, 3, 3, true);
        img
    }

    #[test]
    fn test_dilate_circ_dot() {
        let mut img = BitImage::with_size(11, 11);
        img.set(5, 5, true).unwrap();
        let out = dilate_circ(&img, 2);
        // rows of 1, 3, 5, 3 and 1 pixels
        assert_eq!(out.count(), Sel::circle(2).hit_count());
        assert_eq!(out.get(5, 7), Some(true));
        assert_eq!(out.get(7, 7), Some(false));
    }

    #[test]
    fn test_rrect_at_zero_is_rect() {
        let img = blob();
        assert_eq!(erode_rrect(&img, 5, 3, 0.0).unwrap(), erode_rect(&img, 5, 3));
        assert_eq!(dilate_rrect(&img, 4, 6, 0.0).unwrap(), dilate_rect(&img, 4, 6));
    }

    #[test]
    fn test_line_at_zero_is_rect() {
        let img = blob();
        assert_eq!(erode_line(&img, 3, 0.0, 2).unwrap(), erode_rect(&img, 6, 2));
        assert_eq!(dilate_line(&img, 4, 0.0, 1).unwrap(), dilate_rect(&img, 8, 1));
    }

    #[test]
    fn test_vertical_line_is_tall_rect() {
        // a quarter turn there and back is exact, so a vertical line only
        // differs from a tall rectangle by centering
        let mut img = BitImage::with_size(30, 30);
        img.set(15, 15, true).unwrap();
        let out = dilate_line(&img, 3, FRAC_PI_2, 1).unwrap();
        assert_eq!(out.count(), 6);
        assert_eq!(out.count_rect(15, 12, 1, 7), 6);
    }

    #[test]
    fn test_line_rejects_nan() {
        let mut img = blob();
        assert!(Morphology::default().erode_line(&mut img, 3, f64::NAN, 1).is_err());
    }

    #[test]
    fn test_line_angle_is_periodic() {
        let mut img = BitImage::with_size(40, 40);
        img.set(20, 20, true).unwrap();
        let base = dilate_line(&img, 4, 0.3, 1).unwrap();
        assert_eq!(dilate_line(&img, 4, 0.3 + 1000.0 * PI, 1).unwrap(), base);
        assert_eq!(dilate_line(&img, 4, 0.3 - 7.0 * PI, 1).unwrap(), base);
        // huge angles reduce in one step instead of looping
        assert!(dilate_line(&img, 4, 1.0e20, 1).is_ok());
        assert!(dilate_line(&img, 4, -1.0e300, 1).is_ok());
        assert!(dilate_line(&img, 4, f64::INFINITY, 1).is_err());
    }

    #[test]
    fn test_rrect_past_quarter_turn() {
        let img = blob();
        // odd sides are symmetric, so half turns leave the rectangle alone
        assert_eq!(erode_rrect(&img, 5, 3, PI).unwrap(), erode_rect(&img, 5, 3));
        assert_eq!(erode_rrect(&img, 5, 3, -FRAC_PI_2).unwrap(), erode_rect(&img, 3, 5));
        assert_eq!(
            dilate_rrect(&img, 7, 3, 4.0 * PI + FRAC_PI_2).unwrap(),
            dilate_rect(&img, 3, 7)
        );
    }

    #[test]
    fn test_line_mask_rejects_infinite_angle() {
        let img = blob();
        assert!(erode_line_mask(&img, 3, f64::NAN).is_err());
        assert!(dilate_line_mask(&img, 3, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_line_mask_horizontal() {
        let mut img = BitImage::with_size(20, 5);
        img.set(10, 2, true).unwrap();
        let out = dilate_line_mask(&img, 3, 0.0).unwrap();
        assert_eq!(out.count(), 7);
        assert_eq!(out.count_rect(7, 2, 7, 1), 7);
    }
}
