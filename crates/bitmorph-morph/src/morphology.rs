//! Morphology context
//!
//! A [`Morphology`] bundles the [`Blitter`] that composites images with the
//! [`Decomposition`] used for rectangles. Every operation is a method on
//! it; the crate's free functions create one from the process-wide defaults
//! in [`bitmorph_core::config`].

use bitmorph_core::config;
use bitmorph_core::{BitImage, BlitOp, Blitter, Boundary, Decomposition, LineBlitKind};

/// Axis a line operation runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Across rows (first coordinate, blit offset `dx`)
    X,
    /// Within rows (second coordinate, blit offset `dy`)
    Y,
}

impl Axis {
    /// Blit offset `(dx, dy)` for a shift of `d` along this axis.
    #[inline]
    pub fn offset(self, d: isize) -> (isize, isize) {
        match self {
            Axis::X => (d, 0),
            Axis::Y => (0, d),
        }
    }
}

/// Erosion or dilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphOp {
    /// Intersection of shifted copies
    Erode,
    /// Union of shifted copies
    Dilate,
}

impl MorphOp {
    /// Compositing operator.
    #[inline]
    pub fn blit_op(self) -> BlitOp {
        match self {
            MorphOp::Erode => BlitOp::And,
            MorphOp::Dilate => BlitOp::Or,
        }
    }

    /// Value that leaves the result unchanged when combined in; pixels
    /// outside the image behave as this value.
    #[inline]
    pub fn identity(self) -> bool {
        matches!(self, MorphOp::Erode)
    }

    /// Boundary that fills uncovered pixels with the identity.
    #[inline]
    pub fn identity_boundary(self) -> Boundary {
        match self {
            MorphOp::Erode => Boundary::Set,
            MorphOp::Dilate => Boundary::Clear,
        }
    }
}

/// Compositing engine plus rectangle decomposition.
#[derive(Debug)]
pub struct Morphology {
    pub(crate) blitter: Blitter,
    decomposition: Decomposition,
}

impl Default for Morphology {
    /// A context built from the process-wide defaults.
    fn default() -> Self {
        Self::new(config::default_line_blit(), config::default_decomposition())
    }
}

impl Morphology {
    /// Context with an explicit row strategy and decomposition.
    pub fn new(kind: LineBlitKind, decomposition: Decomposition) -> Self {
        Self::with_blitter(Blitter::new(kind), decomposition)
    }

    /// Context around an existing blitter, keeping its count.
    pub fn with_blitter(blitter: Blitter, decomposition: Decomposition) -> Self {
        log::trace!(
            "morphology using {} rows and {} decomposition",
            blitter.kind(),
            decomposition
        );
        Self {
            blitter,
            decomposition,
        }
    }

    /// Decomposition used for rectangles.
    #[inline]
    pub fn decomposition(&self) -> Decomposition {
        self.decomposition
    }

    /// Switch the rectangle decomposition for later operations.
    pub fn set_decomposition(&mut self, decomposition: Decomposition) {
        self.decomposition = decomposition;
    }

    /// The blitter all operations go through.
    #[inline]
    pub fn blitter(&self) -> &Blitter {
        &self.blitter
    }

    /// Mutable access, e.g. to reset the blit count.
    #[inline]
    pub fn blitter_mut(&mut self) -> &mut Blitter {
        &mut self.blitter
    }

    /// 2D blits performed by this context so far.
    #[inline]
    pub fn blit_count(&self) -> u64 {
        self.blitter.count()
    }

    /// `image op= mask` shifted by `d` along `axis`, keeping uncovered
    /// pixels.
    pub(crate) fn combine(
        &mut self,
        image: &mut BitImage,
        mask: &BitImage,
        axis: Axis,
        d: isize,
        op: MorphOp,
    ) {
        let (dx, dy) = axis.offset(d);
        self.blitter
            .blit(image, mask, dx, dy, op.blit_op(), Boundary::Keep);
    }

    /// `image op= image` shifted by `d` along `axis`, keeping uncovered
    /// pixels.
    pub(crate) fn combine_self(&mut self, image: &mut BitImage, axis: Axis, d: isize, op: MorphOp) {
        let (dx, dy) = axis.offset(d);
        self.blitter
            .blit_self(image, dx, dy, op.blit_op(), Boundary::Keep);
    }
}
