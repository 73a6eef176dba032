//! Process-wide strategy defaults
//!
//! Two switches pick the implementation used when a caller does not name
//! one explicitly:
//!
//! - the row compositing backend ([`LineBlitKind`])
//! - the rectangular decomposition ([`Decomposition`])
//!
//! Both are read once when a blitter or morphology context is created.
//! Changing them while other threads are mid-operation is allowed but
//! only affects operations started afterwards.

use crate::error::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

static LINE_BLIT: AtomicU8 = AtomicU8::new(LineBlitKind::Wordwise as u8);
static DECOMPOSITION: AtomicU8 = AtomicU8::new(Decomposition::Telescope as u8);

/// Row compositing backend
///
/// Both backends produce identical rows; they differ only in speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LineBlitKind {
    /// Whole aligned words between bit-serial head and tail
    #[default]
    Wordwise = 0,
    /// One bit at a time
    Bitwise = 1,
}

impl LineBlitKind {
    /// All backends, in selector order.
    pub const ALL: [LineBlitKind; 2] = [LineBlitKind::Wordwise, LineBlitKind::Bitwise];

    /// Resolve a numeric selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStrategy`] for anything but 0 or 1.
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(Self::Wordwise),
            1 => Ok(Self::Bitwise),
            _ => Err(Error::UnknownStrategy {
                kind: "line blit",
                index,
            }),
        }
    }

    /// Numeric selector of this backend.
    pub fn index(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for LineBlitKind {
    type Error = Error;

    fn try_from(index: u32) -> Result<Self> {
        Self::from_index(index)
    }
}

impl fmt::Display for LineBlitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wordwise => write!(f, "wordwise"),
            Self::Bitwise => write!(f, "bitwise"),
        }
    }
}

/// Algorithm used to build a 1-D erosion or dilation of length R from
/// O(log R) shifted compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Decomposition {
    /// Double a scratch mask until it spans at least R/2, then combine
    /// it into the image at two offsets
    #[default]
    Telescope = 0,
    /// Walk the binary digits of R and add the doubled mask wherever a
    /// digit is set
    BitPattern = 1,
    /// Double the image in place without a scratch mask
    Shifted = 2,
}

impl Decomposition {
    /// All decompositions, in selector order.
    pub const ALL: [Decomposition; 3] = [
        Decomposition::Telescope,
        Decomposition::BitPattern,
        Decomposition::Shifted,
    ];

    /// Resolve a numeric selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStrategy`] for anything outside 0..=2.
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(Self::Telescope),
            1 => Ok(Self::BitPattern),
            2 => Ok(Self::Shifted),
            _ => Err(Error::UnknownStrategy {
                kind: "decomposition",
                index,
            }),
        }
    }

    /// Numeric selector of this decomposition.
    pub fn index(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Decomposition {
    type Error = Error;

    fn try_from(index: u32) -> Result<Self> {
        Self::from_index(index)
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Telescope => write!(f, "telescope"),
            Self::BitPattern => write!(f, "bit-pattern"),
            Self::Shifted => write!(f, "shifted"),
        }
    }
}

/// Backend used by [`Blitter::default`](crate::Blitter).
pub fn default_line_blit() -> LineBlitKind {
    LineBlitKind::from_index(LINE_BLIT.load(Ordering::Relaxed) as u32).unwrap_or_default()
}

/// Change the default row compositing backend.
pub fn set_default_line_blit(kind: LineBlitKind) {
    log::debug!("default line blit set to {kind}");
    LINE_BLIT.store(kind as u8, Ordering::Relaxed);
}

/// Decomposition used by morphology contexts created with defaults.
pub fn default_decomposition() -> Decomposition {
    Decomposition::from_index(DECOMPOSITION.load(Ordering::Relaxed) as u32).unwrap_or_default()
}

/// Change the default rectangular decomposition.
pub fn set_default_decomposition(decomposition: Decomposition) {
    log::debug!("default decomposition set to {decomposition}");
    DECOMPOSITION.store(decomposition as u8, Ordering::Relaxed);
}
