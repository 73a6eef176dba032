//! Row compositing and 2D blits
//!
//! A blit combines a source ("mask") into a destination under a [`BlitOp`]:
//!
//! - [`LineBlit`] combines one row with a bit-shifted source row. Two
//!   implementations exist, [`BitwiseLineBlit`] and [`WordwiseLineBlit`],
//!   and they produce identical rows.
//! - [`Blitter`] owns a line strategy and applies it to every row of an
//!   image at a pixel offset `(dx, dy)`, filling the destination regions the
//!   shifted mask does not cover according to a [`Boundary`] policy.
//!
//! Offsets follow one rule everywhere: after a blit at `(dx, dy)`,
//! `dest(i, j) = op(dest(i, j), mask(i - dx, j - dy))`.

use super::{BitImage, BitSnk, BitSrc};
use crate::config::{self, LineBlitKind};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static TOTAL_BLITS: AtomicU64 = AtomicU64::new(0);

/// Number of 2D blits performed by every [`Blitter`] in the process.
pub fn total_blit_count() -> u64 {
    TOTAL_BLITS.load(Ordering::Relaxed)
}

/// Boolean operator combining a destination bit `d` with a source bit `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlitOp {
    /// `s`
    Set,
    /// `!s`
    SetNot,
    /// `d & s`
    And,
    /// `d | s`
    Or,
    /// `d & !s`
    AndNot,
    /// `d | !s`
    OrNot,
    /// `d ^ s`
    Xor,
}

impl BlitOp {
    pub const ALL: [BlitOp; 7] = [
        BlitOp::Set,
        BlitOp::SetNot,
        BlitOp::And,
        BlitOp::Or,
        BlitOp::AndNot,
        BlitOp::OrNot,
        BlitOp::Xor,
    ];

    /// Apply the operator to 32 bit pairs at once.
    #[inline]
    pub fn apply(self, d: u32, s: u32) -> u32 {
        match self {
            BlitOp::Set => s,
            BlitOp::SetNot => !s,
            BlitOp::And => d & s,
            BlitOp::Or => d | s,
            BlitOp::AndNot => d & !s,
            BlitOp::OrNot => d | !s,
            BlitOp::Xor => d ^ s,
        }
    }

    #[inline]
    fn apply_bit(self, d: bool, s: bool) -> bool {
        self.apply(d as u32, s as u32) & 1 != 0
    }
}

/// What happens to destination pixels the shifted mask does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Boundary {
    /// Leave them as they are
    #[default]
    Keep,
    /// Clear them
    Clear,
    /// Set them
    Set,
}

impl Boundary {
    #[inline]
    fn fill_value(self) -> Option<bool> {
        match self {
            Boundary::Keep => None,
            Boundary::Clear => Some(false),
            Boundary::Set => Some(true),
        }
    }
}

/// Strategy for combining one row with a shifted source row.
///
/// With `shift >= 0` the source starts at destination bit `shift`; with
/// `shift < 0` the first `-shift` source bits are dropped. Only the
/// overlapping bits change.
pub trait LineBlit: fmt::Debug + Send + Sync {
    fn kind(&self) -> LineBlitKind;

    /// `dest[j] = op(dest[j], src[j - shift])` wherever both exist.
    fn blit_row(
        &self,
        dest: &mut [u32],
        dest_bits: usize,
        src: &[u32],
        src_bits: usize,
        shift: isize,
        op: BlitOp,
    );

    /// Combine a row with a shifted copy of itself.
    ///
    /// The row is snapshotted first so that no source bit is read after it
    /// has been overwritten.
    fn blit_row_in_place(&self, row: &mut [u32], bits: usize, shift: isize, op: BlitOp) {
        let snapshot = row[..bits.div_ceil(32)].to_vec();
        self.blit_row(row, bits, &snapshot, bits, shift, op);
    }
}

fn cursors<'d, 's>(
    dest: &'d mut [u32],
    dest_bits: usize,
    src: &'s [u32],
    src_bits: usize,
    shift: isize,
) -> (BitSnk<'d>, BitSrc<'s>) {
    let (dskip, sskip) = if shift >= 0 {
        (shift as usize, 0)
    } else {
        (0, shift.unsigned_abs())
    };
    (
        BitSnk::new(dest, dest_bits, dskip),
        BitSrc::new(src, src_bits, sskip),
    )
}

#[inline]
fn step_bit(dp: &mut BitSnk<'_>, sp: &mut BitSrc<'_>, op: BlitOp) {
    let d = dp.current_bit();
    let s = sp.get_bit();
    dp.put_bit(op.apply_bit(d, s));
}

/// Bit-serial row strategy; the reference the word strategy is checked
/// against.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitwiseLineBlit;

impl LineBlit for BitwiseLineBlit {
    fn kind(&self) -> LineBlitKind {
        LineBlitKind::Bitwise
    }

    fn blit_row(
        &self,
        dest: &mut [u32],
        dest_bits: usize,
        src: &[u32],
        src_bits: usize,
        shift: isize,
        op: BlitOp,
    ) {
        let (mut dp, mut sp) = cursors(dest, dest_bits, src, src_bits, shift);
        while dp.has_bits() && sp.has_bits() {
            step_bit(&mut dp, &mut sp, op);
        }
        dp.close();
    }
}

/// Row strategy that works on whole destination words once the destination
/// cursor is aligned, with bit-serial head and tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordwiseLineBlit;

impl LineBlit for WordwiseLineBlit {
    fn kind(&self) -> LineBlitKind {
        LineBlitKind::Wordwise
    }

    fn blit_row(
        &self,
        dest: &mut [u32],
        dest_bits: usize,
        src: &[u32],
        src_bits: usize,
        shift: isize,
        op: BlitOp,
    ) {
        let (mut dp, mut sp) = cursors(dest, dest_bits, src, src_bits, shift);
        while dp.has_bits() && sp.has_bits() && !dp.is_word_aligned() {
            step_bit(&mut dp, &mut sp, op);
        }
        while dp.has_words() && sp.has_words() {
            let d = dp.current_word();
            let s = sp.get_word();
            dp.put_word_aligned(op.apply(d, s));
        }
        while dp.has_bits() && sp.has_bits() {
            step_bit(&mut dp, &mut sp, op);
        }
        dp.close();
    }
}

impl LineBlitKind {
    /// Instantiate the strategy.
    pub fn create(self) -> Box<dyn LineBlit> {
        match self {
            LineBlitKind::Wordwise => Box::new(WordwiseLineBlit),
            LineBlitKind::Bitwise => Box::new(BitwiseLineBlit),
        }
    }
}

/// Fill the bits of a row outside `[shift, shift + src_bits)`.
fn fix_row_boundary(row: &mut [u32], bits: usize, src_bits: usize, shift: isize, value: bool) {
    let lo = shift.clamp(0, bits as isize) as usize;
    let hi = shift
        .saturating_add(src_bits as isize)
        .clamp(lo as isize, bits as isize) as usize;
    BitSnk::new(row, bits, 0).put_run(lo, value);
    BitSnk::new(row, bits, hi).put_run(bits - hi, value);
}

/// 2D compositing engine.
///
/// Holds the active [`LineBlit`] strategy and counts the blits it performs.
#[derive(Debug)]
pub struct Blitter {
    line: Box<dyn LineBlit>,
    count: u64,
}

impl Default for Blitter {
    /// A blitter using the process-wide default backend.
    fn default() -> Self {
        Self::new(config::default_line_blit())
    }
}

impl Blitter {
    /// Blitter over the row strategy `kind`.
    pub fn new(kind: LineBlitKind) -> Self {
        Self::with_line_blit(kind.create())
    }

    /// Blitter over an already constructed row strategy.
    pub fn with_line_blit(line: Box<dyn LineBlit>) -> Self {
        log::trace!("blitter using {} rows", line.kind());
        Self { line, count: 0 }
    }

    /// Replace the row strategy; the operation count is kept.
    pub fn set_line_blit(&mut self, line: Box<dyn LineBlit>) {
        self.line = line;
    }

    /// The row strategy used for every row of a 2D blit.
    #[inline]
    pub fn line_blit(&self) -> &dyn LineBlit {
        self.line.as_ref()
    }

    /// Which row strategy this blitter uses.
    #[inline]
    pub fn kind(&self) -> LineBlitKind {
        self.line.kind()
    }

    /// 2D blits performed since creation or the last reset.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Zero the per-blitter count. The process-wide total is not affected.
    pub fn reset_count(&mut self) {
        self.count = 0;
    }

    fn record(&mut self) {
        self.count += 1;
        TOTAL_BLITS.fetch_add(1, Ordering::Relaxed);
    }

    /// Combine `mask` into `image` at offset `(dx, dy)`.
    ///
    /// Destination rows whose source row `i - dx` lies outside `mask`, and
    /// the bits of other rows not covered by the shifted mask row, are
    /// handled by `boundary`.
    pub fn blit(
        &mut self,
        image: &mut BitImage,
        mask: &BitImage,
        dx: isize,
        dy: isize,
        op: BlitOp,
        boundary: Boundary,
    ) {
        self.record();
        let (width, bits) = image.dims();
        let (mwidth, mbits) = mask.dims();
        for step in 0..width {
            let i = if dx > 0 { width - 1 - step } else { step };
            let row = image.line_mut(i);
            match source_row(i, dx, mwidth) {
                Some(oi) => {
                    self.line.blit_row(row, bits, mask.line(oi), mbits, dy, op);
                    if let Some(value) = boundary.fill_value() {
                        fix_row_boundary(row, bits, mbits, dy, value);
                    }
                }
                None => fill_row(row, bits, boundary),
            }
        }
    }

    /// Combine `image` with a copy of itself shifted by `(dx, dy)`.
    ///
    /// Rows are visited from the far edge inward when `dx > 0` (and from the
    /// near edge otherwise), so every source row is read before it is
    /// overwritten. A row combined with itself goes through
    /// [`LineBlit::blit_row_in_place`].
    pub fn blit_self(
        &mut self,
        image: &mut BitImage,
        dx: isize,
        dy: isize,
        op: BlitOp,
        boundary: Boundary,
    ) {
        self.record();
        let (width, bits) = image.dims();
        for step in 0..width {
            let i = if dx > 0 { width - 1 - step } else { step };
            match source_row(i, dx, width) {
                Some(oi) if oi == i => {
                    let row = image.line_mut(i);
                    self.line.blit_row_in_place(row, bits, dy, op);
                    if let Some(value) = boundary.fill_value() {
                        fix_row_boundary(row, bits, bits, dy, value);
                    }
                }
                Some(oi) => {
                    let (row, src) = image.line_pair_mut(i, oi);
                    self.line.blit_row(row, bits, src, bits, dy, op);
                    if let Some(value) = boundary.fill_value() {
                        fix_row_boundary(row, bits, bits, dy, value);
                    }
                }
                None => fill_row(image.line_mut(i), bits, boundary),
            }
        }
    }
}

#[inline]
fn source_row(i: usize, dx: isize, rows: usize) -> Option<usize> {
    let oi = i as isize - dx;
    (0..rows as isize).contains(&oi).then_some(oi as usize)
}

fn fill_row(row: &mut [u32], bits: usize, boundary: Boundary) {
    if let Some(value) = boundary.fill_value() {
        BitSnk::new(row, bits, 0).put_run(bits, value);
    }
}
