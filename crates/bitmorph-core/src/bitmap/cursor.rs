//! Sequential bit cursors over packed words
//!
//! [`BitSrc`] reads and [`BitSnk`] writes a contiguous range of bits in a
//! `u32` buffer. Bit 0 of the range is the most significant bit of the
//! first word. Both cursors keep the partially consumed word in a small
//! cache so single-bit steps do not touch memory every time, and both offer
//! whole-word operations for the aligned middle of a row.
//!
//! The starting offset ("skip") may exceed a word; the cursor jumps over
//! whole words first. Skipping to or past the end of the range yields an
//! exhausted cursor, which is a valid state. Reading or writing past the end
//! of the declared range is a bug in the caller and panics.

use crate::bithacks::{right_mask, shl, top_bits};

/// Read cursor over a packed bit range.
#[derive(Debug, Clone)]
pub struct BitSrc<'a> {
    words: &'a [u32],
    next: usize,
    nbits: usize,
    cur: u32,
    ncur: u32,
    pos: usize,
}

impl<'a> BitSrc<'a> {
    /// Start reading `words` at bit `skip` of a range that is `nbits` long.
    pub fn new(words: &'a [u32], nbits: usize, skip: usize) -> Self {
        let mut src = Self {
            words,
            next: 0,
            nbits,
            cur: 0,
            ncur: 0,
            pos: skip,
        };
        if skip >= nbits {
            src.nbits = 0;
            src.pos = nbits;
            return src;
        }
        src.next = skip / 32;
        src.nbits -= src.next * 32;
        let rest = (skip % 32) as u32;
        if rest > 0 {
            src.load();
            src.cur <<= rest;
            src.ncur -= rest;
            src.nbits -= rest as usize;
        }
        src
    }

    #[inline]
    fn load(&mut self) {
        if self.ncur == 0 {
            self.cur = self.words[self.next];
            self.next += 1;
            self.ncur = 32;
        }
    }

    #[inline]
    fn need(&self, n: usize) {
        assert!(
            self.nbits >= n,
            "BitSrc: read of {n} bits with only {} left",
            self.nbits
        );
    }

    /// Bits left before the end of the range.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.nbits
    }

    /// Position of the next bit, counted from the start of the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// `true` while unread bits remain.
    #[inline]
    pub fn has_bits(&self) -> bool {
        self.nbits > 0
    }

    /// At least a whole word is left.
    #[inline]
    pub fn has_words(&self) -> bool {
        self.nbits >= 32
    }

    /// The next bit starts a buffer word.
    #[inline]
    pub fn is_word_aligned(&self) -> bool {
        self.ncur == 0
    }

    /// Cached bits not yet consumed (0 when aligned).
    #[inline]
    pub fn bits_left_in_word(&self) -> usize {
        (self.ncur as usize).min(self.nbits)
    }

    /// Consume one bit.
    #[inline]
    pub fn get_bit(&mut self) -> bool {
        self.need(1);
        self.load();
        let bit = self.cur >> 31 != 0;
        self.cur <<= 1;
        self.ncur -= 1;
        self.nbits -= 1;
        self.pos += 1;
        bit
    }

    /// Look at the next bit without consuming it.
    #[inline]
    pub fn peek_bit(&self) -> bool {
        self.need(1);
        if self.ncur == 0 {
            self.words[self.next] >> 31 != 0
        } else {
            self.cur >> 31 != 0
        }
    }

    /// Consume one bit without looking at it.
    #[inline]
    pub fn skip_bit(&mut self) {
        self.get_bit();
    }

    /// Consume `n` bits (1..=32), returned right-aligned with the first bit
    /// read as the most significant.
    pub fn get_bits(&mut self, n: u32) -> u32 {
        assert!((1..=32).contains(&n), "BitSrc: get_bits({n}) out of range");
        self.need(n as usize);
        self.load();
        let result = if n <= self.ncur {
            let r = top_bits(self.cur, n);
            self.cur = shl(self.cur, n);
            self.ncur -= n;
            r
        } else {
            // stitch the cached tail with the head of the next word
            let have = self.ncur;
            let rest = n - have;
            let hi = top_bits(self.cur, have);
            self.cur = self.words[self.next];
            self.next += 1;
            let r = (hi << rest) | top_bits(self.cur, rest);
            self.cur = shl(self.cur, rest);
            self.ncur = 32 - rest;
            r
        };
        self.nbits -= n as usize;
        self.pos += n as usize;
        result
    }

    /// Advance over `n` bits.
    pub fn skip(&mut self, n: usize) {
        self.need(n);
        let mut n = n;
        while n > 0 {
            if self.ncur == 0 && n >= 32 {
                self.skip_word_aligned();
                n -= 32;
            } else {
                let k = n.min(32) as u32;
                self.get_bits(k);
                n -= k as usize;
            }
        }
    }

    /// Consume a whole buffer word; the cursor must be aligned.
    #[inline]
    pub fn get_word_aligned(&mut self) -> u32 {
        assert!(self.ncur == 0, "BitSrc: aligned word read while unaligned");
        self.need(32);
        let w = self.words[self.next];
        self.next += 1;
        self.nbits -= 32;
        self.pos += 32;
        w
    }

    /// The next 32 bits without consuming them.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not word aligned or fewer than 32 bits remain.
    #[inline]
    pub fn peek_word_aligned(&self) -> u32 {
        assert!(self.ncur == 0, "BitSrc: aligned word peek while unaligned");
        self.need(32);
        self.words[self.next]
    }

    /// Consume 32 bits from a word-aligned position.
    #[inline]
    pub fn skip_word_aligned(&mut self) {
        self.get_word_aligned();
    }

    /// Consume 32 bits from any position, stitching two buffer words when
    /// the cursor is not aligned.
    #[inline]
    pub fn get_word(&mut self) -> u32 {
        if self.ncur == 0 {
            return self.get_word_aligned();
        }
        self.need(32);
        let next = self.words[self.next];
        self.next += 1;
        let w = self.cur | (next >> self.ncur);
        self.cur = next << (32 - self.ncur);
        self.nbits -= 32;
        self.pos += 32;
        w
    }

    /// Find the next run of set bits.
    ///
    /// Returns `[start, end)` in buffer positions (see [`position`]) and
    /// leaves the cursor on the first clear bit after the run, or `None`
    /// when no set bit remains. All-zero and all-one words are skipped
    /// whole when the cursor is aligned.
    ///
    /// [`position`]: BitSrc::position
    pub fn get_run(&mut self) -> Option<(usize, usize)> {
        loop {
            if !self.has_bits() {
                return None;
            }
            if self.ncur == 0 && self.has_words() && self.peek_word_aligned() == 0 {
                self.skip_word_aligned();
                continue;
            }
            if self.peek_bit() {
                break;
            }
            self.skip_bit();
        }
        let start = self.pos;
        while self.has_bits() {
            if self.ncur == 0 && self.has_words() && self.peek_word_aligned() == u32::MAX {
                self.skip_word_aligned();
                continue;
            }
            if !self.peek_bit() {
                break;
            }
            self.skip_bit();
        }
        Some((start, self.pos))
    }
}

/// Write cursor over a packed bit range.
///
/// Bits are gathered in a pending word and stored once the word is full.
/// [`close`](BitSnk::close) merges a trailing partial word with the bits
/// already in the buffer; it runs automatically on drop, so every exit path
/// preserves the untouched tail of the last word. Closing twice is harmless.
///
/// While writing, [`current_bit`](BitSnk::current_bit) and
/// [`current_word`](BitSnk::current_word) read the destination bits that are
/// about to be overwritten, which is what read-modify-write compositing needs.
#[derive(Debug)]
pub struct BitSnk<'a> {
    words: &'a mut [u32],
    next: usize,
    nbits: usize,
    cur: u32,
    ncur: u32,
    closed: bool,
}

impl<'a> BitSnk<'a> {
    /// Start writing `words` at bit `skip` of a range that is `nbits` long.
    ///
    /// Bits before `skip` in the first touched word are preserved.
    pub fn new(words: &'a mut [u32], nbits: usize, skip: usize) -> Self {
        let mut snk = Self {
            words,
            next: 0,
            nbits,
            cur: 0,
            ncur: 0,
            closed: false,
        };
        if skip >= nbits {
            snk.nbits = 0;
            return snk;
        }
        snk.next = skip / 32;
        snk.nbits -= snk.next * 32;
        let rest = (skip % 32) as u32;
        if rest > 0 {
            snk.cur = snk.words[snk.next] >> (32 - rest);
            snk.ncur = rest;
            snk.nbits -= rest as usize;
        }
        snk
    }

    #[inline]
    fn flush(&mut self) {
        if self.ncur == 32 {
            self.words[self.next] = self.cur;
            self.next += 1;
            self.ncur = 0;
        }
    }

    #[inline]
    fn need(&self, n: usize) {
        assert!(!self.closed, "BitSnk: write after close");
        assert!(
            self.nbits >= n,
            "BitSnk: write of {n} bits with only {} left",
            self.nbits
        );
    }

    /// Bits that can still be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.nbits
    }

    /// `true` while at least one bit can be written.
    #[inline]
    pub fn has_bits(&self) -> bool {
        self.nbits > 0
    }

    /// `true` while at least a whole word can be written.
    #[inline]
    pub fn has_words(&self) -> bool {
        self.nbits >= 32
    }

    /// `true` when the next write starts a destination word.
    #[inline]
    pub fn is_word_aligned(&self) -> bool {
        self.ncur == 0
    }

    /// `true` once the pending bits have been flushed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The destination bit the next `put_bit` will replace.
    #[inline]
    pub fn current_bit(&self) -> bool {
        self.need(1);
        self.words[self.next] >> (31 - self.ncur) & 1 != 0
    }

    /// The destination word the next `put_word_aligned` will replace.
    #[inline]
    pub fn current_word(&self) -> u32 {
        assert!(self.ncur == 0, "BitSnk: aligned word peek while unaligned");
        self.need(32);
        self.words[self.next]
    }

    /// Write one bit.
    ///
    /// # Panics
    ///
    /// Panics if the sink is full.
    #[inline]
    pub fn put_bit(&mut self, bit: bool) {
        self.need(1);
        self.cur = (self.cur << 1) | bit as u32;
        self.ncur += 1;
        self.nbits -= 1;
        self.flush();
    }

    /// Write `len` copies of `bit`, storing whole words directly once the
    /// cursor reaches a word boundary.
    pub fn put_run(&mut self, len: usize, bit: bool) {
        self.need(len);
        let mut len = len;
        while len > 0 && self.ncur != 0 {
            self.put_bit(bit);
            len -= 1;
        }
        let fill = if bit { u32::MAX } else { 0 };
        while len >= 32 {
            self.put_word_aligned(fill);
            len -= 32;
        }
        for _ in 0..len {
            self.put_bit(bit);
        }
    }

    /// Store a whole word; the cursor must be aligned.
    #[inline]
    pub fn put_word_aligned(&mut self, w: u32) {
        assert!(self.ncur == 0, "BitSnk: aligned word write while unaligned");
        self.need(32);
        self.words[self.next] = w;
        self.next += 1;
        self.nbits -= 32;
    }

    /// Write 32 bits from any position.
    #[inline]
    pub fn put_word(&mut self, w: u32) {
        if self.ncur == 0 {
            self.put_word_aligned(w);
            return;
        }
        self.need(32);
        self.words[self.next] = (self.cur << (32 - self.ncur)) | (w >> self.ncur);
        self.next += 1;
        self.cur = w;
        self.nbits -= 32;
    }

    /// Merge the pending partial word into the buffer.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.flush();
        if self.ncur == 0 {
            return;
        }
        let keep = right_mask(32 - self.ncur);
        let w = &mut self.words[self.next];
        *w = (self.cur << (32 - self.ncur)) | (*w & keep);
        self.ncur = 0;
    }
}

impl Drop for BitSnk<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
