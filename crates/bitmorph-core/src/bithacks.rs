//! Word-level bit helpers
//!
//! Words hold pixels most-significant bit first, so "left" is toward bit 31.

/// Mask with the lowest `n` bits set (`n` may be 0 or 32).
#[inline]
pub fn right_mask(n: u32) -> u32 {
    if n >= 32 { u32::MAX } else { (1u32 << n) - 1 }
}

/// Mask with the highest `n` bits set (`n` may be 0 or 32).
#[inline]
pub fn left_mask(n: u32) -> u32 {
    !right_mask(32 - n.min(32))
}

/// The top `n` bits of `w`, moved down to the low end.
#[inline]
pub(crate) fn top_bits(w: u32, n: u32) -> u32 {
    w.checked_shr(32 - n).unwrap_or(0)
}

/// Left shift that yields 0 for shifts of 32 or more.
#[inline]
pub(crate) fn shl(w: u32, n: u32) -> u32 {
    w.checked_shl(n).unwrap_or(0)
}

/// Transpose a 32x32 bit block in place.
///
/// Row `k` is `block[k]`, column `c` is bit `31 - c`. After the call, bit
/// (r, c) holds what bit (c, r) held before. The network swaps the two
/// off-diagonal 16x16 quadrants, then the 8x8 quadrants inside each of
/// those, and so on down to single bits.
pub fn transpose32(block: &mut [u32; 32]) {
    let mut j = 16usize;
    let mut m: u32 = 0x0000_ffff;
    while j != 0 {
        let mut k = 0usize;
        while k < 32 {
            let t = (block[k] ^ (block[k + j] >> j)) & m;
            block[k] ^= t;
            block[k + j] ^= t << j;
            k = (k + j + 1) & !j;
        }
        j >>= 1;
        m ^= m << j;
    }
}
