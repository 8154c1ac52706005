//! Fixed-width (64-bit) bit primitives.
//!
//! Every structural mutation of a series goes through these, so all of them
//! are O(1). `lowest`/`highest` lower to `tzcnt`/`lzcnt` (or `bsf`/`bsr`) on
//! targets that have them; `lowest_portable`/`highest_portable` are the
//! branchy fallbacks and must agree with the fast path on every nonzero input.

/// Bit width of a mask. Orders `0..WIDTH` are representable.
pub const WIDTH: u32 = u64::BITS;

/// Highest representable bit index.
pub const MAX_BIT: u32 = WIDTH - 1;

/// `b` with bit `n` set.
#[inline]
pub const fn set(b: u64, n: u32) -> u64 {
    b | (1u64 << n)
}

/// `true` if bit `n` of `b` is set.
#[inline]
pub const fn get(b: u64, n: u32) -> bool {
    b & (1u64 << n) != 0
}

/// `b` with bit `n` cleared.
#[inline]
pub const fn clr(b: u64, n: u32) -> u64 {
    b & !(1u64 << n)
}

/// Clear bits `< n`.
#[inline]
pub const fn lcut(b: u64, n: u32) -> u64 {
    if n >= WIDTH {
        0
    } else {
        b & !((1u64 << n) - 1)
    }
}

/// Clear bits `> n`.
#[inline]
pub const fn hcut(b: u64, n: u32) -> u64 {
    if n >= MAX_BIT {
        b
    } else {
        b & ((2u64 << n) - 1)
    }
}

/// Index of the lowest set bit. `b` must be nonzero.
#[inline]
pub fn lowest(b: u64) -> u32 {
    debug_assert!(b != 0, "lowest set bit of an empty mask");
    b.trailing_zeros()
}

/// Index of the highest set bit. `b` must be nonzero.
#[inline]
pub fn highest(b: u64) -> u32 {
    debug_assert!(b != 0, "highest set bit of an empty mask");
    MAX_BIT - b.leading_zeros()
}

/// Portable binary-search version of [`lowest`].
pub fn lowest_portable(mut b: u64) -> u32 {
    debug_assert!(b != 0, "lowest set bit of an empty mask");
    let mut n = 0;
    let mut shift = 32;
    while shift > 0 {
        let low = b & ((1u64 << shift) - 1);
        if low == 0 {
            b >>= shift;
            n += shift;
        } else {
            b = low;
        }
        shift >>= 1;
    }
    n
}

/// Portable binary-search version of [`highest`].
pub fn highest_portable(mut b: u64) -> u32 {
    debug_assert!(b != 0, "highest set bit of an empty mask");
    let mut n = 0;
    let mut shift = 32;
    while shift > 0 {
        if b >> shift != 0 {
            b >>= shift;
            n += shift;
        }
        shift >>= 1;
    }
    n
}
