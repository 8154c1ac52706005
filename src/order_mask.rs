//! Sparse order-presence index.
//!
//! Bit `o` of an [`OrderMask`] says that the homogeneous block of order `o`
//! holds at least one nonzero coefficient. Order 0 (the constant term) is
//! tracked separately by the series, so series never set bit 0.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::bit;

/// Largest order an [`OrderMask`] can index.
pub const MAX_ORDER: u8 = bit::MAX_BIT as u8;

/// Set of orders in `0..=MAX_ORDER`, backed by a `u64`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OrderMask(u64);

impl OrderMask {
    /// The empty set.
    pub const EMPTY: OrderMask = OrderMask(0);

    /// Wrap raw bits.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        OrderMask(bits)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Mask with every order in `lo..=hi` set. Empty when `lo > hi`.
    #[inline]
    pub fn range(lo: u8, hi: u8) -> Self {
        if lo > hi {
            return OrderMask::EMPTY;
        }
        OrderMask(bit::lcut(bit::hcut(u64::MAX, hi as u32), lo as u32))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn set(&mut self, o: u8) {
        debug_assert!(o <= MAX_ORDER);
        self.0 = bit::set(self.0, o as u32);
    }

    #[inline]
    pub fn get(self, o: u8) -> bool {
        o <= MAX_ORDER && bit::get(self.0, o as u32)
    }

    #[inline]
    pub fn clear(&mut self, o: u8) {
        debug_assert!(o <= MAX_ORDER);
        self.0 = bit::clr(self.0, o as u32);
    }

    /// Copy with every order `< o` removed.
    #[inline]
    pub fn low_cut(self, o: u8) -> Self {
        OrderMask(bit::lcut(self.0, o as u32))
    }

    /// Copy with every order `> o` removed.
    #[inline]
    pub fn high_cut(self, o: u8) -> Self {
        OrderMask(bit::hcut(self.0, o as u32))
    }

    /// Lowest present order, `None` when empty.
    #[inline]
    pub fn lowest(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(bit::lowest(self.0) as u8)
        }
    }

    /// Highest present order, `None` when empty.
    #[inline]
    pub fn highest(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(bit::highest(self.0) as u8)
        }
    }

    /// Present orders in increasing order. Cost is proportional to the
    /// number of set bits, not the width.
    #[inline]
    pub fn iter(self) -> Orders {
        Orders(self.0)
    }
}

impl BitOr for OrderMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        OrderMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for OrderMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for OrderMask {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        OrderMask(self.0 & rhs.0)
    }
}

impl fmt::Debug for OrderMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl IntoIterator for OrderMask {
    type Item = u8;
    type IntoIter = Orders;
    fn into_iter(self) -> Orders {
        self.iter()
    }
}

/// Iterator over the orders of an [`OrderMask`].
#[derive(Clone, Debug)]
pub struct Orders(u64);

impl Iterator for Orders {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let o = bit::lowest(self.0);
        self.0 = bit::clr(self.0, o);
        Some(o as u8)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Orders {}
