//! Monomial utilities.
//!
//! A monomial is a slice of per-variable exponents, `[2, 0, 1]` meaning
//! `x₀² x₂`. All binary operations require equal lengths.

use std::cmp::Ordering;
use std::fmt::Write;

/// Parse a monomial from a string of digits, letters standing for 10..35
/// (`"10"` is `[1, 0]`, `"A1"` is `[10, 1]`). Parsing stops at the first
/// character that is neither. Returns the number of exponents written.
pub fn parse(s: &str, out: &mut [u8]) -> usize {
    let mut n = 0;
    for (slot, ch) in out.iter_mut().zip(s.chars()) {
        match ch.to_digit(36) {
            Some(d) => *slot = d as u8,
            None => break,
        }
        n += 1;
    }
    n
}

/// Total order `Σ a[i]`.
#[inline]
pub fn order(a: &[u8]) -> u32 {
    a.iter().map(|&e| e as u32).sum()
}

/// Smallest exponent (`u8::MAX` when empty).
pub fn min(a: &[u8]) -> u8 {
    a.iter().copied().min().unwrap_or(u8::MAX)
}

/// Largest exponent (`0` when empty).
pub fn max(a: &[u8]) -> u8 {
    a.iter().copied().max().unwrap_or(0)
}

/// Lexicographic comparison, first variable most significant.
#[inline]
pub fn cmp(a: &[u8], b: &[u8]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    a.cmp(b)
}

/// Lexicographic comparison, last variable most significant.
pub fn rcmp(a: &[u8], b: &[u8]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    a.iter().rev().cmp(b.iter().rev())
}

/// `r = a + b`.
pub fn add(a: &[u8], b: &[u8], r: &mut [u8]) {
    debug_assert!(a.len() == b.len() && a.len() == r.len());
    for ((r, &a), &b) in r.iter_mut().zip(a).zip(b) {
        *r = a + b;
    }
}

/// `r = a - b`. Every exponent of `b` must not exceed `a`'s.
pub fn sub(a: &[u8], b: &[u8], r: &mut [u8]) {
    debug_assert!(a.len() == b.len() && a.len() == r.len());
    for ((r, &a), &b) in r.iter_mut().zip(a).zip(b) {
        *r = a - b;
    }
}

/// `true` when `a ≤ b` componentwise, i.e. `a` divides `b`.
pub fn divides(a: &[u8], b: &[u8]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).all(|(a, b)| a <= b)
}

/// Compact string form, inverse of [`parse`] for exponents below 36.
pub fn format(a: &[u8]) -> String {
    let mut s = String::with_capacity(a.len());
    for &e in a {
        match char::from_digit(e as u32, 36) {
            Some(c) => s.push(c.to_ascii_uppercase()),
            None => {
                let _ = write!(s, "({})", e);
            }
        }
    }
    s
}
