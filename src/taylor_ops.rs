//! Univariate Taylor coefficient recurrences.
//!
//! Convention: `c[k] = f^(k)(t₀) / k!` (scaled/normalized Taylor coefficients).
//! All functions operate on slices `&[C]` (inputs) and `&mut [C]` (outputs),
//! where `C: Coef`. The degree (number of coefficients) is determined by the
//! output slice length.
//!
//! The multivariate kernels only need expansions of elementary functions
//! about a point: feeding the identity `[x₀, 1, 0, …]` to a recurrence yields
//! `f^(k)(x₀) / k!`, which [`expansion`] packages up.

use crate::coef::Coef;
use crate::order_mask::MAX_ORDER;

/// Longest expansion the kernels ever request (`MAX_ORDER + 1` terms).
pub const MAX_TERMS: usize = MAX_ORDER as usize + 1;

#[inline]
fn num<C: Coef>(k: usize) -> C {
    C::from_real(k as f64)
}

// ══════════════════════════════════════════════
//  Arithmetic
// ══════════════════════════════════════════════

/// Cauchy product `c = a * b`.
///
/// `c[k] = Σ_{j=0}^{k} a[j] * b[k-j]`
#[inline]
pub fn taylor_mul<C: Coef>(a: &[C], b: &[C], c: &mut [C]) {
    let n = c.len();
    for k in 0..n {
        let mut sum = C::zero();
        for j in 0..=k {
            sum += a[j] * b[k - j];
        }
        c[k] = sum;
    }
}

/// Reciprocal `c = 1/a` by recursive division.
#[inline]
pub fn taylor_recip<C: Coef>(a: &[C], c: &mut [C]) {
    let n = c.len();
    let inv_a0 = C::one() / a[0];
    c[0] = inv_a0;
    for k in 1..n {
        let mut sum = C::zero();
        for j in 1..=k {
            sum += a[j] * c[k - j];
        }
        c[k] = -sum * inv_a0;
    }
}

// ══════════════════════════════════════════════
//  Transcendentals (logarithmic derivative technique)
// ══════════════════════════════════════════════

/// `c = exp(a)`
///
/// `c[0] = exp(a[0])`
/// `c[k] = (1/k) * Σ_{j=1}^{k} j * a[j] * c[k-j]`
#[inline]
pub fn taylor_exp<C: Coef>(a: &[C], c: &mut [C]) {
    let n = c.len();
    c[0] = a[0].exp();
    for k in 1..n {
        let mut sum = C::zero();
        for j in 1..=k {
            sum += num::<C>(j) * a[j] * c[k - j];
        }
        c[k] = sum / num::<C>(k);
    }
}

/// `c = ln(a)`
///
/// `c[0] = ln(a[0])`
/// `c[k] = (a[k] - (1/k) * Σ_{j=1}^{k-1} j * c[j] * a[k-j]) / a[0]`
#[inline]
pub fn taylor_ln<C: Coef>(a: &[C], c: &mut [C]) {
    let n = c.len();
    let inv_a0 = C::one() / a[0];
    c[0] = a[0].ln();
    for k in 1..n {
        let mut sum = C::zero();
        for j in 1..k {
            sum += num::<C>(j) * c[j] * a[k - j];
        }
        c[k] = (a[k] - sum / num::<C>(k)) * inv_a0;
    }
}

/// `c = sqrt(a)`
///
/// `c[0] = sqrt(a[0])`
/// `c[k] = (a[k] - Σ_{j=1}^{k-1} c[j] * c[k-j]) / (2 * c[0])`
#[inline]
pub fn taylor_sqrt<C: Coef>(a: &[C], c: &mut [C]) {
    let n = c.len();
    c[0] = a[0].sqrt();
    let two_c0 = num::<C>(2) * c[0];
    for k in 1..n {
        let mut sum = C::zero();
        for j in 1..k {
            sum += c[j] * c[k - j];
        }
        c[k] = (a[k] - sum) / two_c0;
    }
}

/// `(s, co) = (sin a, cos a)` by the coupled recurrence.
///
/// `s[k] = (1/k) * Σ_{j=1}^{k} j * a[j] * co[k-j]`
/// `co[k] = -(1/k) * Σ_{j=1}^{k} j * a[j] * s[k-j]`
#[inline]
pub fn taylor_sin_cos<C: Coef>(a: &[C], s: &mut [C], co: &mut [C]) {
    let n = s.len();
    let (s0, c0) = a[0].sin_cos();
    s[0] = s0;
    co[0] = c0;
    for k in 1..n {
        let inv_k = C::one() / num::<C>(k);
        let mut sum_s = C::zero();
        let mut sum_c = C::zero();
        for j in 1..=k {
            let jf = num::<C>(j);
            sum_s += jf * a[j] * co[k - j];
            sum_c += jf * a[j] * s[k - j];
        }
        s[k] = sum_s * inv_k;
        co[k] = -sum_c * inv_k;
    }
}

/// `c = atan(a)` from `c' = a' / (1 + a²)`, integrated term by term.
///
/// `scratch1` receives `1/(1 + a²)`, `scratch2` holds `1 + a²`.
#[inline]
pub fn taylor_atan<C: Coef>(a: &[C], c: &mut [C], scratch1: &mut [C], scratch2: &mut [C]) {
    let n = c.len();
    taylor_mul(a, a, &mut scratch2[..n]);
    scratch2[0] += C::one();
    c[0] = a[0].atan();
    taylor_recip(&scratch2[..n], &mut scratch1[..n]);
    for k in 1..n {
        let mut sum = C::zero();
        for j in 1..=k {
            sum += num::<C>(j) * a[j] * scratch1[k - j];
        }
        c[k] = sum / num::<C>(k);
    }
}

// ══════════════════════════════════════════════
//  Expansions about a point
// ══════════════════════════════════════════════

/// Elementary functions the multivariate kernels compose with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Elementary {
    Recip,
    Exp,
    Ln,
    Sqrt,
    Sin,
    Cos,
    Atan,
}

/// Write `f^(k)(x0) / k!` for `k < out.len()` into `out`.
///
/// `out.len()` must not exceed [`MAX_TERMS`].
pub fn expansion<C: Coef>(f: Elementary, x0: C, out: &mut [C]) {
    let n = out.len();
    assert!(n <= MAX_TERMS, "expansion longer than {} terms", MAX_TERMS);
    if n == 0 {
        return;
    }
    let mut x = [C::zero(); MAX_TERMS];
    x[0] = x0;
    if n > 1 {
        x[1] = C::one();
    }
    let x = &x[..n];
    match f {
        Elementary::Recip => taylor_recip(x, out),
        Elementary::Exp => taylor_exp(x, out),
        Elementary::Ln => taylor_ln(x, out),
        Elementary::Sqrt => taylor_sqrt(x, out),
        Elementary::Sin | Elementary::Cos => {
            let mut other = [C::zero(); MAX_TERMS];
            if f == Elementary::Sin {
                taylor_sin_cos(x, out, &mut other[..n]);
            } else {
                taylor_sin_cos(x, &mut other[..n], out);
            }
        }
        Elementary::Atan => {
            let mut s1 = [C::zero(); MAX_TERMS];
            let mut s2 = [C::zero(); MAX_TERMS];
            taylor_atan(x, out, &mut s1, &mut s2);
        }
    }
}
