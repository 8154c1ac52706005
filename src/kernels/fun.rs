//! Elementary functions of a series.
//!
//! Every function is evaluated by composition: with `a = a₀ + da`,
//! `f(a) = Σ_k f⁽ᵏ⁾(a₀)/k! · daᵏ`, the univariate coefficients coming from
//! [`taylor_ops::expansion`]. The powers of `da` are built in two workspace
//! temporaries, so the series is never truncated before `min(c.mo, to)`.

use crate::coef::Coef;
use crate::desc::ensure_same;
use crate::pool::Workspace;
use crate::series::Series;
use crate::taylor_ops::{self, Elementary, MAX_TERMS};

use super::arith::{acc, mul, mul_shifted};

/// `c = Σ_k f[k]·(a - a₀)ᵏ`.
pub fn compose<C: Coef>(ws: &Workspace, a: &Series<C>, f: &[C], c: &mut Series<C>) {
    ensure_same(&a.desc, &c.desc);
    let top = c.top();
    let n = f.len().min(top as usize + 1);

    c.reset();
    if n == 0 {
        return;
    }
    c.coef[0] = f[0];
    let lo = match a.scan().next() {
        Some(lo) => lo as usize,
        None => return,
    };
    if n == 1 {
        return;
    }

    let mut pw = ws.tmp::<C, _>(&*c);
    let mut t = ws.tmp::<C, _>(&*c);
    pw.copy_from(a);
    pw.coef[0] = C::zero();
    acc(&pw, f[1], c);
    for (k, &fk) in f.iter().enumerate().take(n).skip(2) {
        if k * lo > top as usize {
            break;
        }
        mul_shifted(&pw, a, &mut t);
        std::mem::swap(&mut *pw, &mut *t);
        if pw.nz.is_empty() {
            break;
        }
        acc(&pw, fk, c);
    }
}

fn apply<C: Coef>(ws: &Workspace, f: Elementary, a: &Series<C>, scale: C, c: &mut Series<C>) {
    let n = c.top() as usize + 1;
    let mut coefs = [C::zero(); MAX_TERMS];
    taylor_ops::expansion(f, a.coef[0], &mut coefs[..n]);
    if scale != C::one() {
        for x in &mut coefs[..n] {
            *x *= scale;
        }
    }
    compose(ws, a, &coefs[..n], c);
}

#[track_caller]
fn ensure_domain<C: Coef>(a: &Series<C>, what: &str) {
    assert!(
        a.coef[0] != C::zero(),
        "invalid domain: {} of a series with zero constant term",
        what
    );
}

/// `c = v / a`.
pub fn inv<C: Coef>(ws: &Workspace, a: &Series<C>, v: C, c: &mut Series<C>) {
    ensure_domain(a, "inverse");
    apply(ws, Elementary::Recip, a, v, c);
}

/// `c = a / b`.
pub fn div<C: Coef>(ws: &Workspace, a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    ensure_same(&a.desc, &b.desc);
    ensure_domain(b, "division");
    if a.is_nul() {
        ensure_same(&a.desc, &c.desc);
        c.reset();
        return;
    }
    let mut t = ws.tmp::<C, _>(&*c);
    inv(ws, b, C::one(), &mut t);
    mul(a, &t, c);
}

/// `c = exp(a)`.
pub fn exp<C: Coef>(ws: &Workspace, a: &Series<C>, c: &mut Series<C>) {
    apply(ws, Elementary::Exp, a, C::one(), c);
}

/// `c = ln(a)`.
pub fn ln<C: Coef>(ws: &Workspace, a: &Series<C>, c: &mut Series<C>) {
    ensure_domain(a, "logarithm");
    apply(ws, Elementary::Ln, a, C::one(), c);
}

/// `c = √a`. The zero series maps to zero; any other series needs a
/// nonzero constant term.
pub fn sqrt<C: Coef>(ws: &Workspace, a: &Series<C>, c: &mut Series<C>) {
    if a.is_nul() {
        ensure_same(&a.desc, &c.desc);
        c.reset();
        return;
    }
    ensure_domain(a, "square root");
    apply(ws, Elementary::Sqrt, a, C::one(), c);
}

/// `c = atan(a)`.
pub fn atan<C: Coef>(ws: &Workspace, a: &Series<C>, c: &mut Series<C>) {
    apply(ws, Elementary::Atan, a, C::one(), c);
}

/// `s = sin(a)`, `c = cos(a)`.
pub fn sincos<C: Coef>(ws: &Workspace, a: &Series<C>, s: &mut Series<C>, c: &mut Series<C>) {
    apply(ws, Elementary::Sin, a, C::one(), s);
    apply(ws, Elementary::Cos, a, C::one(), c);
}

/// `c = a^b = exp(b·ln a)`, with `a^0 = 1` and `0^b = 0`.
pub fn pow<C: Coef>(ws: &Workspace, a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    ensure_same(&a.desc, &b.desc);
    ensure_same(&a.desc, &c.desc);
    if b.is_nul() {
        c.reset();
        c.coef[0] = C::one();
        return;
    }
    if a.is_nul() {
        c.reset();
        return;
    }
    let mut l = ws.tmp::<C, _>(&*c);
    ln(ws, a, &mut l);
    let mut e = ws.tmp::<C, _>(&*c);
    mul(b, &l, &mut e);
    exp(ws, &e, c);
}

/// `c = aⁿ` by repeated squaring; negative `n` goes through `1/a`.
pub fn powi<C: Coef>(ws: &Workspace, a: &Series<C>, n: i32, c: &mut Series<C>) {
    ensure_same(&a.desc, &c.desc);
    if n == 0 {
        c.reset();
        c.coef[0] = C::one();
        return;
    }
    let mut base = ws.tmp::<C, _>(&*c);
    if n < 0 {
        inv(ws, a, C::one(), &mut base);
    } else {
        base.copy_from(a);
    }
    let mut r = ws.tmp::<C, _>(&*c);
    let mut t = ws.tmp::<C, _>(&*c);
    r.coef[0] = C::one();

    let mut k = n.unsigned_abs();
    loop {
        if k & 1 == 1 {
            mul(&r, &base, &mut t);
            std::mem::swap(&mut *r, &mut *t);
        }
        k >>= 1;
        if k == 0 {
            break;
        }
        mul(&base, &base, &mut t);
        std::mem::swap(&mut *base, &mut *t);
    }
    c.copy_from(&r);
}

/// `c = √(a² + b²)`.
pub fn hypot<C: Coef>(ws: &Workspace, a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    ensure_same(&a.desc, &b.desc);
    let mut aa = ws.tmp::<C, _>(&*c);
    mul(a, a, &mut aa);
    let mut bb = ws.tmp::<C, _>(&*c);
    mul(b, b, &mut bb);
    acc(&bb, C::one(), &mut aa);
    drop(bb);
    sqrt(ws, &aa, c);
}

/// `c = atan2(y, x)`, the constant term landing in the quadrant of
/// `(x₀, y₀)`.
pub fn atan2(ws: &Workspace, y: &Series<f64>, x: &Series<f64>, c: &mut Series<f64>) {
    ensure_same(&y.desc, &x.desc);
    ensure_same(&y.desc, &c.desc);
    let (y0, x0) = (y.coef[0], x.coef[0]);
    if y.is_nul() && x.is_nul() {
        c.reset();
        return;
    }
    assert!(
        x0 != 0.0 || y0 != 0.0,
        "invalid domain: atan2 of series with zero constant terms"
    );

    let mut q = ws.tmp::<f64, _>(&*c);
    if x0.abs() >= y0.abs() {
        div(ws, y, x, &mut q);
        atan(ws, &q, c);
    } else {
        // atan2(y, x) = ±π/2 - atan(x/y)
        div(ws, x, y, &mut q);
        atan(ws, &q, c);
        c.scale(-1.0);
    }
    c.coef[0] = y0.atan2(x0);
}
