//! Real/complex conversion and mixed-type dispatch.
//!
//! Mixed operations promote their real operand into a complex temporary
//! with [`cplx`] and hand both to the complex kernel, so every result is
//! identical to promoting by hand first.

use num_complex::Complex64;

use crate::desc::ensure_same;
use crate::kernels;
use crate::pool::{Temp, Workspace};
use crate::{Ctpsa, Tpsa};

fn component(src: &Ctpsa, dst: &mut Tpsa, part: impl Fn(Complex64) -> f64) {
    ensure_same(&src.desc, &dst.desc);
    dst.copy_bookkeeping(src);
    dst.coef[0] = part(src.coef[0]);
    if dst.nz.is_empty() {
        dst.adjust();
        return;
    }
    for o in dst.scan() {
        for i in dst.desc.order_range(o) {
            dst.coef[i] = part(src.coef[i]);
        }
    }
    dst.update();
}

/// `dst = Re(src)`.
pub fn real(src: &Ctpsa, dst: &mut Tpsa) {
    component(src, dst, |z| z.re);
}

/// `dst = Im(src)`.
pub fn imag(src: &Ctpsa, dst: &mut Tpsa) {
    component(src, dst, |z| z.im);
}

/// `dst = re + i·im`. A missing part counts as zero; at least one must be
/// given.
pub fn cplx(re: Option<&Tpsa>, im: Option<&Tpsa>, dst: &mut Ctpsa) {
    let (r, m) = match (re, im) {
        (Some(r), Some(m)) => (r, m),
        (Some(r), None) => (r, r),
        (None, Some(m)) => (m, m),
        (None, None) => panic!("cplx needs a real or an imaginary part"),
    };
    ensure_same(&r.desc, &m.desc);
    ensure_same(&r.desc, &dst.desc);

    dst.lo = r.lo.min(m.lo).min(dst.mo).max(1);
    dst.hi = r.hi.max(m.hi).min(dst.top());
    dst.nz = (r.nz | m.nz).high_cut(dst.hi);
    dst.coef[0] = Complex64::new(
        re.map_or(0.0, |r| r.coef[0]),
        im.map_or(0.0, |m| m.coef[0]),
    );
    if dst.is_nul() {
        dst.reset();
        return;
    }
    if dst.nz.is_empty() {
        dst.adjust();
        return;
    }

    let desc = &r.desc;
    for o in dst.scan() {
        let fr = re.filter(|r| r.nz.get(o));
        let fm = im.filter(|m| m.nz.get(o));
        for i in desc.order_range(o) {
            dst.coef[i] = Complex64::new(
                fr.map_or(0.0, |r| r.coef[i]),
                fm.map_or(0.0, |m| m.coef[i]),
            );
        }
    }
}

/// `c = |a|`.
pub fn cabs(ws: &Workspace, a: &Ctpsa, c: &mut Tpsa) {
    ensure_same(&a.desc, &c.desc);
    let mut re = ws.tmp::<f64, _>(a);
    let mut im = ws.tmp::<f64, _>(a);
    real(a, &mut re);
    imag(a, &mut im);
    kernels::hypot(ws, &re, &im, c);
}

/// `c = arg(a)`.
pub fn carg(ws: &Workspace, a: &Ctpsa, c: &mut Tpsa) {
    ensure_same(&a.desc, &c.desc);
    let mut re = ws.tmp::<f64, _>(a);
    let mut im = ws.tmp::<f64, _>(a);
    real(a, &mut re);
    imag(a, &mut im);
    kernels::atan2(ws, &im, &re, c);
}

/// Polar to rectangular: `a = ρ + i·θ` becomes `c = ρ·cos θ + i·ρ·sin θ`.
pub fn rect(ws: &Workspace, a: &Ctpsa, c: &mut Ctpsa) {
    ensure_same(&a.desc, &c.desc);
    let mut rho = ws.tmp::<f64, _>(a);
    let mut th = ws.tmp::<f64, _>(a);
    real(a, &mut rho);
    imag(a, &mut th);
    let mut st = ws.tmp::<f64, _>(a);
    let mut ct = ws.tmp::<f64, _>(a);
    kernels::sincos(ws, &th, &mut st, &mut ct);
    kernels::mul(&rho, &st, &mut th);
    kernels::mul(&rho, &ct, &mut st);
    cplx(Some(&*st), Some(&*th), c);
}

/// Rectangular to polar: `c = |a| + i·arg(a)`.
pub fn polar(ws: &Workspace, a: &Ctpsa, c: &mut Ctpsa) {
    ensure_same(&a.desc, &c.desc);
    let mut re = ws.tmp::<f64, _>(a);
    let mut im = ws.tmp::<f64, _>(a);
    real(a, &mut re);
    imag(a, &mut im);
    let mut rho = ws.tmp::<f64, _>(a);
    kernels::hypot(ws, &re, &im, &mut rho);
    let mut th = ws.tmp::<f64, _>(a);
    kernels::atan2(ws, &im, &re, &mut th);
    cplx(Some(&*rho), Some(&*th), c);
}

/// Borrow a complex temporary holding `b + 0i`.
fn promote<'w>(ws: &'w Workspace, b: &Tpsa) -> Temp<'w, Complex64> {
    let mut t = ws.tmp::<Complex64, _>(b);
    cplx(Some(b), None, &mut t);
    t
}

#[track_caller]
fn ensure_mixed(a: &Ctpsa, b: &Tpsa, c: &Ctpsa) {
    ensure_same(&a.desc, &b.desc);
    ensure_same(&a.desc, &c.desc);
}

/// `c = dif(a, b)` with a real second operand.
pub fn dif_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, c: &mut Ctpsa) {
    ensure_mixed(a, b, c);
    let b = promote(ws, b);
    kernels::dif(a, &b, c);
}

/// `c = dif(a, b)` with a real first operand.
pub fn dif_tc(ws: &Workspace, a: &Tpsa, b: &Ctpsa, c: &mut Ctpsa) {
    ensure_mixed(b, a, c);
    let a = promote(ws, a);
    kernels::dif(&a, b, c);
}

/// `c = a + b`.
pub fn add_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, c: &mut Ctpsa) {
    ensure_mixed(a, b, c);
    let b = promote(ws, b);
    kernels::add(a, &b, c);
}

/// `c = a - b`.
pub fn sub_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, c: &mut Ctpsa) {
    ensure_mixed(a, b, c);
    let b = promote(ws, b);
    kernels::sub(a, &b, c);
}

/// `c = a - b` with a real first operand.
pub fn sub_tc(ws: &Workspace, a: &Tpsa, b: &Ctpsa, c: &mut Ctpsa) {
    ensure_mixed(b, a, c);
    let a = promote(ws, a);
    kernels::sub(&a, b, c);
}

/// `c = a·b`.
pub fn mul_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, c: &mut Ctpsa) {
    ensure_mixed(a, b, c);
    let b = promote(ws, b);
    kernels::mul(a, &b, c);
}

/// `c = a / b`.
pub fn div_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, c: &mut Ctpsa) {
    ensure_mixed(a, b, c);
    let b = promote(ws, b);
    kernels::div(ws, a, &b, c);
}

/// `c = a / b` with a real numerator.
pub fn div_tc(ws: &Workspace, a: &Tpsa, b: &Ctpsa, c: &mut Ctpsa) {
    ensure_mixed(b, a, c);
    let a = promote(ws, a);
    kernels::div(ws, &a, b, c);
}

/// `c = a^b` with a real exponent.
pub fn pow_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, c: &mut Ctpsa) {
    ensure_mixed(a, b, c);
    let b = promote(ws, b);
    kernels::pow(ws, a, &b, c);
}

/// `c = a^b` with a real base.
pub fn pow_tc(ws: &Workspace, a: &Tpsa, b: &Ctpsa, c: &mut Ctpsa) {
    ensure_mixed(b, a, c);
    let a = promote(ws, a);
    kernels::pow(ws, &a, b, c);
}

/// `c = [a, b]` over `nv` canonical variables.
pub fn poisbra_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, c: &mut Ctpsa, nv: usize) {
    ensure_mixed(a, b, c);
    let b = promote(ws, b);
    kernels::poisbra(ws, a, &b, c, nv);
}

/// `c = [a, b]` with a real first operand.
pub fn poisbra_tc(ws: &Workspace, a: &Tpsa, b: &Ctpsa, c: &mut Ctpsa, nv: usize) {
    ensure_mixed(b, a, c);
    let a = promote(ws, a);
    kernels::poisbra(ws, &a, b, c, nv);
}

/// `c = ∂a/∂x_iv` of a real series into a complex target.
pub fn deriv_t(ws: &Workspace, a: &Tpsa, c: &mut Ctpsa, iv: usize) {
    ensure_same(&a.desc, &c.desc);
    let a = promote(ws, a);
    kernels::deriv(&a, c, iv);
}

/// Tolerance equality of a complex and a real series.
pub fn equ_ct(ws: &Workspace, a: &Ctpsa, b: &Tpsa, tol: Option<f64>) -> bool {
    ensure_same(&a.desc, &b.desc);
    let b = promote(ws, b);
    kernels::equ(a, &b, tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::DescriptorConfig;

    #[test]
    fn promoted_copy_has_zero_imaginary_part() {
        let d = DescriptorConfig::new(2, 3).build().unwrap();
        let ws = d.workspace(0);
        let mut b = Tpsa::variable(&d, 0, 2.0);
        b.set_mono(&[1, 1], -1.5);
        let t = promote(&ws, &b);
        assert_eq!(ws.complex_pool().depth(), 1);
        assert_eq!(t.nz(), b.nz());
        assert_eq!(t.get_mono(&[1, 1]), Complex64::new(-1.5, 0.0));
        drop(t);
        assert_eq!(ws.complex_pool().depth(), 0);
    }
}
