use crate::coef::Coef;
use crate::desc::ensure_same;
use crate::order_mask::OrderMask;
use crate::series::Series;

/// Orders (including 0 when the constant is nonzero) holding data in `s`,
/// clipped to its active range.
#[inline]
fn support<C: Coef>(s: &Series<C>) -> OrderMask {
    let mut m = s.nz.high_cut(s.hi.min(s.desc.to())).low_cut(s.lo);
    if s.coef[0] != C::zero() {
        m.set(0);
    }
    m
}

/// `c = ca·a + cb·b + cc`.
pub fn axpbypc<C: Coef>(ca: C, a: &Series<C>, cb: C, b: &Series<C>, cc: C, c: &mut Series<C>) {
    ensure_same(&a.desc, &b.desc);
    ensure_same(&a.desc, &c.desc);

    let hi = a.hi.max(b.hi).min(c.top());
    c.nz = (a.nz | b.nz).high_cut(hi);
    c.coef[0] = ca * a.coef[0] + cb * b.coef[0] + cc;

    for o in c.nz.iter() {
        let ra = a.nz.get(o);
        let rb = b.nz.get(o);
        for i in c.desc.order_range(o) {
            let mut v = C::zero();
            if ra {
                v += ca * a.coef[i];
            }
            if rb {
                v += cb * b.coef[i];
            }
            c.coef[i] = v;
        }
        c.update_order(o);
    }
    c.adjust();
}

/// `c = a + b`.
#[inline]
pub fn add<C: Coef>(a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    axpbypc(C::one(), a, C::one(), b, C::zero(), c);
}

/// `c = a - b`.
#[inline]
pub fn sub<C: Coef>(a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    axpbypc(C::one(), a, -C::one(), b, C::zero(), c);
}

/// `c = v·a`.
pub fn scale<C: Coef>(v: C, a: &Series<C>, c: &mut Series<C>) {
    ensure_same(&a.desc, &c.desc);
    if v == C::zero() || a.is_nul() {
        c.reset();
        return;
    }
    c.copy_bookkeeping(a);
    c.coef[0] = v * a.coef[0];
    for o in c.scan() {
        for i in c.desc.order_range(o) {
            c.coef[i] = v * a.coef[i];
        }
        c.update_order(o);
    }
    c.adjust();
}

/// `c += v·a`.
pub fn acc<C: Coef>(a: &Series<C>, v: C, c: &mut Series<C>) {
    ensure_same(&a.desc, &c.desc);
    if v == C::zero() {
        return;
    }
    c.coef[0] += v * a.coef[0];
    for o in a.nz.high_cut(a.hi.min(c.top())).low_cut(a.lo) {
        c.open_order(o);
        for i in c.desc.order_range(o) {
            c.coef[i] += v * a.coef[i];
        }
        c.update_order(o);
    }
    c.adjust();
}

/// `c = a·b`, truncated to `min(c.mo, to)`.
pub fn mul<C: Coef>(a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    mul_support(a, support(a), b, support(b), c);
}

/// `c = a·(b - b₀)`: the product with `b`'s constant term ignored.
pub(crate) fn mul_shifted<C: Coef>(a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    let mut sb = support(b);
    sb.clear(0);
    mul_support(a, support(a), b, sb, c);
}

fn mul_support<C: Coef>(
    a: &Series<C>,
    sa: OrderMask,
    b: &Series<C>,
    sb: OrderMask,
    c: &mut Series<C>,
) {
    ensure_same(&a.desc, &b.desc);
    ensure_same(&a.desc, &c.desc);
    if sa.is_empty() || sb.is_empty() {
        c.reset();
        return;
    }

    let desc = &a.desc;
    let top = c.top();
    c.coef[0] = if sa.get(0) && sb.get(0) {
        a.coef[0] * b.coef[0]
    } else {
        C::zero()
    };
    c.nz = OrderMask::EMPTY;
    let sa = sa.high_cut(top);
    for oa in sa {
        for ob in sb.high_cut(top - oa) {
            if oa + ob > 0 {
                c.open_order(oa + ob);
            }
        }
    }

    for oa in sa {
        for ob in sb.high_cut(top - oa) {
            if oa + ob == 0 {
                continue;
            }
            for i in desc.order_range(oa) {
                let ai = a.coef[i];
                if ai == C::zero() {
                    continue;
                }
                for j in desc.order_range(ob) {
                    c.coef[desc.product_index(i, j)] += ai * b.coef[j];
                }
            }
        }
    }

    for o in c.nz.iter() {
        c.update_order(o);
    }
    c.adjust();
    c.truncate();
}

/// Relative difference `c_i = (a_i - b_i) / max(|a_i|, 1)`.
pub fn dif<C: Coef>(a: &Series<C>, b: &Series<C>, c: &mut Series<C>) {
    ensure_same(&a.desc, &b.desc);
    ensure_same(&a.desc, &c.desc);

    #[inline]
    fn rel<C: Coef>(a: C, b: C) -> C {
        (a - b).scale(1.0 / a.norm().max(1.0))
    }

    let hi = a.hi.max(b.hi).min(c.top());
    c.nz = (a.nz | b.nz).high_cut(hi);
    c.coef[0] = rel(a.coef[0], b.coef[0]);
    for o in c.nz.iter() {
        let ra = a.nz.get(o);
        let rb = b.nz.get(o);
        for i in c.desc.order_range(o) {
            let ai = if ra { a.coef[i] } else { C::zero() };
            let bi = if rb { b.coef[i] } else { C::zero() };
            c.coef[i] = rel(ai, bi);
        }
        c.update_order(o);
    }
    c.adjust();
}

/// `true` when every logical coefficient of `a` and `b` differs by at most
/// `tol` (default `f64::EPSILON`). Any NaN difference compares unequal.
pub fn equ<C: Coef>(a: &Series<C>, b: &Series<C>, tol: Option<f64>) -> bool {
    ensure_same(&a.desc, &b.desc);
    let tol = tol.unwrap_or(f64::EPSILON);
    let close = |x: C, y: C| (x - y).norm() <= tol;

    if !close(a.coef[0], b.coef[0]) {
        return false;
    }
    let to = a.desc.to();
    let ma = a.nz.high_cut(a.hi.min(to));
    let mb = b.nz.high_cut(b.hi.min(to));
    for o in ma | mb {
        let ra = ma.get(o);
        let rb = mb.get(o);
        for i in a.desc.order_range(o) {
            let ai = if ra { a.coef[i] } else { C::zero() };
            let bi = if rb { b.coef[i] } else { C::zero() };
            if !close(ai, bi) {
                return false;
            }
        }
    }
    true
}
