use crate::coef::Coef;
use crate::desc::ensure_same;
use crate::pool::Workspace;
use crate::series::Series;

use super::arith::{acc, mul};

/// `c = ∂a/∂x_iv`.
pub fn deriv<C: Coef>(a: &Series<C>, c: &mut Series<C>, iv: usize) {
    ensure_same(&a.desc, &c.desc);
    let nv = a.desc.nv();
    assert!(iv < nv, "variable index {} out of range (nv = {})", iv, nv);

    let desc = &a.desc;
    let top = c.top();
    c.reset();
    for o in a.scan() {
        let ro = o - 1;
        if ro > top {
            break;
        }
        if ro > 0 {
            c.open_order(ro);
        }
        for i in desc.order_range(o) {
            if let Some(j) = desc.deriv_index(i, iv) {
                let e = desc.mono(i)[iv];
                c.coef[j] += a.coef[i].scale(e as f64);
            }
        }
    }
    for o in c.nz.iter() {
        c.update_order(o);
    }
    c.adjust();
}

/// Poisson bracket over the canonical pairs `(x₀, x₁), (x₂, x₃), …`:
/// `c = Σ_i ∂a/∂q_i·∂b/∂p_i - ∂a/∂p_i·∂b/∂q_i` with `q_i = x_{2i}`,
/// `p_i = x_{2i+1}`. `nv = 0` uses every variable of the descriptor.
pub fn poisbra<C: Coef>(
    ws: &Workspace,
    a: &Series<C>,
    b: &Series<C>,
    c: &mut Series<C>,
    nv: usize,
) {
    ensure_same(&a.desc, &b.desc);
    ensure_same(&a.desc, &c.desc);
    let nv = if nv == 0 { a.desc.nv() } else { nv };
    assert!(
        nv % 2 == 0 && nv <= a.desc.nv(),
        "invalid Poisson bracket: {} canonical variables (nv = {})",
        nv,
        a.desc.nv()
    );

    let mut da = ws.tmp::<C, _>(&*c);
    let mut db = ws.tmp::<C, _>(&*c);
    let mut ab = ws.tmp::<C, _>(&*c);
    let mut sum = ws.tmp::<C, _>(&*c);
    for i in 0..nv / 2 {
        let (q, p) = (2 * i, 2 * i + 1);
        deriv(a, &mut da, q);
        deriv(b, &mut db, p);
        mul(&da, &db, &mut ab);
        acc(&ab, C::one(), &mut sum);

        deriv(a, &mut da, p);
        deriv(b, &mut db, q);
        mul(&da, &db, &mut ab);
        acc(&ab, -C::one(), &mut sum);
    }
    c.copy_from(&sum);
}
