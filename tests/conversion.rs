use std::sync::Arc;

use approx::assert_relative_eq;
use gtpsa::conv::{cabs, carg, cplx, imag, polar, real, rect};
use gtpsa::{Complex64, Ctpsa, Descriptor, DescriptorConfig, OrderMask, Tpsa};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn trunc3() -> Arc<Descriptor> {
    DescriptorConfig::new(2, 3).truncation(3).build().unwrap()
}

// ══════════════════════════════════════════════
//  1. Scenarios
// ══════════════════════════════════════════════

#[test]
fn real_of_promoted_series_reproduces_it() {
    let d = trunc3();
    // A = x + x²
    let mut a = Tpsa::new(&d);
    a.set_mono(&[1, 0], 1.0);
    a.set_mono(&[2, 0], 1.0);

    let mut z = Ctpsa::new(&d);
    cplx(Some(&a), None, &mut z);
    let mut back = Tpsa::new(&d);
    real(&z, &mut back);

    assert_eq!((back.lo(), back.hi()), (1, 2));
    assert!(back.nz().get(1) && back.nz().get(2));
    assert!(!back.nz().get(0));
    assert_eq!(back.to_dense(), a.to_dense());
}

#[test]
fn promotion_of_first_order_series() {
    let d = trunc3();
    let mut re = Tpsa::new(&d);
    re.set_mono(&[1, 0], 2.0);
    re.set_mono(&[0, 1], -1.0);

    let mut z = Ctpsa::new(&d);
    cplx(Some(&re), None, &mut z);
    assert_eq!(z.nz(), re.nz());
    assert_eq!((z.lo(), z.hi()), (re.lo(), re.hi()));
    assert_eq!(z.get_mono(&[1, 0]), c(2.0, 0.0));
    assert_eq!(z.get_mono(&[0, 1]), c(-1.0, 0.0));
    assert_eq!(z.value(), c(0.0, 0.0));
}

#[test]
fn imaginary_only_composition() {
    let d = trunc3();
    let im = Tpsa::variable(&d, 1, 3.0);
    let mut z = Ctpsa::new(&d);
    cplx(None, Some(&im), &mut z);
    assert_eq!(z.value(), c(0.0, 3.0));
    assert_eq!(z.get_mono(&[0, 1]), c(0.0, 1.0));
}

#[test]
fn parts_flag_orders_independently() {
    let d = DescriptorConfig::new(2, 4).build().unwrap();
    let mut re = Tpsa::new(&d);
    re.set_mono(&[1, 0], 1.0);
    re.set_mono(&[2, 1], 5.0);
    let mut im = Tpsa::new(&d);
    // leaves stale storage in order 1, which `im` no longer flags
    im.set_mono(&[1, 0], 9.0);
    im.reset();
    im.set_mono(&[0, 2], 2.0);
    im.set_mono(&[1, 2], 7.0);

    let mut z = Ctpsa::new(&d);
    cplx(Some(&re), Some(&im), &mut z);
    assert_eq!(z.nz().iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(z.get_mono(&[1, 0]), c(1.0, 0.0));
    assert_eq!(z.get_mono(&[0, 2]), c(0.0, 2.0));
    assert_eq!(z.get_mono(&[2, 1]), c(5.0, 0.0));
    assert_eq!(z.get_mono(&[1, 2]), c(0.0, 7.0));

    let mut back = Tpsa::new(&d);
    imag(&z, &mut back);
    assert_eq!(back.nz().iter().collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(back.lo(), 2);
    real(&z, &mut back);
    assert_eq!(back.nz().iter().collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn purely_real_series_has_nul_imaginary_part() {
    let d = trunc3();
    let mut z = Ctpsa::variable(&d, 0, c(1.5, 0.0));
    z.set_mono(&[1, 1], c(-2.0, 0.0));
    let mut im = Tpsa::variable(&d, 1, 4.0);
    imag(&z, &mut im);
    assert!(im.is_nul());
    assert_eq!((im.lo(), im.hi()), (1, 0));
}

#[test]
fn destination_capacity_clips() {
    let d = DescriptorConfig::new(2, 4).build().unwrap();
    let mut re = Tpsa::new(&d);
    re.set_mono(&[1, 0], 1.0);
    re.set_mono(&[4, 0], 1.0);
    let mut z = Ctpsa::with_order(&d, 2);
    cplx(Some(&re), None, &mut z);
    assert_eq!(z.nz(), {
        let mut m = OrderMask::EMPTY;
        m.set(1);
        m
    });
    // hi is clipped to the capacity, not narrowed to the mask
    assert_eq!((z.lo(), z.hi()), (1, 2));
}

#[test]
fn promotion_keeps_loose_bounds() {
    let d = trunc3();
    let mut re = Tpsa::new(&d);
    re.set_mono(&[1, 0], 1.0);
    re.set_mono(&[2, 0], 1e-20);
    re.stabilize_order(2, 1e-12);
    assert_eq!((re.lo(), re.hi()), (1, 2));
    assert!(!re.nz().get(2));

    let mut z = Ctpsa::new(&d);
    cplx(Some(&re), None, &mut z);
    assert_eq!(z.nz(), re.nz());
    assert_eq!((z.lo(), z.hi()), (re.lo(), re.hi()));
    assert_eq!(z.get_mono(&[1, 0]), c(1.0, 0.0));
    assert_eq!(z.get_mono(&[2, 0]), c(0.0, 0.0));
}

#[test]
fn promotion_of_a_constant_has_empty_bookkeeping() {
    let d = trunc3();
    let mut re = Tpsa::variable(&d, 0, 2.5);
    re.clear_order(1);
    let mut z = Ctpsa::new(&d);
    cplx(Some(&re), None, &mut z);
    assert!(z.nz().is_empty());
    assert_eq!((z.lo(), z.hi()), (1, 0));
    assert_eq!(z.value(), c(2.5, 0.0));

    re.set_constant(0.0);
    cplx(Some(&re), None, &mut z);
    assert!(z.is_nul());
}

#[test]
#[should_panic(expected = "cplx needs a real or an imaginary part")]
fn cplx_without_parts_panics() {
    let d = trunc3();
    let mut z = Ctpsa::new(&d);
    cplx(None, None, &mut z);
}

#[test]
#[should_panic(expected = "incompatible series (descriptors differ)")]
fn parts_on_different_descriptors_panic() {
    let d = trunc3();
    let e = trunc3();
    let mut z = Ctpsa::new(&d);
    cplx(Some(&Tpsa::new(&d)), Some(&Tpsa::new(&e)), &mut z);
}

// ══════════════════════════════════════════════
//  2. Round trip
// ══════════════════════════════════════════════

#[test]
fn split_and_recombine_is_exact() {
    let d = DescriptorConfig::new(3, 5).build().unwrap();
    let mut z = Ctpsa::new(&d);
    for i in 0..d.size() {
        if i % 3 != 1 {
            z.set(i, c(i as f64 * 0.25 - 3.0, (i % 5) as f64 - 2.0));
        }
    }
    let mut re = Tpsa::new(&d);
    let mut im = Tpsa::new(&d);
    real(&z, &mut re);
    imag(&z, &mut im);
    let mut w = Ctpsa::new(&d);
    cplx(Some(&re), Some(&im), &mut w);
    assert_eq!(w.to_dense(), z.to_dense());
    assert_eq!(w.nz(), z.nz());
    assert_eq!((w.lo(), w.hi()), (z.lo(), z.hi()));
}

// ══════════════════════════════════════════════
//  3. Polar forms
// ══════════════════════════════════════════════

#[test]
fn modulus_and_argument() {
    let d = DescriptorConfig::new(1, 4).build().unwrap();
    let ws = d.workspace(0);
    // z = (3 + 4i) + x
    let z = Ctpsa::variable(&d, 0, c(3.0, 4.0));

    let mut r = Tpsa::new(&d);
    cabs(&ws, &z, &mut r);
    // |z| = sqrt((3 + x)² + 16) = 5 + 3x/5 + 8x²/125 + ...
    assert_relative_eq!(r.value(), 5.0, epsilon = 1e-14);
    assert_relative_eq!(r.get(1), 0.6, epsilon = 1e-14);
    assert_relative_eq!(r.get(2), 8.0 / 125.0, epsilon = 1e-14);

    let mut t = Tpsa::new(&d);
    carg(&ws, &z, &mut t);
    // arg z = atan2(4, 3 + x); d/dx = -4 / ((3 + x)² + 16)
    assert_relative_eq!(t.value(), 4f64.atan2(3.0), epsilon = 1e-14);
    assert_relative_eq!(t.get(1), -4.0 / 25.0, epsilon = 1e-14);
}

#[test]
fn rect_inverts_polar() {
    let d = DescriptorConfig::new(2, 5).build().unwrap();
    let ws = d.workspace(0);
    let mut z = Ctpsa::variable(&d, 0, c(-1.2, 0.8));
    z.set_mono(&[0, 1], c(0.3, -0.1));
    z.set_mono(&[1, 1], c(0.05, 0.2));

    let mut p = Ctpsa::new(&d);
    polar(&ws, &z, &mut p);
    let mut back = Ctpsa::new(&d);
    rect(&ws, &p, &mut back);
    for i in 0..d.size() {
        assert_relative_eq!(back.get(i).re, z.get(i).re, epsilon = 1e-12);
        assert_relative_eq!(back.get(i).im, z.get(i).im, epsilon = 1e-12);
    }
}
