use std::panic::AssertUnwindSafe;

use gtpsa::{Complex64, Ctpsa, DescriptorConfig, PoolError, Tpsa};

#[test]
fn nested_acquires_restore_depth() {
    let d = DescriptorConfig::new(2, 4).max_tmp(5).build().unwrap();
    let ws = d.workspace(0);
    let proto = Tpsa::new(&d);
    {
        let a = ws.tmp::<f64, _>(&proto);
        let b = ws.tmp::<f64, _>(&proto);
        let c = ws.tmp::<f64, _>(&proto);
        assert_eq!((a.slot(), b.slot(), c.slot()), (0, 1, 2));
        assert_eq!(ws.real_pool().depth(), 3);
        assert_eq!(ws.complex_pool().depth(), 0);
        c.release();
        b.release();
        a.release();
    }
    assert_eq!(ws.real_pool().depth(), 0);
    assert_eq!(ws.real_pool().capacity(), 5);
}

#[test]
fn temporaries_come_back_zeroed_with_prototype_capacity() {
    let d = DescriptorConfig::new(2, 4).build().unwrap();
    let ws = d.workspace(0);
    {
        let mut t = ws.tmp::<f64, _>(&Tpsa::new(&d));
        t.set_mono(&[2, 2], 7.0);
        t.set_constant(1.0);
    }
    let small = Ctpsa::with_order(&d, 2);
    let t = ws.tmp::<f64, _>(&small);
    assert!(t.is_nul());
    assert_eq!(t.mo(), 2);
    assert_eq!(t.get_mono(&[2, 2]), 0.0);
}

#[test]
fn pools_are_independent_per_coefficient_type() {
    let d = DescriptorConfig::new(1, 3).max_tmp(1).build().unwrap();
    let ws = d.workspace(0);
    let proto = Tpsa::new(&d);
    let r = ws.tmp::<f64, _>(&proto);
    let z = ws.tmp::<Complex64, _>(&proto);
    assert_eq!(r.slot(), 0);
    assert_eq!(z.slot(), 0);
    assert_eq!(ws.pool::<Complex64>().depth(), 1);
}

#[test]
fn exhaustion_is_reported() {
    let d = DescriptorConfig::new(1, 2).max_tmp(2).build().unwrap();
    let ws = d.workspace(3);
    let proto = Tpsa::new(&d);
    let _a = ws.real_pool().acquire(&proto);
    let _b = ws.real_pool().acquire(&proto);
    match ws.real_pool().try_acquire(&proto) {
        Err(e) => {
            assert_eq!(e, PoolError::Exhausted { tid: 3, limit: 2 });
            assert_eq!(
                e.to_string(),
                "temporary pool exhausted (thread 3, limit 2)"
            );
        }
        Ok(_) => panic!("third temporary should not fit"),
    };
}

#[test]
#[should_panic(expected = "temporary pool exhausted")]
fn over_acquire_panics() {
    let d = DescriptorConfig::new(1, 2).max_tmp(1).build().unwrap();
    let ws = d.workspace(0);
    let proto = Tpsa::new(&d);
    let _a = ws.tmp::<f64, _>(&proto);
    let _b = ws.tmp::<f64, _>(&proto);
}

#[test]
#[should_panic(expected = "temporaries must be released in LIFO order")]
fn out_of_order_release_panics() {
    let d = DescriptorConfig::new(1, 2).build().unwrap();
    let ws = d.workspace(0);
    let proto = Tpsa::new(&d);
    let a = ws.tmp::<f64, _>(&proto);
    let _b = ws.tmp::<f64, _>(&proto);
    a.release();
}

#[test]
fn out_of_order_release_while_unwinding_leaks_its_slot() {
    let d = DescriptorConfig::new(2, 3).max_tmp(2).build().unwrap();
    let ws = d.workspace(0);
    let proto = Tpsa::new(&d);
    let unwound = std::panic::catch_unwind(AssertUnwindSafe(|| {
        // declared first, so dropped after `early`
        let late;
        let early = ws.tmp::<f64, _>(&proto);
        late = ws.tmp::<f64, _>(&proto);
        assert_eq!((early.slot(), late.slot()), (0, 1));
        panic!("abort evaluation");
    }));
    assert!(unwound.is_err());

    assert_eq!(ws.real_pool().depth(), 1);
    let a = ws.real_pool().try_acquire(&proto);
    let b = ws.real_pool().try_acquire(&proto);
    assert!(a.is_ok());
    assert!(matches!(b, Err(PoolError::Exhausted { .. })));
}

#[test]
#[should_panic(expected = "incompatible series (descriptors differ)")]
fn foreign_prototype_panics() {
    let d = DescriptorConfig::new(1, 2).build().unwrap();
    let other = DescriptorConfig::new(1, 2).build().unwrap();
    let ws = d.workspace(0);
    let _t = ws.tmp::<f64, _>(&Tpsa::new(&other));
}

#[test]
fn kernels_leave_the_stack_empty() {
    let d = DescriptorConfig::new(2, 5).build().unwrap();
    let ws = d.workspace(0);
    let x = Tpsa::variable(&d, 0, 0.7);
    let y = Tpsa::variable(&d, 1, -0.3);
    let mut c = Tpsa::new(&d);
    gtpsa::kernels::atan2(&ws, &y, &x, &mut c);
    gtpsa::kernels::pow(&ws, &x, &x, &mut c);
    gtpsa::kernels::powi(&ws, &x, -3, &mut c);
    assert_eq!(ws.real_pool().depth(), 0);

    let z = Ctpsa::variable(&d, 0, Complex64::new(1.0, 1.0));
    let mut p = Ctpsa::new(&d);
    gtpsa::conv::polar(&ws, &z, &mut p);
    gtpsa::conv::div_ct(&ws, &z, &x, &mut p);
    assert_eq!(ws.real_pool().depth(), 0);
    assert_eq!(ws.complex_pool().depth(), 0);
}

#[test]
fn workspaces_follow_thread_count() {
    let d = DescriptorConfig::new(1, 1).threads(4).build().unwrap();
    let all = d.workspaces();
    assert_eq!(all.iter().map(|w| w.tid()).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}
