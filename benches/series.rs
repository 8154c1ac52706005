use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gtpsa::conv::{cplx, mul_ct, real};
use gtpsa::{kernels, Ctpsa, Descriptor, DescriptorConfig, Tpsa};

fn make_series(d: &Arc<Descriptor>, v0: f64) -> Tpsa {
    let mut s = Tpsa::constant(d, v0);
    for i in 1..d.size() {
        s.set(i, 1.0 / (i as f64 + 1.0));
    }
    s
}

fn make_sparse(d: &Arc<Descriptor>) -> Tpsa {
    // only the first-order block and the top block
    let mut s = Tpsa::variable(d, 0, 1.0);
    let top = d.order_range(d.mo());
    s.set(top.start, 0.5);
    s
}

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels");
    for (nv, mo) in [(2usize, 8u8), (4, 6), (6, 4)] {
        let d = DescriptorConfig::new(nv, mo).build().unwrap();
        let ws = d.workspace(0);
        let a = make_series(&d, 1.5);
        let b = make_series(&d, -0.5);
        let mut out = Tpsa::new(&d);
        let id = format!("nv{}_mo{}", nv, mo);

        group.bench_with_input(BenchmarkId::new("mul", &id), &a, |bch, a| {
            bch.iter(|| kernels::mul(black_box(a), black_box(&b), &mut out))
        });
        group.bench_with_input(BenchmarkId::new("exp", &id), &a, |bch, a| {
            bch.iter(|| kernels::exp(&ws, black_box(a), &mut out))
        });
        group.bench_with_input(BenchmarkId::new("div", &id), &a, |bch, a| {
            bch.iter(|| kernels::div(&ws, black_box(&b), black_box(a), &mut out))
        });
    }
    group.finish();
}

fn bench_sparse_bookkeeping(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse");
    let d = DescriptorConfig::new(6, 10).build().unwrap();
    let a = make_sparse(&d);
    let mut out = Tpsa::new(&d);

    group.bench_function("add_two_blocks", |bch| {
        bch.iter(|| kernels::add(black_box(&a), black_box(&a), &mut out))
    });
    group.bench_function("update", |bch| {
        bch.iter(|| {
            out.copy_from(black_box(&a));
            out.update();
        })
    });
    group.finish();
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");
    let d = DescriptorConfig::new(4, 6).build().unwrap();
    let ws = d.workspace(0);
    let re = make_series(&d, 1.0);
    let im = make_series(&d, -1.0);
    let mut z = Ctpsa::new(&d);
    cplx(Some(&re), Some(&im), &mut z);
    let mut back = Tpsa::new(&d);
    let mut out = Ctpsa::new(&d);

    group.bench_function("cplx", |bch| {
        bch.iter(|| {
            let mut w = Ctpsa::new(&d);
            cplx(Some(black_box(&re)), Some(black_box(&im)), &mut w);
            w
        })
    });
    group.bench_function("real", |bch| bch.iter(|| real(black_box(&z), &mut back)));
    group.bench_function("mul_ct", |bch| {
        bch.iter(|| mul_ct(&ws, black_box(&z), black_box(&re), &mut out))
    });
    group.bench_function("mul_promoted", |bch| {
        bch.iter(|| {
            let mut p = Ctpsa::new(&d);
            cplx(Some(black_box(&re)), None, &mut p);
            kernels::mul(black_box(&z), &p, &mut out);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_kernels, bench_sparse_bookkeeping, bench_conversion);
criterion_main!(benches);
