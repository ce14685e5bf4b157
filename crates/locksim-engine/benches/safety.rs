//! Safety-algorithm cost at growing process counts.
//!
//! The chain construction forces the fixed point to discover completions
//! one resource class at a time, so larger tables need more passes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use locksim_engine::{is_safe, Policy, ProcessLoad, System};

fn chain_system(n: usize, m: usize) -> System {
    let mut loads = Vec::with_capacity(n);
    for i in 0..n {
        let r = i % m;
        let mut allocation = vec![0u32; m];
        allocation[r] = 1;
        let mut max = allocation.clone();
        max[(r + 1) % m] += 1;
        loads.push(ProcessLoad {
            max,
            allocation,
            script: vec![],
        });
    }
    let mut available = vec![0u32; m];
    available[0] = 1;

    let mut sys = System::new(n, m, Policy::Avoidance).unwrap();
    sys.load(available, loads).unwrap();
    sys
}

fn bench_safety(c: &mut Criterion) {
    let mut group = c.benchmark_group("safety_check");
    for &n in &[16usize, 64, 256] {
        let sys = chain_system(n, 8);
        group.bench_function(format!("chain_n{n}"), |b| {
            b.iter(|| is_safe(black_box(&sys)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_safety);
criterion_main!(benches);
