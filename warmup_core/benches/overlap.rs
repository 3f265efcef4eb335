use criterion::{criterion_group, criterion_main, Criterion};
use rand::{prelude::SmallRng, Rng, SeedableRng};
use warmup_core::{Addr, UnderCovered};

pub fn bench_find_overlap(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0);
    let uc = UnderCovered::new();
    uc.update((0..4096).map(|_| rng.gen_range(0..1 << 20)).collect());
    let covered = (0..1 << 14)
        .map(|_| rng.gen_range(0..1 << 20))
        .collect::<Vec<Addr>>();

    c.bench_function("find-overlap", |b| b.iter(|| uc.find_overlap(&covered)));
}

criterion_group!(benches, bench_find_overlap);
criterion_main!(benches);
