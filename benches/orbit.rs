#[macro_use]
extern crate criterion;
extern crate nebulabrot;
extern crate num;

use criterion::Criterion;
use nebulabrot::orbit::{escape_time, in_main_bulbs};
use num::Complex;

fn bench_escape_time(c: &mut Criterion) {
    // A seahorse-valley point with a long but finite escape.
    c.bench_function("escape_time near the boundary", |b| {
        b.iter(|| escape_time(Complex::new(-0.75, 0.05), 10_000))
    });
}

fn bench_interior_shortcut(c: &mut Criterion) {
    c.bench_function("interior shortcut over a scanline", |b| {
        b.iter(|| {
            (0..1000)
                .filter(|i| in_main_bulbs(Complex::new(-2.0 + 0.003 * (*i as f64), 0.01)))
                .count()
        })
    });
}

criterion_group!(benches, bench_escape_time, bench_interior_shortcut);
criterion_main!(benches);
