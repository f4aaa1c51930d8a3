use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sandfall::{step, Brush, BrushMode, Grid, Shape};

/// Top `fill` of the rows about 70% occupied, the rest empty.
fn half_full_grid(size: usize, fill: f64) -> Grid {
    let mut rng = StdRng::seed_from_u64(3);
    let mut grid = Grid::new(size);
    let rows = (size as f64 * fill) as i32;
    for x in 0..size as i32 {
        for y in 0..rows {
            if rng.gen_bool(0.7) {
                grid.set(x, y, rng.gen_range(1..=0xFF_FFFF));
            }
        }
    }
    grid
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    for size in [100usize, 200, 400] {
        let grid = half_full_grid(size, 0.5);
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            let mut rng = StdRng::seed_from_u64(11);
            b.iter_batched_ref(
                || grid.clone(),
                |g| step(g, &mut rng, true),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_brush(c: &mut Criterion) {
    for shape in [Shape::Disc, Shape::star()] {
        c.bench_function(&format!("paint_{}", shape.name()), |b| {
            let mut brush = Brush::new(20.0, shape);
            b.iter_batched_ref(
                || Grid::new(100),
                |g| brush.apply(g, (50, 50), BrushMode::Paint),
                criterion::BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, bench_step, bench_brush);
criterion_main!(benches);
