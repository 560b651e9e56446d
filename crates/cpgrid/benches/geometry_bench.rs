//! Benchmarks for per-cell geometry and ZCORN repair on regular boxes.

use cpgrid::{CornerIndexer, CornerPointGrid, GridDims};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: [usize; 3] = [10, 30, 60];

/// Active volumes from scratch; the cache is dropped every iteration.
fn bench_active_volume(c: &mut Criterion) {
  let mut group = c.benchmark_group("active_volume");

  for n in SIZES {
    let mut grid = CornerPointGrid::uniform(n, n, n / 2, 50.0, 50.0, 2.0, 1500.0);
    group.throughput(Throughput::Elements(grid.cartesian_size() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
      b.iter(|| {
        grid.clear_volume_cache();
        black_box(grid.active_volume().iter().sum::<f64>())
      })
    });
  }

  group.finish();
}

/// Repair of a stack whose every second layer is pushed above its neighbour.
fn bench_repair(c: &mut Criterion) {
  let mut group = c.benchmark_group("zcorn_repair");

  for n in SIZES {
    let grid = CornerPointGrid::uniform(n, n, n / 2, 50.0, 50.0, 2.0, 1500.0);
    let mapper = CornerIndexer::new(GridDims::new(n, n, n / 2));
    let mut crossed = grid.zcorn().to_vec();
    for (idx, z) in crossed.iter_mut().enumerate() {
      if (idx / (8 * n * n)) % 2 == 1 {
        *z -= 3.0;
      }
    }

    group.throughput(Throughput::Elements(crossed.len() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
      b.iter(|| {
        let mut zcorn = crossed.clone();
        black_box(mapper.repair(&mut zcorn).unwrap())
      })
    });
  }

  group.finish();
}

criterion_group!(benches, bench_active_volume, bench_repair);
criterion_main!(benches);
