//! Benchmarks for EGRID encoding and decoding of in-memory files.

use cpgrid::{CornerPointGrid, EgridFile, GridDims, HostMapping, LengthUnit, Nnc, NncData, RefinementSpec};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn refined_grid(n: usize) -> CornerPointGrid {
  let mut grid = CornerPointGrid::uniform(n, n, 4, 100.0, 100.0, 5.0, 2000.0);
  let mid = n / 2;
  let spec = RefinementSpec::new("LGR1", [mid, mid, 0], [mid, mid, 3], GridDims::new(5, 5, 8));
  grid.init_lgr_cells(&[spec], HostMapping::Logical).unwrap();
  grid
}

fn bench_write(c: &mut Criterion) {
  let mut group = c.benchmark_group("egrid_write");

  for n in [20, 80] {
    let grid = refined_grid(n);
    let nnc: Nnc = (0..n).map(|i| NncData::new(i, i + n * n, 0.5)).collect();
    group.throughput(Throughput::Elements(grid.cartesian_size() as u64));

    for unit in [LengthUnit::Metres, LengthUnit::Feet] {
      group.bench_with_input(BenchmarkId::new(unit.label(), n), &n, |b, _| {
        b.iter(|| black_box(grid.write_egrid(Vec::new(), &nnc, unit).unwrap().len()))
      });
    }
  }

  group.finish();
}

fn bench_read(c: &mut Criterion) {
  let mut group = c.benchmark_group("egrid_read");

  for n in [20, 80] {
    let bytes = refined_grid(n).write_egrid(Vec::new(), &Nnc::new(), LengthUnit::Metres).unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
      b.iter(|| black_box(EgridFile::from_reader(bytes.as_slice()).unwrap().array_list().len()))
    });
  }

  group.finish();
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
