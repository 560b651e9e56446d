//! Cartesian grids from per-axis increments or per-cell spacing.

use tracing::info;

use super::{assert_size, GridArrays};
use crate::dims::GridDims;
use crate::error::{GridError, GridResult};
use crate::input::GridInput;
use crate::mapper::{CornerIndexer, PillarIndexer};

/// Explicit TOPS within this distance of the stacked value snap to it.
const TOPS_SNAP_TOLERANCE: f64 = 1e-6;

/// `[0, v0, v0 + v1, ...]`.
fn partial_sums(values: &[f64]) -> Vec<f64> {
  let mut sums = Vec::with_capacity(values.len() + 1);
  sums.push(0.0);
  let mut acc = 0.0;
  for v in values {
    acc += v;
    sums.push(acc);
  }
  sums
}

// =========================================================================
// DXV, DYV, DZV and DEPTHZ
// =========================================================================

pub(super) fn from_depthz(input: &GridInput) -> GridResult<GridArrays> {
  let dims = input.dims();
  let GridDims { nx, ny, nz } = dims;
  let dxv = input.require("DXV")?;
  let dyv = input.require("DYV")?;
  let dzv = input.require("DZV")?;
  let depthz = input.require("DEPTHZ")?;

  info!("Creating grid from keywords DXV, DYV, DZV and DEPTHZ");
  assert_size("DEPTHZ", depthz, (nx + 1) * (ny + 1))?;
  assert_size("DXV", dxv, nx)?;
  assert_size("DYV", dyv, ny)?;
  assert_size("DZV", dzv, nz)?;

  let x = partial_sums(dxv);
  let y = partial_sums(dyv);
  let z = partial_sums(dzv);

  let mut coord = Vec::with_capacity(PillarIndexer::new(nx, ny).size());
  for j in 0..=ny {
    for i in 0..=nx {
      let top = depthz[i + j * (nx + 1)];
      coord.extend_from_slice(&[x[i], y[j], top, x[i], y[j], top + z[nz]]);
    }
  }

  let mapper = CornerIndexer::new(dims);
  let mut zcorn = vec![0.0; mapper.size()];
  for k in 0..nz {
    for j in 0..ny {
      for i in 0..nx {
        let offsets = mapper.cell_offsets(i, j, k);
        let pillar_depths = [
          depthz[i + j * (nx + 1)],
          depthz[i + 1 + j * (nx + 1)],
          depthz[i + (j + 1) * (nx + 1)],
          depthz[i + 1 + (j + 1) * (nx + 1)],
        ];
        for (c, depth) in pillar_depths.iter().enumerate() {
          zcorn[offsets[c]] = depth + z[k];
          zcorn[offsets[c + 4]] = depth + z[k] + dzv[k];
        }
      }
    }
  }

  Ok(GridArrays::generated(dims, coord, zcorn))
}

// =========================================================================
// DX/DXV, DY/DYV, DZ/DZV and TOPS
// =========================================================================

/// Per-cell spacing along axis `axis` from the cell keyword or the
/// per-axis vector.
///
/// A cell keyword covering at least the top layer is extended downward by
/// copying the layer above.
fn spacing_vector(input: &GridInput, axis: usize, cell_key: &'static str, axis_key: &'static str) -> GridResult<Vec<f64>> {
  let dims = input.dims();
  let volume = dims.cartesian_size();
  let area = dims.layer_size();

  if let Some(values) = input.keyword(cell_key) {
    let mut d = values.to_vec();
    if d.len() >= area && d.len() < volume {
      let initial = d.len();
      d.resize(volume, 0.0);
      for target in initial..volume {
        d[target] = d[target - area];
      }
    }
    assert_size(cell_key, &d, volume)?;
    return Ok(d);
  }

  let per_axis = input.require(axis_key)?;
  let extents = dims.as_array();
  assert_size(axis_key, per_axis, extents[axis])?;
  let mut d = Vec::with_capacity(volume);
  for k in 0..dims.nz {
    for j in 0..dims.ny {
      for i in 0..dims.nx {
        d.push(per_axis[[i, j, k][axis]]);
      }
    }
  }
  Ok(d)
}

/// TOPS for every cell. Layers below the supplied ones stack on the layer
/// above; supplied values that differ from the stacked value by floating
/// noise are snapped to it so that touching cells share depths exactly.
fn tops_vector(input: &GridInput, dz: &[f64]) -> GridResult<Vec<f64>> {
  let dims = input.dims();
  let volume = dims.cartesian_size();
  let area = dims.layer_size();
  let mut tops = input.require("TOPS")?.to_vec();

  if tops.len() >= area {
    let initial = tops.len();
    tops.resize(volume, 0.0);
    for target in area..volume {
      let source = target - area;
      let next = tops[source] + dz[source];
      if target >= initial || (next - tops[target]).abs() < TOPS_SNAP_TOLERANCE {
        tops[target] = next;
      }
    }
  }
  assert_size("TOPS", &tops, volume)?;
  Ok(tops)
}

/// Cumulative sums along i for every row of layer `k`.
fn sum_i_at(dims: GridDims, k: usize, dx: &[f64]) -> Vec<f64> {
  let mut sums = vec![0.0; dims.layer_size()];
  for j in 0..dims.ny {
    let mut acc = 0.0;
    for i in 0..dims.nx {
      acc += dx[dims.global_index(i, j, k)];
      sums[i + j * dims.nx] = acc;
    }
  }
  sums
}

/// Cumulative sums along j for every column of layer `k`.
fn sum_j_at(dims: GridDims, k: usize, dy: &[f64]) -> Vec<f64> {
  let mut sums = vec![0.0; dims.layer_size()];
  for i in 0..dims.nx {
    let mut acc = 0.0;
    for j in 0..dims.ny {
      acc += dy[dims.global_index(i, j, k)];
      sums[i + j * dims.nx] = acc;
    }
  }
  sums
}

/// Total thickness of every (i, j) column.
fn column_thickness(dims: GridDims, dz: &[f64]) -> Vec<f64> {
  let mut sums = vec![0.0; dims.layer_size()];
  for k in 0..dims.nz {
    for (n, sum) in sums.iter_mut().enumerate() {
      *sum += dz[n + k * dims.layer_size()];
    }
  }
  sums
}

/// Pillars from in-plane sums at the top and bottom layers.
///
/// Pillar `(pi, pj)` takes its x from the i-sum of the cell to its left,
/// its y from the j-sum of the cell below it, its top depth from TOPS of
/// the nearest cell up-right, and its span from the thickness of the
/// column down-left (clamped at the grid edges).
fn tops_coord(dims: GridDims, dx: &[f64], dy: &[f64], dz: &[f64], tops: &[f64]) -> Vec<f64> {
  let GridDims { nx, ny, nz } = dims;
  let x_top = sum_i_at(dims, 0, dx);
  let x_bot = sum_i_at(dims, nz - 1, dx);
  let y_top = sum_j_at(dims, 0, dy);
  let y_bot = sum_j_at(dims, nz - 1, dy);
  let thickness = column_thickness(dims, dz);

  let mut coord = Vec::with_capacity(PillarIndexer::new(nx, ny).size());
  for pj in 0..=ny {
    for pi in 0..=nx {
      let row = pj.min(ny - 1);
      let col = pi.min(nx - 1);
      let (xt, xb) = if pi == 0 {
        (0.0, 0.0)
      } else {
        let n = (pi - 1) + row * nx;
        (x_top[n], x_bot[n])
      };
      let (yt, yb) = if pj == 0 {
        (0.0, 0.0)
      } else {
        let n = col + (pj - 1) * nx;
        (y_top[n], y_bot[n])
      };
      let zt = tops[col + row * nx];
      let zb = zt + thickness[pi.max(1) - 1 + (pj.max(1) - 1) * nx];
      coord.extend_from_slice(&[xt, yt, zt, xb, yb, zb]);
    }
  }
  coord
}

/// Depths stacked down each column from its top-layer TOPS.
fn tops_zcorn(dims: GridDims, dz: &[f64], tops: &[f64]) -> Vec<f64> {
  let mapper = CornerIndexer::new(dims);
  let mut zcorn = vec![0.0; mapper.size()];
  for j in 0..dims.ny {
    for i in 0..dims.nx {
      let mut z = tops[i + j * dims.nx];
      for k in 0..dims.nz {
        let offsets = mapper.cell_offsets(i, j, k);
        let bottom = z + dz[dims.global_index(i, j, k)];
        for c in 0..4 {
          zcorn[offsets[c]] = z;
          zcorn[offsets[c + 4]] = bottom;
        }
        z = bottom;
      }
    }
  }
  zcorn
}

pub(super) fn from_tops(input: &GridInput) -> GridResult<GridArrays> {
  let dims = input.dims();
  if dims.cartesian_size() == 0 {
    return Err(GridError::OutOfRange(format!(
      "grid {}x{}x{} has no cells",
      dims.nx, dims.ny, dims.nz
    )));
  }
  info!("Creating grid from keywords DX, DY, DZ and TOPS");

  let dx = spacing_vector(input, 0, "DX", "DXV")?;
  let dy = spacing_vector(input, 1, "DY", "DYV")?;
  let dz = spacing_vector(input, 2, "DZ", "DZV")?;
  let tops = tops_vector(input, &dz)?;

  let coord = tops_coord(dims, &dx, &dy, &dz, &tops);
  let zcorn = tops_zcorn(dims, &dz, &tops);
  Ok(GridArrays::generated(dims, coord, zcorn))
}
