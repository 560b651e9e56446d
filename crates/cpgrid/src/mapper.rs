//! Flat offsets into the two canonical corner-point arrays.
//!
//! # Corner numbering
//!
//! ```text
//!  top face (low depth)     bottom face (high depth)      j
//!                                                        /|\
//!     2---3                      6---7                    |
//!     |   |                      |   |                    |
//!     0---1                      4---5                    o-----> i
//! ```
//!
//! # Corner depth layout (ZCORN)
//!
//! Each k-layer stores a top sheet then a bottom sheet of `2nx * 2ny`
//! values, i fastest:
//!
//! ```text
//! index(i,j,k,c) = 2i + 4nx*j + 8nx*ny*k + shift[c]
//! shift = [0, 1, 2nx, 2nx+1, 4nxny, 4nxny+1, 4nxny+2nx, 4nxny+2nx+1]
//! ```
//!
//! # Pillar layout (COORD)
//!
//! `(nx+1)*(ny+1)` pillars, i fastest, each `[xt, yt, zt, xb, yb, zb]`:
//!
//! ```text
//! index(i,j,dim,layer) = 6 * (i + j*(nx+1)) + 3*layer + dim
//! ```

use crate::dims::GridDims;
use crate::error::{GridError, GridResult};

/// Number of corners per cell.
pub const CELL_CORNERS: usize = 8;

/// Values stored per pillar (top xyz + bottom xyz).
pub const PILLAR_STRIDE: usize = 6;

/// Maps `(i, j, k, corner)` onto the corner depth array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerIndexer {
  dims: GridDims,
  stride: [usize; 3],
  cell_shift: [usize; CELL_CORNERS],
}

impl CornerIndexer {
  pub fn new(dims: GridDims) -> Self {
    let GridDims { nx, ny, .. } = dims;
    Self {
      dims,
      stride: [2, 4 * nx, 8 * nx * ny],
      cell_shift: [
        0,
        1,
        2 * nx,
        2 * nx + 1,
        4 * nx * ny,
        4 * nx * ny + 1,
        4 * nx * ny + 2 * nx,
        4 * nx * ny + 2 * nx + 1,
      ],
    }
  }

  #[inline]
  pub fn dims(&self) -> GridDims {
    self.dims
  }

  /// Required length of the corner depth array: `8 * nx * ny * nz`.
  #[inline]
  pub fn size(&self) -> usize {
    self.dims.cartesian_size() * CELL_CORNERS
  }

  /// Offset of corner `c` of cell `(i, j, k)`.
  pub fn index(&self, i: usize, j: usize, k: usize, c: usize) -> GridResult<usize> {
    if i >= self.dims.nx || j >= self.dims.ny || k >= self.dims.nz || c >= CELL_CORNERS {
      return Err(GridError::OutOfRange(format!("invalid cell argument ({i}, {j}, {k}, corner {c})")));
    }
    Ok(self.index_unchecked(i, j, k, c))
  }

  /// Offset of corner `c` of the cell with flat index `global`.
  pub fn index_global(&self, global: usize, c: usize) -> GridResult<usize> {
    let [i, j, k] = self.dims.checked_ijk(global)?;
    self.index(i, j, k, c)
  }

  /// Same as [`CornerIndexer::index`] for callers that already validated
  /// the arguments.
  #[inline]
  pub(crate) fn index_unchecked(&self, i: usize, j: usize, k: usize, c: usize) -> usize {
    i * self.stride[0] + j * self.stride[1] + k * self.stride[2] + self.cell_shift[c]
  }

  /// All 8 corner offsets of a cell, corner order.
  #[inline]
  pub(crate) fn cell_offsets(&self, i: usize, j: usize, k: usize) -> [usize; CELL_CORNERS] {
    let base = i * self.stride[0] + j * self.stride[1] + k * self.stride[2];
    self.cell_shift.map(|shift| base + shift)
  }
}

/// Maps `(i, j, dim, layer)` onto the pillar array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PillarIndexer {
  nx: usize,
  ny: usize,
}

impl PillarIndexer {
  pub fn new(nx: usize, ny: usize) -> Self {
    Self { nx, ny }
  }

  /// Required length of the pillar array: `6 * (nx + 1) * (ny + 1)`.
  #[inline]
  pub fn size(&self) -> usize {
    (self.nx + 1) * (self.ny + 1) * PILLAR_STRIDE
  }

  /// Offset of component `dim` (0=x, 1=y, 2=z) of the top (`layer == 0`) or
  /// bottom (`layer == 1`) point of pillar `(i, j)`; `i <= nx`, `j <= ny`.
  pub fn index(&self, i: usize, j: usize, dim: usize, layer: usize) -> GridResult<usize> {
    if i > self.nx || j > self.ny || dim > 2 || layer > 1 {
      return Err(GridError::OutOfRange(format!(
        "pillar ({i}, {j}) dim {dim} layer {layer} outside {}x{} pillars",
        self.nx + 1,
        self.ny + 1
      )));
    }
    Ok(self.pillar_offset(i, j) + layer * 3 + dim)
  }

  /// Offset of the first value of pillar `(i, j)`.
  #[inline]
  pub(crate) fn pillar_offset(&self, i: usize, j: usize) -> usize {
    PILLAR_STRIDE * (i + j * (self.nx + 1))
  }
}

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;
