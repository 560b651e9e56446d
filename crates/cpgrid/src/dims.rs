//! Logical grid extents and cartesian index arithmetic.
//!
//! ```text
//! global = i + j * nx + k * nx * ny      (i fastest, k slowest)
//! ```

use crate::error::{GridError, GridResult};

/// Logical extents `(nx, ny, nz)` of a grid. Never mutated after construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridDims {
  pub nx: usize,
  pub ny: usize,
  pub nz: usize,
}

impl GridDims {
  pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
    Self { nx, ny, nz }
  }

  /// Number of cells in the full cartesian box.
  #[inline]
  pub const fn cartesian_size(&self) -> usize {
    self.nx * self.ny * self.nz
  }

  /// Number of cells in one k-layer.
  #[inline]
  pub const fn layer_size(&self) -> usize {
    self.nx * self.ny
  }

  #[inline]
  pub const fn as_array(&self) -> [usize; 3] {
    [self.nx, self.ny, self.nz]
  }

  /// Flat cartesian index of `(i, j, k)`. No bounds checking.
  #[inline]
  pub const fn global_index(&self, i: usize, j: usize, k: usize) -> usize {
    i + j * self.nx + k * self.nx * self.ny
  }

  /// Inverse of [`GridDims::global_index`].
  #[inline]
  pub const fn ijk(&self, global: usize) -> [usize; 3] {
    let i = global % self.nx;
    let rest = global / self.nx;
    [i, rest % self.ny, rest / self.ny]
  }

  /// Fail with `OutOfRange` unless `(i, j, k)` is inside the box.
  pub fn assert_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<()> {
    if i >= self.nx || j >= self.ny || k >= self.nz {
      return Err(GridError::OutOfRange(format!(
        "cell ({i}, {j}, {k}) outside grid {}x{}x{}",
        self.nx, self.ny, self.nz
      )));
    }
    Ok(())
  }

  /// Fail with `OutOfRange` unless `global` addresses a cell.
  pub fn assert_global(&self, global: usize) -> GridResult<()> {
    if global >= self.cartesian_size() {
      return Err(GridError::OutOfRange(format!(
        "global index {global} >= cartesian size {}",
        self.cartesian_size()
      )));
    }
    Ok(())
  }

  /// Checked `(i, j, k)` to global index.
  pub fn checked_global_index(&self, i: usize, j: usize, k: usize) -> GridResult<usize> {
    self.assert_ijk(i, j, k)?;
    Ok(self.global_index(i, j, k))
  }

  /// Checked global index to `(i, j, k)`.
  pub fn checked_ijk(&self, global: usize) -> GridResult<[usize; 3]> {
    self.assert_global(global)?;
    Ok(self.ijk(global))
  }
}

impl From<[usize; 3]> for GridDims {
  fn from(d: [usize; 3]) -> Self {
    Self::new(d[0], d[1], d[2])
  }
}

#[cfg(test)]
#[path = "dims_test.rs"]
mod dims_test;
