//! Corner-depth monotonicity repair.
//!
//! Depths along each of the four vertical corner columns of a cell stack
//! must be ordered with one global sign:
//!
//! ```text
//! sign = zcorn[(0,0,0) c0] <= zcorn[(0,0,nz-1) c4] ? +1 : -1
//!
//!   (top(k) - bottom(k-1)) * sign >= 0     between cells
//!   (bottom(k) - top(k))   * sign >= 0     inside a cell
//! ```
//!
//! Violations are clamped to the neighbouring value and counted. Pillars
//! are never moved.

use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::mapper::CornerIndexer;

impl CornerIndexer {
  fn depth_sign(&self, zcorn: &[f64]) -> f64 {
    let nz = self.dims().nz;
    let top = zcorn[self.index_unchecked(0, 0, 0, 0)];
    let bottom = zcorn[self.index_unchecked(0, 0, nz - 1, 4)];
    if top <= bottom {
      1.0
    } else {
      -1.0
    }
  }

  fn check_len(&self, zcorn: &[f64]) -> GridResult<bool> {
    if zcorn.len() != self.size() {
      return Err(GridError::size_mismatch("ZCORN", self.size(), zcorn.len()));
    }
    Ok(self.size() > 0)
  }

  /// Clamp out-of-order corner depths in one k-major pass.
  ///
  /// Returns the number of values changed. One pass is enough: every
  /// clamp only reads values already visited.
  pub fn repair(&self, zcorn: &mut [f64]) -> GridResult<usize> {
    if !self.check_len(zcorn)? {
      return Ok(0);
    }
    let dims = self.dims();
    let sign = self.depth_sign(zcorn);
    let mut adjusted = 0;

    for k in 0..dims.nz {
      for j in 0..dims.ny {
        for i in 0..dims.nx {
          for c in 0..4 {
            let top = self.index_unchecked(i, j, k, c);
            if k > 0 {
              let prev_bottom = self.index_unchecked(i, j, k - 1, c + 4);
              if (zcorn[top] - zcorn[prev_bottom]) * sign < 0.0 {
                zcorn[top] = zcorn[prev_bottom];
                adjusted += 1;
              }
            }

            let bottom = self.index_unchecked(i, j, k, c + 4);
            if (zcorn[bottom] - zcorn[top]) * sign < 0.0 {
              zcorn[bottom] = zcorn[top];
              adjusted += 1;
            }
          }
        }
      }
    }

    if adjusted > 0 {
      debug!(adjusted, "Adjusted out-of-order corner depths");
    }
    Ok(adjusted)
  }

  /// `true` when [`CornerIndexer::repair`] would change nothing.
  pub fn is_monotone(&self, zcorn: &[f64]) -> GridResult<bool> {
    if !self.check_len(zcorn)? {
      return Ok(true);
    }
    let dims = self.dims();
    let sign = self.depth_sign(zcorn);

    for j in 0..dims.ny {
      for i in 0..dims.nx {
        for c in 0..4 {
          for k in 0..dims.nz {
            let top = self.index_unchecked(i, j, k, c);
            if k > 0 {
              let prev_bottom = self.index_unchecked(i, j, k - 1, c + 4);
              if (zcorn[top] - zcorn[prev_bottom]) * sign < 0.0 {
                return Ok(false);
              }
            }
            let bottom = self.index_unchecked(i, j, k, c + 4);
            if (zcorn[bottom] - zcorn[top]) * sign < 0.0 {
              return Ok(false);
            }
          }
        }
      }
    }
    Ok(true)
  }
}

#[cfg(test)]
#[path = "repair_test.rs"]
mod repair_test;
