//! Activity mask and the global/active index maps.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::CornerPointGrid;
use crate::config::MinpvMode;
use crate::error::{GridError, GridResult};

impl CornerPointGrid {
  /// Rebuild the activity mask and both index maps.
  ///
  /// `None` makes every cell active. A supplied mask must cover the full
  /// cartesian box; declared aquifer cells are forced active. The volume
  /// cache is always dropped.
  pub fn reset_actnum(&mut self, actnum: Option<&[i32]>) -> GridResult<()> {
    let Some(actnum) = actnum else {
      self.set_all_active();
      return Ok(());
    };

    let size = self.cartesian_size();
    if actnum.len() != size {
      tracing::error!(expected = size, actual = actnum.len(), "ACTNUM size differs from grid");
      return Err(GridError::size_mismatch("ACTNUM", size, actnum.len()));
    }

    self.actnum.clear();
    self.actnum.reserve(size);
    self.global_to_active.clear();
    self.global_to_active.reserve(size);
    self.active_to_global.clear();

    for (g, &flag) in actnum.iter().enumerate() {
      let flag = if self.aquifer_cells.contains(&g) { 1 } else { flag };
      self.actnum.push(flag);
      if flag > 0 {
        self.global_to_active.push(self.active_to_global.len() as i32);
        self.active_to_global.push(g);
      } else {
        self.global_to_active.push(-1);
      }
    }
    self.active_volume = OnceLock::new();
    Ok(())
  }

  pub(crate) fn set_all_active(&mut self) {
    let size = self.cartesian_size();
    self.actnum = vec![1; size];
    self.global_to_active = (0..size as i32).collect();
    self.active_to_global = (0..size).collect();
    self.active_volume = OnceLock::new();
  }

  pub fn actnum(&self) -> &[i32] {
    &self.actnum
  }

  #[inline]
  pub fn num_active(&self) -> usize {
    self.active_to_global.len()
  }

  pub fn all_active(&self) -> bool {
    self.num_active() == self.cartesian_size()
  }

  /// Active index to global index, one entry per active cell.
  pub fn active_map(&self) -> &[usize] {
    &self.active_to_global
  }

  /// Global index to active index, `-1` for inactive cells.
  pub fn global_to_active_map(&self) -> &[i32] {
    &self.global_to_active
  }

  pub fn cell_active(&self, global: usize) -> GridResult<bool> {
    self.dims.assert_global(global)?;
    Ok(self.actnum[global] > 0)
  }

  pub fn cell_active_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<bool> {
    self.cell_active(self.dims.checked_global_index(i, j, k)?)
  }

  /// Active index of an active cell; `InactiveCell` otherwise.
  pub fn active_index(&self, global: usize) -> GridResult<usize> {
    self.dims.assert_global(global)?;
    usize::try_from(self.global_to_active[global]).map_err(|_| GridError::InactiveCell(global))
  }

  pub fn active_index_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<usize> {
    self.active_index(self.dims.checked_global_index(i, j, k)?)
  }

  pub fn global_index_of_active(&self, active: usize) -> GridResult<usize> {
    self.active_to_global.get(active).copied().ok_or_else(|| {
      GridError::OutOfRange(format!("active index {active} >= active count {}", self.num_active()))
    })
  }

  /// `true` when the cell is active and, with `EclStd`, its pore volume
  /// reaches the minimum.
  pub fn cell_active_after_minpv(&self, i: usize, j: usize, k: usize, porv: f64) -> GridResult<bool> {
    let g = self.dims.checked_global_index(i, j, k)?;
    if !self.cell_active(g)? {
      return Ok(false);
    }
    Ok(self.minpv_mode == MinpvMode::Inactive || porv >= self.minpv[g])
  }

  pub fn is_aquifer_cell(&self, global: usize) -> bool {
    self.aquifer_cells.contains(&global)
  }

  /// `(PVTNUM, SATNUM)` per aquifer cell; 0 where defaulted.
  pub fn aquifer_cell_tabnums(&self) -> &BTreeMap<usize, [i32; 2]> {
    &self.aquifer_tabnums
  }
}

#[cfg(test)]
#[path = "activity_test.rs"]
mod activity_test;
