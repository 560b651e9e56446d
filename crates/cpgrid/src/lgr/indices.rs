//! Tree-wide active indices.
//!
//! Refined hosts are replaced by the whole subtree below them, so a parent
//! consumes `1` slot per ordinary active cell, the child's total at a
//! child's first host, and `0` at its other hosts:
//!
//! ```text
//!   active    0  1  2  3  4  5
//!   consumed  1  1  9  0  1  1        child hosts = {2, 3}, child total 9
//!   map       0  1  2 11 11 12 13
//! ```
//!
//! A child starts at `parent.counter + parent.map[first host]`.

use super::LgrNode;
use crate::error::{GridError, GridResult};
use crate::grid::CornerPointGrid;

fn number_levels(node: &mut LgrNode, next: &mut usize) {
  node.level = *next;
  *next += 1;
  let level = node.level;
  for child in &mut node.children {
    child.grid.lgr.level_father = level;
    number_levels(&mut child.grid.lgr, next);
  }
}

impl CornerPointGrid {
  /// Depth-first level numbers; the root is 0.
  pub(super) fn assign_levels(&mut self) {
    let mut next = 0;
    number_levels(&mut self.lgr, &mut next);
  }

  /// Bottom-up: children need their totals before the parent map exists.
  pub(super) fn build_level_maps(&mut self) {
    for child in &mut self.lgr.children {
      child.grid.build_level_maps();
    }

    let mut consumed = vec![1; self.num_active()];
    let mut refined = std::collections::BTreeSet::new();
    for child in &self.lgr.children {
      for &host in &child.father_active {
        consumed[host] = 0;
        refined.insert(host);
      }
      consumed[child.father_active[0]] = child.grid.total_active_lgr();
    }

    let mut map = Vec::with_capacity(consumed.len() + 1);
    let mut acc = 0;
    map.push(acc);
    for slots in consumed {
      acc += slots;
      map.push(acc);
    }
    self.lgr.level_active_map = map;
    self.lgr.refined_hosts = refined;
  }

  /// Top-down counter offsets.
  pub(super) fn propagate_counters(&mut self) {
    let node = &mut self.lgr;
    for child in &mut node.children {
      child.grid.lgr.counter = node.counter + node.level_active_map[child.father_active[0]];
      child.grid.propagate_counters();
    }
  }

  /// Active cells of the whole tree. Hosts replaced by a refinement count
  /// through the refinement only.
  pub fn total_active_lgr(&self) -> usize {
    let refined: usize = self.lgr.children.iter().map(|child| child.father_active.len()).sum();
    let children: usize = self.lgr.children.iter().map(|child| child.grid.total_active_lgr()).sum();
    self.num_active() + children - refined
  }

  fn level_active_index(&self, global: usize) -> GridResult<usize> {
    let active = self.active_index(global)?;
    if self.lgr.refined_hosts.contains(&active) {
      return Err(GridError::RefinedCellAccess {
        label: self.lgr.label.clone(),
        index: global,
      });
    }
    // Grids never refined have no map; their indices are the plain ones.
    let slot = self.lgr.level_active_map.get(active).copied().unwrap_or(active);
    Ok(self.lgr.counter + slot)
  }

  /// Tree-wide active index of cell `(i, j, k)` in grid `label`.
  ///
  /// Cells replaced by a deeper refinement have no index of their own and
  /// fail with `RefinedCellAccess`.
  pub fn active_index_lgr(&self, label: &str, i: usize, j: usize, k: usize) -> GridResult<usize> {
    let grid = self.lgr_level_grid(label)?;
    grid.level_active_index(grid.dims.checked_global_index(i, j, k)?)
  }

  /// As [`CornerPointGrid::active_index_lgr`] for a local global index.
  pub fn active_index_lgr_local(&self, label: &str, global: usize) -> GridResult<usize> {
    let grid = self.lgr_level_grid(label)?;
    grid.dims.assert_global(global)?;
    grid.level_active_index(global)
  }
}
