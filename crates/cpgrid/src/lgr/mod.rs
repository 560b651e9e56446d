//! Local grid refinements.
//!
//! Every grid owns its refinements. A child replaces a box of host cells in
//! its parent with a finer grid:
//!
//! ```text
//!   GLOBAL ─┬─ LGR2   (hosts: parent active [1])
//!           └─ LGR1   (hosts: parent active [4])
//!               └─ LGR3
//! ```
//!
//! Children are kept sorted by their first host cell. Parents are found by
//! label, never through a stored back-reference.
//!
//! Initialisation runs in a fixed order: labels, tree, index passes, child
//! geometry, host mapping. After that the tree is read-only apart from
//! geometry overrides.

mod hosts;
mod indices;
mod refine;

use std::collections::BTreeSet;

use crate::dims::GridDims;
use crate::error::{GridError, GridResult};
use crate::grid::CornerPointGrid;

/// Label of the root grid.
pub const GLOBAL_LABEL: &str = "GLOBAL";

/// How child cells find their host cell in the parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HostMapping {
  /// Integer division of child indices by the refinement ratio.
  #[default]
  Logical,
  /// The host cell that contains the child cell center.
  Geometrical,
}

/// One CARFIN-style refinement: a host box in the parent (0-based,
/// inclusive) and the refined extents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefinementSpec {
  pub name: String,
  pub parent: String,
  pub low: [usize; 3],
  pub up: [usize; 3],
  pub dims: GridDims,
}

impl RefinementSpec {
  /// Refinement of the root grid.
  pub fn new(name: impl Into<String>, low: [usize; 3], up: [usize; 3], dims: GridDims) -> Self {
    Self {
      name: name.into(),
      parent: GLOBAL_LABEL.to_string(),
      low,
      up,
      dims,
    }
  }

  pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
    self.parent = parent.into();
    self
  }

  /// Host box extent along each axis. Only meaningful once `low <= up`.
  pub fn box_extent(&self) -> [usize; 3] {
    std::array::from_fn(|axis| self.up[axis] + 1 - self.low[axis])
  }

  fn invalid(&self, reason: String) -> GridError {
    GridError::InvalidRefinement {
      name: self.name.clone(),
      reason,
    }
  }

  /// The box must lie inside `parent` and every refined extent must be a
  /// whole multiple of the box extent.
  pub fn validate(&self, parent: GridDims) -> GridResult<()> {
    let parent_extent = parent.as_array();
    let refined = self.dims.as_array();
    for axis in 0..3 {
      let (low, up) = (self.low[axis], self.up[axis]);
      if low > up || up >= parent_extent[axis] {
        return Err(self.invalid(format!(
          "host range {low}..={up} on axis {axis} outside parent extent {}",
          parent_extent[axis]
        )));
      }
      let extent = up + 1 - low;
      if refined[axis] == 0 || refined[axis] % extent != 0 {
        return Err(self.invalid(format!(
          "{} refined cells on axis {axis} do not divide {extent} host cells",
          refined[axis]
        )));
      }
    }
    Ok(())
  }
}

/// Refinement bookkeeping carried by every grid node.
#[derive(Clone, Debug, Default)]
pub(crate) struct LgrNode {
  pub(crate) label: String,
  pub(crate) children: Vec<LgrGrid>,
  /// Emission order of `children`.
  pub(crate) print_order: Vec<usize>,
  /// Root only: GLOBAL followed by every refinement name.
  pub(crate) all_labels: Vec<String>,
  /// Depth-first position in the tree; 0 for the root.
  pub(crate) level: usize,
  pub(crate) level_father: usize,
  /// Tree-wide active index of this node's first cell.
  pub(crate) counter: usize,
  /// Prefix sums of tree cells consumed per own active cell.
  pub(crate) level_active_map: Vec<usize>,
  /// Own active cells replaced by a child.
  pub(crate) refined_hosts: BTreeSet<usize>,
}

impl LgrNode {
  pub(crate) fn root() -> Self {
    Self {
      label: GLOBAL_LABEL.to_string(),
      all_labels: vec![GLOBAL_LABEL.to_string()],
      ..Self::default()
    }
  }

  fn named(label: &str) -> Self {
    Self {
      label: label.to_string(),
      ..Self::default()
    }
  }
}

/// A refined child grid and its place in the parent.
#[derive(Clone, Debug)]
pub struct LgrGrid {
  pub(crate) grid: CornerPointGrid,
  pub(crate) father_label: String,
  /// Sorted active indices of the host cells in the parent.
  pub(crate) father_active: Vec<usize>,
  pub(crate) low: [usize; 3],
  pub(crate) up: [usize; 3],
  /// Parent global index hosting each child cell.
  pub(crate) hostnum: Vec<usize>,
}

impl LgrGrid {
  pub fn label(&self) -> &str {
    &self.grid.lgr.label
  }

  pub fn grid(&self) -> &CornerPointGrid {
    &self.grid
  }

  pub fn father_label(&self) -> &str {
    &self.father_label
  }

  /// Parent active indices replaced by this refinement.
  pub fn father_cells(&self) -> &[usize] {
    &self.father_active
  }

  /// Inclusive 0-based host box `(low, up)` in the parent.
  pub fn host_box(&self) -> ([usize; 3], [usize; 3]) {
    (self.low, self.up)
  }

  pub fn hostnum(&self) -> &[usize] {
    &self.hostnum
  }

  pub fn level(&self) -> usize {
    self.grid.lgr.level
  }

  /// Refined cells per host cell along each axis.
  pub(crate) fn ratio(&self) -> [usize; 3] {
    let dims = self.grid.dims.as_array();
    std::array::from_fn(|axis| dims[axis] / (self.up[axis] + 1 - self.low[axis]))
  }
}

fn unknown_label(label: &str) -> GridError {
  GridError::OutOfRange(format!("no LGR with label {label}"))
}

impl CornerPointGrid {
  /// Build the refinement tree below this grid.
  ///
  /// Replaces any previous refinements. Host cells must be active and may
  /// belong to one refinement only.
  #[tracing::instrument(skip_all, name = "lgr::init")]
  pub fn init_lgr_cells(&mut self, specs: &[RefinementSpec], mapping: HostMapping) -> GridResult<()> {
    self.lgr = LgrNode::root();
    for spec in specs {
      if spec.name == GLOBAL_LABEL || self.lgr.all_labels.contains(&spec.name) {
        return Err(spec.invalid("duplicate refinement label".to_string()));
      }
      self.lgr.all_labels.push(spec.name.clone());
    }

    let built = self.build_children(specs)?;
    if let Some(orphan) = specs.iter().find(|spec| !built.contains(&spec.name)) {
      return Err(orphan.invalid(format!("parent grid {} not found", orphan.parent)));
    }

    self.assign_levels();
    self.build_level_maps();
    self.propagate_counters();
    self.refine_children();
    self.assign_hosts(mapping)?;

    tracing::info!(
      refinements = specs.len(),
      total_active = self.total_active_lgr(),
      "Initialised local grid refinements"
    );
    Ok(())
  }

  /// Create the direct children of this grid, then recurse. Returns the
  /// labels of every node created.
  fn build_children(&mut self, specs: &[RefinementSpec]) -> GridResult<Vec<String>> {
    let label = self.lgr.label.clone();
    let mut taken = BTreeSet::new();
    for spec in specs.iter().filter(|spec| spec.parent == label) {
      spec.validate(self.dims)?;

      let mut father_active = Vec::new();
      for k in spec.low[2]..=spec.up[2] {
        for j in spec.low[1]..=spec.up[1] {
          for i in spec.low[0]..=spec.up[0] {
            let active = self.active_index(self.dims.global_index(i, j, k))?;
            if !taken.insert(active) {
              return Err(spec.invalid(format!("host cell ({i}, {j}, {k}) already refined")));
            }
            father_active.push(active);
          }
        }
      }
      father_active.sort_unstable();

      let pillars = (spec.dims.nx + 1) * (spec.dims.ny + 1) * 6;
      let corners = spec.dims.cartesian_size() * 8;
      let mut grid = CornerPointGrid::bare(spec.dims, vec![0.0; pillars], vec![0.0; corners]);
      grid.set_all_active();
      grid.lgr = LgrNode::named(&spec.name);

      self.lgr.children.push(LgrGrid {
        grid,
        father_label: label.clone(),
        father_active,
        low: spec.low,
        up: spec.up,
        hostnum: Vec::new(),
      });
    }

    self.lgr.children.sort_by_key(|child| child.father_active[0]);
    self.lgr.print_order = (0..self.lgr.children.len()).collect();

    let mut built = Vec::new();
    for child in &mut self.lgr.children {
      built.push(child.label().to_string());
      built.extend(child.grid.build_children(specs)?);
    }
    Ok(built)
  }

  /// Path of refinements from this grid down to `label`, outermost first.
  fn lgr_path<'a>(&'a self, label: &str, path: &mut Vec<&'a LgrGrid>) -> bool {
    for child in &self.lgr.children {
      path.push(child);
      if child.label() == label || child.grid.lgr_path(label, path) {
        return true;
      }
      path.pop();
    }
    false
  }

  fn find_path(&self, label: &str) -> GridResult<Vec<&LgrGrid>> {
    let mut path = Vec::new();
    if self.lgr_path(label, &mut path) {
      Ok(path)
    } else {
      Err(unknown_label(label))
    }
  }

  fn find_lgr_mut(&mut self, label: &str) -> Option<&mut LgrGrid> {
    for child in &mut self.lgr.children {
      if child.label() == label {
        return Some(child);
      }
      if let Some(found) = child.grid.find_lgr_mut(label) {
        return Some(found);
      }
    }
    None
  }

  /// The grid carrying `label`; the root answers to GLOBAL.
  pub(crate) fn lgr_level_grid(&self, label: &str) -> GridResult<&CornerPointGrid> {
    if label == self.lgr.label {
      return Ok(self);
    }
    Ok(&self.lgr(label)?.grid)
  }

  fn lgr_level_grid_mut(&mut self, label: &str) -> GridResult<&mut CornerPointGrid> {
    if label == self.lgr.label {
      return Ok(self);
    }
    self
      .find_lgr_mut(label)
      .map(|child| &mut child.grid)
      .ok_or_else(|| unknown_label(label))
  }

  // =========================================================================
  // Queries
  // =========================================================================

  pub fn lgr(&self, label: &str) -> GridResult<&LgrGrid> {
    self
      .find_path(label)?
      .pop()
      .ok_or_else(|| unknown_label(label))
  }

  /// GLOBAL followed by every refinement label, in input order.
  pub fn all_lgr_labels(&self) -> &[String] {
    &self.lgr.all_labels
  }

  /// Direct refinements of this grid in emission order.
  pub fn lgr_children(&self) -> impl Iterator<Item = &LgrGrid> + '_ {
    self.lgr.print_order.iter().map(|&n| &self.lgr.children[n])
  }

  pub fn has_lgr(&self) -> bool {
    !self.lgr.children.is_empty()
  }

  /// Reorder the direct refinements of `parent` for output. `labels` must
  /// name each of them exactly once.
  pub fn set_lgr_print_order(&mut self, parent: &str, labels: &[&str]) -> GridResult<()> {
    let node = &mut self.lgr_level_grid_mut(parent)?.lgr;
    let mut order = Vec::with_capacity(labels.len());
    for label in labels {
      let position = node
        .children
        .iter()
        .position(|child| child.label() == *label)
        .ok_or_else(|| unknown_label(label))?;
      if order.contains(&position) {
        return Err(GridError::OutOfRange(format!("LGR {label} listed twice")));
      }
      order.push(position);
    }
    if order.len() != node.children.len() {
      return Err(GridError::OutOfRange(format!(
        "print order names {} of {} refinements of {parent}",
        order.len(),
        node.children.len()
      )));
    }
    node.print_order = order;
    Ok(())
  }

  /// Root global index of the cell hosting `global` of refinement `label`.
  pub fn lgr_global_father(&self, label: &str, global: usize) -> GridResult<usize> {
    let path = self.find_path(label)?;
    let mut cell = global;
    for node in path.iter().rev() {
      node.grid.dims.assert_global(cell)?;
      cell = node.hostnum[cell];
    }
    Ok(cell)
  }

  /// `(i, j, k)` of the host cell in the immediate parent grid.
  pub fn lgr_father_ijk(&self, label: &str, i: usize, j: usize, k: usize) -> GridResult<[usize; 3]> {
    let path = self.find_path(label)?;
    let node = path[path.len() - 1];
    let host = node.hostnum[node.grid.dims.checked_global_index(i, j, k)?];
    let parent_dims = match path.len() {
      1 => self.dims,
      n => path[n - 2].grid.dims,
    };
    Ok(parent_dims.ijk(host))
  }

  /// Cumulative refinement ratio of `label` relative to the root.
  pub fn subdivision_ratio(&self, label: &str) -> GridResult<[usize; 3]> {
    let path = self.find_path(label)?;
    Ok(path.iter().fold([1; 3], |acc, node| {
      let ratio = node.ratio();
      std::array::from_fn(|axis| acc[axis] * ratio[axis])
    }))
  }

  /// Dimensions of a refined cell: its root host cell divided by the
  /// cumulative ratio.
  pub fn cell_dims_lgr(&self, label: &str, i: usize, j: usize, k: usize) -> GridResult<[f64; 3]> {
    let global = self.lgr(label)?.grid.dims.checked_global_index(i, j, k)?;
    let host = self.lgr_global_father(label, global)?;
    let ratio = self.subdivision_ratio(label)?;
    let dims = self.cell_dims(host)?;
    Ok(std::array::from_fn(|axis| dims[axis] / ratio[axis] as f64))
  }

  /// Depth of a refined cell from the root host geometry, subdividing the
  /// host's corner quartets layer by layer down the tree.
  pub fn cell_depth_lgr(&self, label: &str, i: usize, j: usize, k: usize) -> GridResult<f64> {
    let path = self.find_path(label)?;
    let node = path[path.len() - 1];
    let mut cells = vec![node.grid.dims.checked_global_index(i, j, k)?];
    for node in path.iter().rev() {
      let host = node.hostnum[cells[cells.len() - 1]];
      cells.push(host);
    }
    cells.reverse();

    let corners = self.corners_global(cells[0]);
    let mut top: [f64; 4] = std::array::from_fn(|c| corners[c].z);
    let mut bottom: [f64; 4] = std::array::from_fn(|c| corners[c + 4].z);

    let mut parent_dims = self.dims;
    for (level, node) in path.iter().enumerate() {
      let rz = node.ratio()[2];
      let host_k = parent_dims.ijk(cells[level])[2];
      let child_k = node.grid.dims.ijk(cells[level + 1])[2];
      let local = child_k - (host_k - node.low[2]) * rz;
      let t0 = local as f64 / rz as f64;
      let t1 = (local + 1) as f64 / rz as f64;
      for c in 0..4 {
        let span = bottom[c] - top[c];
        bottom[c] = top[c] + t1 * span;
        top[c] += t0 * span;
      }
      parent_dims = node.grid.dims;
    }

    Ok((top.iter().sum::<f64>() + bottom.iter().sum::<f64>()) / 8.0)
  }
}
