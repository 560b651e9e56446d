//! Canonical corner-point grid.
//!
//! Every construction path ends in the same state:
//!
//! ```text
//!  builder ──► COORD + ZCORN ──► repair ──► GRIDUNIT scale ──► activity
//!                                                   │
//!                                                   ▼
//!                               global_to_active / active_to_global
//! ```
//!
//! Cartesian arrays are the source of truth; the two active maps are fully
//! rebuilt on every mask change.

mod activity;
mod geometry;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use tracing::info;

use crate::builders::{self, GridArrays};
use crate::config::{MinpvMode, PinchConfig};
use crate::dims::GridDims;
use crate::error::{GridError, GridResult};
use crate::input::GridInput;
use crate::lgr::LgrNode;
use crate::mapaxes::MapAxes;
use crate::mapper::{CornerIndexer, PillarIndexer};

/// Radii and angular increments kept by cylindrical grids for the
/// closed-form sector volume.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cylinder {
  /// `nx + 1` radii, starting at INRAD.
  pub(crate) rv: Vec<f64>,
  /// `ny` angular increments in degrees.
  pub(crate) thetav: Vec<f64>,
}

#[derive(Clone, Debug)]
pub struct CornerPointGrid {
  pub(crate) dims: GridDims,
  pub(crate) coord: Vec<f64>,
  pub(crate) zcorn: Vec<f64>,
  /// Pre-repair copies written back on save.
  pub(crate) input_coord: Option<Vec<f64>>,
  pub(crate) input_zcorn: Option<Vec<f64>>,
  pub(crate) zcorn_fixed: usize,
  pub(crate) cylinder: Option<Cylinder>,
  pub(crate) circle: bool,

  pub(crate) actnum: Vec<i32>,
  pub(crate) global_to_active: Vec<i32>,
  pub(crate) active_to_global: Vec<usize>,
  pub(crate) aquifer_cells: BTreeSet<usize>,
  pub(crate) aquifer_depths: BTreeMap<usize, f64>,
  pub(crate) aquifer_tabnums: BTreeMap<usize, [i32; 2]>,

  pub(crate) pinch: PinchConfig,
  pub(crate) minpv_mode: MinpvMode,
  pub(crate) minpv: Vec<f64>,
  pub(crate) mapaxes: Option<MapAxes>,

  pub(crate) lgr: LgrNode,
  pub(crate) active_volume: OnceLock<Vec<f64>>,
}

impl CornerPointGrid {
  /// Grid over the given arrays with every cell active. Validates both
  /// lengths and repairs corner depths.
  pub fn from_arrays(dims: GridDims, coord: Vec<f64>, zcorn: Vec<f64>) -> GridResult<Self> {
    Self::from_arrays_with_actnum(dims, coord, zcorn, None)
  }

  /// As [`CornerPointGrid::from_arrays`] with an optional activity mask.
  pub fn from_arrays_with_actnum(
    dims: GridDims,
    coord: Vec<f64>,
    zcorn: Vec<f64>,
    actnum: Option<&[i32]>,
  ) -> GridResult<Self> {
    builders::assert_size("COORD", &coord, PillarIndexer::new(dims.nx, dims.ny).size())?;
    builders::assert_size("ZCORN", &zcorn, CornerIndexer::new(dims).size())?;
    let mut grid = Self::assemble(GridArrays::corner_point(dims, coord, zcorn))?;
    grid.reset_actnum(actnum)?;
    Ok(grid)
  }

  /// Build from deck keyword groups. `actnum`, when given, takes precedence
  /// over every mask the input carries.
  pub fn from_input(input: &GridInput, actnum: Option<&[i32]>) -> GridResult<Self> {
    let mut arrays = builders::build(input)?;
    let file_actnum = arrays.actnum.take();
    let file_mapaxes = arrays.mapaxes.take();
    let mut grid = Self::assemble(arrays)?;

    if let Some(unit) = input.gridunit() {
      if unit != input.deck_unit() {
        grid.apply_gridunit(unit.si_factor() / input.deck_unit().si_factor());
      }
    }

    for cell in input.aquifers() {
      let g = grid.dims.checked_global_index(cell.i, cell.j, cell.k)?;
      grid.aquifer_cells.insert(g);
      if let Some(depth) = cell.depth {
        grid.aquifer_depths.insert(g, depth);
      }
      grid
        .aquifer_tabnums
        .insert(g, [cell.pvtnum.unwrap_or(0), cell.satnum.unwrap_or(0)]);
    }

    grid.pinch = input.pinch().clone();
    if let Some(minpv) = input.minpv() {
      grid.minpv.fill(minpv.value());
      grid.minpv_mode = MinpvMode::EclStd;
    }
    grid.mapaxes = input.mapaxes().cloned().or(file_mapaxes);

    let mask = match (actnum, input.actnum(), file_actnum.as_deref()) {
      (Some(explicit), _, _) => Some(explicit),
      (None, None, Some(from_file)) => Some(from_file),
      (None, deck, _) => deck,
    };
    grid.reset_actnum(mask)?;
    Ok(grid)
  }

  /// Regular box of `nx * ny * nz` cells of size `dx * dy * dz` with its
  /// top at depth `top`. Every cell active.
  pub fn uniform(nx: usize, ny: usize, nz: usize, dx: f64, dy: f64, dz: f64, top: f64) -> Self {
    let dims = GridDims::new(nx, ny, nz);
    let mut coord = Vec::with_capacity(PillarIndexer::new(nx, ny).size());
    for j in 0..=ny {
      for i in 0..=nx {
        let (x, y) = (i as f64 * dx, j as f64 * dy);
        coord.extend_from_slice(&[x, y, 0.0, x, y, nz as f64 * dz]);
      }
    }

    let mapper = CornerIndexer::new(dims);
    let mut zcorn = vec![0.0; mapper.size()];
    for k in 0..nz {
      let zt = top + k as f64 * dz;
      let zb = top + (k + 1) as f64 * dz;
      for j in 0..ny {
        for i in 0..nx {
          let offsets = mapper.cell_offsets(i, j, k);
          for c in 0..4 {
            zcorn[offsets[c]] = zt;
            zcorn[offsets[c + 4]] = zb;
          }
        }
      }
    }

    let mut grid = Self::bare(dims, coord, zcorn);
    grid.set_all_active();
    grid
  }

  /// Copy of `src` with a new activity mask.
  pub fn with_actnum(src: &CornerPointGrid, actnum: &[i32]) -> GridResult<Self> {
    let mut grid = src.clone();
    grid.reset_actnum(Some(actnum))?;
    Ok(grid)
  }

  /// Copy of `src` with new corner depths (repaired) and a new mask.
  pub fn with_zcorn_and_actnum(src: &CornerPointGrid, zcorn: Vec<f64>, actnum: &[i32]) -> GridResult<Self> {
    let mapper = CornerIndexer::new(src.dims);
    builders::assert_size("ZCORN", &zcorn, mapper.size())?;
    let mut grid = src.clone();
    grid.zcorn = zcorn;
    grid.input_zcorn = None;
    grid.zcorn_fixed = mapper.repair(&mut grid.zcorn)?;
    grid.reset_actnum(Some(actnum))?;
    Ok(grid)
  }

  /// Unrepaired grid state with defaults for everything but geometry.
  pub(crate) fn bare(dims: GridDims, coord: Vec<f64>, zcorn: Vec<f64>) -> Self {
    Self {
      dims,
      coord,
      zcorn,
      input_coord: None,
      input_zcorn: None,
      zcorn_fixed: 0,
      cylinder: None,
      circle: false,
      actnum: Vec::new(),
      global_to_active: Vec::new(),
      active_to_global: Vec::new(),
      aquifer_cells: BTreeSet::new(),
      aquifer_depths: BTreeMap::new(),
      aquifer_tabnums: BTreeMap::new(),
      pinch: PinchConfig::default(),
      minpv_mode: MinpvMode::Inactive,
      minpv: vec![0.0; dims.cartesian_size()],
      mapaxes: None,
      lgr: LgrNode::root(),
      active_volume: OnceLock::new(),
    }
  }

  /// Store builder output, keep input copies where the path asks for it,
  /// then repair. Activity is left for the caller.
  pub(crate) fn assemble(arrays: GridArrays) -> GridResult<Self> {
    let GridArrays {
      dims,
      coord,
      zcorn,
      cylinder,
      circle,
      keep_input,
      ..
    } = arrays;
    let mut grid = Self::bare(dims, coord, zcorn);
    if keep_input {
      grid.input_coord = Some(grid.coord.clone());
      grid.input_zcorn = Some(grid.zcorn.clone());
    }
    grid.cylinder = cylinder;
    grid.circle = circle;
    grid.zcorn_fixed = CornerIndexer::new(dims).repair(&mut grid.zcorn)?;
    Ok(grid)
  }

  fn apply_gridunit(&mut self, factor: f64) {
    info!(factor, "Applying GRIDUNIT scaling");
    let scale = |values: &mut Vec<f64>| values.iter_mut().for_each(|v| *v *= factor);
    scale(&mut self.coord);
    scale(&mut self.zcorn);
    if let Some(cylinder) = self.cylinder.as_mut() {
      scale(&mut cylinder.rv);
    }
    if let Some(coord) = self.input_coord.as_mut() {
      scale(coord);
    }
    if let Some(zcorn) = self.input_zcorn.as_mut() {
      scale(zcorn);
    }
    self.active_volume = OnceLock::new();
  }

  // =========================================================================
  // Accessors
  // =========================================================================

  #[inline]
  pub fn dims(&self) -> GridDims {
    self.dims
  }

  #[inline]
  pub fn nx(&self) -> usize {
    self.dims.nx
  }

  #[inline]
  pub fn ny(&self) -> usize {
    self.dims.ny
  }

  #[inline]
  pub fn nz(&self) -> usize {
    self.dims.nz
  }

  #[inline]
  pub fn cartesian_size(&self) -> usize {
    self.dims.cartesian_size()
  }

  pub fn coord(&self) -> &[f64] {
    &self.coord
  }

  pub fn zcorn(&self) -> &[f64] {
    &self.zcorn
  }

  /// Pre-repair pillar array, when the grid was built from keywords.
  pub fn input_coord(&self) -> Option<&[f64]> {
    self.input_coord.as_deref()
  }

  /// Pre-repair depth array, when the grid was built from keywords.
  pub fn input_zcorn(&self) -> Option<&[f64]> {
    self.input_zcorn.as_deref()
  }

  /// Number of depth values adjusted by the most recent repair.
  pub fn zcorn_fixed(&self) -> usize {
    self.zcorn_fixed
  }

  /// Re-run depth repair on the current array.
  pub fn fixup_zcorn(&mut self) -> GridResult<usize> {
    let adjusted = CornerIndexer::new(self.dims).repair(&mut self.zcorn)?;
    if adjusted > 0 {
      self.active_volume = OnceLock::new();
    }
    Ok(adjusted)
  }

  pub fn corner_indexer(&self) -> CornerIndexer {
    CornerIndexer::new(self.dims)
  }

  pub fn pillar_indexer(&self) -> PillarIndexer {
    PillarIndexer::new(self.dims.nx, self.dims.ny)
  }

  /// `true` for radial grids that keep radii for volumes.
  pub fn is_cylindrical(&self) -> bool {
    self.cylinder.is_some()
  }

  /// Angular increments close a full circle and CIRCLE was given.
  pub fn circle(&self) -> bool {
    self.circle
  }

  pub fn mapaxes(&self) -> Option<&MapAxes> {
    self.mapaxes.as_ref()
  }

  pub fn set_mapaxes(&mut self, mapaxes: Option<MapAxes>) {
    self.mapaxes = mapaxes;
  }

  // =========================================================================
  // Pinch and minimum pore volume
  // =========================================================================

  pub fn pinch(&self) -> &PinchConfig {
    &self.pinch
  }

  pub fn set_pinch(&mut self, pinch: PinchConfig) {
    self.pinch = pinch;
  }

  pub fn is_pinch_active(&self) -> bool {
    self.pinch.is_active()
  }

  pub fn minpv_mode(&self) -> MinpvMode {
    self.minpv_mode
  }

  pub fn minpv_vector(&self) -> &[f64] {
    &self.minpv
  }

  /// Install a per-cell minimum pore volume and switch to `EclStd`.
  pub fn set_minpvv(&mut self, minpvv: Vec<f64>) -> GridResult<()> {
    if minpvv.len() != self.cartesian_size() {
      return Err(GridError::size_mismatch("MINPVV", self.cartesian_size(), minpvv.len()));
    }
    self.minpv = minpvv;
    self.minpv_mode = MinpvMode::EclStd;
    Ok(())
  }
}

/// Structural equality: arrays, map axes, activity, pinch and minimum pore
/// volume settings. Refinements and caches are not compared.
impl PartialEq for CornerPointGrid {
  fn eq(&self, other: &Self) -> bool {
    if self.dims != other.dims || self.coord.len() != other.coord.len() || self.zcorn.len() != other.zcorn.len() {
      return false;
    }
    let same = self.mapaxes == other.mapaxes
      && self.actnum == other.actnum
      && self.coord == other.coord
      && self.zcorn == other.zcorn
      && self.pinch == other.pinch
      && self.minpv_mode == other.minpv_mode;
    if self.minpv_mode == MinpvMode::Inactive {
      same
    } else {
      same && self.minpv == other.minpv
    }
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
