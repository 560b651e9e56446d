//! Per-cell geometry derived from pillars and corner depths.

use std::sync::OnceLock;

use glam::DVec3;
use rayon::prelude::*;

use super::CornerPointGrid;
use crate::error::{GridError, GridResult};
use crate::geometry::{self, CellCorners};
use crate::units::LengthUnit;

/// Any corner coordinate at or beyond this magnitude marks a cell invalid.
const COORD_LIMIT: f64 = 1.0e20;

/// Minimum vertical extent along some pillar for a cell to be valid.
const MIN_PILLAR_SEPARATION: f64 = 1.0e-4;

impl CornerPointGrid {
  /// Corners of an in-range cell.
  ///
  /// Each corner slides along its pillar to its depth; vertical pillars
  /// keep their top x/y.
  pub(crate) fn corners_unchecked(&self, i: usize, j: usize, k: usize) -> CellCorners {
    let pillars = self.pillar_indexer();
    let depths = self.corner_indexer().cell_offsets(i, j, k);
    let pillar_ij = [(i, j), (i + 1, j), (i, j + 1), (i + 1, j + 1)];

    std::array::from_fn(|c| {
      let (pi, pj) = pillar_ij[c % 4];
      let p = pillars.pillar_offset(pi, pj);
      let [xt, yt, zt, xb, yb, zb]: [f64; 6] = [
        self.coord[p],
        self.coord[p + 1],
        self.coord[p + 2],
        self.coord[p + 3],
        self.coord[p + 4],
        self.coord[p + 5],
      ];
      let z = self.zcorn[depths[c]];
      if zt == zb {
        DVec3::new(xt, yt, z)
      } else {
        let t = (zt - z) / (zt - zb);
        DVec3::new(xt + (xb - xt) * t, yt + (yb - yt) * t, z)
      }
    })
  }

  pub(crate) fn corners_global(&self, global: usize) -> CellCorners {
    let [i, j, k] = self.dims.ijk(global);
    self.corners_unchecked(i, j, k)
  }

  pub fn cell_corners(&self, i: usize, j: usize, k: usize) -> GridResult<CellCorners> {
    self.dims.assert_ijk(i, j, k)?;
    Ok(self.corners_unchecked(i, j, k))
  }

  pub fn cell_corners_global(&self, global: usize) -> GridResult<CellCorners> {
    self.dims.assert_global(global)?;
    Ok(self.corners_global(global))
  }

  pub fn corner_pos(&self, i: usize, j: usize, k: usize, corner: usize) -> GridResult<DVec3> {
    self.dims.assert_ijk(i, j, k)?;
    if corner >= 8 {
      return Err(GridError::OutOfRange(format!("invalid corner position {corner}")));
    }
    Ok(self.corners_unchecked(i, j, k)[corner])
  }

  // =========================================================================
  // Volume
  // =========================================================================

  fn compute_volume(&self, global: usize) -> f64 {
    let corners = self.corners_global(global);
    match &self.cylinder {
      Some(cylinder) => {
        let [i, j, _] = self.dims.ijk(global);
        geometry::cylindrical_volume(
          cylinder.rv[i],
          cylinder.rv[i + 1],
          cylinder.thetav[j],
          corners[4].z - corners[0].z,
        )
      }
      None => geometry::hexahedron_volume(&corners),
    }
  }

  /// Volumes of all active cells, in active order. Computed once in
  /// parallel and cached until the mask or geometry changes.
  #[tracing::instrument(skip_all, name = "grid::active_volumes")]
  pub fn active_volume(&self) -> &[f64] {
    self.active_volume.get_or_init(|| {
      self
        .active_to_global
        .par_iter()
        .map(|&g| self.compute_volume(g))
        .collect()
    })
  }

  pub fn cell_volume(&self, global: usize) -> GridResult<f64> {
    self.dims.assert_global(global)?;
    if let Some(volumes) = self.active_volume.get() {
      if let Ok(active) = usize::try_from(self.global_to_active[global]) {
        return Ok(volumes[active]);
      }
    }
    Ok(self.compute_volume(global))
  }

  pub fn cell_volume_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<f64> {
    self.cell_volume(self.dims.checked_global_index(i, j, k)?)
  }

  /// Drop cached volumes after an in-place geometry edit.
  pub fn clear_volume_cache(&mut self) {
    self.active_volume = OnceLock::new();
  }

  // =========================================================================
  // Center, thickness, dimensions, depth
  // =========================================================================

  pub fn cell_center(&self, global: usize) -> GridResult<DVec3> {
    self.dims.assert_global(global)?;
    Ok(geometry::cell_center(&self.corners_global(global)))
  }

  pub fn cell_center_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<DVec3> {
    self.cell_center(self.dims.checked_global_index(i, j, k)?)
  }

  pub fn cell_thickness(&self, global: usize) -> GridResult<f64> {
    self.dims.assert_global(global)?;
    Ok(geometry::thickness(&self.corners_global(global)))
  }

  pub fn cell_thickness_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<f64> {
    self.cell_thickness(self.dims.checked_global_index(i, j, k)?)
  }

  pub fn cell_dims(&self, global: usize) -> GridResult<[f64; 3]> {
    self.dims.assert_global(global)?;
    Ok(geometry::cell_dims(&self.corners_global(global)))
  }

  pub fn cell_dims_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<[f64; 3]> {
    self.cell_dims(self.dims.checked_global_index(i, j, k)?)
  }

  /// Cell depth; a declared aquifer depth wins over geometry.
  pub fn cell_depth(&self, global: usize) -> GridResult<f64> {
    self.dims.assert_global(global)?;
    match self.aquifer_depths.get(&global) {
      Some(depth) => Ok(*depth),
      None => Ok(geometry::mid_depth(&self.corners_global(global))),
    }
  }

  pub fn cell_depth_ijk(&self, i: usize, j: usize, k: usize) -> GridResult<f64> {
    self.cell_depth(self.dims.checked_global_index(i, j, k)?)
  }

  /// `(cell center, bottom face center, bottom face normal)`. The normal is
  /// scaled by the face area and points toward increasing k.
  pub fn cell_and_bottom_center_normal(&self, global: usize) -> GridResult<(DVec3, DVec3, DVec3)> {
    self.dims.assert_global(global)?;
    let corners = self.corners_global(global);
    let (bottom, normal) = geometry::bottom_center_normal(&corners);
    Ok((geometry::cell_center(&corners), bottom, normal))
  }

  /// Finite corners and at least one pillar with a real vertical extent.
  /// Thresholds are given in `unit` and compared in SI.
  pub fn is_valid_cell_geometry(&self, global: usize, unit: LengthUnit) -> GridResult<bool> {
    self.dims.assert_global(global)?;
    let limit = unit.to_si(COORD_LIMIT);
    let corners = self.corners_global(global);

    if !corners.iter().all(|c| c.abs().max_element() < limit) {
      return Ok(false);
    }
    let separation = (0..4)
      .map(|c| corners[c + 4].z - corners[c].z)
      .fold(f64::NEG_INFINITY, f64::max);
    Ok(separation > unit.to_si(MIN_PILLAR_SEPARATION))
  }
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;
