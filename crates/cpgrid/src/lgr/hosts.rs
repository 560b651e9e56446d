//! Host cell assignment for refined cells.

use rayon::prelude::*;

use super::{HostMapping, LgrGrid};
use crate::error::{GridError, GridResult};
use crate::geometry;
use crate::grid::CornerPointGrid;

impl CornerPointGrid {
  /// Parent global index of each child cell by index arithmetic.
  fn logical_hosts(&self, child: &LgrGrid) -> Vec<usize> {
    let dims = child.grid.dims;
    let ratio = child.ratio();
    (0..dims.cartesian_size())
      .map(|g| {
        let local = dims.ijk(g);
        let [i, j, k]: [usize; 3] = std::array::from_fn(|a| child.low[a] + local[a] / ratio[a]);
        self.dims.global_index(i, j, k)
      })
      .collect()
  }

  /// Parent global index of the host cell containing each child center.
  fn geometrical_hosts(&self, child: &LgrGrid) -> GridResult<Vec<usize>> {
    let hosts: Vec<(usize, geometry::CellCorners)> = child
      .father_active
      .iter()
      .map(|&active| {
        let g = self.active_to_global[active];
        (g, self.corners_global(g))
      })
      .collect();

    (0..child.grid.cartesian_size())
      .into_par_iter()
      .map(|g| {
        let center = geometry::cell_center(&child.grid.corners_global(g));
        let mut containing = hosts
          .iter()
          .filter(|(_, corners)| geometry::point_in_hexahedron(center, corners))
          .map(|(host, _)| *host);
        let invalid = |reason: String| GridError::InvalidRefinement {
          name: child.label().to_string(),
          reason,
        };
        match (containing.next(), containing.next()) {
          (Some(host), None) => Ok(host),
          (None, _) => Err(invalid(format!("cell {g} lies in no host cell"))),
          (Some(first), Some(second)) => Err(invalid(format!(
            "cell {g} lies in host cells {first} and {second}"
          ))),
        }
      })
      .collect()
  }

  /// Fill `hostnum` for every refinement below this grid.
  pub(super) fn assign_hosts(&mut self, mapping: HostMapping) -> GridResult<()> {
    for n in 0..self.lgr.children.len() {
      let child = &self.lgr.children[n];
      let hostnum = match mapping {
        HostMapping::Logical => self.logical_hosts(child),
        HostMapping::Geometrical => self.geometrical_hosts(child)?,
      };
      let child = &mut self.lgr.children[n];
      child.hostnum = hostnum;
      child.grid.assign_hosts(mapping)?;
    }
    Ok(())
  }
}
