//! Child geometry by bilinear interpolation of the host box.
//!
//! Child pillars sit on a lattice spanning the host pillars; child corner
//! depths interpolate each host cell's top and bottom quartets laterally
//! and then linearly in k.

use super::{unknown_label, LgrGrid};
use crate::error::GridResult;
use crate::grid::CornerPointGrid;
use crate::mapper::{CornerIndexer, PillarIndexer};

type Pillar = [f64; 6];

fn blend(a: Pillar, b: Pillar, t: f64) -> Pillar {
  std::array::from_fn(|n| a[n] + (b[n] - a[n]) * t)
}

/// Bilinear weights of the four lateral corners `(0,0) (1,0) (0,1) (1,1)`.
fn bilinear(quartet: [f64; 4], u: f64, w: f64) -> f64 {
  quartet[0] * (1.0 - u) * (1.0 - w)
    + quartet[1] * u * (1.0 - w)
    + quartet[2] * (1.0 - u) * w
    + quartet[3] * u * w
}

impl CornerPointGrid {
  fn pillar(&self, i: usize, j: usize) -> Pillar {
    let p = self.pillar_indexer().pillar_offset(i, j);
    std::array::from_fn(|n| self.coord[p + n])
  }

  /// Host pillar column plus fraction toward the next one. Lattice points
  /// on a host pillar never read past it.
  fn refined_pillar(&self, i: (usize, f64), j: (usize, f64)) -> Pillar {
    let along_i = |pj: usize| {
      if i.1 == 0.0 {
        self.pillar(i.0, pj)
      } else {
        blend(self.pillar(i.0, pj), self.pillar(i.0 + 1, pj), i.1)
      }
    };
    if j.1 == 0.0 {
      along_i(j.0)
    } else {
      blend(along_i(j.0), along_i(j.0 + 1), j.1)
    }
  }

  /// COORD of `child` from this grid's pillars.
  fn refined_coord(&self, child: &LgrGrid) -> Vec<f64> {
    let dims = child.grid.dims;
    let [si, sj, _] = child.ratio();
    let mut coord = Vec::with_capacity(PillarIndexer::new(dims.nx, dims.ny).size());
    for pj in 0..=dims.ny {
      for pi in 0..=dims.nx {
        let i = (child.low[0] + pi / si, (pi % si) as f64 / si as f64);
        let j = (child.low[1] + pj / sj, (pj % sj) as f64 / sj as f64);
        coord.extend_from_slice(&self.refined_pillar(i, j));
      }
    }
    coord
  }

  /// ZCORN of `child` from this grid's host cell depths.
  fn refined_zcorn(&self, child: &LgrGrid) -> Vec<f64> {
    let dims = child.grid.dims;
    let ratio = child.ratio();
    let parent = self.corner_indexer();
    let mapper = CornerIndexer::new(dims);
    let mut zcorn = vec![0.0; mapper.size()];

    for k in 0..dims.nz {
      for j in 0..dims.ny {
        for i in 0..dims.nx {
          let local = [i, j, k];
          let host: [usize; 3] = std::array::from_fn(|a| child.low[a] + local[a] / ratio[a]);
          let within: [usize; 3] = std::array::from_fn(|a| local[a] % ratio[a]);
          let depths = parent.cell_offsets(host[0], host[1], host[2]);
          let top: [f64; 4] = std::array::from_fn(|c| self.zcorn[depths[c]]);
          let bottom: [f64; 4] = std::array::from_fn(|c| self.zcorn[depths[c + 4]]);

          let offsets = mapper.cell_offsets(i, j, k);
          for (c, &offset) in offsets.iter().enumerate() {
            let u = (within[0] + (c & 1)) as f64 / ratio[0] as f64;
            let w = (within[1] + ((c >> 1) & 1)) as f64 / ratio[1] as f64;
            let s = (within[2] + (c >> 2)) as f64 / ratio[2] as f64;
            let zt = bilinear(top, u, w);
            let zb = bilinear(bottom, u, w);
            zcorn[offset] = zt + (zb - zt) * s;
          }
        }
      }
    }
    zcorn
  }

  /// Generate geometry for every refinement below this grid, parents
  /// before children.
  pub(super) fn refine_children(&mut self) {
    for n in 0..self.lgr.children.len() {
      let coord = self.refined_coord(&self.lgr.children[n]);
      let zcorn = self.refined_zcorn(&self.lgr.children[n]);
      let child = &mut self.lgr.children[n];
      child.grid.coord = coord;
      child.grid.zcorn = zcorn;
      child.grid.clear_volume_cache();
      child.grid.refine_children();
    }
  }

  /// Replace the geometry of refinement `label` with explicit arrays.
  ///
  /// The arrays are taken as given, without depth repair. Host mapping is
  /// not recomputed.
  pub fn set_lgr_refinement(&mut self, label: &str, coord: Vec<f64>, zcorn: Vec<f64>) -> GridResult<()> {
    let child = self
      .find_lgr_mut(label)
      .ok_or_else(|| unknown_label(label))?;
    let grid = &mut child.grid;
    crate::builders::assert_size("COORD", &coord, grid.pillar_indexer().size())?;
    crate::builders::assert_size("ZCORN", &zcorn, grid.corner_indexer().size())?;
    grid.coord = coord;
    grid.zcorn = zcorn;
    grid.input_coord = None;
    grid.input_zcorn = None;
    grid.clear_volume_cache();
    Ok(())
  }
}
