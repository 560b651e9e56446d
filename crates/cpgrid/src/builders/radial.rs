//! Cylindrical and spider-web grids.
//!
//! i runs outward from INRAD, j runs around the axis. Angles are measured
//! clockwise from twelve o'clock:
//!
//! ```text
//!   t = pi * (90 - theta) / 180      x = r cos t,  y = r sin t
//! ```

use tracing::info;

use super::{assert_size, GridArrays};
use crate::error::{GridError, GridResult};
use crate::grid::Cylinder;
use crate::input::GridInput;
use crate::mapper::{CornerIndexer, PillarIndexer};

/// Angular sums this close to 360 degrees count as a closed circle.
const FULL_CIRCLE_TOLERANCE: f64 = 0.01;

/// Cylindrical grids keep radii and angles for sector volumes; spider-web
/// grids use the hexahedron volume.
pub(super) fn build(input: &GridInput, cylindrical: bool) -> GridResult<GridArrays> {
  let kind = if cylindrical { "cylindrical" } else { "spiderweb" };
  let dims = input.dims();
  let (nx, ny, nz) = (dims.nx, dims.ny, dims.nz);
  let area = dims.layer_size();
  let volume = dims.cartesian_size();

  let dthetav = input.require("DTHETAV")?;
  let drv = input.require("DRV")?;
  let tops = input.require("TOPS")?;
  let inrad = input.require("INRAD")?;
  info!("Creating {kind} grid from keywords DRV, DTHETAV, DZV and TOPS");

  assert_size("DRV", drv, nx)?;
  assert_size("DTHETAV", dthetav, ny)?;

  let dz = match input.keyword("DZ") {
    Some(dz) => {
      assert_size("DZ", dz, volume)?;
      dz.to_vec()
    }
    None => {
      let dzv = input.require("DZV")?;
      assert_size("DZV", dzv, nz)?;
      (0..volume).map(|g| dzv[g / area]).collect()
    }
  };
  assert_size("TOPS", tops, area)?;

  let total: f64 = dthetav.iter().sum();
  let circle = if (total - 360.0).abs() < FULL_CIRCLE_TOLERANCE {
    input.has_keyword("CIRCLE")
  } else if total > 360.0 {
    return Err(GridError::FullCircleExceeded { total });
  } else {
    false
  };

  let mapper = CornerIndexer::new(dims);
  let mut zcorn = vec![0.0; mapper.size()];
  let mut depth = tops.to_vec();
  for k in 0..nz {
    for j in 0..ny {
      for i in 0..nx {
        let column = i + j * nx;
        let current = depth[column];
        let next = current + dz[k * area + column];
        let offsets = mapper.cell_offsets(i, j, k);
        for c in 0..4 {
          zcorn[offsets[c]] = current;
          zcorn[offsets[c + 4]] = next;
        }
        depth[column] = next;
      }
    }
  }

  let z_min = zcorn.iter().copied().fold(f64::INFINITY, f64::min);
  let z_max = zcorn.iter().copied().fold(f64::NEG_INFINITY, f64::max);

  let mut radii = Vec::with_capacity(nx + 1);
  radii.push(inrad.first().copied().ok_or(GridError::MissingKeyword("INRAD"))?);
  for dr in drv {
    radii.push(radii[radii.len() - 1] + dr);
  }

  let mut angles = Vec::with_capacity(ny + 1);
  angles.push(0.0);
  for dtheta in dthetav {
    angles.push(angles[angles.len() - 1] + dtheta);
  }

  let pillars = PillarIndexer::new(nx, ny);
  let mut coord = vec![0.0; pillars.size()];
  for (j, theta) in angles.iter().enumerate() {
    let t = std::f64::consts::PI * (90.0 - theta) / 180.0;
    let (s, c) = t.sin_cos();
    for (i, r) in radii.iter().enumerate() {
      let p = pillars.pillar_offset(i, j);
      coord[p..p + 6].copy_from_slice(&[r * c, r * s, z_min, r * c, r * s, z_max]);
    }
  }

  let mut arrays = GridArrays::corner_point(dims, coord, zcorn);
  arrays.circle = circle;
  if cylindrical {
    arrays.cylinder = Some(Cylinder {
      rv: radii,
      thetav: dthetav.to_vec(),
    });
  }
  Ok(arrays)
}
