//! Construction paths from keyword groups to pillar and depth arrays.
//!
//! Exactly one group must be present:
//!
//! | Path        | Keywords                                              |
//! |-------------|-------------------------------------------------------|
//! | corner-point| COORD, ZCORN                                          |
//! | increments  | DXV, DYV, DZV, DEPTHZ                                 |
//! | tops        | DX/DXV, DY/DYV, DZ/DZV, TOPS                          |
//! | radial      | RADIAL, INRAD, TOPS, DZ/DZV, DR/DRV, DTHETA/DTHETAV   |
//! | spider      | SPIDER, INRAD, TOPS, DZ/DZV, DR/DRV, DTHETA/DTHETAV   |
//! | file        | GDFILE                                                |

mod cartesian;
mod radial;

use smallvec::SmallVec;
use tracing::info;

use crate::dims::GridDims;
use crate::egrid;
use crate::error::{GridError, GridKind, GridResult, SelectionFailure};
use crate::grid::Cylinder;
use crate::input::GridInput;
use crate::mapaxes::MapAxes;
use crate::mapper::{CornerIndexer, PillarIndexer};

/// Builder output before repair and activity.
#[derive(Debug)]
pub(crate) struct GridArrays {
  pub(crate) dims: GridDims,
  pub(crate) coord: Vec<f64>,
  pub(crate) zcorn: Vec<f64>,
  pub(crate) cylinder: Option<Cylinder>,
  pub(crate) circle: bool,
  /// Keep pre-repair copies for output.
  pub(crate) keep_input: bool,
  pub(crate) actnum: Option<Vec<i32>>,
  pub(crate) mapaxes: Option<MapAxes>,
}

impl GridArrays {
  pub(crate) fn corner_point(dims: GridDims, coord: Vec<f64>, zcorn: Vec<f64>) -> Self {
    Self {
      dims,
      coord,
      zcorn,
      cylinder: None,
      circle: false,
      keep_input: true,
      actnum: None,
      mapaxes: None,
    }
  }

  pub(crate) fn generated(dims: GridDims, coord: Vec<f64>, zcorn: Vec<f64>) -> Self {
    Self {
      keep_input: false,
      ..Self::corner_point(dims, coord, zcorn)
    }
  }
}

/// Fail with `SizeMismatch` unless `values` has `expected` entries.
pub(crate) fn assert_size(name: &str, values: &[f64], expected: usize) -> GridResult<()> {
  if values.len() != expected {
    tracing::error!(keyword = name, expected, actual = values.len(), "Wrong keyword size");
    return Err(GridError::size_mismatch(name, expected, values.len()));
  }
  Ok(())
}

fn has_any(input: &GridInput, names: &[&str]) -> bool {
  names.iter().any(|n| input.has_keyword(n))
}

fn has_cylindrical_keywords(input: &GridInput) -> bool {
  input.has_keyword("INRAD")
    && input.has_keyword("TOPS")
    && has_any(input, &["DZ", "DZV"])
    && has_any(input, &["DR", "DRV"])
    && has_any(input, &["DTHETA", "DTHETAV"])
}

fn is_present(input: &GridInput, kind: GridKind) -> bool {
  match kind {
    GridKind::CornerPoint => input.has_keyword("COORD") && input.has_keyword("ZCORN"),
    GridKind::DepthzIncrements => ["DXV", "DYV", "DZV", "DEPTHZ"].iter().all(|n| input.has_keyword(n)),
    GridKind::Tops => {
      has_any(input, &["DX", "DXV"])
        && has_any(input, &["DY", "DYV"])
        && has_any(input, &["DZ", "DZV"])
        && input.has_keyword("TOPS")
    }
    GridKind::Radial => input.has_keyword("RADIAL") && has_cylindrical_keywords(input),
    GridKind::Spider => input.has_keyword("SPIDER") && has_cylindrical_keywords(input),
    GridKind::GdFile => input.gdfile().is_some(),
  }
}

/// The single construction path the input selects.
pub fn select(input: &GridInput) -> GridResult<GridKind> {
  let found: SmallVec<[GridKind; 6]> = GridKind::ALL
    .into_iter()
    .filter(|kind| is_present(input, *kind))
    .collect();

  match found.as_slice() {
    [kind] => Ok(*kind),
    [] => Err(GridError::Specification {
      failure: SelectionFailure::NoneFound,
      options: GridKind::ALL.to_vec(),
    }),
    _ => Err(GridError::Specification {
      failure: SelectionFailure::Ambiguous,
      options: found.to_vec(),
    }),
  }
}

/// Run the selected path and return unrepaired arrays.
pub(crate) fn build(input: &GridInput) -> GridResult<GridArrays> {
  match select(input)? {
    GridKind::CornerPoint => corner_point(input),
    GridKind::DepthzIncrements => cartesian::from_depthz(input),
    GridKind::Tops => cartesian::from_tops(input),
    GridKind::Radial => radial::build(input, true),
    GridKind::Spider => radial::build(input, false),
    GridKind::GdFile => {
      let path = input.gdfile().ok_or(GridError::MissingKeyword("GDFILE"))?;
      info!(path = %path.display(), "Creating grid from GDFILE");
      egrid::read_grid_arrays(path)
    }
  }
}

fn corner_point(input: &GridInput) -> GridResult<GridArrays> {
  let dims = input.dims();
  let coord = input.require("COORD")?;
  let zcorn = input.require("ZCORN")?;
  assert_size("ZCORN", zcorn, CornerIndexer::new(dims).size())?;
  assert_size("COORD", coord, PillarIndexer::new(dims.nx, dims.ny).size())?;

  info!("Creating corner-point grid from keywords COORD, ZCORN and others");
  Ok(GridArrays::corner_point(dims, coord.to_vec(), zcorn.to_vec()))
}

#[cfg(test)]
#[path = "builders_test.rs"]
mod builders_test;
