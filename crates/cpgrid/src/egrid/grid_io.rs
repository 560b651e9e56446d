//! Grid save and load.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::file::{EgridFile, EgridWriter};
use crate::builders::{assert_size, GridArrays};
use crate::dims::GridDims;
use crate::error::{GridError, GridResult};
use crate::grid::CornerPointGrid;
use crate::lgr::{LgrGrid, GLOBAL_LABEL};
use crate::mapaxes::MapAxes;
use crate::mapper::{CornerIndexer, PillarIndexer};
use crate::nnc::Nnc;
use crate::units::LengthUnit;

const HEADER_LEN: usize = 100;
const NNCHEAD_LEN: usize = 10;

fn filehead() -> Vec<i32> {
  let mut head = vec![0; HEADER_LEN];
  head[0] = 3;
  head[1] = 2007;
  head[6] = 1;
  head
}

fn gridhead(dims: GridDims) -> Vec<i32> {
  let mut head = vec![0; HEADER_LEN];
  head[0] = 1;
  head[1] = dims.nx as i32;
  head[2] = dims.ny as i32;
  head[3] = dims.nz as i32;
  head[24] = 1;
  head
}

fn to_unit(values: &[f64], unit: LengthUnit) -> Vec<f32> {
  values.iter().map(|&v| unit.from_si(v) as f32).collect()
}

impl CornerPointGrid {
  /// COORD, ZCORN and ACTNUM. Input arrays win over repaired ones when the
  /// grid kept them.
  fn write_geometry<W: Write>(&self, writer: &mut EgridWriter<W>, unit: LengthUnit) -> GridResult<()> {
    let coord = self.input_coord.as_deref().unwrap_or(&self.coord);
    let zcorn = self.input_zcorn.as_deref().unwrap_or(&self.zcorn);
    writer.write_reals("COORD", &to_unit(coord, unit))?;
    writer.write_reals("ZCORN", &to_unit(zcorn, unit))?;
    writer.write_ints("ACTNUM", &self.actnum)
  }

  /// Write the grid, its refinements and `nnc` as EGRID arrays in `unit`.
  pub fn write_egrid<W: Write>(&self, out: W, nnc: &Nnc, unit: LengthUnit) -> GridResult<W> {
    let mut writer = EgridWriter::new(out);
    writer.write_ints("FILEHEAD", &filehead())?;

    if let Some(mapaxes) = &self.mapaxes {
      if let Some(units) = mapaxes.mapunits() {
        writer.write_chars("MAPUNITS", &[units])?;
      }
      let values: Vec<f32> = mapaxes.input().iter().map(|&v| v as f32).collect();
      writer.write_reals("MAPAXES", &values)?;
    }

    writer.write_chars("GRIDUNIT", &[unit.label(), ""])?;
    writer.write_ints("GRIDHEAD", &gridhead(self.dims))?;
    self.write_geometry(&mut writer, unit)?;
    writer.write_ints("ENDGRID", &[])?;

    for child in self.lgr_children() {
      child.write_subtree(&mut writer, unit)?;
    }

    if !nnc.is_empty() {
      let mut head = vec![0; NNCHEAD_LEN];
      head[0] = nnc.len() as i32;
      writer.write_ints("NNCHEAD", &head)?;
      let cell1: Vec<i32> = nnc.input().iter().map(|c| c.cell1 as i32 + 1).collect();
      let cell2: Vec<i32> = nnc.input().iter().map(|c| c.cell2 as i32 + 1).collect();
      writer.write_ints("NNC1", &cell1)?;
      writer.write_ints("NNC2", &cell2)?;
    }
    writer.finish()
  }

  /// Save to `path`. Geometry is converted from SI to `unit`; the grid is
  /// not modified.
  #[tracing::instrument(skip_all, name = "egrid::save", fields(path = %path.as_ref().display()))]
  pub fn save(&self, path: impl AsRef<Path>, nnc: &Nnc, unit: LengthUnit) -> GridResult<()> {
    let out = BufWriter::new(File::create(path.as_ref())?);
    self.write_egrid(out, nnc, unit)?;
    tracing::info!(cells = self.cartesian_size(), unit = unit.label(), "Saved EGRID");
    Ok(())
  }

  /// Load the root grid of an EGRID file. Refinements in the file are not
  /// reconstructed.
  #[tracing::instrument(skip_all, name = "egrid::load", fields(path = %path.as_ref().display()))]
  pub fn load(path: impl AsRef<Path>) -> GridResult<Self> {
    let mut arrays = read_grid_arrays(path.as_ref())?;
    let actnum = arrays.actnum.take();
    let mapaxes = arrays.mapaxes.take();
    let mut grid = Self::assemble(arrays)?;
    grid.mapaxes = mapaxes;
    grid.reset_actnum(actnum.as_deref())?;
    Ok(grid)
  }
}

impl LgrGrid {
  fn write_subtree<W: Write>(&self, writer: &mut EgridWriter<W>, unit: LengthUnit) -> GridResult<()> {
    writer.write_chars("LGR", &[self.label()])?;
    let parent = if self.father_label == GLOBAL_LABEL {
      ""
    } else {
      self.father_label.as_str()
    };
    writer.write_chars("LGRPARNT", &[parent])?;

    let mut head = gridhead(self.grid.dims);
    head[4] = self.level() as i32;
    head[25] = 1;
    head[26] = 0;
    for axis in 0..3 {
      head[27 + axis] = self.low[axis] as i32 + 1;
      head[30 + axis] = self.up[axis] as i32 + 1;
    }
    writer.write_ints("GRIDHEAD", &head)?;
    self.grid.write_geometry(writer, unit)?;

    let hostnum: Vec<i32> = self.hostnum.iter().map(|&h| h as i32 + 1).collect();
    writer.write_ints("HOSTNUM", &hostnum)?;
    writer.write_ints("ENDGRID", &[])?;
    writer.write_ints("ENDLGR", &[])?;

    for child in self.grid.lgr_children() {
      child.write_subtree(writer, unit)?;
    }
    Ok(())
  }
}

/// Root grid arrays of an EGRID file in SI units, unrepaired.
pub(crate) fn read_grid_arrays(path: &Path) -> GridResult<GridArrays> {
  let file = EgridFile::open(path)?;
  let missing = |section: &'static str| GridError::MissingSection {
    file: path.display().to_string(),
    section,
  };
  for section in ["GRIDHEAD", "COORD", "ZCORN", "GRIDUNIT"] {
    if !file.has_key(section) {
      return Err(missing(section));
    }
  }

  let head = file.ints("GRIDHEAD")?;
  if head.len() < 4 {
    return Err(GridError::Format(format!("GRIDHEAD has {} values, expected at least 4", head.len())));
  }
  let extent = |n: i32| usize::try_from(n).map_err(|_| GridError::Format(format!("negative grid extent {n}")));
  let dims = GridDims::new(extent(head[1])?, extent(head[2])?, extent(head[3])?);

  let unit_label = file.chars("GRIDUNIT")?.first().cloned().ok_or_else(|| missing("GRIDUNIT"))?;
  let unit = LengthUnit::from_label(&unit_label)?;

  let mut coord = file.floats("COORD")?;
  let mut zcorn = file.floats("ZCORN")?;
  assert_size("COORD", &coord, PillarIndexer::new(dims.nx, dims.ny).size())?;
  assert_size("ZCORN", &zcorn, CornerIndexer::new(dims).size())?;
  unit.scale_to_si(&mut coord);
  unit.scale_to_si(&mut zcorn);

  let mut arrays = GridArrays::generated(dims, coord, zcorn);
  if file.has_key("ACTNUM") {
    arrays.actnum = Some(file.ints("ACTNUM")?.to_vec());
  }
  if file.has_key("MAPAXES") {
    let mut mapaxes = MapAxes::from_slice(&file.floats("MAPAXES")?)?;
    if file.has_key("MAPUNITS") {
      if let Some(units) = file.chars("MAPUNITS")?.first() {
        mapaxes = mapaxes.with_mapunits(units.clone());
      }
    }
    arrays.mapaxes = Some(mapaxes);
  }
  tracing::debug!(nx = dims.nx, ny = dims.ny, nz = dims.nz, unit = unit.label(), "Read EGRID arrays");
  Ok(arrays)
}
