//! Keyword groups handed over by the deck front end.
//!
//! All numeric payloads are already in SI units of the deck unit system.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::{MinpvInput, PinchConfig};
use crate::dims::GridDims;
use crate::error::{GridError, GridResult};
use crate::mapaxes::MapAxes;
use crate::units::LengthUnit;

/// Numerical aquifer cell declaration (AQUNUM record), 0-based.
#[derive(Clone, Debug, PartialEq)]
pub struct AquiferCell {
  pub i: usize,
  pub j: usize,
  pub k: usize,
  /// Overrides the geometric cell depth.
  pub depth: Option<f64>,
  pub pvtnum: Option<i32>,
  pub satnum: Option<i32>,
}

impl AquiferCell {
  pub fn new(i: usize, j: usize, k: usize) -> Self {
    Self {
      i,
      j,
      k,
      depth: None,
      pvtnum: None,
      satnum: None,
    }
  }

  pub fn with_depth(mut self, depth: f64) -> Self {
    self.depth = Some(depth);
    self
  }

  pub fn with_tables(mut self, pvtnum: i32, satnum: i32) -> Self {
    self.pvtnum = Some(pvtnum);
    self.satnum = Some(satnum);
    self
  }
}

/// Everything a grid builder may consult.
#[derive(Clone, Debug, Default)]
pub struct GridInput {
  dims: GridDims,
  keywords: BTreeMap<String, Vec<f64>>,
  flags: BTreeSet<String>,
  gdfile: Option<PathBuf>,
  actnum: Option<Vec<i32>>,
  aquifers: Vec<AquiferCell>,
  pinch: PinchConfig,
  minpv: Option<MinpvInput>,
  mapaxes: Option<MapAxes>,
  gridunit: Option<LengthUnit>,
  deck_unit: LengthUnit,
}

impl GridInput {
  pub fn new(dims: GridDims) -> Self {
    Self {
      dims,
      ..Self::default()
    }
  }

  /// Add or replace a numeric keyword. Names are stored upper-case.
  pub fn with_keyword(mut self, name: &str, values: Vec<f64>) -> Self {
    self.keywords.insert(name.to_ascii_uppercase(), values);
    self
  }

  /// Add a data-less keyword such as RADIAL, SPIDER or CIRCLE.
  pub fn with_flag(mut self, name: &str) -> Self {
    self.flags.insert(name.to_ascii_uppercase());
    self
  }

  /// INRAD is stored as a single-value keyword.
  pub fn with_inrad(self, inrad: f64) -> Self {
    self.with_keyword("INRAD", vec![inrad])
  }

  pub fn with_gdfile(mut self, path: impl Into<PathBuf>) -> Self {
    self.gdfile = Some(path.into());
    self
  }

  pub fn with_actnum(mut self, actnum: Vec<i32>) -> Self {
    self.actnum = Some(actnum);
    self
  }

  pub fn with_aquifer(mut self, cell: AquiferCell) -> Self {
    self.aquifers.push(cell);
    self
  }

  pub fn with_pinch(mut self, pinch: PinchConfig) -> Self {
    self.pinch = pinch;
    self
  }

  pub fn with_minpv(mut self, minpv: MinpvInput) -> Self {
    self.minpv = Some(minpv);
    self
  }

  pub fn with_mapaxes(mut self, mapaxes: MapAxes) -> Self {
    self.mapaxes = Some(mapaxes);
    self
  }

  pub fn with_gridunit(mut self, unit: LengthUnit) -> Self {
    self.gridunit = Some(unit);
    self
  }

  pub fn with_deck_unit(mut self, unit: LengthUnit) -> Self {
    self.deck_unit = unit;
    self
  }

  #[inline]
  pub fn dims(&self) -> GridDims {
    self.dims
  }

  pub fn has_keyword(&self, name: &str) -> bool {
    self.keywords.contains_key(name) || self.flags.contains(name)
  }

  pub fn keyword(&self, name: &str) -> Option<&[f64]> {
    self.keywords.get(name).map(Vec::as_slice)
  }

  pub(crate) fn require(&self, name: &'static str) -> GridResult<&[f64]> {
    self.keyword(name).ok_or(GridError::MissingKeyword(name))
  }

  pub fn gdfile(&self) -> Option<&Path> {
    self.gdfile.as_deref()
  }

  pub fn actnum(&self) -> Option<&[i32]> {
    self.actnum.as_deref()
  }

  pub fn aquifers(&self) -> &[AquiferCell] {
    &self.aquifers
  }

  pub fn pinch(&self) -> &PinchConfig {
    &self.pinch
  }

  pub fn minpv(&self) -> Option<&MinpvInput> {
    self.minpv.as_ref()
  }

  pub fn mapaxes(&self) -> Option<&MapAxes> {
    self.mapaxes.as_ref()
  }

  pub fn gridunit(&self) -> Option<LengthUnit> {
    self.gridunit
  }

  pub fn deck_unit(&self) -> LengthUnit {
    self.deck_unit
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_keywords_and_flags() {
    let input = GridInput::new(GridDims::new(2, 2, 1))
      .with_keyword("dxv", vec![1.0, 2.0])
      .with_flag("radial")
      .with_inrad(0.5);
    assert!(input.has_keyword("DXV"));
    assert!(input.has_keyword("RADIAL"));
    assert_eq!(input.keyword("INRAD"), Some(&[0.5][..]));
    assert!(input.keyword("RADIAL").is_none(), "flags carry no data");
    assert!(matches!(input.require("DYV"), Err(GridError::MissingKeyword("DYV"))));
  }
}
