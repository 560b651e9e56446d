//! Length units recognised in grid files and decks.

use std::fmt;

use crate::error::{GridError, GridResult};

/// A length unit and its factor to metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LengthUnit {
  #[default]
  Metres,
  Feet,
  Centimetres,
}

impl LengthUnit {
  /// Parse a GRIDUNIT label. Surrounding whitespace is ignored.
  pub fn from_label(label: &str) -> GridResult<Self> {
    match label.trim() {
      "METRES" => Ok(LengthUnit::Metres),
      "FEET" => Ok(LengthUnit::Feet),
      "CM" => Ok(LengthUnit::Centimetres),
      other => Err(GridError::UnrecognizedUnit(other.to_string())),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      LengthUnit::Metres => "METRES",
      LengthUnit::Feet => "FEET",
      LengthUnit::Centimetres => "CM",
    }
  }

  /// Metres per unit.
  #[inline]
  pub fn si_factor(self) -> f64 {
    match self {
      LengthUnit::Metres => 1.0,
      LengthUnit::Feet => 0.3048,
      LengthUnit::Centimetres => 0.01,
    }
  }

  #[inline]
  pub fn to_si(self, value: f64) -> f64 {
    value * self.si_factor()
  }

  #[inline]
  pub fn from_si(self, value: f64) -> f64 {
    value / self.si_factor()
  }

  /// Convert a slice in place from this unit to metres.
  pub fn scale_to_si(self, values: &mut [f64]) {
    if self == LengthUnit::Metres {
      return;
    }
    let factor = self.si_factor();
    values.iter_mut().for_each(|v| *v *= factor);
  }
}

impl fmt::Display for LengthUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}
