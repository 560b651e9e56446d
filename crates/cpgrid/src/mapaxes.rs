//! Optional map coordinate frame for pillar x/y.
//!
//! ```text
//!        (x1,y1)
//!          ^  y axis
//!          |
//!          |
//!       (x0,y0) -------> (x2,y2)
//!        origin     x axis
//! ```
//!
//! Annotation only: no geometry query goes through it.

use glam::{DAffine2, DVec2};

use crate::error::{GridError, GridResult};

#[derive(Clone, Debug, PartialEq)]
pub struct MapAxes {
  input: [f64; 6],
  mapunits: Option<String>,
  affine: DAffine2,
  inverse: DAffine2,
}

impl MapAxes {
  /// Build from the six MAPAXES values `x1 y1 x0 y0 x2 y2`.
  pub fn new(input: [f64; 6]) -> GridResult<Self> {
    let [x1, y1, x0, y0, x2, y2] = input;
    let origin = DVec2::new(x0, y0);
    let x_axis = DVec2::new(x2, y2) - origin;
    let y_axis = DVec2::new(x1, y1) - origin;
    let (Some(ex), Some(ey)) = (x_axis.try_normalize(), y_axis.try_normalize()) else {
      return Err(GridError::Format(format!("degenerate MAPAXES {input:?}")));
    };

    let affine = DAffine2::from_cols(ex, ey, origin);
    if affine.matrix2.determinant().abs() < f64::EPSILON {
      return Err(GridError::Format(format!("collinear MAPAXES {input:?}")));
    }
    Ok(Self {
      input,
      mapunits: None,
      affine,
      inverse: affine.inverse(),
    })
  }

  /// Build from a slice of exactly six values.
  pub fn from_slice(values: &[f64]) -> GridResult<Self> {
    let input: [f64; 6] = values
      .try_into()
      .map_err(|_| GridError::size_mismatch("MAPAXES", 6, values.len()))?;
    Self::new(input)
  }

  pub fn with_mapunits(mut self, units: impl Into<String>) -> Self {
    self.mapunits = Some(units.into());
    self
  }

  pub fn input(&self) -> &[f64; 6] {
    &self.input
  }

  pub fn mapunits(&self) -> Option<&str> {
    self.mapunits.as_deref()
  }

  /// Grid-local to map coordinates.
  pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
    let p = self.affine.transform_point2(DVec2::new(x, y));
    (p.x, p.y)
  }

  /// Map to grid-local coordinates.
  pub fn inv_transform(&self, x: f64, y: f64) -> (f64, f64) {
    let p = self.inverse.transform_point2(DVec2::new(x, y));
    (p.x, p.y)
  }
}
