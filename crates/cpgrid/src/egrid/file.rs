//! Whole-file reader and streaming writer for EGRID arrays.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use super::record::{self, EclArray};
use crate::error::{GridError, GridResult};

/// All arrays of a file in file order. Lookups by name return the first
/// occurrence, which for grid files is the root grid's array.
#[derive(Clone, Debug, Default)]
pub struct EgridFile {
  arrays: Vec<(String, EclArray)>,
}

impl EgridFile {
  pub fn open(path: impl AsRef<Path>) -> GridResult<Self> {
    Self::from_reader(BufReader::new(File::open(path)?))
  }

  pub fn from_reader<R: Read>(mut input: R) -> GridResult<Self> {
    let mut arrays = Vec::new();
    while let Some(entry) = record::read_array(&mut input)? {
      arrays.push(entry);
    }
    Ok(Self { arrays })
  }

  pub fn has_key(&self, name: &str) -> bool {
    self.arrays.iter().any(|(key, _)| key == name)
  }

  pub fn get(&self, name: &str) -> Option<&EclArray> {
    self.arrays.iter().find(|(key, _)| key == name).map(|(_, array)| array)
  }

  /// `(name, type code, element count)` for every array.
  pub fn array_list(&self) -> Vec<(&str, &'static str, usize)> {
    self
      .arrays
      .iter()
      .map(|(name, array)| (name.as_str(), array.type_code(), array.len()))
      .collect()
  }

  pub fn arrays(&self) -> impl Iterator<Item = (&str, &EclArray)> + '_ {
    self.arrays.iter().map(|(name, array)| (name.as_str(), array))
  }

  fn require(&self, name: &str) -> GridResult<&EclArray> {
    self
      .get(name)
      .ok_or_else(|| GridError::Format(format!("array {name} not found")))
  }

  fn wrong_type(name: &str, array: &EclArray, expected: &str) -> GridError {
    GridError::Format(format!("{name} is {}, expected {expected}", array.type_code()))
  }

  pub fn ints(&self, name: &str) -> GridResult<&[i32]> {
    match self.require(name)? {
      EclArray::Inte(values) => Ok(values),
      other => Err(Self::wrong_type(name, other, "INTE")),
    }
  }

  pub fn reals(&self, name: &str) -> GridResult<&[f32]> {
    match self.require(name)? {
      EclArray::Real(values) => Ok(values),
      other => Err(Self::wrong_type(name, other, "REAL")),
    }
  }

  pub fn doubles(&self, name: &str) -> GridResult<&[f64]> {
    match self.require(name)? {
      EclArray::Doub(values) => Ok(values),
      other => Err(Self::wrong_type(name, other, "DOUB")),
    }
  }

  pub fn logicals(&self, name: &str) -> GridResult<&[bool]> {
    match self.require(name)? {
      EclArray::Logi(values) => Ok(values),
      other => Err(Self::wrong_type(name, other, "LOGI")),
    }
  }

  pub fn chars(&self, name: &str) -> GridResult<&[String]> {
    match self.require(name)? {
      EclArray::Char(values) => Ok(values),
      other => Err(Self::wrong_type(name, other, "CHAR")),
    }
  }

  /// REAL or DOUB values widened to `f64`.
  pub fn floats(&self, name: &str) -> GridResult<Vec<f64>> {
    match self.require(name)? {
      EclArray::Real(values) => Ok(values.iter().map(|&v| f64::from(v)).collect()),
      EclArray::Doub(values) => Ok(values.clone()),
      other => Err(Self::wrong_type(name, other, "REAL or DOUB")),
    }
  }

  /// Labels of every LGR section, in file order.
  pub fn lgr_labels(&self) -> Vec<&str> {
    self
      .arrays
      .iter()
      .filter(|(name, _)| name == "LGR")
      .filter_map(|(_, array)| match array {
        EclArray::Char(labels) => labels.first().map(String::as_str),
        _ => None,
      })
      .collect()
  }
}

/// Typed array writer over any byte sink.
pub struct EgridWriter<W: Write> {
  out: W,
}

impl<W: Write> EgridWriter<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  pub fn write(&mut self, name: &str, array: &EclArray) -> GridResult<()> {
    record::write_array(&mut self.out, name, array)
  }

  pub fn write_ints(&mut self, name: &str, values: &[i32]) -> GridResult<()> {
    self.write(name, &EclArray::Inte(values.to_vec()))
  }

  pub fn write_reals(&mut self, name: &str, values: &[f32]) -> GridResult<()> {
    self.write(name, &EclArray::Real(values.to_vec()))
  }

  pub fn write_doubles(&mut self, name: &str, values: &[f64]) -> GridResult<()> {
    self.write(name, &EclArray::Doub(values.to_vec()))
  }

  pub fn write_chars(&mut self, name: &str, values: &[&str]) -> GridResult<()> {
    self.write(name, &EclArray::Char(values.iter().map(|v| v.to_string()).collect()))
  }

  pub fn write_message(&mut self, name: &str) -> GridResult<()> {
    self.write(name, &EclArray::Mess)
  }

  /// Flush and hand back the sink.
  pub fn finish(mut self) -> GridResult<W> {
    self.out.flush()?;
    Ok(self.out)
  }
}
