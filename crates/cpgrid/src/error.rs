//! Error taxonomy for grid construction, queries and persistence.

use std::fmt;

/// Result alias used throughout the crate.
pub type GridResult<T> = Result<T, GridError>;

/// One of the construction paths a grid input can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridKind {
  CornerPoint,
  DepthzIncrements,
  Tops,
  Radial,
  Spider,
  GdFile,
}

impl GridKind {
  /// All construction paths in selection order.
  pub const ALL: [GridKind; 6] = [
    GridKind::CornerPoint,
    GridKind::DepthzIncrements,
    GridKind::Tops,
    GridKind::Radial,
    GridKind::Spider,
    GridKind::GdFile,
  ];

  /// Human-readable description of the keywords behind this path.
  pub fn description(self) -> &'static str {
    match self {
      GridKind::CornerPoint => "COORD with ZCORN creates a corner-point grid",
      GridKind::DepthzIncrements => "DEPTHZ with DXV, DYV, DZV creates a cartesian grid",
      GridKind::Tops => "TOPS with DX/DXV, DY/DYV, DZ/DZV creates a cartesian grid",
      GridKind::Radial => {
        "RADIAL with DR/DRV, DTHETA/DTHETAV, DZ/DZV and TOPS creates a cylindrical grid"
      }
      GridKind::Spider => "SPIDER with DR/DRV, DTHETA/DTHETAV, DZ/DZV and TOPS creates a spider grid",
      GridKind::GdFile => "GDFILE reads a grid from file",
    }
  }
}

impl fmt::Display for GridKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.description())
  }
}

/// Why grid selection failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionFailure {
  /// No construction group present; candidates are every option.
  NoneFound,
  /// More than one construction group present.
  Ambiguous,
}

fn selection_message(failure: &SelectionFailure, options: &[GridKind]) -> String {
  let mut message = match failure {
    SelectionFailure::NoneFound => "The grid must be specified using one of these options:",
    SelectionFailure::Ambiguous => "The specification of the grid is ambiguous:",
  }
  .to_string();
  for option in options {
    message.push_str("\n    ");
    message.push_str(option.description());
  }
  message
}

/// Errors raised by the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
  #[error("{}", selection_message(.failure, .options))]
  Specification {
    failure: SelectionFailure,
    options: Vec<GridKind>,
  },

  #[error("Wrong size for keyword: {name}. Expected: {expected} got: {actual}")]
  SizeMismatch {
    name: String,
    expected: usize,
    actual: usize,
  },

  #[error("Out of range: {0}")]
  OutOfRange(String),

  #[error("Cell {index} of {label} is an LGR refined cell")]
  RefinedCellAccess { label: String, index: usize },

  #[error("file: {file} is not a valid egrid file, {section} not found")]
  MissingSection { file: String, section: &'static str },

  #[error("gridunit '{0}' doesn't correspond to a valid unit system")]
  UnrecognizedUnit(String),

  #[error("More than 360 degrees rotation ({total}) - cells will be double covered")]
  FullCircleExceeded { total: f64 },

  #[error("Keyword {0} is required for this grid")]
  MissingKeyword(&'static str),

  #[error("Cell {0} does not correspond to an active cell")]
  InactiveCell(usize),

  #[error("{name}: {reason}")]
  InvalidRefinement { name: String, reason: String },

  #[error("Malformed binary data: {0}")]
  Format(String),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl GridError {
  pub(crate) fn size_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
    GridError::SizeMismatch {
      name: name.into(),
      expected,
      actual,
    }
  }
}
