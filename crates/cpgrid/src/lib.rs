//! cpgrid - Corner-point reservoir grid model
//!
//! A grid is a set of `(nx+1)*(ny+1)` straight pillars (COORD) and eight
//! depths per cell (ZCORN). Every cell is a hexahedron whose corners slide
//! along the four pillars around it. This crate builds such grids from deck
//! keyword groups, keeps the activity maps, answers geometry queries,
//! refines boxes of cells into nested local grids and reads and writes the
//! EGRID binary format.
//!
//! # Features
//!
//! - **Builders**: COORD/ZCORN, DEPTHZ, TOPS, RADIAL/SPIDER and GDFILE
//! - **ZCORN repair**: monotone corner columns in one pass
//! - **Activity**: ACTNUM, aquifer override and a global/active bijection
//! - **Geometry**: cell corners, volumes, centers, depths and validity
//! - **LGR**: nested refinements with tree-wide active indexing
//! - **EGRID**: big-endian Fortran records, unit conversion, NNC output
//!
//! # Example
//!
//! ```ignore
//! use cpgrid::{CornerPointGrid, LengthUnit, Nnc};
//!
//! let grid = CornerPointGrid::uniform(10, 10, 3, 100.0, 100.0, 5.0, 2000.0);
//! let total: f64 = grid.active_volume().iter().sum();
//! grid.save("CASE.EGRID", &Nnc::new(), LengthUnit::Feet)?;
//! ```

pub mod builders;
pub mod config;
pub mod dims;
pub mod egrid;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod lgr;
pub mod mapaxes;
pub mod mapper;
pub mod nnc;
pub mod repair;
pub mod units;

// Re-export commonly used items
pub use config::{MinpvInput, MinpvMode, PinchConfig, PinchMode};
pub use dims::GridDims;
pub use egrid::{EclArray, EgridFile, EgridWriter};
pub use error::{GridError, GridKind, GridResult};
pub use geometry::CellCorners;
pub use grid::CornerPointGrid;
pub use input::{AquiferCell, GridInput};
pub use lgr::{HostMapping, LgrGrid, RefinementSpec, GLOBAL_LABEL};
pub use mapaxes::MapAxes;
pub use mapper::{CornerIndexer, PillarIndexer};
pub use nnc::{Nnc, NncData};
pub use units::LengthUnit;
