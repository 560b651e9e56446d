//! EGRID persistence.
//!
//! File layout written by [`CornerPointGrid::save`]:
//!
//! ```text
//!  FILEHEAD  [MAPUNITS] [MAPAXES]  GRIDUNIT  GRIDHEAD  COORD  ZCORN  ACTNUM  ENDGRID
//!  ( LGR  LGRPARNT  GRIDHEAD  COORD  ZCORN  ACTNUM  HOSTNUM  ENDGRID  ENDLGR )*
//!  [NNCHEAD  NNC1  NNC2]
//! ```
//!
//! [`CornerPointGrid::save`]: crate::grid::CornerPointGrid::save

mod file;
mod grid_io;
mod record;

pub use file::{EgridFile, EgridWriter};
pub(crate) use grid_io::read_grid_arrays;
pub use record::{read_array, write_array, EclArray};
