use super::*;
use crate::config::MinpvInput;
use crate::input::AquiferCell;
use crate::units::LengthUnit;

fn depthz(dims: GridDims) -> GridInput {
  GridInput::new(dims)
    .with_keyword("DXV", vec![10.0; dims.nx])
    .with_keyword("DYV", vec![10.0; dims.ny])
    .with_keyword("DZV", vec![1.0; dims.nz])
    .with_keyword("DEPTHZ", vec![100.0; (dims.nx + 1) * (dims.ny + 1)])
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_from_arrays_size_checked() {
  let dims = GridDims::new(2, 1, 1);
  let err = CornerPointGrid::from_arrays(dims, vec![0.0; 17], vec![0.0; 16]).unwrap_err();
  assert_eq!(err.to_string(), "Wrong size for keyword: COORD. Expected: 36 got: 17");
}

/// Crossing corners are repaired on construction; the input copy is kept.
#[test]
fn test_from_arrays_repairs_and_keeps_input() {
  let base = CornerPointGrid::uniform(1, 1, 2, 1.0, 1.0, 1.0, 0.0);
  let mut zcorn = base.zcorn().to_vec();
  let lower_top = base.corner_indexer().index(0, 0, 1, 0).unwrap();
  zcorn[lower_top] = 0.5;

  let grid = CornerPointGrid::from_arrays(base.dims(), base.coord().to_vec(), zcorn.clone()).unwrap();
  assert_eq!(grid.zcorn_fixed(), 1);
  assert_eq!(grid.zcorn()[lower_top], 1.0);
  assert_eq!(grid.input_zcorn(), Some(zcorn.as_slice()));
}

#[test]
fn test_uniform_box() {
  let grid = CornerPointGrid::uniform(3, 2, 2, 10.0, 20.0, 5.0, 1000.0);
  assert_eq!(grid.cartesian_size(), 12);
  assert!(grid.all_active());
  assert!((grid.cell_depth_ijk(2, 1, 1).unwrap() - 1007.5).abs() < 1e-12);
  assert!((grid.cell_volume(0).unwrap() - 1000.0).abs() < 1e-9);
}

/// Explicit mask wins over the input mask.
#[test]
fn test_actnum_precedence() {
  let dims = GridDims::new(2, 1, 1);
  let input = depthz(dims).with_actnum(vec![0, 1]);

  let from_input = CornerPointGrid::from_input(&input, None).unwrap();
  assert_eq!(from_input.actnum(), &[0, 1]);

  let explicit = CornerPointGrid::from_input(&input, Some(&[1, 0])).unwrap();
  assert_eq!(explicit.actnum(), &[1, 0]);
}

/// FEET grid data in a METRES deck are scaled by 0.3048.
#[test]
fn test_gridunit_scaling() {
  let deck = CornerPointGrid::uniform(1, 1, 1, 10.0, 10.0, 10.0, 0.0);
  let input = GridInput::new(deck.dims())
    .with_keyword("COORD", deck.coord().to_vec())
    .with_keyword("ZCORN", deck.zcorn().to_vec())
    .with_gridunit(LengthUnit::Feet);
  let grid = CornerPointGrid::from_input(&input, None).unwrap();

  let expected = 3.048_f64.powi(3);
  assert!((grid.cell_volume(0).unwrap() - expected).abs() < 1e-9);
  assert!((grid.input_zcorn().unwrap()[4] - 3.048).abs() < 1e-12);
}

/// Aquifer cells stay active and report their declared depth.
#[test]
fn test_aquifer_override() {
  let input = depthz(GridDims::new(2, 1, 1))
    .with_actnum(vec![0, 0])
    .with_aquifer(AquiferCell::new(1, 0, 0).with_depth(2500.0).with_tables(2, 3));
  let grid = CornerPointGrid::from_input(&input, None).unwrap();

  assert_eq!(grid.actnum(), &[0, 1]);
  assert!(grid.is_aquifer_cell(1));
  assert_eq!(grid.cell_depth(1).unwrap(), 2500.0);
  assert_eq!(grid.cell_depth(0).unwrap(), 100.5);
  assert_eq!(grid.aquifer_cell_tabnums().get(&1), Some(&[2, 3]));
}

#[test]
fn test_aquifer_outside_grid() {
  let input = depthz(GridDims::new(2, 1, 1)).with_aquifer(AquiferCell::new(2, 0, 0));
  assert!(matches!(
    CornerPointGrid::from_input(&input, None),
    Err(GridError::OutOfRange(_))
  ));
}

// =========================================================================
// Pinch and MINPV
// =========================================================================

#[test]
fn test_minpv_fills_vector() {
  let input = depthz(GridDims::new(2, 2, 1)).with_minpv(MinpvInput::Minporv(5.0));
  let grid = CornerPointGrid::from_input(&input, None).unwrap();
  assert_eq!(grid.minpv_mode(), MinpvMode::EclStd);
  assert_eq!(grid.minpv_vector(), &[5.0; 4]);
  assert!(!grid.cell_active_after_minpv(0, 0, 0, 4.0).unwrap());
  assert!(grid.cell_active_after_minpv(0, 0, 0, 5.0).unwrap());
}

#[test]
fn test_minpvv_size_checked() {
  let mut grid = CornerPointGrid::uniform(2, 1, 1, 1.0, 1.0, 1.0, 0.0);
  assert!(grid.set_minpvv(vec![1.0]).is_err());
  grid.set_minpvv(vec![1.0, 2.0]).unwrap();
  assert_eq!(grid.minpv_mode(), MinpvMode::EclStd);
}

#[test]
fn test_pinch_from_input() {
  let input = depthz(GridDims::new(1, 1, 1)).with_pinch(PinchConfig::with_threshold(0.001));
  let grid = CornerPointGrid::from_input(&input, None).unwrap();
  assert!(grid.is_pinch_active());
  assert_eq!(grid.pinch().threshold, Some(0.001));
}

// =========================================================================
// Equality
// =========================================================================

#[test]
fn test_equality() {
  let a = CornerPointGrid::uniform(2, 2, 1, 1.0, 1.0, 1.0, 0.0);
  let b = CornerPointGrid::uniform(2, 2, 1, 1.0, 1.0, 1.0, 0.0);
  assert_eq!(a, b);

  let masked = CornerPointGrid::with_actnum(&a, &[1, 1, 0, 1]).unwrap();
  assert_ne!(a, masked, "activity differs");

  let mut pinched = b.clone();
  pinched.set_pinch(PinchConfig::with_threshold(0.1));
  assert_ne!(a, pinched, "pinch differs");

  let deeper = CornerPointGrid::uniform(2, 2, 1, 1.0, 1.0, 1.0, 5.0);
  assert_ne!(a, deeper, "depths differ");
}

/// Same-length arrays over transposed extents are different grids.
#[test]
fn test_equality_dims() {
  let a = CornerPointGrid::from_arrays(GridDims::new(2, 1, 1), vec![0.0; 36], vec![0.0; 16]).unwrap();
  let b = CornerPointGrid::from_arrays(GridDims::new(1, 2, 1), vec![0.0; 36], vec![0.0; 16]).unwrap();
  assert_eq!(a.actnum().len(), b.actnum().len());
  assert_ne!(a, b, "dimensions differ");
}

/// The MINPV vector only matters once the mode is active.
#[test]
fn test_equality_minpv() {
  let mut a = CornerPointGrid::uniform(1, 1, 1, 1.0, 1.0, 1.0, 0.0);
  let mut b = a.clone();
  a.minpv[0] = 7.0;
  assert_eq!(a, b);

  a.set_minpvv(vec![1.0]).unwrap();
  b.set_minpvv(vec![2.0]).unwrap();
  assert_ne!(a, b);
}

#[test]
fn test_with_zcorn_and_actnum() {
  let src = CornerPointGrid::uniform(1, 1, 1, 1.0, 1.0, 1.0, 0.0);
  let zcorn = [vec![0.0; 4], vec![3.0; 4]].concat();
  let grid = CornerPointGrid::with_zcorn_and_actnum(&src, zcorn, &[1]).unwrap();
  assert!((grid.cell_volume(0).unwrap() - 3.0).abs() < 1e-12);
  assert_eq!(grid.input_zcorn(), None);
}
