use super::*;
use crate::grid::CornerPointGrid;

fn depthz_input() -> GridInput {
  GridInput::new(GridDims::new(2, 2, 2))
    .with_keyword("DXV", vec![100.0, 100.0])
    .with_keyword("DYV", vec![100.0, 100.0])
    .with_keyword("DZV", vec![10.0, 10.0])
    .with_keyword("DEPTHZ", vec![1000.0; 9])
}

fn radial_input(dthetav: Vec<f64>) -> GridInput {
  let ny = dthetav.len();
  GridInput::new(GridDims::new(1, ny, 1))
    .with_flag("RADIAL")
    .with_inrad(1.0)
    .with_keyword("DRV", vec![1.0])
    .with_keyword("DTHETAV", dthetav)
    .with_keyword("DZV", vec![10.0])
    .with_keyword("TOPS", vec![0.0; ny])
}

// =========================================================================
// Selection
// =========================================================================

#[test]
fn test_select_none_lists_all_options() {
  let err = select(&GridInput::new(GridDims::new(1, 1, 1))).unwrap_err();
  match err {
    GridError::Specification { failure, options } => {
      assert_eq!(failure, SelectionFailure::NoneFound);
      assert_eq!(options, GridKind::ALL.to_vec());
    }
    other => panic!("unexpected error {other:?}"),
  }
}

/// Corner-point and tops groups together name both paths.
#[test]
fn test_select_ambiguous_names_matches() {
  let input = GridInput::new(GridDims::new(1, 1, 1))
    .with_keyword("COORD", vec![0.0; 24])
    .with_keyword("ZCORN", vec![0.0; 8])
    .with_keyword("DX", vec![1.0])
    .with_keyword("DY", vec![1.0])
    .with_keyword("DZ", vec![1.0])
    .with_keyword("TOPS", vec![0.0]);
  let err = select(&input).unwrap_err();
  match err {
    GridError::Specification { failure, options } => {
      assert_eq!(failure, SelectionFailure::Ambiguous);
      assert_eq!(options, vec![GridKind::CornerPoint, GridKind::Tops]);
    }
    other => panic!("unexpected error {other:?}"),
  }
}

/// Increments plus DEPTHZ also satisfy neither TOPS nor RADIAL groups.
#[test]
fn test_select_single_paths() {
  assert_eq!(select(&depthz_input()).unwrap(), GridKind::DepthzIncrements);
  assert_eq!(select(&radial_input(vec![90.0; 4])).unwrap(), GridKind::Radial);
  let spider = radial_input(vec![90.0; 4]).with_flag("SPIDER");
  assert!(select(&spider).is_err(), "RADIAL and SPIDER together are ambiguous");
  let gdfile = GridInput::new(GridDims::new(1, 1, 1)).with_gdfile("GRID.EGRID");
  assert_eq!(select(&gdfile).unwrap(), GridKind::GdFile);
}

// =========================================================================
// Corner-point
// =========================================================================

#[test]
fn test_corner_point_size_checked() {
  let input = GridInput::new(GridDims::new(1, 1, 1))
    .with_keyword("COORD", vec![0.0; 24])
    .with_keyword("ZCORN", vec![0.0; 7]);
  let err = build(&input).unwrap_err();
  assert_eq!(err.to_string(), "Wrong size for keyword: ZCORN. Expected: 8 got: 7");
}

// =========================================================================
// DXV / DEPTHZ
// =========================================================================

/// 2x2x2 cells of 100x100x10 fill a 200x200x20 box.
#[test]
fn test_depthz_volume_sum() {
  let grid = CornerPointGrid::from_input(&depthz_input(), None).unwrap();
  let total: f64 = grid.active_volume().iter().sum();
  assert!((total - 200.0 * 200.0 * 20.0).abs() < 1e-6, "total {}", total);
  assert_eq!(grid.input_coord(), None, "generated arrays are not retained");
}

#[test]
fn test_depthz_corner_depths() {
  let arrays = build(&depthz_input()).unwrap();
  let mapper = CornerIndexer::new(arrays.dims);
  assert_eq!(arrays.zcorn[mapper.index(1, 1, 1, 0).unwrap()], 1010.0);
  assert_eq!(arrays.zcorn[mapper.index(1, 1, 1, 7).unwrap()], 1020.0);
  let pillars = PillarIndexer::new(2, 2);
  assert_eq!(arrays.coord[pillars.index(2, 1, 0, 0).unwrap()], 200.0);
  assert_eq!(arrays.coord[pillars.index(2, 1, 2, 1).unwrap()], 1020.0);
}

#[test]
fn test_depthz_wrong_size() {
  let input = depthz_input().with_keyword("DXV", vec![100.0]);
  assert!(matches!(
    build(&input),
    Err(GridError::SizeMismatch { expected: 2, actual: 1, .. })
  ));
}

// =========================================================================
// DX / TOPS
// =========================================================================

/// A top-layer DX is copied down and TOPS stack on the layer above.
#[test]
fn test_tops_layer_extension() {
  let input = GridInput::new(GridDims::new(2, 1, 2))
    .with_keyword("DX", vec![10.0, 20.0])
    .with_keyword("DYV", vec![5.0])
    .with_keyword("DZV", vec![2.0, 3.0])
    .with_keyword("TOPS", vec![100.0, 100.0]);
  let grid = CornerPointGrid::from_input(&input, None).unwrap();

  assert_eq!(grid.cell_dims_ijk(1, 0, 1).unwrap(), [20.0, 5.0, 3.0]);
  assert!((grid.cell_volume_ijk(0, 0, 0).unwrap() - 100.0).abs() < 1e-9);
  assert!((grid.cell_volume_ijk(1, 0, 1).unwrap() - 300.0).abs() < 1e-9);
  assert_eq!(grid.corner_pos(0, 0, 1, 0).unwrap().z, 102.0);
  assert_eq!(grid.corner_pos(1, 0, 1, 7).unwrap().x, 30.0);
}

/// Explicit lower-layer TOPS within 1e-6 of the stacked value snap to it.
#[test]
fn test_tops_snap_to_stacked_depth() {
  let input = GridInput::new(GridDims::new(1, 1, 2))
    .with_keyword("DXV", vec![1.0])
    .with_keyword("DYV", vec![1.0])
    .with_keyword("DZ", vec![2.0, 2.0])
    .with_keyword("TOPS", vec![100.0, 102.0 + 1e-8]);
  let arrays = build(&input).unwrap();
  let mapper = CornerIndexer::new(arrays.dims);
  assert_eq!(arrays.zcorn[mapper.index(0, 0, 1, 0).unwrap()], 102.0);
}

#[test]
fn test_tops_short_dx_rejected() {
  let input = GridInput::new(GridDims::new(2, 1, 1))
    .with_keyword("DX", vec![10.0])
    .with_keyword("DYV", vec![5.0])
    .with_keyword("DZV", vec![2.0])
    .with_keyword("TOPS", vec![100.0, 100.0]);
  assert!(matches!(build(&input), Err(GridError::SizeMismatch { .. })));
}

// =========================================================================
// Radial / spider
// =========================================================================

#[test]
fn test_radial_over_full_circle() {
  let input = radial_input(vec![90.0, 90.0, 90.0, 91.0]);
  assert!(matches!(build(&input), Err(GridError::FullCircleExceeded { .. })));
}

/// A closed circle only sets the circle flag when CIRCLE is given.
#[test]
fn test_radial_circle_flag() {
  assert!(!build(&radial_input(vec![90.0; 4])).unwrap().circle);
  assert!(build(&radial_input(vec![90.0; 4]).with_flag("CIRCLE")).unwrap().circle);
  assert!(!build(&radial_input(vec![90.0; 3]).with_flag("CIRCLE")).unwrap().circle);
}

/// Four quarter sectors between r=1 and r=2 make up the full annulus.
#[test]
fn test_cylindrical_volume() {
  let grid = CornerPointGrid::from_input(&radial_input(vec![90.0; 4]), None).unwrap();
  assert!(grid.is_cylindrical());
  let total: f64 = grid.active_volume().iter().sum();
  assert!((total - std::f64::consts::PI * 3.0 * 10.0).abs() < 1e-9);
}

/// Angles run clockwise from twelve o'clock.
#[test]
fn test_radial_pillar_orientation() {
  let arrays = build(&radial_input(vec![90.0; 4])).unwrap();
  let pillars = PillarIndexer::new(1, 4);
  let p = pillars.pillar_offset(1, 1);
  assert!((arrays.coord[p] - 2.0).abs() < 1e-12);
  assert!(arrays.coord[p + 1].abs() < 1e-12);
  assert_eq!(arrays.coord[p + 2], 0.0);
  assert_eq!(arrays.coord[p + 5], 10.0);
}

#[test]
fn test_spider_keeps_no_cylinder() {
  let input = GridInput::new(GridDims::new(1, 4, 1))
    .with_flag("SPIDER")
    .with_inrad(1.0)
    .with_keyword("DRV", vec![1.0])
    .with_keyword("DTHETAV", vec![90.0; 4])
    .with_keyword("DZV", vec![10.0])
    .with_keyword("TOPS", vec![0.0; 4]);
  let arrays = build(&input).unwrap();
  assert!(arrays.cylinder.is_none());
}

/// DR alone selects the radial path but the builder needs DRV.
#[test]
fn test_radial_requires_drv() {
  let input = GridInput::new(GridDims::new(1, 4, 1))
    .with_flag("RADIAL")
    .with_inrad(1.0)
    .with_keyword("DR", vec![1.0; 4])
    .with_keyword("DTHETAV", vec![90.0; 4])
    .with_keyword("DZV", vec![10.0])
    .with_keyword("TOPS", vec![0.0; 4]);
  assert!(matches!(build(&input), Err(GridError::MissingKeyword("DRV"))));
}
