use super::*;

#[test]
fn test_cartesian_size() {
  let dims = GridDims::new(4, 3, 2);
  assert_eq!(dims.cartesian_size(), 24);
  assert_eq!(dims.layer_size(), 12);
}

#[test]
fn test_global_index_roundtrip() {
  let dims = GridDims::new(5, 4, 3);
  for k in 0..dims.nz {
    for j in 0..dims.ny {
      for i in 0..dims.nx {
        let g = dims.global_index(i, j, k);
        assert_eq!(dims.ijk(g), [i, j, k], "Roundtrip failed for ({}, {}, {})", i, j, k);
      }
    }
  }
}

/// i varies fastest, k slowest.
#[test]
fn test_global_index_ordering() {
  let dims = GridDims::new(3, 3, 2);
  assert_eq!(dims.global_index(1, 0, 0), 1);
  assert_eq!(dims.global_index(0, 1, 0), 3);
  assert_eq!(dims.global_index(0, 0, 1), 9);
  assert_eq!(dims.global_index(2, 2, 1), 17);
}

#[test]
fn test_assert_ijk_rejects_out_of_bounds() {
  let dims = GridDims::new(2, 2, 2);
  assert!(dims.assert_ijk(1, 1, 1).is_ok());
  assert!(matches!(dims.assert_ijk(2, 0, 0), Err(GridError::OutOfRange(_))));
  assert!(matches!(dims.assert_ijk(0, 2, 0), Err(GridError::OutOfRange(_))));
  assert!(matches!(dims.assert_ijk(0, 0, 2), Err(GridError::OutOfRange(_))));
}

#[test]
fn test_checked_ijk() {
  let dims = GridDims::new(2, 2, 2);
  assert_eq!(dims.checked_ijk(7).unwrap(), [1, 1, 1]);
  assert!(dims.checked_ijk(8).is_err());
}
