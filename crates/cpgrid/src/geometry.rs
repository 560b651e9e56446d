//! Pure geometry on the eight corners of a corner-point cell.
//!
//! Corners use the same numbering as the depth array (see [`crate::mapper`]):
//! bit 0 is +i, bit 1 is +j, bit 2 is the bottom face.
//!
//! ```text
//!        6-------7
//!       /|      /|        bottom face: 4 5 7 6
//!      4-------5 |        top face:    0 1 3 2
//!      | 2-----|-3
//!      |/      |/
//!      0-------1
//! ```

use glam::DVec3;

/// Corner positions of one cell, corner order.
pub type CellCorners = [DVec3; 8];

/// Faces with a consistent winding. Each quad is listed as a closed loop.
const FACES: [[usize; 4]; 6] = [
  [0, 2, 3, 1],
  [4, 5, 7, 6],
  [0, 4, 6, 2],
  [1, 3, 7, 5],
  [0, 1, 5, 4],
  [2, 6, 7, 3],
];

/// Below this magnitude a face normal is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Mean of the eight corners.
#[inline]
pub fn cell_center(corners: &CellCorners) -> DVec3 {
  corners.iter().copied().sum::<DVec3>() / 8.0
}

/// Mean of four selected corners.
#[inline]
pub fn centroid(corners: &CellCorners, idx: [usize; 4]) -> DVec3 {
  idx.iter().map(|&c| corners[c]).sum::<DVec3>() / 4.0
}

/// Hexahedron volume from 24 tetrahedra.
///
/// Each tetrahedron joins the cell center, one face center and one edge of
/// that face. Exact for planar faces, consistent for warped ones.
pub fn hexahedron_volume(corners: &CellCorners) -> f64 {
  let center = cell_center(corners);
  let mut six_volume = 0.0;
  for face in FACES {
    let face_center = centroid(corners, face);
    for e in 0..4 {
      let a = corners[face[e]] - center;
      let b = corners[face[(e + 1) % 4]] - center;
      six_volume += a.dot(b.cross(face_center - center));
    }
  }
  (six_volume / 6.0).abs()
}

/// Volume of an annular sector with radii `r1 < r2`, opening `dtheta`
/// degrees and height `dz`.
#[inline]
pub fn cylindrical_volume(r1: f64, r2: f64, dtheta: f64, dz: f64) -> f64 {
  std::f64::consts::PI * (r2 * r2 - r1 * r1) * dz * dtheta / 360.0
}

/// Top and bottom face mean depths.
#[inline]
fn face_depths(corners: &CellCorners) -> (f64, f64) {
  let top = corners[..4].iter().map(|c| c.z).sum::<f64>() / 4.0;
  let bottom = corners[4..].iter().map(|c| c.z).sum::<f64>() / 4.0;
  (top, bottom)
}

/// Mean bottom depth minus mean top depth.
#[inline]
pub fn thickness(corners: &CellCorners) -> f64 {
  let (top, bottom) = face_depths(corners);
  bottom - top
}

/// Midpoint of the mean top and mean bottom depths.
#[inline]
pub fn mid_depth(corners: &CellCorners) -> f64 {
  let (top, bottom) = face_depths(corners);
  0.5 * (top + bottom)
}

/// `(dx, dy, dz)`: horizontal distance between opposite i and j face
/// centroids, and the thickness.
pub fn cell_dims(corners: &CellCorners) -> [f64; 3] {
  let horizontal = |a: [usize; 4], b: [usize; 4]| {
    let d = centroid(corners, b) - centroid(corners, a);
    d.x.hypot(d.y)
  };
  [
    horizontal([0, 2, 4, 6], [1, 3, 5, 7]),
    horizontal([0, 1, 4, 5], [2, 3, 6, 7]),
    thickness(corners),
  ]
}

/// Bottom face center and its area-weighted normal.
///
/// Triangles fan out from the face center around corners 4, 5, 7, 6.
pub fn bottom_center_normal(corners: &CellCorners) -> (DVec3, DVec3) {
  let center = centroid(corners, [4, 5, 6, 7]);
  let mut normal = DVec3::ZERO;
  let mut previous = corners[6];
  for c in [4, 5, 7, 6] {
    let next = corners[c];
    normal += (previous - center).cross(next - center);
    previous = next;
  }
  (center, 0.5 * normal)
}

/// `true` when `point` lies inside (or on) the hexahedron.
///
/// Each face is approximated by the plane through its centroid with the
/// quad's diagonal-cross normal. The point must be on the same side of
/// every face plane as the cell center.
pub fn point_in_hexahedron(point: DVec3, corners: &CellCorners) -> bool {
  let center = cell_center(corners);
  let scale = corners
    .iter()
    .map(|c| (*c - center).length())
    .fold(0.0, f64::max)
    .max(1.0);
  let tolerance = 1e-9 * scale;

  FACES.iter().all(|face| {
    let normal = (corners[face[2]] - corners[face[0]]).cross(corners[face[3]] - corners[face[1]]);
    let length = normal.length();
    if length < DEGENERATE_AREA {
      return true;
    }
    let normal = normal / length;
    let face_center = centroid(corners, *face);
    let inside = (center - face_center).dot(normal);
    let probe = (point - face_center).dot(normal);
    probe.abs() <= tolerance || probe.signum() == inside.signum()
  })
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;
