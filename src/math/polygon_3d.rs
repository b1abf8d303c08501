use super::{try_normalize, Point3, Vector3};

/// Computes the unit normal of a polygon using Newell's method.
///
/// Works for non-planar and concave polygons; the result follows the
/// right-hand rule over the vertex order. Returns `None` when the polygon
/// has (near) zero area.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Option<Vector3> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    try_normalize(&normal)
}
