pub mod polygon_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance under which two generated knot points are welded together.
pub const WELD_TOLERANCE: f64 = 1e-5;

/// Normalizes `v`, returning `None` when its length is below [`TOLERANCE`]
/// or not finite.
#[must_use]
pub fn try_normalize(v: &Vector3) -> Option<Vector3> {
    let len = v.norm();
    if len.is_finite() && len >= TOLERANCE {
        Some(*v / len)
    } else {
        None
    }
}

/// Whether every coordinate of `p` is finite.
#[must_use]
pub fn is_finite_point(p: &Point3) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

/// Midpoint of the segment `a`–`b`.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) / 2.0)
}
