//! Ray intersection with the wall swept by a polygon edge extruded along Z.

use losgeom_math::Point2;

use super::EDGE_TOL;
use crate::config::Tolerances;
use crate::ray::Ray;

/// Whether the ray runs along the extrusion axis.
#[inline]
pub fn parallel_to_axis(ray: &Ray, tol: &Tolerances) -> bool {
    ray.upar2().sqrt() < tol.eps_uz
}

/// Non-negative ray parameter where the ray crosses the wall swept by the
/// edge `start → end` (`(X, Y)` coordinates).
///
/// The problem is 2D: `k` is measured along the 3D unit direction, so no
/// rescaling is needed.
pub fn edge_root(ray: &Ray, start: &Point2, end: &Point2, tol: &Tolerances) -> Option<f64> {
    let (ux, uy) = (ray.direction.x, ray.direction.y);
    let ex = end.x - start.x;
    let ey = end.y - start.y;

    let denom = ux * ey - uy * ex;
    if denom.abs() <= tol.eps_plane * ex.hypot(ey) {
        return None;
    }

    let wx = start.x - ray.origin.x;
    let wy = start.y - ray.origin.y;
    let k = (wx * ey - wy * ex) / denom;
    let q = (wx * uy - wy * ux) / denom;

    (k >= 0.0 && (-EDGE_TOL..=1.0 + EDGE_TOL).contains(&q)).then_some(k)
}
