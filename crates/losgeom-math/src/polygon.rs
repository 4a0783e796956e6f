//! Predicates on closed 2D polygons given as vertex slices.
//!
//! Polygons are implicitly closed: edge `i` joins `points[i]` to
//! `points[(i + 1) % n]`.

use crate::Point2;

/// Twice the signed area of the triangle `(p0, p1, p2)`.
///
/// Positive when `p2` lies to the left of the directed line `p0 → p1`.
#[inline]
pub fn is_left(p0: &Point2, p1: &Point2, p2: &Point2) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

/// Signed area of a polygon, positive for counter-clockwise winding.
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Winding-number point-in-polygon test.
///
/// Returns `true` if the point is strictly inside or on a lower/left
/// boundary; points on the remaining boundary may go either way.
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut winding = 0i32;
    let n = polygon.len();

    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];

        if p1.y <= point.y {
            if p2.y > point.y && is_left(&p1, &p2, point) > 0.0 {
                winding += 1;
            }
        } else if p2.y <= point.y && is_left(&p1, &p2, point) < 0.0 {
            winding -= 1;
        }
    }

    winding != 0
}

/// Test whether closed segments `a0–a1` and `b0–b1` intersect.
///
/// Collinear overlapping segments count as intersecting; `tol` absorbs
/// rounding in the orientation tests.
pub fn segments_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2, tol: f64) -> bool {
    let d1 = is_left(b0, b1, a0);
    let d2 = is_left(b0, b1, a1);
    let d3 = is_left(a0, a1, b0);
    let d4 = is_left(a0, a1, b1);

    if ((d1 > tol && d2 < -tol) || (d1 < -tol && d2 > tol))
        && ((d3 > tol && d4 < -tol) || (d3 < -tol && d4 > tol))
    {
        return true;
    }

    (d1.abs() <= tol && on_segment(b0, b1, a0))
        || (d2.abs() <= tol && on_segment(b0, b1, a1))
        || (d3.abs() <= tol && on_segment(a0, a1, b0))
        || (d4.abs() <= tol && on_segment(a0, a1, b1))
}

/// Whether `p`, known to be collinear with `a–b`, lies within its bounding box.
fn on_segment(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
