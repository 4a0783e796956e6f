//! Closed poloidal cross-sections with per-edge inward normals.

use losgeom_math::polygon::{point_in_polygon, segments_intersect, signed_area};
use losgeom_math::{Point2, Tolerance, Vec2};

use crate::error::{LosError, Result};

/// Caller-supplied normals may be off unit length by this much.
const NORMAL_TOL: f64 = 1e-6;

/// A closed 2D polygon with one unit inward normal per edge ("VIn").
///
/// Vertices are stored open: edge `i` joins vertex `i` to vertex
/// `(i + 1) % n`. Construction validates the polygon once so that the
/// tracing code never has to.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    points: Vec<Point2>,
    normals: Vec<Vec2>,
}

/// One polygon edge, borrowed from a [`Polygon2D`].
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// Edge index.
    pub index: usize,
    /// Start vertex.
    pub start: Point2,
    /// End vertex.
    pub end: Point2,
    /// Unit normal pointing into the polygon.
    pub normal: Vec2,
}

impl Polygon2D {
    /// Build a polygon and derive its inward normals from the winding.
    ///
    /// A trailing vertex equal to the first one is dropped.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        let points = validate_points(points)?;
        let sign = if signed_area(&points) > 0.0 { 1.0 } else { -1.0 };
        let n = points.len();
        let normals = (0..n)
            .map(|i| {
                let e = (points[(i + 1) % n] - points[i]).normalize();
                // rotate +90° for CCW winding, -90° for CW
                Vec2::new(-e.y * sign, e.x * sign)
            })
            .collect();
        Ok(Self { points, normals })
    }

    /// Build a polygon with caller-supplied inward normals, one per edge.
    ///
    /// Each normal must be unit length and lie on the interior side of its
    /// edge.
    pub fn with_normals(points: Vec<Point2>, normals: Vec<Vec2>) -> Result<Self> {
        let derived = Self::new(points)?;
        if normals.len() != derived.normals.len() {
            return Err(LosError::geometry(
                "polygon",
                format!(
                    "{} normals supplied for {} edges",
                    normals.len(),
                    derived.normals.len()
                ),
            ));
        }
        for (i, (given, inward)) in normals.iter().zip(&derived.normals).enumerate() {
            if !given.iter().all(|c| c.is_finite()) || (given.norm() - 1.0).abs() > NORMAL_TOL {
                return Err(LosError::geometry(
                    "polygon",
                    format!("normal {i} is not a unit vector"),
                ));
            }
            if given.dot(inward) <= 0.0 {
                return Err(LosError::geometry(
                    "polygon",
                    format!("normal {i} points out of the polygon"),
                ));
            }
        }
        Ok(Self {
            points: derived.points,
            normals,
        })
    }

    /// Build a polygon from separate first/second coordinate arrays.
    pub fn from_coords(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(LosError::geometry(
                "polygon",
                format!("{} first coordinates but {} second coordinates", xs.len(), ys.len()),
            ));
        }
        Self::new(xs.iter().zip(ys).map(|(&x, &y)| Point2::new(x, y)).collect())
    }

    /// Vertices, without the closing duplicate.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Inward normals, one per edge.
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Number of vertices (and edges).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a validated polygon has at least three vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        edges_of(&self.points, &self.normals)
    }

    /// Whether `p` lies inside the polygon.
    pub fn contains(&self, p: &Point2) -> bool {
        point_in_polygon(p, &self.points)
    }

    /// Signed area, positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }
}

/// Iterate over the edges of a vertex/normal slice pair.
pub(crate) fn edges_of<'a>(
    points: &'a [Point2],
    normals: &'a [Vec2],
) -> impl Iterator<Item = Edge> + 'a {
    let n = points.len();
    (0..n).map(move |i| Edge {
        index: i,
        start: points[i],
        end: points[(i + 1) % n],
        normal: normals[i],
    })
}

/// `(min, max)` corners of a vertex slice.
pub(crate) fn bounds_of(points: &[Point2]) -> (Point2, Point2) {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

fn validate_points(mut points: Vec<Point2>) -> Result<Vec<Point2>> {
    let tol = Tolerance::DEFAULT;

    if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(LosError::geometry("polygon", "non-finite vertex"));
    }
    if points.len() > 1 && tol.points_equal(&points[0], &points[points.len() - 1]) {
        points.pop();
    }
    let n = points.len();
    if n < 3 {
        return Err(LosError::geometry(
            "polygon",
            format!("needs at least 3 vertices, got {n}"),
        ));
    }
    for i in 0..n {
        if tol.points_equal(&points[i], &points[(i + 1) % n]) {
            return Err(LosError::geometry(
                "polygon",
                format!("edge {i} has zero length"),
            ));
        }
    }

    let (min, max) = bounds_of(&points);
    let scale = (max - min).norm().max(1.0);
    if signed_area(&points).abs() <= tol.linear * scale * scale {
        return Err(LosError::geometry("polygon", "polygon has zero area"));
    }

    // Non-adjacent edges must not touch.
    let cross_tol = tol.linear * scale * scale;
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(
                &points[i],
                &points[(i + 1) % n],
                &points[j],
                &points[(j + 1) % n],
                cross_tol,
            ) {
                return Err(LosError::geometry(
                    "polygon",
                    format!("edges {i} and {j} intersect"),
                ));
            }
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn test_inward_normals_ccw() {
        let poly = Polygon2D::new(square(0.0, 0.0, 1.0, 1.0)).unwrap();
        // bottom edge of a CCW square: inward is +y
        assert!((poly.normals()[0] - Vec2::new(0.0, 1.0)).norm() < 1e-12);
        // right edge: inward is -x
        assert!((poly.normals()[1] - Vec2::new(-1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_inward_normals_cw() {
        let mut pts = square(0.0, 0.0, 1.0, 1.0);
        pts.reverse();
        let poly = Polygon2D::new(pts).unwrap();
        for edge in poly.edges() {
            let mid = Point2::from((edge.start.coords + edge.end.coords) / 2.0);
            assert!(poly.contains(&(mid + 1e-3 * edge.normal)));
        }
    }

    #[test]
    fn test_closing_vertex_dropped() {
        let mut pts = square(0.0, 0.0, 1.0, 1.0);
        pts.push(pts[0]);
        let poly = Polygon2D::new(pts).unwrap();
        assert_eq!(poly.len(), 4);
    }

    #[test]
    fn test_too_few_vertices() {
        let err = Polygon2D::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, LosError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_self_intersection_rejected() {
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(Polygon2D::new(bowtie).is_err());
    }

    #[test]
    fn test_collinear_rejected() {
        let line = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(Polygon2D::new(line).is_err());
    }

    #[test]
    fn test_supplied_normals_checked() {
        let pts = square(0.0, 0.0, 1.0, 1.0);
        let good = vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
        ];
        assert!(Polygon2D::with_normals(pts.clone(), good.clone()).is_ok());

        let flipped: Vec<Vec2> = good.iter().map(|n| -n).collect();
        assert!(Polygon2D::with_normals(pts.clone(), flipped).is_err());
        assert!(Polygon2D::with_normals(pts, good[..3].to_vec()).is_err());
    }

    #[test]
    fn test_from_coords() {
        let poly = Polygon2D::from_coords(&[0.0, 2.0, 2.0, 0.0], &[0.0, 0.0, 1.0, 1.0]).unwrap();
        assert!((poly.signed_area() - 2.0).abs() < 1e-12);
        let (min, max) = bounds_of(poly.points());
        assert_eq!((min.x, min.y, max.x, max.y), (0.0, 0.0, 2.0, 1.0));
        assert!(Polygon2D::from_coords(&[0.0, 1.0], &[0.0]).is_err());
    }
}
