//! Ray intersection with the surface of revolution swept by one polygon
//! edge about the Z axis.
//!
//! Depending on the edge, the swept surface is a cone, a cylinder or a flat
//! annulus. Each case reduces to at most a quadratic in `k`, solved in
//! closed form.

use losgeom_math::{Point2, Point3, Vec2, Vec3};

use super::roots::{solve_quadratic, Roots};
use super::EDGE_TOL;
use crate::config::Tolerances;
use crate::ray::Ray;

/// Hits closer than this to the symmetry axis have no defined normal.
const AXIS_TOL: f64 = 1e-12;

#[inline]
fn on_edge(q: f64) -> bool {
    (-EDGE_TOL..=1.0 + EDGE_TOL).contains(&q)
}

/// Non-negative ray parameters where the ray meets the surface swept by the
/// edge `start → end` (`(R, Z)` coordinates).
pub fn edge_roots(ray: &Ray, start: &Point2, end: &Point2, tol: &Tolerances) -> Roots {
    let o = ray.origin;
    let uz = ray.direction.z;
    let dr = end.x - start.x;
    let dz = end.y - start.y;

    if dz.abs() < tol.eps_vz {
        // flat annulus at Z = start.z
        if uz.abs() < tol.eps_uz || dr.abs() < tol.eps_vz {
            return Roots::None;
        }
        let k = (start.y - o.z) / uz;
        if k < 0.0 {
            return Roots::None;
        }
        let q = (ray.radius2_at(k).sqrt() - start.x) / dr;
        return if on_edge(q) { Roots::One(k) } else { Roots::None };
    }

    if uz.abs() < tol.eps_uz {
        // horizontal ray: it meets the cone along a single circle
        let q = (o.z - start.y) / dz;
        if !on_edge(q) {
            return Roots::None;
        }
        let rq = start.x + q * dr;
        return solve_quadratic(ray.upar2(), ray.dot_par(), ray.dpar2() - rq * rq, tol)
            .retain(|k| k >= 0.0);
    }

    // cone: R(k) = c0 + slope·k along the ray's height
    let slope = dr * uz / dz;
    let c0 = start.x + dr * (o.z - start.y) / dz;
    solve_quadratic(
        ray.upar2() - slope * slope,
        ray.dot_par() - slope * c0,
        ray.dpar2() - c0 * c0,
        tol,
    )
    .retain(|k| {
        k >= 0.0 && c0 + slope * k >= 0.0 && on_edge((o.z + k * uz - start.y) / dz)
    })
}

/// Lift a poloidal normal `(nR, nZ)` to 3D at point `p`.
///
/// Returns `None` when `p` lies on the symmetry axis.
pub fn normal_at(p: &Point3, normal: &Vec2) -> Option<Vec3> {
    let r = (p.x * p.x + p.y * p.y).sqrt();
    if r < AXIS_TOL {
        return None;
    }
    Some(Vec3::new(normal.x * p.x / r, normal.x * p.y / r, normal.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::try_new(Point3::new(o[0], o[1], o[2]), Vec3::new(d[0], d[1], d[2])).unwrap()
    }

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    fn roots(r: Roots) -> Vec<f64> {
        r.iter().collect()
    }

    #[test]
    fn test_cylinder_horizontal_ray() {
        // vertical edge at R = 1.3 sweeps a cylinder
        let r = ray([2.0, 0.0, 0.0], [-1.0, 0.0, 0.0]);
        let k = roots(edge_roots(&r, &Point2::new(1.3, -0.5), &Point2::new(1.3, 0.5), &tol()));
        assert_eq!(k.len(), 2);
        assert!((k[0] - 0.7).abs() < 1e-12);
        assert!((k[1] - 3.3).abs() < 1e-12);
    }

    #[test]
    fn test_cylinder_outside_edge_height() {
        let r = ray([2.0, 0.0, 0.7], [-1.0, 0.0, 0.0]);
        assert!(edge_roots(&r, &Point2::new(1.3, -0.5), &Point2::new(1.3, 0.5), &tol()).is_empty());
    }

    #[test]
    fn test_cylinder_tangent_single_root() {
        let r = ray([1.3, -2.0, 0.0], [0.0, 1.0, 0.0]);
        let k = edge_roots(&r, &Point2::new(1.3, -0.5), &Point2::new(1.3, 0.5), &tol());
        assert_eq!(k, Roots::One(2.0));
    }

    #[test]
    fn test_annulus_vertical_ray() {
        // horizontal edge at Z = 0.5 from R = 0.5 to R = 1.5
        let r = ray([1.0, 0.0, 2.0], [0.0, 0.0, -1.0]);
        let k = roots(edge_roots(&r, &Point2::new(0.5, 0.5), &Point2::new(1.5, 0.5), &tol()));
        assert_eq!(k.len(), 1);
        assert!((k[0] - 1.5).abs() < 1e-12);

        // misses the annulus radially
        let r = ray([2.0, 0.0, 2.0], [0.0, 0.0, -1.0]);
        assert!(edge_roots(&r, &Point2::new(0.5, 0.5), &Point2::new(1.5, 0.5), &tol()).is_empty());
    }

    #[test]
    fn test_annulus_parallel_ray() {
        let r = ray([1.0, 0.0, 0.5], [-1.0, 0.0, 0.0]);
        assert!(edge_roots(&r, &Point2::new(0.5, 0.5), &Point2::new(1.5, 0.5), &tol()).is_empty());
    }

    #[test]
    fn test_cone_oblique_ray() {
        // edge from (1, 0) to (2, 1): the cone R = 1 + Z for Z in [0, 1]
        let r = ray([0.0, 0.0, 0.5], [1.0, 0.0, 0.0]);
        let k = roots(edge_roots(&r, &Point2::new(1.0, 0.0), &Point2::new(2.0, 1.0), &tol()));
        assert_eq!(k.len(), 1);
        assert!((k[0] - 1.5).abs() < 1e-12);

        // descending ray x = 3 - k/√2·..., check the hit lies on the cone
        let r = ray([3.0, 0.0, 1.5], [-1.0, 0.0, -1.0]);
        for k in edge_roots(&r, &Point2::new(1.0, 0.0), &Point2::new(2.0, 1.0), &tol()).iter() {
            let p = r.at(k);
            let rr = (p.x * p.x + p.y * p.y).sqrt();
            assert!((rr - (1.0 + p.z)).abs() < 1e-9);
            assert!((-1e-9..=1.0 + 1e-9).contains(&p.z));
        }
    }

    #[test]
    fn test_cone_vertical_ray() {
        let r = ray([1.5, 0.0, 3.0], [0.0, 0.0, -1.0]);
        let k = roots(edge_roots(&r, &Point2::new(1.0, 0.0), &Point2::new(2.0, 1.0), &tol()));
        assert_eq!(k.len(), 1);
        // hits R = 1.5 at Z = 0.5
        assert!((k[0] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_behind_origin_discarded() {
        let r = ray([2.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert!(edge_roots(&r, &Point2::new(1.3, -0.5), &Point2::new(1.3, 0.5), &tol()).is_empty());
    }

    #[test]
    fn test_normal_lift() {
        let n = normal_at(&Point3::new(0.0, 2.0, 0.3), &Vec2::new(-1.0, 0.0)).unwrap();
        assert!((n - Vec3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
        assert!(normal_at(&Point3::new(0.0, 0.0, 1.0), &Vec2::new(1.0, 0.0)).is_none());
    }
}
