//! End caps closing a limited occurrence.
//!
//! A toroidal sector is closed by two half-planes through the Z axis; a
//! bounded extrusion by two planes of constant Z. A cap hit counts only
//! when the in-plane point falls inside the cross-section.

use losgeom_math::polygon::point_in_polygon;
use losgeom_math::{Point2, Vec3};

use crate::config::Tolerances;
use crate::hit::SurfaceId;
use crate::ray::Ray;
use crate::scene::Extent;

/// A cap hit with the cap's inward normal.
#[derive(Debug, Clone, Copy)]
pub struct CapHit {
    /// Ray parameter.
    pub k: f64,
    /// Normal pointing into the occurrence.
    pub normal: Vec3,
    /// Which cap.
    pub surface: SurfaceId,
}

/// Hits of the ray on the caps of `extent`, pushed into `out`.
pub fn cap_hits(
    ray: &Ray,
    polygon: &[Point2],
    extent: &Extent,
    tol: &Tolerances,
    mut out: impl FnMut(CapHit),
) {
    match extent {
        Extent::Full => {}
        Extent::Angular(span) => {
            for (phi, surface, sign) in [
                (span.start, SurfaceId::StartCap, 1.0),
                (span.end(), SurfaceId::EndCap, -1.0),
            ] {
                if let Some(hit) = half_plane_hit(ray, polygon, phi, tol) {
                    let (s, c) = phi.sin_cos();
                    out(CapHit {
                        k: hit,
                        normal: Vec3::new(-s, c, 0.0) * sign,
                        surface,
                    });
                }
            }
        }
        Extent::Axial { min, max } => {
            for (z, surface, sign) in [
                (*min, SurfaceId::StartCap, 1.0),
                (*max, SurfaceId::EndCap, -1.0),
            ] {
                if let Some(hit) = z_plane_hit(ray, polygon, z, tol) {
                    out(CapHit {
                        k: hit,
                        normal: Vec3::new(0.0, 0.0, sign),
                        surface,
                    });
                }
            }
        }
    }
}

/// Hit on the half-plane `φ = phi, R > 0`, inside the `(R, Z)` polygon.
fn half_plane_hit(ray: &Ray, polygon: &[Point2], phi: f64, tol: &Tolerances) -> Option<f64> {
    let (s, c) = phi.sin_cos();
    let plane_normal = Vec3::new(-s, c, 0.0);
    let denom = ray.direction.dot(&plane_normal);
    if denom.abs() < tol.eps_plane {
        return None;
    }
    let k = -ray.origin.coords.dot(&plane_normal) / denom;
    if k < 0.0 {
        return None;
    }
    let p = ray.at(k);
    let r = p.x * c + p.y * s;
    (r > 0.0 && point_in_polygon(&Point2::new(r, p.z), polygon)).then_some(k)
}

/// Hit on the plane `Z = z`, inside the `(X, Y)` polygon.
fn z_plane_hit(ray: &Ray, polygon: &[Point2], z: f64, tol: &Tolerances) -> Option<f64> {
    let uz = ray.direction.z;
    if uz.abs() < tol.eps_plane {
        return None;
    }
    let k = (z - ray.origin.z) / uz;
    if k < 0.0 {
        return None;
    }
    let p = ray.at(k);
    point_in_polygon(&Point2::new(p.x, p.y), polygon).then_some(k)
}
