//! Conservative per-occurrence bounds used to skip structures a ray
//! cannot reach.
//!
//! Every test here may let through an occurrence the ray misses; none may
//! reject one it hits. The exact primitives settle the rest, so tracing
//! gives identical results with or without the pre-filter.

use std::f64::consts::{FRAC_PI_2, TAU};

use losgeom_math::{wrap_angle, Aabb3, Point2, Point3};

use crate::polygon::bounds_of;
use crate::ray::Ray;
use crate::scene::{AngularSpan, Extent, VesselKind};

/// Relative safety margin applied to every bound.
const MARGIN: f64 = 1e-9;

/// Bounds of one structure occurrence.
#[derive(Debug, Clone)]
pub struct OccurrenceBounds {
    /// Cartesian bounding box.
    pub aabb: Aabb3,
    /// Radial extent `(min, max)` about the Z axis; toroidal only.
    pub radial: Option<(f64, f64)>,
    /// Toroidal sector; toroidal limited occurrences only.
    pub span: Option<AngularSpan>,
    margin: f64,
}

impl OccurrenceBounds {
    /// Compute bounds for a cross-section with the given extent.
    pub fn new(kind: VesselKind, points: &[Point2], extent: &Extent) -> Self {
        let (min, max) = bounds_of(points);
        let scale = min
            .coords
            .abs()
            .max()
            .max(max.coords.abs().max())
            .max(1.0);
        let margin = MARGIN * scale;

        let mut aabb = Aabb3::empty();
        let (radial, span) = match kind {
            VesselKind::Toroidal => {
                let span = match extent {
                    Extent::Angular(span) => Some(*span),
                    _ => None,
                };
                include_sector(&mut aabb, min.x, max.x, min.y, max.y, span.as_ref());
                (Some((min.x, max.x)), span)
            }
            VesselKind::Linear => {
                let (z_min, z_max) = match extent {
                    Extent::Axial { min, max } => (*min, *max),
                    _ => (f64::MIN, f64::MAX),
                };
                aabb.include_point(&Point3::new(min.x, min.y, z_min));
                aabb.include_point(&Point3::new(max.x, max.y, z_max));
                (None, None)
            }
        };
        aabb.expand(margin);

        Self {
            aabb,
            radial,
            span,
            margin,
        }
    }

    /// Whether the ray segment `[kin, kout]` may reach this occurrence.
    pub fn may_hit(&self, ray: &Ray, kin: f64, kout: f64) -> bool {
        match ray.intersect_aabb(&self.aabb) {
            Some((t0, t1)) if t0 <= kout && t1 >= kin => {}
            _ => return false,
        }

        let Some((r_min, r_max)) = self.radial else {
            return true;
        };

        // r² is convex in k: its maximum is at an end, its minimum at the
        // clamped closest approach.
        let k_close = if ray.upar2() > 0.0 {
            (-ray.dot_par() / ray.upar2()).clamp(kin, kout)
        } else {
            kin
        };
        let seg_min = ray.radius2_at(k_close).sqrt();
        let seg_max = ray.radius2_at(kin).max(ray.radius2_at(kout)).sqrt();
        if seg_min > r_max + self.margin || seg_max < r_min - self.margin {
            return false;
        }

        match &self.span {
            Some(span) if seg_min > self.margin => {
                let p0 = ray.at(kin);
                let p1 = ray.at(kout);
                let phi0 = p0.y.atan2(p0.x);
                // the segment stays clear of the axis, so it sweeps less than π
                let sweep = (p0.x * p1.y - p0.y * p1.x).atan2(p0.x * p1.x + p0.y * p1.y);
                let start = if sweep >= 0.0 { phi0 } else { phi0 + sweep };
                span.overlaps(wrap_angle(start), sweep.abs(), ANGLE_MARGIN)
            }
            _ => true,
        }
    }
}

/// Angular slack on sector overlap tests.
const ANGLE_MARGIN: f64 = 1e-9;

/// Grow `aabb` to hold the annular sector `[r0, r1] × [z0, z1]` over `span`.
fn include_sector(
    aabb: &mut Aabb3,
    r0: f64,
    r1: f64,
    z0: f64,
    z1: f64,
    span: Option<&AngularSpan>,
) {
    let Some(span) = span else {
        aabb.include_point(&Point3::new(-r1, -r1, z0));
        aabb.include_point(&Point3::new(r1, r1, z1));
        return;
    };

    let mut include_angle = |phi: f64| {
        let (s, c) = phi.sin_cos();
        for r in [r0, r1] {
            aabb.include_point(&Point3::new(r * c, r * s, z0));
            aabb.include_point(&Point3::new(r * c, r * s, z1));
        }
    };
    include_angle(span.start);
    include_angle(span.end());
    // axis-aligned extremes the sector sweeps past
    for quarter in 0..4 {
        let phi = quarter as f64 * FRAC_PI_2;
        if wrap_angle(phi - span.start) <= span.width || span.width >= TAU {
            include_angle(phi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use losgeom_math::Vec3;
    use std::f64::consts::PI;

    fn rect(r0: f64, z0: f64, r1: f64, z1: f64) -> Vec<Point2> {
        vec![
            Point2::new(r0, z0),
            Point2::new(r1, z0),
            Point2::new(r1, z1),
            Point2::new(r0, z1),
        ]
    }

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::try_new(Point3::new(o[0], o[1], o[2]), Vec3::new(d[0], d[1], d[2])).unwrap()
    }

    #[test]
    fn test_full_ring_box() {
        let b = OccurrenceBounds::new(VesselKind::Toroidal, &rect(0.8, -0.1, 0.9, 0.1), &Extent::Full);
        assert!((b.aabb.max.x - 0.9).abs() < 1e-6);
        assert!((b.aabb.min.y + 0.9).abs() < 1e-6);
        assert!((b.aabb.max.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_radial_reject() {
        let b = OccurrenceBounds::new(VesselKind::Toroidal, &rect(0.8, -0.1, 0.9, 0.1), &Extent::Full);
        // passes the axis at radius 0.95, outside the ring
        let r = ray([2.0, 0.95, 0.0], [-1.0, 0.0, 0.0]);
        assert!(!b.may_hit(&r, 0.0, 4.0));
        // through the ring
        let r = ray([2.0, 0.0, 0.0], [-1.0, 0.0, 0.0]);
        assert!(b.may_hit(&r, 0.0, 4.0));
        // segment ends before reaching the ring
        assert!(!b.may_hit(&r, 0.0, 1.0));
    }

    #[test]
    fn test_inner_radius_reject() {
        let b = OccurrenceBounds::new(VesselKind::Toroidal, &rect(0.8, -0.1, 0.9, 0.1), &Extent::Full);
        // stays within radius 0.5 of the axis
        let r = ray([0.3, -0.3, 0.0], [0.0, 1.0, 0.0]);
        assert!(!b.may_hit(&r, 0.0, 0.6));
    }

    #[test]
    fn test_angular_reject() {
        let span = AngularSpan::from_limits(PI / 2.0 - 0.1, PI / 2.0 + 0.1).unwrap();
        let b = OccurrenceBounds::new(
            VesselKind::Toroidal,
            &rect(0.8, -0.1, 0.9, 0.1),
            &Extent::Angular(span),
        );
        // inside the box and the radial band, just clockwise of the sector
        let r = ray([0.085, 0.81, 0.0], [0.0, 1.0, 0.0]);
        assert!(!b.may_hit(&r, 0.0, 0.01));
        // crosses the sector near phi = π/2
        let r = ray([-1.0, 0.85, 0.0], [1.0, 0.0, 0.0]);
        assert!(b.may_hit(&r, 0.0, 2.0));
    }

    #[test]
    fn test_sector_box_is_tight() {
        let span = AngularSpan::from_limits(0.0, 0.2).unwrap();
        let b = OccurrenceBounds::new(
            VesselKind::Toroidal,
            &rect(0.8, -0.1, 0.9, 0.1),
            &Extent::Angular(span),
        );
        assert!(b.aabb.min.y > -1e-6);
        assert!(b.aabb.min.x > 0.7);
    }

    #[test]
    fn test_linear_box() {
        let b = OccurrenceBounds::new(
            VesselKind::Linear,
            &rect(0.0, 0.0, 1.0, 1.0),
            &Extent::Axial { min: 2.0, max: 3.0 },
        );
        let r = ray([-1.0, 0.5, 0.0], [1.0, 0.0, 0.0]);
        assert!(!b.may_hit(&r, 0.0, 5.0));
        let r = ray([-1.0, 0.5, 2.5], [1.0, 0.0, 0.0]);
        assert!(b.may_hit(&r, 0.0, 5.0));

        let unlimited = OccurrenceBounds::new(VesselKind::Linear, &rect(0.0, 0.0, 1.0, 1.0), &Extent::Full);
        let r = ray([-1.0, 0.5, 100.0], [1.0, 0.0, 0.0]);
        assert!(unlimited.may_hit(&r, 0.0, 5.0));
    }
}
