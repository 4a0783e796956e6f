//! Line-of-sight representation and the ray-box slab test.

use losgeom_math::{Aabb3, Dir3, Point3, Vec3};

use crate::error::{LosError, Result};

/// A line of sight: origin and unit direction.
///
/// Besides the reciprocal direction used by the slab test, the ray caches
/// the horizontal-plane quantities that every toroidal formula needs.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
    /// `ux² + uy²`.
    upar2: f64,
    /// `Dx² + Dy²`.
    dpar2: f64,
    /// `Dx·ux + Dy·uy`.
    dot_par: f64,
}

impl Ray {
    /// Create a ray from an origin and a direction of any non-zero length.
    ///
    /// Fails with [`LosError::DegenerateRay`] when the direction is zero or
    /// either input is not finite.
    pub fn try_new(origin: Point3, direction: Vec3) -> Result<Self> {
        // scale by the largest component first so the norm cannot overflow
        let scale = direction.amax();
        if !(scale.is_finite() && scale > 0.0)
            || !direction.iter().all(|c| c.is_finite())
            || !origin.coords.iter().all(|c| c.is_finite())
        {
            return Err(LosError::DegenerateRay);
        }
        let scaled = direction / scale;
        let dir = Dir3::new_unchecked(scaled / scaled.norm());
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            usize::from(inv.x < 0.0),
            usize::from(inv.y < 0.0),
            usize::from(inv.z < 0.0),
        ];
        Ok(Self {
            origin,
            direction: dir,
            inv_direction: inv,
            sign,
            upar2: dir.x * dir.x + dir.y * dir.y,
            dpar2: origin.x * origin.x + origin.y * origin.y,
            dot_par: origin.x * dir.x + origin.y * dir.y,
        })
    }

    /// Evaluate the ray at parameter `k`: `origin + k * direction`.
    #[inline]
    pub fn at(&self, k: f64) -> Point3 {
        self.origin + k * self.direction.as_ref()
    }

    /// `ux² + uy²`, the squared norm of the horizontal direction.
    #[inline]
    pub fn upar2(&self) -> f64 {
        self.upar2
    }

    /// `Dx² + Dy²`, the squared distance of the origin to the Z axis.
    #[inline]
    pub fn dpar2(&self) -> f64 {
        self.dpar2
    }

    /// `Dx·ux + Dy·uy`.
    #[inline]
    pub fn dot_par(&self) -> f64 {
        self.dot_par
    }

    /// Squared distance to the Z axis at parameter `k`.
    #[inline]
    pub fn radius2_at(&self, k: f64) -> f64 {
        (self.upar2 * k * k + 2.0 * self.dot_par * k + self.dpar2).max(0.0)
    }

    /// Parameter and radius of the closest approach to the Z axis.
    ///
    /// Returns `None` for rays parallel to the axis.
    pub fn closest_to_axis(&self, eps: f64) -> Option<(f64, f64)> {
        if self.upar2 <= eps * eps {
            return None;
        }
        let k = -self.dot_par / self.upar2;
        Some((k, self.radius2_at(k).sqrt()))
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_min, t_max))` if the ray intersects the box,
    /// where `t_min` and `t_max` are the entry and exit parameters.
    /// Returns `None` if no intersection.
    ///
    /// Axis-parallel rays give infinite slab bounds; a NaN slab (origin on
    /// a face of a zero-width slab) leaves the interval unconstrained.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut t_min = tx1;
        let mut t_max = tx2;

        let ty1 = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;

        t_min = t_min.max(ty1);
        t_max = t_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;

        t_min = t_min.max(tz1);
        t_max = t_max.min(tz2);

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}
