#![warn(missing_docs)]

//! Math types for the losgeom line-of-sight engine.
//!
//! Thin wrappers around nalgebra providing the point, vector and direction
//! types shared by the engine, an axis-aligned bounding box for ray
//! pre-filtering, and the 2D predicates used on poloidal cross-sections.

use nalgebra::{Unit, Vector2, Vector3};

pub mod aabb;
pub mod polygon;

pub use aabb::Aabb3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a 2D cross-section, `(R, Z)` or `(X, Y)`.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Tolerance for geometric comparisons on cross-sections.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-12 linear).
    pub const DEFAULT: Self = Self { linear: 1e-12 };

    /// Check if two cross-section points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_points_equal() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.points_equal(&Point2::new(1.0, 2.0), &Point2::new(1.0, 2.0)));
        assert!(!tol.points_equal(&Point2::new(1.0, 2.0), &Point2::new(1.0, 2.0 + 1e-9)));
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert_eq!(wrap_angle(0.0), 0.0);
        let tiny = wrap_angle(-1e-300);
        assert!((0.0..TAU).contains(&tiny));
    }
}
