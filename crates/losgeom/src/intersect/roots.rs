//! Closed-form quadratic roots with tolerance-driven degeneracy handling.

use crate::config::Tolerances;

/// Up to two real roots, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    /// No real root.
    None,
    /// One root (linear equation or grazing double root).
    One(f64),
    /// Two distinct roots, `.0 < .1`.
    Two(f64, f64),
}

impl Roots {
    /// Number of roots.
    pub fn len(&self) -> usize {
        match self {
            Roots::None => 0,
            Roots::One(_) => 1,
            Roots::Two(..) => 2,
        }
    }

    /// Whether there is no root.
    pub fn is_empty(&self) -> bool {
        matches!(self, Roots::None)
    }

    /// Keep only the roots satisfying `keep`.
    pub fn retain(self, mut keep: impl FnMut(f64) -> bool) -> Self {
        match self {
            Roots::None => Roots::None,
            Roots::One(a) if keep(a) => Roots::One(a),
            Roots::One(_) => Roots::None,
            Roots::Two(a, b) => match (keep(a), keep(b)) {
                (true, true) => Roots::Two(a, b),
                (true, false) => Roots::One(a),
                (false, true) => Roots::One(b),
                (false, false) => Roots::None,
            },
        }
    }

    /// Iterate over the roots in ascending order.
    pub fn iter(self) -> impl Iterator<Item = f64> {
        let (buf, n) = match self {
            Roots::None => ([0.0; 2], 0),
            Roots::One(a) => ([a, 0.0], 1),
            Roots::Two(a, b) => ([a, b], 2),
        };
        buf.into_iter().take(n)
    }
}

/// Solve `a k² + 2 b k + c = 0`.
///
/// `|a| < eps_a` falls back to the linear equation, solved only when
/// `|b| > eps_b`. A discriminant `b² − ac` within `eps_b` of zero gives a
/// single grazing root.
pub fn solve_quadratic(a: f64, b: f64, c: f64, tol: &Tolerances) -> Roots {
    if a.abs() < tol.eps_a {
        if b.abs() > tol.eps_b {
            return Roots::One(-c / (2.0 * b));
        }
        return Roots::None;
    }

    let delta = b * b - a * c;
    if delta < -tol.eps_b {
        return Roots::None;
    }
    if delta <= tol.eps_b {
        return Roots::One(-b / a);
    }

    // avoid cancellation between -b and sqrt(delta)
    let q = -(b + b.signum() * delta.sqrt());
    let (r1, r2) = (q / a, c / q);
    if r1 <= r2 {
        Roots::Two(r1, r2)
    } else {
        Roots::Two(r2, r1)
    }
}
