//! Engine options and numerical tolerances.

use serde::{Deserialize, Serialize};

use crate::error::{LosError, Result};

/// Named tolerances used by the intersection primitives.
///
/// Every near-singular configuration is resolved against one of these, so
/// the same inputs always give the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Below this, the vertical component of a ray direction is treated as
    /// zero (horizontal ray). For linear geometry, below this the in-plane
    /// direction norm is treated as zero (ray along the extrusion axis).
    pub eps_uz: f64,
    /// Below this, the Z extent of a toroidal polygon edge is treated as
    /// zero (the edge sweeps a flat annulus).
    pub eps_vz: f64,
    /// Below this, the leading coefficient of a quadratic is treated as
    /// zero and the equation solved as linear.
    pub eps_a: f64,
    /// Linear-equation slope cutoff, and the half-width of the discriminant
    /// band that counts as a single grazing root.
    pub eps_b: f64,
    /// Below this, `|u·n|` makes a ray parallel to a plane or grazing a
    /// surface: no crossing is recorded.
    pub eps_plane: f64,
    /// A structure must beat the current exit by more than this to replace
    /// it; ties go to the earlier structure.
    pub eps_tie: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            eps_uz: 1e-6,
            eps_vz: 1e-9,
            eps_a: 1e-9,
            eps_b: 1e-9,
            eps_plane: 1e-9,
            eps_tie: 1e-12,
        }
    }
}

impl Tolerances {
    /// Validate tolerances: all must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("eps_uz", self.eps_uz),
            ("eps_vz", self.eps_vz),
            ("eps_a", self.eps_a),
            ("eps_b", self.eps_b),
            ("eps_plane", self.eps_plane),
            ("eps_tie", self.eps_tie),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(LosError::InvalidOptions(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Options for a line-of-sight batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LosOptions {
    /// Numerical tolerances.
    pub tolerances: Tolerances,
    /// Reject crossings past the ray's closest approach to the symmetry
    /// axis when that approach goes through the central column
    /// (toroidal vessels only).
    pub forbid: bool,
    /// Radius of the central column used by `forbid`. Defaults to the
    /// smallest major radius of the vessel polygon.
    pub rmin: Option<f64>,
    /// Skip structures whose bounds the ray cannot reach.
    pub prefilter: bool,
    /// Trace rays on the rayon thread pool.
    pub parallel: bool,
}

impl Default for LosOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            forbid: true,
            rmin: None,
            prefilter: true,
            parallel: true,
        }
    }
}

impl LosOptions {
    /// Validate options.
    pub fn validate(&self) -> Result<()> {
        self.tolerances.validate()?;
        if let Some(rmin) = self.rmin {
            if !rmin.is_finite() || rmin < 0.0 {
                return Err(LosError::InvalidOptions(format!(
                    "rmin must be finite and non-negative, got {rmin}"
                )));
            }
        }
        Ok(())
    }
}
