//! Batch tracing of lines of sight.
//!
//! Rays are independent given the shared, read-only [`Scene`], so a batch
//! is a plain data-parallel map. Each rayon worker owns a crossing buffer
//! that is reused across its rays; results come back in input order and
//! are identical for any number of threads.

use rayon::prelude::*;

use losgeom_math::{Point3, Vec3};

use crate::config::LosOptions;
use crate::error::{LosError, Result};
use crate::hit::{nan3, Exit, LosHit};
use crate::intersect::Crossing;
use crate::occlusion::nearest_blocker;
use crate::ray::Ray;
use crate::scene::{Scene, Structure, Vessel, VesselKind};
use crate::vessel::vessel_interval;

/// Trace a batch of lines of sight through a vessel and its structures.
///
/// Validates `options`, the array lengths and the geometry once, then
/// traces every ray. `origins[i]` and `directions[i]` give ray `i`;
/// directions need not be normalised. A zero or non-finite ray yields
/// [`Exit::Degenerate`] without affecting the rest of the batch.
pub fn intersect_los_vessel(
    origins: &[Point3],
    directions: &[Vec3],
    vessel: &Vessel,
    structures: &[Structure],
    options: &LosOptions,
) -> Result<Vec<LosHit>> {
    check_inputs(origins, directions, options)?;
    let scene = Scene::new(vessel, structures)?;
    scene.trace_batch(origins, directions, options)
}

fn check_inputs(origins: &[Point3], directions: &[Vec3], options: &LosOptions) -> Result<()> {
    options.validate()?;
    if origins.len() != directions.len() {
        return Err(LosError::LengthMismatch {
            origins: origins.len(),
            directions: directions.len(),
        });
    }
    Ok(())
}

impl Scene {
    /// Trace a single ray.
    pub fn trace(&self, ray: &Ray, options: &LosOptions) -> LosHit {
        self.trace_with(ray, options, &mut Vec::new())
    }

    /// Trace a batch of rays, in parallel when `options.parallel` is set.
    pub fn trace_batch(
        &self,
        origins: &[Point3],
        directions: &[Vec3],
        options: &LosOptions,
    ) -> Result<Vec<LosHit>> {
        check_inputs(origins, directions, options)?;
        log::debug!(
            "tracing {} lines of sight against {} structure occurrences (parallel: {})",
            origins.len(),
            self.occurrence_count(),
            options.parallel
        );

        let trace_one = |scratch: &mut Vec<Crossing>, (origin, direction): (&Point3, &Vec3)| {
            match Ray::try_new(*origin, *direction) {
                Ok(ray) => self.trace_with(&ray, options, scratch),
                Err(_) => LosHit::degenerate(),
            }
        };

        let hits: Vec<LosHit> = if options.parallel {
            origins
                .par_iter()
                .zip(directions.par_iter())
                .map_init(Vec::new, trace_one)
                .collect()
        } else {
            let mut scratch = Vec::new();
            origins
                .iter()
                .zip(directions)
                .map(|pair| trace_one(&mut scratch, pair))
                .collect()
        };

        let degenerate = hits.iter().filter(|h| h.exit == Exit::Degenerate).count();
        if degenerate > 0 {
            log::warn!("{degenerate} of {} rays have a degenerate direction", hits.len());
        }
        Ok(hits)
    }

    /// Distance past which crossings are on the far side of the central
    /// column, or infinity when nothing is forbidden.
    ///
    /// Applies to toroidal vessels with `options.forbid`: when the ray's
    /// closest approach to the axis lies ahead of the origin and inside
    /// `rmin`, everything beyond it is unreachable.
    pub fn forbid_limit(&self, ray: &Ray, options: &LosOptions) -> f64 {
        if !options.forbid || self.kind() != VesselKind::Toroidal {
            return f64::INFINITY;
        }
        let rmin = options.rmin.unwrap_or_else(|| self.vessel_rmin());
        match ray.closest_to_axis(options.tolerances.eps_uz) {
            Some((kc, r)) if kc > 0.0 && r < rmin => kc,
            _ => f64::INFINITY,
        }
    }

    fn trace_with(&self, ray: &Ray, options: &LosOptions, scratch: &mut Vec<Crossing>) -> LosHit {
        let tol = &options.tolerances;
        let k_max = self.forbid_limit(ray, options);

        let Some(interval) = vessel_interval(self, ray, tol, k_max, scratch) else {
            return LosHit::outside();
        };

        let mut hit = LosHit {
            kin: interval.kin,
            kout: interval.kout,
            normal_in: interval.normal_in.unwrap_or_else(nan3),
            normal_out: interval.normal_out,
            entry: interval.entry,
            exit: Exit::Vessel(interval.exit),
        };

        if let Some(blocker) = nearest_blocker(
            self,
            ray,
            tol,
            options.prefilter,
            interval.kin,
            interval.kout,
            k_max,
            scratch,
        ) {
            hit.kout = blocker.k;
            hit.normal_out = blocker.normal;
            hit.exit = Exit::Structure {
                index: blocker.structure,
                hit: blocker.hit,
            };
        }
        hit
    }
}
