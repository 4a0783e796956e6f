//! Occlusion of the vessel interval by internal structures.

use losgeom_math::Vec3;

use crate::config::Tolerances;
use crate::hit::SurfaceRef;
use crate::intersect::{collect_crossings, settle_crossings, Crossing, Solid};
use crate::ray::Ray;
use crate::scene::Scene;

/// The structure surface that cuts a line of sight short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blocker {
    /// Distance to the blocking surface.
    pub k: f64,
    /// Structure normal at the hit, facing back along the ray.
    pub normal: Vec3,
    /// Structure index in input order.
    pub structure: usize,
    /// Occurrence and surface hit.
    pub hit: SurfaceRef,
}

/// Find the nearest structure that stops the ray inside `[kin, kout)`.
///
/// A structure entered at `k >= kin` blocks there. A structure the ray is
/// already inside at `kin` (flush with or cutting through the vessel wall,
/// or holding the origin) blocks at `kin` itself; the reported surface is
/// the one the ray would leave it through. A structure the ray only leaves
/// at about `kin` lies outside the vessel and is ignored.
///
/// Occurrences are scanned in input order and a later hit only wins when it
/// is closer by more than `eps_tie`, so ties go to the earlier structure.
/// With `prefilter`, occurrences whose bounds the ray cannot reach are
/// skipped. Crossings beyond `k_max` are ignored.
#[allow(clippy::too_many_arguments)]
pub fn nearest_blocker(
    scene: &Scene,
    ray: &Ray,
    tol: &Tolerances,
    prefilter: bool,
    kin: f64,
    kout: f64,
    k_max: f64,
    scratch: &mut Vec<Crossing>,
) -> Option<Blocker> {
    let mut kout = kout;
    let mut best = None;

    for occ in scene.occurrences() {
        if prefilter && !occ.bounds.may_hit(ray, kin, kout) {
            continue;
        }

        scratch.clear();
        let solid = Solid {
            kind: scene.kind(),
            points: scene.structure_points(occ.structure),
            normals: scene.structure_normals(occ.structure),
            extent: &occ.extent,
            occurrence: occ.index,
        };
        collect_crossings(ray, &solid, tol, k_max, scratch);
        settle_crossings(scratch, tol.eps_tie);

        // the first crossing past kin decides: leaving means inside at kin
        let first = scratch.iter().find(|c| {
            if c.entering {
                c.k >= kin - tol.eps_tie
            } else {
                c.k > kin + tol.eps_tie
            }
        });
        let Some(c) = first else {
            continue;
        };
        let (k, normal) = if c.entering {
            (c.k.max(kin), -c.normal)
        } else {
            (kin, c.normal)
        };
        if k >= kout - tol.eps_tie {
            continue;
        }

        log::trace!(
            "structure {} occurrence {} blocks at k = {} ({})",
            occ.structure,
            occ.index,
            k,
            if c.entering { "entered" } else { "inside" }
        );
        kout = k;
        best = Some(Blocker {
            k,
            normal,
            structure: occ.structure,
            hit: c.surface,
        });
    }

    best
}
