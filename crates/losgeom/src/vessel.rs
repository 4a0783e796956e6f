//! Entry and exit of a ray through the vessel, before any structure.

use losgeom_math::Vec3;

use crate::config::Tolerances;
use crate::hit::SurfaceRef;
use crate::intersect::{collect_crossings, linear, settle_crossings, Crossing, Solid};
use crate::ray::Ray;
use crate::scene::{Scene, VesselKind};

/// The part of a ray inside the vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselInterval {
    /// Entry distance; 0 when the origin is inside.
    pub kin: f64,
    /// Exit distance through the vessel wall.
    pub kout: f64,
    /// Vessel inward normal at the entry, `None` when the origin is inside.
    pub normal_in: Option<Vec3>,
    /// Entry surface, `None` when the origin is inside.
    pub entry: Option<SurfaceRef>,
    /// Vessel inward normal at the exit.
    pub normal_out: Vec3,
    /// Exit surface.
    pub exit: SurfaceRef,
}

/// Intersect `ray` with the vessel walls (and caps of a limited vessel).
///
/// `kout` is the first leaving crossing and `kin` the last entering crossing
/// before it. No entering crossing means the origin is inside. Returns
/// `None` when the ray never leaves the vessel, i.e. it never enters it.
/// Crossings beyond `k_max` are ignored. `scratch` is reused across calls.
pub fn vessel_interval(
    scene: &Scene,
    ray: &Ray,
    tol: &Tolerances,
    k_max: f64,
    scratch: &mut Vec<Crossing>,
) -> Option<VesselInterval> {
    if scene.kind() == VesselKind::Linear && linear::parallel_to_axis(ray, tol) {
        return None;
    }

    scratch.clear();
    let polygon = scene.vessel();
    for (occurrence, extent) in scene.vessel_extents().iter().enumerate() {
        let solid = Solid {
            kind: scene.kind(),
            points: polygon.points(),
            normals: polygon.normals(),
            extent,
            occurrence,
        };
        collect_crossings(ray, &solid, tol, k_max, scratch);
    }
    settle_crossings(scratch, tol.eps_tie);

    let exit_at = scratch.iter().position(|c| !c.entering)?;
    let exit = scratch[exit_at];
    let entry = scratch[..exit_at].iter().rev().find(|c| c.entering);

    Some(VesselInterval {
        kin: entry.map_or(0.0, |c| c.k),
        kout: exit.k,
        normal_in: entry.map(|c| c.normal),
        entry: entry.map(|c| c.surface),
        normal_out: exit.normal,
        exit: exit.surface,
    })
}
