//! Ray-solid intersection primitives.
//!
//! A solid is one occurrence of a cross-section: its walls are swept by the
//! polygon edges (about the Z axis, or along it) and, when limited, it is
//! closed by two end caps. Every surface hit becomes a [`Crossing`]
//! classified as entering or leaving from the solid's inward normal.

pub mod caps;
pub mod linear;
mod roots;
pub mod toroidal;

pub use roots::{solve_quadratic, Roots};

use losgeom_math::{Point2, Vec2, Vec3};

use crate::config::Tolerances;
use crate::hit::{SurfaceId, SurfaceRef};
use crate::polygon::edges_of;
use crate::ray::Ray;
use crate::scene::{Extent, VesselKind};

/// Slack on the edge parameter so that a hit on a shared vertex is seen by
/// both edges; coincident crossings are merged afterwards.
pub(crate) const EDGE_TOL: f64 = 1e-12;

/// A surface hit classified against the solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Ray parameter.
    pub k: f64,
    /// Whether the ray enters the solid here (leaves otherwise).
    pub entering: bool,
    /// Unit normal pointing into the solid.
    pub normal: Vec3,
    /// Surface that was hit.
    pub surface: SurfaceRef,
}

/// One occurrence of a cross-section, borrowed for intersection.
#[derive(Debug, Clone, Copy)]
pub struct Solid<'a> {
    /// Topology.
    pub kind: VesselKind,
    /// Cross-section vertices.
    pub points: &'a [Point2],
    /// Inward edge normals.
    pub normals: &'a [Vec2],
    /// Extent of the occurrence.
    pub extent: &'a Extent,
    /// Occurrence index reported in crossings.
    pub occurrence: usize,
}

/// Push every crossing of `ray` with `solid` with `k <= k_max` into `out`.
///
/// Hits where `|u·n| <= eps_plane` graze the surface and are dropped. A
/// ray that is only tangent to a solid therefore records nothing there: a
/// line of sight that just touches the vessel is reported outside it, and
/// a structure it only touches never blocks it.
pub fn collect_crossings(
    ray: &Ray,
    solid: &Solid<'_>,
    tol: &Tolerances,
    k_max: f64,
    out: &mut Vec<Crossing>,
) {
    let mut push = |k: f64, normal: Vec3, surface: SurfaceId| {
        if !(k.is_finite() && k <= k_max) {
            return;
        }
        let sca = ray.direction.dot(&normal);
        if sca.abs() <= tol.eps_plane {
            return;
        }
        out.push(Crossing {
            k,
            entering: sca > 0.0,
            normal,
            surface: SurfaceRef {
                occurrence: solid.occurrence,
                surface,
            },
        });
    };

    match solid.kind {
        VesselKind::Toroidal => {
            for edge in edges_of(solid.points, solid.normals) {
                for k in toroidal::edge_roots(ray, &edge.start, &edge.end, tol).iter() {
                    let p = ray.at(k);
                    if !solid.extent.contains_point(&p) {
                        continue;
                    }
                    if let Some(normal) = toroidal::normal_at(&p, &edge.normal) {
                        push(k, normal, SurfaceId::Edge(edge.index));
                    }
                }
            }
        }
        VesselKind::Linear => {
            if !linear::parallel_to_axis(ray, tol) {
                for edge in edges_of(solid.points, solid.normals) {
                    if let Some(k) = linear::edge_root(ray, &edge.start, &edge.end, tol) {
                        if solid.extent.contains_point(&ray.at(k)) {
                            let normal = Vec3::new(edge.normal.x, edge.normal.y, 0.0);
                            push(k, normal, SurfaceId::Edge(edge.index));
                        }
                    }
                }
            }
        }
    }

    caps::cap_hits(ray, solid.points, solid.extent, tol, |hit| {
        push(hit.k, hit.normal, hit.surface)
    });
}

/// Sort crossings by `k` and merge those closer than `eps`.
///
/// Each group of coincident crossings collapses to its net effect: a ray
/// passing through a vertex is seen entering (or leaving) once, while a
/// ray touching a corner enters and leaves at the same point and drops out
/// entirely.
pub fn settle_crossings(crossings: &mut Vec<Crossing>, eps: f64) {
    crossings.sort_by(|a, b| a.k.total_cmp(&b.k));

    let n = crossings.len();
    let mut write = 0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && crossings[j].k - crossings[i].k <= eps {
            j += 1;
        }
        let net: isize = crossings[i..j]
            .iter()
            .map(|c| if c.entering { 1 } else { -1 })
            .sum();
        if net != 0 {
            if let Some(pos) = crossings[i..j].iter().position(|c| c.entering == (net > 0)) {
                crossings[write] = crossings[i + pos];
                write += 1;
            }
        }
        i = j;
    }
    crossings.truncate(write);
}
