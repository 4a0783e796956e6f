//! Per-ray results and their array export.

use losgeom_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::ray::Ray;
use crate::scene::Scene;

/// A surface of one occurrence of the vessel or of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceId {
    /// The surface swept by polygon edge `i`.
    Edge(usize),
    /// End cap at the lower limit.
    StartCap,
    /// End cap at the upper limit.
    EndCap,
}

impl SurfaceId {
    /// Flat index: edges first, then the start and end caps.
    pub fn flat_index(&self, n_edges: usize) -> usize {
        match self {
            SurfaceId::Edge(i) => *i,
            SurfaceId::StartCap => n_edges,
            SurfaceId::EndCap => n_edges + 1,
        }
    }
}

/// A surface together with the occurrence it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceRef {
    /// Occurrence index (limit pair index; 0 when unlimited).
    pub occurrence: usize,
    /// Surface within the occurrence.
    pub surface: SurfaceId,
}

/// What ended the line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exit {
    /// The ray never enters the vessel.
    Outside,
    /// The ray direction was unusable.
    Degenerate,
    /// The ray leaves through the vessel wall.
    Vessel(SurfaceRef),
    /// The ray is blocked by a structure.
    Structure {
        /// Structure index in input order.
        index: usize,
        /// Surface that was hit.
        hit: SurfaceRef,
    },
}

/// Entry/exit result for one line of sight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LosHit {
    /// Distance to the vessel entry; 0 when the origin is inside.
    pub kin: f64,
    /// Distance to the exit: vessel wall or nearest blocking structure.
    pub kout: f64,
    /// Vessel inward normal at the entry; NaN when the origin is inside.
    pub normal_in: Vec3,
    /// Unit normal at the exit, pointing back into the vacuum region.
    pub normal_out: Vec3,
    /// Vessel surface the ray enters through, if it starts outside.
    pub entry: Option<SurfaceRef>,
    /// What ended the line of sight.
    pub exit: Exit,
}

pub(crate) fn nan3() -> Vec3 {
    Vec3::new(f64::NAN, f64::NAN, f64::NAN)
}

impl LosHit {
    /// Result for a ray that never enters the vessel.
    pub fn outside() -> Self {
        Self {
            kin: f64::NAN,
            kout: f64::NAN,
            normal_in: nan3(),
            normal_out: nan3(),
            entry: None,
            exit: Exit::Outside,
        }
    }

    /// Result for a ray with an unusable direction.
    pub fn degenerate() -> Self {
        Self {
            exit: Exit::Degenerate,
            ..Self::outside()
        }
    }

    /// Whether the ray crosses the vessel interior.
    pub fn is_inside(&self) -> bool {
        !matches!(self.exit, Exit::Outside | Exit::Degenerate)
    }

    /// Entry point, if the ray crosses the vessel.
    pub fn point_in(&self, ray: &Ray) -> Option<Point3> {
        self.is_inside().then(|| ray.at(self.kin))
    }
}

/// Structure-of-arrays export of a batch.
///
/// `ind_out[i] = [structure, occurrence, surface]` with structure `-1` for
/// the vessel wall, and `[-2, -2, -2]` for rays that miss the vessel or
/// are degenerate. Cap surfaces follow the edges of their polygon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LosArrays {
    /// Entry distances.
    pub kin: Vec<f64>,
    /// Exit distances.
    pub kout: Vec<f64>,
    /// Exit normals.
    pub vperp_out: Vec<[f64; 3]>,
    /// Exit surface indices.
    pub ind_out: Vec<[i64; 3]>,
}

impl LosArrays {
    /// Flatten per-ray results traced against `scene`.
    pub fn from_hits(hits: &[LosHit], scene: &Scene) -> Self {
        let mut arrays = Self {
            kin: Vec::with_capacity(hits.len()),
            kout: Vec::with_capacity(hits.len()),
            vperp_out: Vec::with_capacity(hits.len()),
            ind_out: Vec::with_capacity(hits.len()),
        };
        for hit in hits {
            arrays.kin.push(hit.kin);
            arrays.kout.push(hit.kout);
            arrays
                .vperp_out
                .push([hit.normal_out.x, hit.normal_out.y, hit.normal_out.z]);
            let ind = match hit.exit {
                Exit::Outside | Exit::Degenerate => [-2, -2, -2],
                Exit::Vessel(r) => [
                    -1,
                    r.occurrence as i64,
                    r.surface.flat_index(scene.vessel().len()) as i64,
                ],
                Exit::Structure { index, hit } => [
                    index as i64,
                    hit.occurrence as i64,
                    hit.surface.flat_index(scene.structure_points(index).len()) as i64,
                ],
            };
            arrays.ind_out.push(ind);
        }
        arrays
    }

    /// Number of rays.
    pub fn len(&self) -> usize {
        self.kin.len()
    }

    /// Whether the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.kin.is_empty()
    }
}
