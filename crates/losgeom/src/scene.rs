//! Vessel and structure descriptions, and the validated [`Scene`] they
//! compile into.

use std::f64::consts::TAU;

use losgeom_math::{wrap_angle, Point2, Point3, Vec2};
use serde::{Deserialize, Serialize};

use crate::bounds::OccurrenceBounds;
use crate::error::{LosError, Result};
use crate::polygon::Polygon2D;

/// Topology of the vessel and of every structure inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselKind {
    /// Surface of revolution about the Z axis; polygons are `(R, Z)`.
    Toroidal,
    /// Extrusion along Z; polygons are `(X, Y)`.
    Linear,
}

/// A toroidal angle range, `width` radians counter-clockwise from `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSpan {
    /// Start angle in `[0, 2π)`.
    pub start: f64,
    /// Angular width in `(0, 2π)`.
    pub width: f64,
}

/// Angles this close to a span boundary count as inside.
const ANGLE_TOL: f64 = 1e-12;

/// Counter-clockwise width from `a` to `b`, in `[0, 2π)` unless `b - a`
/// already spans a full turn.
fn wrapped_width(a: f64, b: f64) -> f64 {
    let width = b - a;
    if width >= TAU {
        width
    } else {
        width.rem_euclid(TAU)
    }
}

impl AngularSpan {
    /// Build a span from a limit pair.
    ///
    /// `b < a` wraps through ±π, however many turns apart the two are.
    /// Returns `None` when the pair covers a full turn or more.
    pub fn from_limits(a: f64, b: f64) -> Option<Self> {
        let width = wrapped_width(a, b);
        if width >= TAU {
            return None;
        }
        Some(Self {
            start: wrap_angle(a),
            width,
        })
    }

    /// End angle (not wrapped).
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    /// Whether `phi` lies in the span.
    pub fn contains(&self, phi: f64) -> bool {
        let offset = wrap_angle(phi - self.start);
        offset <= self.width + ANGLE_TOL || offset >= TAU - ANGLE_TOL
    }

    /// Whether two spans share at least one angle, each widened by `margin`.
    pub fn overlaps(&self, start: f64, width: f64, margin: f64) -> bool {
        wrap_angle(start - self.start) <= self.width + margin
            || wrap_angle(self.start - start) <= width + margin
    }
}

/// Where along the symmetry direction an occurrence exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Full revolution, or infinite extrusion.
    Full,
    /// Toroidal sector.
    Angular(AngularSpan),
    /// Z range of a linear extrusion.
    Axial {
        /// Lower Z bound.
        min: f64,
        /// Upper Z bound.
        max: f64,
    },
}

impl Extent {
    fn from_limits(kind: VesselKind, (a, b): (f64, f64), what: &str) -> Result<Self> {
        if !(a.is_finite() && b.is_finite()) {
            return Err(LosError::geometry(what, "non-finite limit"));
        }
        match kind {
            VesselKind::Toroidal => {
                // a whole number of turns backwards leaves nothing
                let width = wrapped_width(a, b);
                let empty = b < a && (width < ANGLE_TOL || width > TAU - ANGLE_TOL);
                if (b - a).abs() < ANGLE_TOL || empty {
                    return Err(LosError::geometry(what, format!("empty angular limit ({a}, {b})")));
                }
                Ok(AngularSpan::from_limits(a, b).map_or(Extent::Full, Extent::Angular))
            }
            VesselKind::Linear => {
                if b <= a {
                    return Err(LosError::geometry(
                        what,
                        format!("axial limit ({a}, {b}) must have min < max"),
                    ));
                }
                Ok(Extent::Axial { min: a, max: b })
            }
        }
    }

    /// Whether a 3D point lies within the extent (ignoring the cross-section).
    pub fn contains_point(&self, p: &Point3) -> bool {
        match self {
            Extent::Full => true,
            Extent::Angular(span) => span.contains(p.y.atan2(p.x)),
            Extent::Axial { min, max } => p.z >= *min && p.z <= *max,
        }
    }
}

/// The enclosing vacuum vessel.
#[derive(Debug, Clone)]
pub struct Vessel {
    /// Poloidal cross-section.
    pub polygon: Polygon2D,
    /// Toroidal or linear.
    pub kind: VesselKind,
    /// Limit pairs; empty for a full revolution / infinite extrusion.
    pub limits: Vec<(f64, f64)>,
}

impl Vessel {
    /// Create an unlimited vessel.
    pub fn new(polygon: Polygon2D, kind: VesselKind) -> Self {
        Self {
            polygon,
            kind,
            limits: Vec::new(),
        }
    }

    /// Restrict the vessel to the given limit pairs.
    pub fn with_limits(mut self, limits: Vec<(f64, f64)>) -> Self {
        self.limits = limits;
        self
    }
}

/// An obstructing structure inside the vessel.
#[derive(Debug, Clone)]
pub struct Structure {
    /// Cross-section of the structure.
    pub polygon: Polygon2D,
    /// Limit pairs; each is one occurrence. Empty = one full occurrence.
    pub limits: Vec<(f64, f64)>,
}

impl Structure {
    /// Create an axisymmetric (or infinitely extruded) structure.
    pub fn new(polygon: Polygon2D) -> Self {
        Self {
            polygon,
            limits: Vec::new(),
        }
    }

    /// Restrict the structure to the given limit pairs.
    pub fn with_limits(mut self, limits: Vec<(f64, f64)>) -> Self {
        self.limits = limits;
        self
    }
}

/// One toroidal/axial instance of a structure.
#[derive(Debug, Clone)]
pub struct Occurrence {
    /// Index of the owning structure.
    pub structure: usize,
    /// Index of this occurrence within its structure's limits.
    pub index: usize,
    /// Extent of the occurrence.
    pub extent: Extent,
    /// Pre-filter bounds.
    pub bounds: OccurrenceBounds,
}

/// Validated vessel and structures, flattened for tracing.
///
/// Structure polygons live in one vertex array and one normal array;
/// `vertex_offsets[i]..vertex_offsets[i + 1]` is structure `i`.
#[derive(Debug, Clone)]
pub struct Scene {
    kind: VesselKind,
    vessel: Polygon2D,
    vessel_extents: Vec<Extent>,
    vessel_rmin: f64,
    vertices: Vec<Point2>,
    normals: Vec<Vec2>,
    vertex_offsets: Vec<usize>,
    occurrences: Vec<Occurrence>,
}

impl Scene {
    /// Validate and flatten a vessel and its structures.
    pub fn new(vessel: &Vessel, structures: &[Structure]) -> Result<Self> {
        let kind = vessel.kind;
        check_polygon_side(kind, &vessel.polygon, "vessel")?;
        let vessel_extents = extents_for(kind, &vessel.limits, "vessel")?;

        let total: usize = structures.iter().map(|s| s.polygon.len()).sum();
        let mut vertices = Vec::with_capacity(total);
        let mut normals = Vec::with_capacity(total);
        let mut vertex_offsets = Vec::with_capacity(structures.len() + 1);
        let mut occurrences = Vec::new();
        vertex_offsets.push(0);

        for (i, structure) in structures.iter().enumerate() {
            let what = format!("structure {i}");
            check_polygon_side(kind, &structure.polygon, &what)?;
            let points = structure.polygon.points();
            for (j, extent) in extents_for(kind, &structure.limits, &what)?
                .into_iter()
                .enumerate()
            {
                occurrences.push(Occurrence {
                    structure: i,
                    index: j,
                    extent,
                    bounds: OccurrenceBounds::new(kind, points, &extent),
                });
            }
            vertices.extend_from_slice(points);
            normals.extend_from_slice(structure.polygon.normals());
            vertex_offsets.push(vertices.len());
        }

        if vertex_offsets.last() != Some(&vertices.len()) || normals.len() != vertices.len() {
            return Err(LosError::geometry(
                "scene",
                "vertex offsets do not match the vertex array",
            ));
        }

        let vessel_rmin = vessel
            .polygon
            .points()
            .iter()
            .map(|p| p.x)
            .fold(f64::INFINITY, f64::min);

        log::debug!(
            "scene: {:?} vessel with {} edges, {} structures, {} occurrences",
            kind,
            vessel.polygon.len(),
            structures.len(),
            occurrences.len()
        );

        Ok(Self {
            kind,
            vessel: vessel.polygon.clone(),
            vessel_extents,
            vessel_rmin,
            vertices,
            normals,
            vertex_offsets,
            occurrences,
        })
    }

    /// Vessel topology.
    pub fn kind(&self) -> VesselKind {
        self.kind
    }

    /// Vessel cross-section.
    pub fn vessel(&self) -> &Polygon2D {
        &self.vessel
    }

    /// Vessel occurrences.
    pub fn vessel_extents(&self) -> &[Extent] {
        &self.vessel_extents
    }

    /// Smallest major radius of the vessel polygon.
    pub fn vessel_rmin(&self) -> f64 {
        self.vessel_rmin
    }

    /// Number of structures.
    pub fn structure_count(&self) -> usize {
        self.vertex_offsets.len() - 1
    }

    /// Number of structure occurrences, summed over all structures.
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }

    /// Structure occurrences, in structure order then limit order.
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Vertices of structure `i`.
    pub fn structure_points(&self, i: usize) -> &[Point2] {
        &self.vertices[self.vertex_offsets[i]..self.vertex_offsets[i + 1]]
    }

    /// Inward normals of structure `i`.
    pub fn structure_normals(&self, i: usize) -> &[Vec2] {
        &self.normals[self.vertex_offsets[i]..self.vertex_offsets[i + 1]]
    }
}

fn extents_for(kind: VesselKind, limits: &[(f64, f64)], what: &str) -> Result<Vec<Extent>> {
    if limits.is_empty() {
        return Ok(vec![Extent::Full]);
    }
    limits
        .iter()
        .map(|&lim| Extent::from_limits(kind, lim, what))
        .collect()
}

fn check_polygon_side(kind: VesselKind, polygon: &Polygon2D, what: &str) -> Result<()> {
    if kind == VesselKind::Toroidal && polygon.points().iter().any(|p| p.x < 0.0) {
        return Err(LosError::geometry(what, "toroidal polygon has negative major radius"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn rect(r0: f64, z0: f64, r1: f64, z1: f64) -> Polygon2D {
        Polygon2D::new(vec![
            Point2::new(r0, z0),
            Point2::new(r1, z0),
            Point2::new(r1, z1),
            Point2::new(r0, z1),
        ])
        .unwrap()
    }

    #[test]
    fn test_span_wraps() {
        let span = AngularSpan::from_limits(3.0 * PI / 4.0, -3.0 * PI / 4.0).unwrap();
        assert!((span.width - PI / 2.0).abs() < 1e-12);
        assert!(span.contains(PI));
        assert!(span.contains(-PI));
        assert!(!span.contains(0.0));
    }

    #[test]
    fn test_full_turn_is_unlimited() {
        assert!(AngularSpan::from_limits(0.0, TAU).is_none());
        assert!(AngularSpan::from_limits(-PI, 3.0 * PI).is_none());
    }

    #[test]
    fn test_limits_several_turns_apart() {
        // -10 is 11 rad below 1, i.e. 2 * TAU - 11 counter-clockwise from it
        let span = AngularSpan::from_limits(1.0, -10.0).unwrap();
        assert!((span.width - (2.0 * TAU - 11.0)).abs() < 1e-12);
        assert!(span.width > 0.0 && span.width < TAU);
        assert!((span.start - 1.0).abs() < 1e-15);
        assert!(span.contains(2.0));
        assert!(!span.contains(0.5));

        let vessel = Vessel::new(rect(0.5, -1.0, 2.0, 1.0), VesselKind::Toroidal);
        let s = Structure::new(rect(0.8, -0.1, 0.9, 0.1)).with_limits(vec![(1.0, -10.0)]);
        let scene = Scene::new(&vessel, &[s]).unwrap();
        match scene.occurrences()[0].extent {
            Extent::Angular(span) => assert!(span.width > 0.0 && span.width < TAU),
            other => panic!("expected an angular extent, got {other:?}"),
        }
    }

    #[test]
    fn test_span_overlap() {
        let span = AngularSpan::from_limits(0.0, 0.5).unwrap();
        assert!(span.overlaps(0.4, 0.5, 0.0));
        assert!(span.overlaps(TAU - 0.1, 0.2, 0.0));
        assert!(!span.overlaps(1.0, 0.5, 0.0));
        assert!(!span.overlaps(TAU - 0.3, 0.2, 0.0));
    }

    #[test]
    fn test_scene_offsets_and_occurrences() {
        let vessel = Vessel::new(rect(0.5, -1.0, 2.0, 1.0), VesselKind::Toroidal);
        let structures = vec![
            Structure::new(rect(0.8, -0.1, 0.9, 0.1)),
            Structure::new(rect(1.5, 0.5, 1.7, 0.7)).with_limits(vec![(0.0, 0.3), (PI, PI + 0.3)]),
        ];
        let scene = Scene::new(&vessel, &structures).unwrap();
        assert_eq!(scene.structure_count(), 2);
        assert_eq!(scene.occurrence_count(), 3);
        assert_eq!(scene.structure_points(1).len(), 4);
        assert_eq!(scene.structure_points(1)[0], Point2::new(1.5, 0.5));
        assert_eq!(scene.occurrences()[2].structure, 1);
        assert_eq!(scene.occurrences()[2].index, 1);
        assert!((scene.vessel_rmin() - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let vessel = Vessel::new(rect(-0.5, -1.0, 2.0, 1.0), VesselKind::Toroidal);
        assert!(matches!(
            Scene::new(&vessel, &[]),
            Err(LosError::InvalidGeometry { .. })
        ));
        let linear = Vessel::new(rect(-0.5, -1.0, 2.0, 1.0), VesselKind::Linear);
        assert!(Scene::new(&linear, &[]).is_ok());
    }

    #[test]
    fn test_bad_limits_rejected() {
        let vessel = Vessel::new(rect(0.0, 0.0, 1.0, 1.0), VesselKind::Linear)
            .with_limits(vec![(2.0, 1.0)]);
        assert!(Scene::new(&vessel, &[]).is_err());

        let vessel = Vessel::new(rect(0.5, -1.0, 2.0, 1.0), VesselKind::Toroidal);
        let s = Structure::new(rect(0.8, -0.1, 0.9, 0.1)).with_limits(vec![(1.0, 1.0)]);
        assert!(Scene::new(&vessel, &[s]).is_err());

        // a whole number of turns backwards is empty, not a full turn
        let s = Structure::new(rect(0.8, -0.1, 0.9, 0.1)).with_limits(vec![(1.0, 1.0 - TAU)]);
        assert!(matches!(
            Scene::new(&vessel, &[s]),
            Err(LosError::InvalidGeometry { .. })
        ));
    }
}
