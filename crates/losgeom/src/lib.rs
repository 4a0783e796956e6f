#![warn(missing_docs)]

//! Line-of-sight intersection with toroidal and linear vacuum vessels.
//!
//! For each line of sight this crate finds where it enters the vessel
//! (`kin`), where it leaves (`kout`), and what it leaves through: the
//! vessel wall or the first internal structure in the way. Vessels and
//! structures are 2D polygons swept about the Z axis (toroidal) or
//! extruded along it (linear), optionally restricted to angular or axial
//! limits. Every near-singular case is settled by named tolerances.
//!
//! # Architecture
//!
//! - [`Ray`] - Line of sight with cached horizontal-plane quantities
//! - [`Polygon2D`] - Validated cross-section with inward edge normals
//! - [`Scene`] - Vessel and flattened structures, built once per batch
//! - [`intersect`] - Cone, cylinder, annulus, wall and cap primitives
//! - [`bounds`] - Conservative per-occurrence pre-filter
//! - [`intersect_los_vessel`] - Validated, parallel batch entry point
//!
//! # Example
//!
//! ```
//! use losgeom::{intersect_los_vessel, LosOptions, Point3, Polygon2D, Vec3, Vessel, VesselKind};
//!
//! # fn main() -> losgeom::Result<()> {
//! let polygon = Polygon2D::from_coords(&[0.7, 1.3, 1.3, 0.7], &[-0.3, -0.3, 0.3, 0.3])?;
//! let vessel = Vessel::new(polygon, VesselKind::Toroidal);
//!
//! let origins = vec![Point3::new(2.0, 0.0, 0.0)];
//! let directions = vec![Vec3::new(-1.0, 0.0, 0.0)];
//! let hits = intersect_los_vessel(&origins, &directions, &vessel, &[], &LosOptions::default())?;
//!
//! // in through the outer wall at R = 1.3, out through the inner one at R = 0.7
//! assert!((hits[0].kin - 0.7).abs() < 1e-12);
//! assert!((hits[0].kout - 1.3).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod bounds;
pub mod config;
pub mod error;
pub mod hit;
pub mod intersect;
pub mod occlusion;
pub mod polygon;
mod ray;
pub mod scene;
pub mod vessel;

pub use batch::intersect_los_vessel;
pub use config::{LosOptions, Tolerances};
pub use error::{LosError, Result};
pub use hit::{Exit, LosArrays, LosHit, SurfaceId, SurfaceRef};
pub use polygon::{Edge, Polygon2D};
pub use ray::Ray;
pub use scene::{AngularSpan, Extent, Occurrence, Scene, Structure, Vessel, VesselKind};

pub use losgeom_math::{Point2, Point3, Vec2, Vec3};
