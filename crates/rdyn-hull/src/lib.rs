//! 3-D convex hulls for workspace boundary meshes.
//!
//! [`convex_hull`] runs an incremental QuickHull: seed a tetrahedron from
//! axial extrema, then repeatedly lift the farthest outside point, carve
//! out the faces it sees, and re-triangulate across the horizon. Point
//! clouds too flat (or too small) to span a tetrahedron fall back to their
//! axis-aligned bounding box, flagged [`HullMesh::degenerate`].
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use rdyn_hull::convex_hull;
//!
//! let corners: Vec<Point3<f64>> = (0..8)
//!     .map(|i| Point3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
//!     .collect();
//! let hull = convex_hull(&corners);
//!
//! assert_eq!(hull.vertices.len(), 8);
//! assert_eq!(hull.triangles.len(), 12);
//! assert!((hull.volume() - 1.0).abs() < 1e-9);
//! ```

#![doc(html_root_url = "https://docs.rs/rdyn-hull/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod quickhull;

pub use quickhull::{convex_hull, HullMesh};
