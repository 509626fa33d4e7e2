//! Incremental QuickHull over 3-D point sets.

use nalgebra::{Point3, Vector3};
use tracing::debug;

/// A triangulated convex hull (or its bounding-box fallback).
#[derive(Debug, Clone)]
pub struct HullMesh {
    /// Deduplicated hull vertices.
    pub vertices: Vec<Point3<f64>>,
    /// Outward-wound triangles indexing into [`vertices`](Self::vertices).
    pub triangles: Vec<[u32; 3]>,
    /// Whether the input collapsed and the mesh is a bounding-box fallback.
    pub degenerate: bool,
}

impl HullMesh {
    /// An empty mesh (no input points).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            degenerate: true,
        }
    }

    /// Vertices as a flat `[x, y, z, x, y, z, …]` array.
    #[must_use]
    pub fn flat_vertices(&self) -> Vec<f64> {
        self.vertices
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Triangle indices as a flat array.
    #[must_use]
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Signed volume by the divergence theorem over the triangle fan:
    /// `Σ v₀·(v₁ × v₂) / 6`. Positive for outward-wound closed meshes.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let a = self.vertices[t[0] as usize].coords;
                let b = self.vertices[t[1] as usize].coords;
                let c = self.vertices[t[2] as usize].coords;
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }
}

struct Face {
    v: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
    outside: Vec<usize>,
    far: f64,
    far_idx: usize,
}

impl Face {
    fn distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        [
            (self.v[0], self.v[1]),
            (self.v[1], self.v[2]),
            (self.v[2], self.v[0]),
        ]
    }

    fn shares_edge(&self, other: &Face) -> bool {
        let shared = self
            .v
            .iter()
            .filter(|a| other.v.contains(a))
            .count();
        shared == 2
    }
}

/// Compute the convex hull of a point set.
///
/// Inputs with fewer than four points, fewer than four distinct axial
/// extrema, or a collapsed (coplanar) seed return the bounding-box
/// fallback with [`HullMesh::degenerate`] set. The iteration cap is
/// `3·N`; outside points closer than `1e-9·scale` to a face are treated
/// as on it.
#[must_use]
pub fn convex_hull(points: &[Point3<f64>]) -> HullMesh {
    if points.is_empty() {
        return HullMesh::empty();
    }
    let (bb_min, bb_max) = bounds(points);
    let scale = (bb_max - bb_min).norm();
    if points.len() < 4 || scale == 0.0 {
        return bounding_box_mesh(bb_min, bb_max);
    }
    let eps = 1e-9 * scale;

    // Seed tetrahedron from the first four distinct axial extrema
    let Some(seed) = seed_tetrahedron(points, scale) else {
        debug!("hull seed degenerate; falling back to bounding box");
        return bounding_box_mesh(bb_min, bb_max);
    };
    let interior = Point3::from(
        (points[seed[0]].coords
            + points[seed[1]].coords
            + points[seed[2]].coords
            + points[seed[3]].coords)
            / 4.0,
    );

    let mut faces: Vec<Face> = Vec::new();
    for &(a, b, c) in &[
        (seed[0], seed[1], seed[2]),
        (seed[0], seed[1], seed[3]),
        (seed[0], seed[2], seed[3]),
        (seed[1], seed[2], seed[3]),
    ] {
        match make_face(points, a, b, c, &interior, eps) {
            Some(face) => faces.push(face),
            None => {
                debug!("hull seed face degenerate; falling back to bounding box");
                return bounding_box_mesh(bb_min, bb_max);
            }
        }
    }

    // Assign every non-seed point to at most one face it lies outside of
    for idx in 0..points.len() {
        if seed.contains(&idx) {
            continue;
        }
        assign_point(&mut faces, points, idx, eps);
    }

    // Farthest-point expansion
    let max_iters = 3 * points.len();
    for _ in 0..max_iters {
        let Some(face_idx) = faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.outside.is_empty())
            .max_by(|a, b| a.1.far.total_cmp(&b.1.far))
            .map(|(i, _)| i)
        else {
            break;
        };
        let apex = faces[face_idx].far_idx;
        let apex_point = points[apex];

        // Visible set: BFS across edge-adjacent faces that see the apex
        let mut visible = vec![face_idx];
        let mut queue = vec![face_idx];
        while let Some(current) = queue.pop() {
            for (i, face) in faces.iter().enumerate() {
                if visible.contains(&i) || !face.shares_edge(&faces[current]) {
                    continue;
                }
                if face.distance(&apex_point) > eps {
                    visible.push(i);
                    queue.push(i);
                }
            }
        }

        // Horizon: undirected edges appearing exactly once across the
        // visible set
        let mut horizon: Vec<(usize, usize)> = Vec::new();
        for &i in &visible {
            for (a, b) in faces[i].edges() {
                let key = (a.min(b), a.max(b));
                if let Some(pos) = horizon.iter().position(|&e| e == key) {
                    horizon.swap_remove(pos);
                } else {
                    horizon.push(key);
                }
            }
        }

        // Orphans: points that were outside a removed face
        let mut orphans: Vec<usize> = Vec::new();
        let mut keep = Vec::with_capacity(faces.len());
        for (i, mut face) in faces.drain(..).enumerate() {
            if visible.contains(&i) {
                orphans.extend(face.outside.drain(..).filter(|&p| p != apex));
            } else {
                keep.push(face);
            }
        }
        faces = keep;

        // New faces joining each horizon edge with the apex
        for &(a, b) in &horizon {
            if let Some(face) = make_face(points, a, b, apex, &interior, eps) {
                faces.push(face);
            }
        }

        for idx in orphans {
            assign_point(&mut faces, points, idx, eps);
        }
    }

    if faces.len() < 4 {
        debug!("hull collapsed during expansion; falling back to bounding box");
        return bounding_box_mesh(bb_min, bb_max);
    }

    compact(points, &faces)
}

/// Find min/max corners of the point cloud.
fn bounds(points: &[Point3<f64>]) -> (Point3<f64>, Point3<f64>) {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    (min, max)
}

/// First four distinct axial extrema, rejected if they span no volume.
fn seed_tetrahedron(points: &[Point3<f64>], scale: f64) -> Option<[usize; 4]> {
    let mut extrema = Vec::with_capacity(6);
    for axis in 0..3 {
        let lo = (0..points.len()).min_by(|&a, &b| points[a][axis].total_cmp(&points[b][axis]));
        let hi = (0..points.len()).max_by(|&a, &b| points[a][axis].total_cmp(&points[b][axis]));
        extrema.extend([lo, hi].into_iter().flatten());
    }

    let mut seed: Vec<usize> = Vec::with_capacity(4);
    for idx in extrema {
        if !seed.contains(&idx) {
            seed.push(idx);
            if seed.len() == 4 {
                break;
            }
        }
    }
    if seed.len() < 4 {
        return None;
    }

    let (a, b, c, d) = (points[seed[0]], points[seed[1]], points[seed[2]], points[seed[3]]);
    let volume = (b - a).cross(&(c - a)).dot(&(d - a)).abs() / 6.0;
    if volume <= 1e-12 * scale.powi(3) {
        return None;
    }
    Some([seed[0], seed[1], seed[2], seed[3]])
}

/// Build a face over three point indices, wound so its normal points away
/// from `interior`.
fn make_face(
    points: &[Point3<f64>],
    a: usize,
    b: usize,
    c: usize,
    interior: &Point3<f64>,
    eps: f64,
) -> Option<Face> {
    let (pa, pb, pc) = (points[a], points[b], points[c]);
    let mut normal = (pb - pa).cross(&(pc - pa));
    if normal.norm() < eps * eps {
        return None;
    }
    normal.normalize_mut();

    let mut v = [a, b, c];
    let mut offset = normal.dot(&pa.coords);
    if normal.dot(&interior.coords) - offset > 0.0 {
        v = [a, c, b];
        normal = -normal;
        offset = normal.dot(&pa.coords);
    }

    Some(Face {
        v,
        normal,
        offset,
        outside: Vec::new(),
        far: 0.0,
        far_idx: 0,
    })
}

/// Attach a point to the first face it lies strictly outside of.
fn assign_point(faces: &mut [Face], points: &[Point3<f64>], idx: usize, eps: f64) {
    for face in faces.iter_mut() {
        let d = face.distance(&points[idx]);
        if d > eps {
            if d > face.far {
                face.far = d;
                face.far_idx = idx;
            }
            face.outside.push(idx);
            return;
        }
    }
}

/// Re-index used vertices into a compact, deduplicated mesh.
fn compact(points: &[Point3<f64>], faces: &[Face]) -> HullMesh {
    let mut remap: Vec<Option<u32>> = vec![None; points.len()];
    let mut vertices = Vec::new();
    let mut triangles = Vec::with_capacity(faces.len());

    for face in faces {
        let mut tri = [0u32; 3];
        for (slot, &idx) in tri.iter_mut().zip(&face.v) {
            *slot = match remap[idx] {
                Some(compacted) => compacted,
                None => {
                    let compacted = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
                    vertices.push(points[idx]);
                    remap[idx] = Some(compacted);
                    compacted
                }
            };
        }
        triangles.push(tri);
    }

    HullMesh {
        vertices,
        triangles,
        degenerate: false,
    }
}

/// The 12-triangle axis-aligned bounding box, outward-wound.
fn bounding_box_mesh(min: Point3<f64>, max: Point3<f64>) -> HullMesh {
    let vertices: Vec<Point3<f64>> = (0..8)
        .map(|i| {
            Point3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        })
        .collect();

    let triangles = vec![
        [0, 2, 1],
        [1, 2, 3], // bottom (z−)
        [4, 5, 6],
        [5, 7, 6], // top (z+)
        [0, 1, 4],
        [1, 5, 4], // front (y−)
        [2, 6, 3],
        [3, 6, 7], // back (y+)
        [0, 4, 2],
        [2, 4, 6], // left (x−)
        [1, 3, 5],
        [3, 7, 5], // right (x+)
    ];

    HullMesh {
        vertices,
        triangles,
        degenerate: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> Vec<Point3<f64>> {
        (0..8)
            .map(|i| {
                Point3::new(
                    f64::from(i & 1),
                    f64::from((i >> 1) & 1),
                    f64::from((i >> 2) & 1),
                )
            })
            .collect()
    }

    /// Every vertex lies on or behind every face plane.
    fn assert_convex(mesh: &HullMesh, eps: f64) {
        for tri in &mesh.triangles {
            let a = mesh.vertices[tri[0] as usize];
            let b = mesh.vertices[tri[1] as usize];
            let c = mesh.vertices[tri[2] as usize];
            let n = (b - a).cross(&(c - a));
            for v in &mesh.vertices {
                assert!(
                    n.dot(&(v - a)) <= eps * n.norm().max(1.0),
                    "vertex {v:?} lies outside face {tri:?}"
                );
            }
        }
    }

    #[test]
    fn cube_corners_give_cube_hull() {
        let hull = convex_hull(&unit_cube());
        assert!(!hull.degenerate);
        assert_eq!(hull.vertices.len(), 8);
        assert_eq!(hull.triangles.len(), 12);
        assert_relative_eq!(hull.volume(), 1.0, epsilon = 1e-9);
        assert_convex(&hull, 1e-9);
    }

    #[test]
    fn interior_points_are_dropped() {
        let mut pts = unit_cube();
        pts.push(Point3::new(0.5, 0.5, 0.5));
        pts.push(Point3::new(0.25, 0.5, 0.75));
        let hull = convex_hull(&pts);
        assert_eq!(hull.vertices.len(), 8);
        assert_relative_eq!(hull.volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn tetrahedron_passes_through() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let hull = convex_hull(&pts);
        assert!(!hull.degenerate);
        assert_eq!(hull.vertices.len(), 4);
        assert_eq!(hull.triangles.len(), 4);
        assert_relative_eq!(hull.volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn skewed_bipyramid_hull() {
        // Two apexes over an off-axis triangle: every extremum is a
        // distinct vertex and the seed spans real volume.
        let pts = vec![
            Point3::new(0.1, 0.2, 0.0),
            Point3::new(2.0, -0.3, 0.1),
            Point3::new(0.7, 1.8, -0.2),
            Point3::new(0.9, 0.6, 1.5),
            Point3::new(0.8, 0.5, -1.4),
        ];
        let hull = convex_hull(&pts);
        assert!(!hull.degenerate);
        assert_eq!(hull.vertices.len(), 5);
        assert_eq!(hull.triangles.len(), 6);
        assert_convex(&hull, 1e-9);
    }

    #[test]
    fn coplanar_axial_extrema_fall_back() {
        // The octahedron's first four axial extrema all sit in the z = 0
        // plane; the seed spans no volume and the box fallback kicks in.
        let pts = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let hull = convex_hull(&pts);
        assert!(hull.degenerate);
        assert_eq!(hull.triangles.len(), 12);
    }

    #[test]
    fn coplanar_points_fall_back_to_bbox() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        let hull = convex_hull(&pts);
        assert!(hull.degenerate);
        assert_eq!(hull.vertices.len(), 8);
        assert_eq!(hull.triangles.len(), 12);
    }

    #[test]
    fn too_few_points_fall_back_to_bbox() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
        ];
        let hull = convex_hull(&pts);
        assert!(hull.degenerate);
        assert_eq!(hull.triangles.len(), 12);
    }

    #[test]
    fn empty_input_is_empty_mesh() {
        let hull = convex_hull(&[]);
        assert!(hull.degenerate);
        assert!(hull.vertices.is_empty());
        assert!(hull.triangles.is_empty());
    }

    #[test]
    fn flat_accessors_agree() {
        let hull = convex_hull(&unit_cube());
        assert_eq!(hull.flat_vertices().len(), hull.vertices.len() * 3);
        assert_eq!(hull.flat_indices().len(), hull.triangles.len() * 3);
    }
}
