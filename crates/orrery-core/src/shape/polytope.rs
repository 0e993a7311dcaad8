// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Convex polytopes with a half-edge mesh.
//!
//! The hull is built by facet enumeration: every plane spanned by three input
//! points that leaves all other points on one side becomes a face. This is
//! quartic in the number of points and meant for the small vertex counts of
//! collision shapes, not for meshing point clouds.

use std::collections::HashMap;

use super::{Box3, PointCollision, Ramp3};
use crate::math::polygon::convex_hull_indices;
use crate::math::{
    Aabb, GeometricEq, Point2, Point3, RigidTransform, Transformable, Vec3, EPSILON,
};

/// A planar face of a [`ConvexPolytope3`].
#[derive(Debug, Clone, PartialEq)]
pub struct Face3 {
    /// Outward unit normal.
    pub normal: Vec3,
    /// Signed offset of the supporting plane: `normal · p = offset` on the face.
    pub offset: f32,
    /// Vertex indices, counter-clockwise when seen from outside.
    pub vertices: Vec<usize>,
    /// Half-edge indices, in the same order as `vertices`.
    pub half_edges: Vec<usize>,
}

impl Face3 {
    /// Signed distance from `p` to the supporting plane, positive outside.
    #[inline]
    pub fn plane_distance(&self, p: Point3) -> f32 {
        self.normal.dot(p.to_vec()) - self.offset
    }
}

/// A directed edge of a face, linked to the opposite edge of the neighbouring face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge3 {
    /// Index of the start vertex.
    pub origin: usize,
    /// Index of the end vertex.
    pub destination: usize,
    /// The half-edge running the other way on the adjacent face.
    pub twin: Option<usize>,
    /// The next half-edge around the same face.
    pub next: usize,
    /// The face this half-edge bounds.
    pub face: usize,
}

/// A convex polytope: vertices, outward-facing faces and twin-linked half-edges.
///
/// A point set that spans fewer than three dimensions yields a polytope with
/// vertices but no faces. Distance queries on such a polytope measure to the
/// nearest vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexPolytope3 {
    vertices: Vec<Point3>,
    faces: Vec<Face3>,
    half_edges: Vec<HalfEdge3>,
}

impl ConvexPolytope3 {
    /// Creates an empty polytope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the convex hull of `points`.
    pub fn from_points(points: &[Point3]) -> Self {
        build_hull(points)
    }

    /// The polytope of a box primitive, expressed in the box's parent coordinates.
    pub fn from_box(shape: &Box3) -> Self {
        Self::from_points(&shape.vertices())
    }

    /// The polytope of a ramp primitive, expressed in the ramp's parent coordinates.
    pub fn from_ramp(shape: &Ramp3) -> Self {
        Self::from_points(&shape.vertices())
    }

    /// Adds a vertex and rebuilds the hull.
    pub fn add_vertex(&mut self, vertex: Point3) {
        self.add_vertices(std::iter::once(vertex));
    }

    /// Adds several vertices and rebuilds the hull once.
    pub fn add_vertices(&mut self, vertices: impl IntoIterator<Item = Point3>) {
        let mut points = std::mem::take(&mut self.vertices);
        points.extend(vertices);
        *self = build_hull(&points);
    }

    /// Removes every vertex, face and half-edge.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.half_edges.clear();
    }

    // --- Accessors ---

    #[inline]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[Face3] {
        &self.faces
    }

    #[inline]
    pub fn half_edges(&self) -> &[HalfEdge3] {
        &self.half_edges
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of edges, each counted once.
    pub fn edge_count(&self) -> usize {
        self.half_edges.len() / 2
    }

    // --- Queries ---

    /// Whether `p` is inside, or within `epsilon` outside of, every face plane.
    pub fn is_point_inside(&self, p: Point3, epsilon: f32) -> bool {
        if self.faces.is_empty() {
            return self
                .vertices
                .iter()
                .any(|v| v.distance(p) <= epsilon);
        }
        self.faces.iter().all(|f| f.plane_distance(p) <= epsilon)
    }

    /// Signed distance from `p` to the surface, negative inside.
    pub fn signed_distance(&self, p: Point3) -> Option<f32> {
        self.evaluate_point_collision(p).map(|c| c.signed_distance)
    }

    /// The point of the polytope closest to `p`. A point inside is returned unchanged.
    pub fn closest_point(&self, p: Point3) -> Option<Point3> {
        if !self.faces.is_empty() && self.is_point_inside(p, 0.0) {
            return Some(p);
        }
        self.evaluate_point_collision(p).map(|c| c.closest)
    }

    /// Full point query: signed distance, closest surface point and outward normal.
    pub fn evaluate_point_collision(&self, p: Point3) -> Option<PointCollision> {
        if self.faces.is_empty() {
            let closest = *self
                .vertices
                .iter()
                .min_by(|a, b| a.distance_squared(p).total_cmp(&b.distance_squared(p)))?;
            let delta = p - closest;
            let normal = if delta.length() > EPSILON { delta.normalize() } else { Vec3::Z };
            return Some(PointCollision {
                signed_distance: delta.length(),
                closest,
                normal,
            });
        }

        // Inside: the nearest face plane also holds the nearest surface point.
        if self.is_point_inside(p, 0.0) {
            let (face, depth) = self
                .faces
                .iter()
                .map(|f| (f, f.plane_distance(p)))
                .max_by(|a, b| a.1.total_cmp(&b.1))?;
            return Some(PointCollision {
                signed_distance: depth,
                closest: p - face.normal * depth,
                normal: face.normal,
            });
        }

        let (closest, distance) = self
            .faces
            .iter()
            .map(|f| {
                let c = self.closest_point_on_face(f, p);
                (c, c.distance(p))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        Some(PointCollision {
            signed_distance: distance,
            closest,
            normal: (p - closest).normalize(),
        })
    }

    fn closest_point_on_face(&self, face: &Face3, p: Point3) -> Point3 {
        let projected = p - face.normal * face.plane_distance(p);
        let n = face.vertices.len();
        let inside = (0..n).all(|i| {
            let a = self.vertices[face.vertices[i]];
            let b = self.vertices[face.vertices[(i + 1) % n]];
            (b - a).cross(projected - a).dot(face.normal) >= 0.0
        });
        if inside {
            return projected;
        }
        (0..n)
            .map(|i| {
                let a = self.vertices[face.vertices[i]];
                let b = self.vertices[face.vertices[(i + 1) % n]];
                crate::math::LineSegment3::new(a, b).orthogonal_projection(p)
            })
            .min_by(|a, b| a.distance_squared(p).total_cmp(&b.distance_squared(p)))
            .unwrap_or(projected)
    }

    /// The vertex furthest along `direction`.
    pub fn support_vertex(&self, direction: Vec3) -> Option<Point3> {
        self.vertices
            .iter()
            .copied()
            .max_by(|a, b| a.to_vec().dot(direction).total_cmp(&b.to_vec().dot(direction)))
    }

    /// The volume enclosed by the faces.
    pub fn volume(&self) -> f32 {
        self.tetrahedra().map(|(v, _)| v).sum()
    }

    /// The volume centroid, or the vertex average for a flat polytope.
    pub fn centroid(&self) -> Option<Point3> {
        if self.vertices.is_empty() {
            return None;
        }
        let volume = self.volume();
        if volume < EPSILON {
            let sum = self
                .vertices
                .iter()
                .fold(Vec3::ZERO, |acc, v| acc + v.to_vec());
            return Some(Point3::from(sum / self.vertices.len() as f32));
        }
        let weighted = self
            .tetrahedra()
            .fold(Vec3::ZERO, |acc, (v, c)| acc + c.to_vec() * v);
        Some(Point3::from(weighted / volume))
    }

    /// Decomposes the polytope into tetrahedra `(volume, centroid)` fanned from the first vertex.
    fn tetrahedra(&self) -> impl Iterator<Item = (f32, Point3)> + '_ {
        let apex = self.vertices.first().copied().unwrap_or(Point3::ORIGIN);
        self.faces.iter().flat_map(move |face| {
            let v = &self.vertices;
            let a = v[face.vertices[0]];
            (1..face.vertices.len().saturating_sub(1)).map(move |i| {
                let b = v[face.vertices[i]];
                let c = v[face.vertices[i + 1]];
                let volume = (a - apex).dot((b - apex).cross(c - apex)) / 6.0;
                let centroid = Point3::from((apex.to_vec() + a.to_vec() + b.to_vec() + c.to_vec()) * 0.25);
                (volume, centroid)
            })
        })
    }

    /// The axis-aligned bounds of the vertices.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }
}

impl GeometricEq for ConvexPolytope3 {
    /// Same vertex set, in any order.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.vertices.len() == other.vertices.len()
            && self.vertices.iter().all(|v| {
                other
                    .vertices
                    .iter()
                    .any(|w| v.geometrically_equals(w, epsilon))
            })
    }
}

impl Transformable for ConvexPolytope3 {
    /// Moves the vertices and rotates the face normals. The topology is unchanged.
    fn apply_transform(&mut self, transform: &RigidTransform) {
        for v in &mut self.vertices {
            v.apply_transform(transform);
        }
        for face in &mut self.faces {
            face.normal = transform.transform_vector(face.normal);
            face.offset = face.normal.dot(self.vertices[face.vertices[0]].to_vec());
        }
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        for v in &mut self.vertices {
            v.apply_inverse_transform(transform);
        }
        for face in &mut self.faces {
            face.normal = transform.inverse_transform_vector(face.normal);
            face.offset = face.normal.dot(self.vertices[face.vertices[0]].to_vec());
        }
    }
}

// --- Hull construction ---

fn build_hull(points: &[Point3]) -> ConvexPolytope3 {
    let mut unique: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if !unique.iter().any(|u| u.distance(*p) < EPSILON) {
            unique.push(*p);
        }
    }

    // Supporting planes, deduplicated.
    let mut planes: Vec<(Vec3, f32)> = Vec::new();
    let n = unique.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let normal = (unique[j] - unique[i]).cross(unique[k] - unique[i]);
                if normal.length() < EPSILON {
                    continue;
                }
                let normal = normal.normalize();
                let offset = normal.dot(unique[i].to_vec());
                let side = |p: &Point3| normal.dot(p.to_vec()) - offset;
                if unique.iter().all(|p| side(p).abs() <= EPSILON) {
                    log::trace!("Polytope of {} points is flat; keeping vertices only", n);
                    return ConvexPolytope3 {
                        vertices: unique,
                        faces: Vec::new(),
                        half_edges: Vec::new(),
                    };
                }
                let outward = if unique.iter().all(|p| side(p) <= EPSILON) {
                    normal
                } else if unique.iter().all(|p| side(p) >= -EPSILON) {
                    -normal
                } else {
                    continue;
                };
                let offset = outward.dot(unique[i].to_vec());
                let known = planes
                    .iter()
                    .any(|(m, d)| m.dot(outward) > 1.0 - EPSILON && (d - offset).abs() < EPSILON);
                if !known {
                    planes.push((outward, offset));
                }
            }
        }
    }

    if planes.is_empty() {
        log::trace!("Polytope of {} points is collinear; keeping vertices only", n);
        return ConvexPolytope3 {
            vertices: unique,
            faces: Vec::new(),
            half_edges: Vec::new(),
        };
    }

    // Face loops, ordered counter-clockwise around the outward normal.
    let mut used: Vec<Option<usize>> = vec![None; n];
    let mut vertices: Vec<Point3> = Vec::new();
    let mut faces: Vec<Face3> = Vec::with_capacity(planes.len());
    for (normal, offset) in planes {
        let on_plane: Vec<usize> = (0..n)
            .filter(|&i| (normal.dot(unique[i].to_vec()) - offset).abs() <= EPSILON)
            .collect();
        let u = normal.any_orthogonal().normalize();
        let w = normal.cross(u);
        let projected: Vec<Point2> = on_plane
            .iter()
            .map(|&i| {
                let v = unique[i].to_vec();
                Point2::new(v.dot(u), v.dot(w))
            })
            .collect();
        let loop_indices: Vec<usize> = convex_hull_indices(&projected)
            .into_iter()
            .map(|local| {
                let global = on_plane[local];
                *used[global].get_or_insert_with(|| {
                    vertices.push(unique[global]);
                    vertices.len() - 1
                })
            })
            .collect();
        if loop_indices.len() < 3 {
            continue;
        }
        faces.push(Face3 {
            normal,
            offset,
            vertices: loop_indices,
            half_edges: Vec::new(),
        });
    }

    let mut half_edges: Vec<HalfEdge3> = Vec::new();
    let mut by_endpoints: HashMap<(usize, usize), usize> = HashMap::new();
    for (face_index, face) in faces.iter_mut().enumerate() {
        let first = half_edges.len();
        let m = face.vertices.len();
        for i in 0..m {
            let origin = face.vertices[i];
            let destination = face.vertices[(i + 1) % m];
            let index = first + i;
            by_endpoints.insert((origin, destination), index);
            half_edges.push(HalfEdge3 {
                origin,
                destination,
                twin: None,
                next: first + (i + 1) % m,
                face: face_index,
            });
            face.half_edges.push(index);
        }
    }
    for edge in &mut half_edges {
        edge.twin = by_endpoints.get(&(edge.destination, edge.origin)).copied();
    }

    ConvexPolytope3 {
        vertices,
        faces,
        half_edges,
    }
}
