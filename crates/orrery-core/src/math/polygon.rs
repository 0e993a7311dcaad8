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

//! Convex polygons on the XY plane.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use super::{GeometricEq, Point2, RigidTransform, Transformable, Vec2, EPSILON};

/// A convex polygon stored as its hull vertices in counter-clockwise order.
///
/// Every mutation rebuilds the hull, so the vertex list never holds interior
/// or collinear points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon2 {
    vertices: Vec<Point2>,
}

impl ConvexPolygon2 {
    /// Creates an empty polygon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the convex hull of `points`.
    pub fn from_points(points: &[Point2]) -> Self {
        Self {
            vertices: convex_hull(points.to_vec()),
        }
    }

    /// The hull vertices in counter-clockwise order.
    #[inline]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// The number of hull vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the polygon holds no vertex.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex at `index`, wrapping around.
    #[inline]
    pub fn vertex(&self, index: usize) -> Option<Point2> {
        if self.vertices.is_empty() {
            None
        } else {
            Some(self.vertices[index % self.vertices.len()])
        }
    }

    /// Adds a vertex and rebuilds the hull.
    pub fn add_vertex(&mut self, vertex: Point2) {
        self.add_vertices(std::iter::once(vertex));
    }

    /// Adds several vertices and rebuilds the hull once.
    pub fn add_vertices(&mut self, vertices: impl IntoIterator<Item = Point2>) {
        let mut points = std::mem::take(&mut self.vertices);
        points.extend(vertices);
        self.vertices = convex_hull(points);
    }

    /// Removes every vertex.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// The enclosed area. Zero for fewer than three vertices.
    pub fn area(&self) -> f32 {
        self.edges().map(|(a, b)| a.to_vec().cross(b.to_vec())).sum::<f32>() * 0.5
    }

    /// The area centroid. Degenerate polygons fall back to the vertex average.
    pub fn centroid(&self) -> Option<Point2> {
        if self.vertices.is_empty() {
            return None;
        }
        let area = self.area();
        if area < EPSILON {
            let sum = self
                .vertices
                .iter()
                .fold(Vec2::ZERO, |acc, v| acc + v.to_vec());
            return Some(Point2::from(sum / self.vertices.len() as f32));
        }
        let mut c = Vec2::ZERO;
        for (a, b) in self.edges() {
            let cross = a.to_vec().cross(b.to_vec());
            c += (a.to_vec() + b.to_vec()) * cross;
        }
        Some(Point2::from(c / (6.0 * area)))
    }

    /// The `(min, max)` corners of the bounding rectangle.
    pub fn bounding_box(&self) -> Option<(Point2, Point2)> {
        let (first, rest) = self.vertices.split_first()?;
        Some(rest.iter().fold((*first, *first), |(lo, hi), v| {
            (
                Point2::new(lo.x.min(v.x), lo.y.min(v.y)),
                Point2::new(hi.x.max(v.x), hi.y.max(v.y)),
            )
        }))
    }

    /// Signed distance from `p` to the boundary, negative inside.
    ///
    /// Returns `None` for an empty polygon.
    pub fn signed_distance(&self, p: Point2) -> Option<f32> {
        let closest = self.closest_boundary_point(p)?;
        let distance = p.distance(closest);
        Some(if self.is_point_inside(p, 0.0) {
            -distance
        } else {
            distance
        })
    }

    /// Whether `p` is inside the polygon, or within `epsilon` outside of it.
    pub fn is_point_inside(&self, p: Point2, epsilon: f32) -> bool {
        match self.vertices.len() {
            0 => false,
            1 => p.distance(self.vertices[0]) <= epsilon,
            2 => {
                segment_closest_point(self.vertices[0], self.vertices[1], p).distance(p) <= epsilon
            }
            _ => self.edges().all(|(a, b)| {
                let edge = b - a;
                // Counter-clockwise winding puts the interior on the left of each edge.
                let inward = edge.cross(p - a) / edge.length();
                inward >= -epsilon
            }),
        }
    }

    /// The point of the polygon closest to `p`. A point already inside is returned unchanged.
    pub fn orthogonal_projection(&self, p: Point2) -> Option<Point2> {
        if self.vertices.len() >= 3 && self.is_point_inside(p, 0.0) {
            return Some(p);
        }
        self.closest_boundary_point(p)
    }

    fn closest_boundary_point(&self, p: Point2) -> Option<Point2> {
        match self.vertices.len() {
            0 => None,
            1 => Some(self.vertices[0]),
            _ => self
                .edges()
                .map(|(a, b)| segment_closest_point(a, b, p))
                .min_by(|x, y| x.distance_squared(p).total_cmp(&y.distance_squared(p))),
        }
    }

    /// Iterates over the edges `(v[i], v[i + 1])`, closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

fn segment_closest_point(a: Point2, b: Point2, p: Point2) -> Point2 {
    let d = b - a;
    let length_squared = d.length_squared();
    if length_squared < EPSILON * EPSILON {
        return a;
    }
    let t = ((p - a).dot(d) / length_squared).clamp(0.0, 1.0);
    Point2::lerp(a, b, t)
}

fn convex_hull(points: Vec<Point2>) -> Vec<Point2> {
    convex_hull_indices(&points)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Andrew's monotone chain. Returns the indices of the hull vertices in
/// counter-clockwise order, without duplicate or collinear points.
pub(crate) fn convex_hull_indices(points: &[Point2]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (points[a], points[b]);
        a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
    });
    order.dedup_by(|a, b| points[*a].distance_squared(points[*b]) < EPSILON * EPSILON);
    if order.len() < 3 {
        return order;
    }

    let turn = |o: usize, a: usize, b: usize| (points[a] - points[o]).cross(points[b] - points[o]);
    let mut hull: Vec<usize> = Vec::with_capacity(order.len() * 2);
    for pass in 0..2 {
        let start = hull.len();
        let chain: Box<dyn Iterator<Item = &usize>> = if pass == 0 {
            Box::new(order.iter())
        } else {
            Box::new(order.iter().rev())
        };
        for &i in chain {
            while hull.len() >= start + 2
                && turn(hull[hull.len() - 2], hull[hull.len() - 1], i) <= EPSILON * EPSILON
            {
                hull.pop();
            }
            hull.push(i);
        }
        // The last point of each chain is the first point of the next one.
        hull.pop();
    }
    hull
}

impl AbsDiffEq for ConvexPolygon2 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(other.vertices.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl GeometricEq for ConvexPolygon2 {
    /// The same hull, whichever vertex the list starts with.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        let n = self.vertices.len();
        if n != other.vertices.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        (0..n).any(|shift| {
            (0..n).all(|i| {
                self.vertices[i].geometrically_equals(&other.vertices[(i + shift) % n], epsilon)
            })
        })
    }
}

impl Transformable for ConvexPolygon2 {
    /// Moves every vertex through the XY-plane projection, then rebuilds the hull.
    fn apply_transform(&mut self, transform: &RigidTransform) {
        let mut points = std::mem::take(&mut self.vertices);
        points.iter_mut().for_each(|p| p.apply_transform(transform));
        self.vertices = convex_hull(points);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        let mut points = std::mem::take(&mut self.vertices);
        points
            .iter_mut()
            .for_each(|p| p.apply_inverse_transform(transform));
        self.vertices = convex_hull(points);
    }

    fn supports_transform(&self, transform: &RigidTransform) -> bool {
        transform.is_rotation_2d(EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> ConvexPolygon2 {
        ConvexPolygon2::from_points(&[
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 0.0),
        ])
    }

    #[test]
    fn test_hull_drops_interior_and_collinear_points() {
        let square = unit_square();
        assert_eq!(square.vertex_count(), 4);
        assert!(square.area() > 0.0, "hull must be counter-clockwise");
        assert_relative_eq!(square.area(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_centroid() {
        let c = unit_square().centroid().unwrap();
        assert_relative_eq!(c, Point2::new(0.5, 0.5), epsilon = 1e-6);
        assert!(ConvexPolygon2::new().centroid().is_none());
    }

    #[test]
    fn test_point_inside_and_signed_distance() {
        let square = unit_square();
        assert!(square.is_point_inside(Point2::new(0.25, 0.75), 0.0));
        assert!(!square.is_point_inside(Point2::new(1.5, 0.5), 0.0));
        assert!(square.is_point_inside(Point2::new(1.05, 0.5), 0.1));
        assert_relative_eq!(square.signed_distance(Point2::new(0.5, 0.25)).unwrap(), -0.25, epsilon = 1e-6);
        assert_relative_eq!(square.signed_distance(Point2::new(2.0, 0.5)).unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_orthogonal_projection() {
        let square = unit_square();
        let inside = Point2::new(0.3, 0.3);
        assert_eq!(square.orthogonal_projection(inside), Some(inside));
        assert_relative_eq!(
            square.orthogonal_projection(Point2::new(2.0, 2.0)).unwrap(),
            Point2::new(1.0, 1.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_geometric_equality_ignores_start_vertex() {
        let a = unit_square();
        let mut b = ConvexPolygon2::new();
        b.add_vertices([
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        assert!(a.geometrically_equals(&b, 1e-6));
    }
}
