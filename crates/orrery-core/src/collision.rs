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

use crate::math::{LineSegment3, Point3, Vec3, EPSILON};
use crate::shape::{PointCollision, Shape3};

/// Result of a shape-versus-shape query.
///
/// The query also reports separated shapes: `signed_distance` is then the gap
/// between them and the points are the closest pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub colliding: bool,
    /// Separation distance, negative when the shapes overlap.
    pub signed_distance: f32,
    /// The point of A closest to (or deepest into) B.
    pub point_on_a: Point3,
    /// The point of B closest to (or deepest into) A.
    pub point_on_b: Point3,
    /// Outward surface normal of A at `point_on_a`.
    pub normal_on_a: Vec3,
    /// Outward surface normal of B at `point_on_b`.
    pub normal_on_b: Vec3,
}

impl CollisionResult {
    /// Swaps the roles of A and B.
    pub fn swapped(self) -> Self {
        Self {
            colliding: self.colliding,
            signed_distance: self.signed_distance,
            point_on_a: self.point_on_b,
            point_on_b: self.point_on_a,
            normal_on_a: self.normal_on_b,
            normal_on_b: self.normal_on_a,
        }
    }

    /// A result for shape A reduced to a ball of `radius` around `center`,
    /// given the point query of `center` against B.
    fn from_ball(center: Point3, radius: f32, query: PointCollision) -> Self {
        let signed_distance = query.signed_distance - radius;
        Self {
            colliding: signed_distance <= 0.0,
            signed_distance,
            point_on_a: center - query.normal * radius,
            point_on_b: query.closest,
            normal_on_a: -query.normal,
            normal_on_b: query.normal,
        }
    }
}

/// Narrow-phase collision evaluation between two frameless shapes.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Creates a new `NarrowPhase` instance.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates the collision between two shapes expressed in the same coordinates.
    ///
    /// Returns `None` for pairs without a formula: only point and sphere against
    /// any shape, and capsule against capsule, are handled.
    pub fn evaluate(&self, shape_a: &Shape3, shape_b: &Shape3) -> Option<CollisionResult> {
        match (shape_a, shape_b) {
            (Shape3::Point(a), b) => {
                let query = b.evaluate_point_collision(a.position)?;
                Some(CollisionResult::from_ball(a.position, 0.0, query))
            }
            (Shape3::Sphere(a), b) => {
                let query = b.evaluate_point_collision(a.center)?;
                Some(CollisionResult::from_ball(a.center, a.radius, query))
            }
            // Mirror for shapes on the right-hand side.
            (_, Shape3::Point(_)) | (_, Shape3::Sphere(_)) => self
                .evaluate(shape_b, shape_a)
                .map(CollisionResult::swapped),
            (Shape3::Capsule(a), Shape3::Capsule(b)) => {
                let (on_a, on_b) = closest_points_between_segments(&a.segment(), &b.segment());
                let delta = on_a - on_b;
                let distance = delta.length();
                let normal_on_b = if distance > EPSILON {
                    delta / distance
                } else {
                    a.axis.cross(b.axis).normalize()
                };
                let normal_on_b = if normal_on_b.length() > EPSILON {
                    normal_on_b
                } else {
                    a.axis.any_orthogonal().normalize()
                };
                let signed_distance = distance - a.radius - b.radius;
                Some(CollisionResult {
                    colliding: signed_distance <= 0.0,
                    signed_distance,
                    point_on_a: on_a - normal_on_b * a.radius,
                    point_on_b: on_b + normal_on_b * b.radius,
                    normal_on_a: -normal_on_b,
                    normal_on_b,
                })
            }
            _ => None,
        }
    }
}

impl Default for NarrowPhase {
    fn default() -> Self {
        Self::new()
    }
}

/// The closest pair of points between two segments.
pub fn closest_points_between_segments(s1: &LineSegment3, s2: &LineSegment3) -> (Point3, Point3) {
    let d1 = s1.direction();
    let d2 = s2.direction();
    let r = s1.first - s2.first;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (s1.point_between(s), s2.point_between(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::RigidTransform;
    use crate::shape::{Box3, Capsule3, PointShape3, Sphere3};
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_sphere_collision() {
        let narrow = NarrowPhase::new();
        let a = Shape3::from(Sphere3::new(Point3::ORIGIN, 1.0));
        let b = Shape3::from(Sphere3::new(Point3::new(1.5, 0.0, 0.0), 1.0));

        let result = narrow.evaluate(&a, &b).unwrap();
        assert!(result.colliding);
        assert_relative_eq!(result.signed_distance, -0.5, epsilon = 1e-6);
        assert_relative_eq!(result.normal_on_a, Vec3::X, epsilon = 1e-6);
        assert_relative_eq!(result.point_on_a, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(result.point_on_b, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_box_sphere_is_mirrored() {
        let narrow = NarrowPhase::new();
        let b = Shape3::from(Box3::new(RigidTransform::IDENTITY, Vec3::splat(2.0)));
        let s = Shape3::from(Sphere3::new(Point3::new(0.0, 0.0, 1.5), 1.0));

        let result = narrow.evaluate(&b, &s).unwrap();
        assert!(result.colliding);
        assert_relative_eq!(result.point_on_a, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(result.normal_on_a, Vec3::Z, epsilon = 1e-6);
        assert_relative_eq!(result.point_on_b, Point3::new(0.0, 0.0, 0.5), epsilon = 1e-6);
    }

    #[test]
    fn test_point_outside_reports_gap() {
        let narrow = NarrowPhase::new();
        let p = Shape3::from(PointShape3::new(Point3::new(0.0, 3.0, 0.0)));
        let s = Shape3::from(Sphere3::new(Point3::ORIGIN, 1.0));
        let result = narrow.evaluate(&p, &s).unwrap();
        assert!(!result.colliding);
        assert_relative_eq!(result.signed_distance, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_capsule_capsule_crossing() {
        let narrow = NarrowPhase::new();
        let a = Shape3::from(Capsule3::new(Point3::ORIGIN, Vec3::X, 4.0, 0.5));
        let b = Shape3::from(Capsule3::new(Point3::new(0.0, 0.0, 0.8), Vec3::Y, 4.0, 0.5));
        let result = narrow.evaluate(&a, &b).unwrap();
        assert!(result.colliding);
        assert_relative_eq!(result.signed_distance, -0.2, epsilon = 1e-5);
        assert_relative_eq!(result.normal_on_a, Vec3::Z, epsilon = 1e-5);
    }

    #[test]
    fn test_unsupported_pair() {
        let narrow = NarrowPhase::new();
        let a = Shape3::from(Box3::new(RigidTransform::IDENTITY, Vec3::ONE));
        let b = Shape3::from(Capsule3::new(Point3::ORIGIN, Vec3::Z, 1.0, 0.1));
        assert!(narrow.evaluate(&a, &b).is_none());
    }

    #[test]
    fn test_parallel_segments() {
        let s1 = LineSegment3::new(Point3::ORIGIN, Point3::new(2.0, 0.0, 0.0));
        let s2 = LineSegment3::new(Point3::new(1.0, 1.0, 0.0), Point3::new(3.0, 1.0, 0.0));
        let (p, q) = closest_points_between_segments(&s1, &s2);
        assert_relative_eq!(p.distance(q), 1.0, epsilon = 1e-6);
    }
}
