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

//! Frameless 3D shapes.
//!
//! Every shape answers the same point query, [`PointCollision`], and can be
//! moved by a [`RigidTransform`]. [`Shape3`] gathers them under one type so
//! the narrow phase and the frame layer can dispatch on the variant.

mod polytope;
mod primitives;

pub use self::polytope::{ConvexPolytope3, Face3, HalfEdge3};
pub use self::primitives::{Box3, Capsule3, Cylinder3, Ellipsoid3, PointShape3, Ramp3, Sphere3};

use crate::math::{Aabb, GeometricEq, Point3, RigidTransform, Transformable, Vec3};

/// The answer to "where is this point with respect to the shape surface?".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCollision {
    /// Distance to the surface, negative when the point is inside.
    pub signed_distance: f32,
    /// The surface point closest to the query.
    pub closest: Point3,
    /// Outward unit surface normal at `closest`.
    pub normal: Vec3,
}

impl PointCollision {
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.signed_distance <= 0.0
    }
}

/// Any of the supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape3 {
    Point(PointShape3),
    Sphere(Sphere3),
    Box(Box3),
    Capsule(Capsule3),
    Cylinder(Cylinder3),
    Ellipsoid(Ellipsoid3),
    Ramp(Ramp3),
    Polytope(ConvexPolytope3),
}

impl Shape3 {
    /// A short lowercase name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape3::Point(_) => "point",
            Shape3::Sphere(_) => "sphere",
            Shape3::Box(_) => "box",
            Shape3::Capsule(_) => "capsule",
            Shape3::Cylinder(_) => "cylinder",
            Shape3::Ellipsoid(_) => "ellipsoid",
            Shape3::Ramp(_) => "ramp",
            Shape3::Polytope(_) => "polytope",
        }
    }

    /// Point query. `None` only for an empty polytope.
    pub fn evaluate_point_collision(&self, p: Point3) -> Option<PointCollision> {
        match self {
            Shape3::Point(s) => Some(s.evaluate_point_collision(p)),
            Shape3::Sphere(s) => Some(s.evaluate_point_collision(p)),
            Shape3::Box(s) => Some(s.evaluate_point_collision(p)),
            Shape3::Capsule(s) => Some(s.evaluate_point_collision(p)),
            Shape3::Cylinder(s) => Some(s.evaluate_point_collision(p)),
            Shape3::Ellipsoid(s) => Some(s.evaluate_point_collision(p)),
            Shape3::Ramp(s) => Some(s.evaluate_point_collision(p)),
            Shape3::Polytope(s) => s.evaluate_point_collision(p),
        }
    }

    pub fn signed_distance(&self, p: Point3) -> Option<f32> {
        self.evaluate_point_collision(p).map(|c| c.signed_distance)
    }

    pub fn is_point_inside(&self, p: Point3) -> bool {
        self.evaluate_point_collision(p)
            .is_some_and(|c| c.is_inside())
    }

    /// The point of the shape furthest along `direction`.
    pub fn support_point(&self, direction: Vec3) -> Option<Point3> {
        match self {
            Shape3::Point(s) => Some(s.support_point(direction)),
            Shape3::Sphere(s) => Some(s.support_point(direction)),
            Shape3::Box(s) => Some(s.support_point(direction)),
            Shape3::Capsule(s) => Some(s.support_point(direction)),
            Shape3::Cylinder(s) => Some(s.support_point(direction)),
            Shape3::Ellipsoid(s) => Some(s.support_point(direction)),
            Shape3::Ramp(s) => Some(s.support_point(direction)),
            Shape3::Polytope(s) => s.support_vertex(direction),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Shape3::Point(s) => s.bounding_box(),
            Shape3::Sphere(s) => s.bounding_box(),
            Shape3::Box(s) => s.bounding_box(),
            Shape3::Capsule(s) => s.bounding_box(),
            Shape3::Cylinder(s) => s.bounding_box(),
            Shape3::Ellipsoid(s) => s.bounding_box(),
            Shape3::Ramp(s) => s.bounding_box(),
            Shape3::Polytope(s) => s.bounding_box().unwrap_or_default(),
        }
    }

    /// Borrows the inner shape as a transformable value.
    fn as_transformable_mut(&mut self) -> &mut dyn Transformable {
        match self {
            Shape3::Point(s) => s,
            Shape3::Sphere(s) => s,
            Shape3::Box(s) => s,
            Shape3::Capsule(s) => s,
            Shape3::Cylinder(s) => s,
            Shape3::Ellipsoid(s) => s,
            Shape3::Ramp(s) => s,
            Shape3::Polytope(s) => s,
        }
    }
}

impl Transformable for Shape3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.as_transformable_mut().apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.as_transformable_mut().apply_inverse_transform(transform);
    }
}

impl GeometricEq for Shape3 {
    /// Shapes of different kinds are never equal.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        match (self, other) {
            (Shape3::Point(a), Shape3::Point(b)) => a.geometrically_equals(b, epsilon),
            (Shape3::Sphere(a), Shape3::Sphere(b)) => a.geometrically_equals(b, epsilon),
            (Shape3::Box(a), Shape3::Box(b)) => a.geometrically_equals(b, epsilon),
            (Shape3::Capsule(a), Shape3::Capsule(b)) => a.geometrically_equals(b, epsilon),
            (Shape3::Cylinder(a), Shape3::Cylinder(b)) => a.geometrically_equals(b, epsilon),
            (Shape3::Ellipsoid(a), Shape3::Ellipsoid(b)) => a.geometrically_equals(b, epsilon),
            (Shape3::Ramp(a), Shape3::Ramp(b)) => a.geometrically_equals(b, epsilon),
            (Shape3::Polytope(a), Shape3::Polytope(b)) => a.geometrically_equals(b, epsilon),
            _ => false,
        }
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(impl From<$ty> for Shape3 {
            fn from(shape: $ty) -> Self {
                Shape3::$variant(shape)
            }
        })+
    };
}

impl_from_shape!(
    Point(PointShape3),
    Sphere(Sphere3),
    Box(Box3),
    Capsule(Capsule3),
    Cylinder(Cylinder3),
    Ellipsoid(Ellipsoid3),
    Ramp(Ramp3),
    Polytope(ConvexPolytope3),
);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dispatch_and_transform() {
        let mut shape = Shape3::from(Sphere3::new(Point3::ORIGIN, 1.0));
        assert_eq!(shape.kind_name(), "sphere");
        shape.apply_transform(&RigidTransform::from_translation(Vec3::new(0.0, 0.0, 5.0)));
        assert_relative_eq!(shape.signed_distance(Point3::ORIGIN).unwrap(), 4.0, epsilon = 1e-6);
        assert!(shape.is_point_inside(Point3::new(0.0, 0.0, 5.5)));
    }

    #[test]
    fn test_different_kinds_are_not_equal() {
        let sphere = Shape3::from(Sphere3::new(Point3::ORIGIN, 1.0));
        let point = Shape3::from(PointShape3::new(Point3::ORIGIN));
        assert!(!sphere.geometrically_equals(&point, 1.0));
    }
}
