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

//! Provides geometric primitives for spatial calculations.
//!
//! This module contains the bounding box, infinite line and line segment types.
//! They are used by the shape primitives and wrapped by the frame layer.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{GeometricEq, Point3, RigidTransform, Transformable, Vec3, EPSILON};

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// An AABB is a rectangular prism aligned with the coordinate axes, defined by its
/// minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Point3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Point3,
}

impl Aabb {
    /// An invalid `Aabb` where `min` components are positive infinity and `max` are negative infinity.
    ///
    /// This is useful as a neutral starting point for merging operations. Merging any
    /// valid `Aabb` with `INVALID` will result in that valid `Aabb`.
    pub const INVALID: Self = Self {
        min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Creates a new `Aabb` from two corner points.
    ///
    /// The corners may be passed in any order.
    #[inline]
    pub fn from_min_max(a: Point3, b: Point3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    ///
    /// The provided `half_extents` will be made non-negative.
    #[inline]
    pub fn from_center_half_extents(center: Point3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates an `Aabb` that tightly encloses a given set of points.
    ///
    /// # Returns
    ///
    /// Returns `Some(Aabb)` if the input slice is not empty, otherwise `None`.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(
            rest.iter()
                .fold(Self::from_min_max(*first, *first), |aabb, p| {
                    aabb.merged_with_point(*p)
                }),
        )
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> Point3 {
        Point3::lerp(self.min, self.max, 0.5)
    }

    /// Calculates the half-extents (half the size on each axis) of the `Aabb`.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Calculates the full size (width, height, depth) of the `Aabb`.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Checks if the `Aabb` is valid (i.e., `min` <= `max` on all axes).
    /// Degenerate boxes where `min == max` are considered valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Checks if a point is contained within or on the boundary of the `Aabb`.
    #[inline]
    pub fn contains_point(&self, point: Point3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Checks if this `Aabb` intersects with another `Aabb`.
    ///
    /// Boxes that only touch at the boundary are considered to be intersecting.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
            && (self.min.z <= other.max.z && self.max.z >= other.min.z)
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and another one.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and an additional point.
    #[inline]
    pub fn merged_with_point(&self, point: Point3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// The eight corners, ordered by the binary pattern (x, y, z) of min/max picks.
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }
}

impl Default for Aabb {
    /// Returns the default `Aabb`, which is `Aabb::INVALID`.
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

impl AbsDiffEq for Aabb {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.min.abs_diff_eq(&other.min, epsilon) && self.max.abs_diff_eq(&other.max, epsilon)
    }
}

impl RelativeEq for Aabb {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.min.relative_eq(&other.min, epsilon, max_relative)
            && self.max.relative_eq(&other.max, epsilon, max_relative)
    }
}

impl GeometricEq for Aabb {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.abs_diff_eq(other, epsilon)
    }
}

impl Transformable for Aabb {
    /// Replaces the box with the axis-aligned box enclosing the transformed one.
    ///
    /// Transforms the center, then projects the half-extents onto the rotated axes.
    /// Rotations make the box grow; the operation is not reversible.
    fn apply_transform(&mut self, transform: &RigidTransform) {
        if !self.is_valid() {
            return;
        }
        let center = transform.transform_point(self.center());
        let half_extents = self.half_extents();
        let rotation = transform.rotation_matrix();
        let new_half_extents = rotation.cols[0].abs() * half_extents.x
            + rotation.cols[1].abs() * half_extents.y
            + rotation.cols[2].abs() * half_extents.z;
        *self = Self::from_center_half_extents(center, new_half_extents);
    }
}

// --- Line3 ---

/// An infinite line through `point` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    /// A point on the line.
    pub point: Point3,
    /// The unit direction of the line.
    pub direction: Vec3,
}

impl Line3 {
    /// Creates a line. The direction is normalized.
    #[inline]
    pub fn new(point: Point3, direction: Vec3) -> Self {
        Self {
            point,
            direction: direction.normalize(),
        }
    }

    /// Creates the line passing through two points, directed from `first` to `second`.
    #[inline]
    pub fn from_two_points(first: Point3, second: Point3) -> Self {
        Self::new(first, second - first)
    }

    /// The point at signed distance `t` from `self.point` along the direction.
    #[inline]
    pub fn point_at(&self, t: f32) -> Point3 {
        self.point + self.direction * t
    }

    /// The orthogonal projection of `p` onto the line.
    #[inline]
    pub fn orthogonal_projection(&self, p: Point3) -> Point3 {
        self.point_at((p - self.point).dot(self.direction))
    }

    /// The distance from `p` to the line.
    #[inline]
    pub fn distance(&self, p: Point3) -> f32 {
        p.distance(self.orthogonal_projection(p))
    }

    /// Whether `p` lies on the line to within `epsilon`.
    #[inline]
    pub fn is_point_on_line(&self, p: Point3, epsilon: f32) -> bool {
        self.distance(p) <= epsilon
    }
}

impl AbsDiffEq for Line3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.point.abs_diff_eq(&other.point, epsilon)
            && self.direction.abs_diff_eq(&other.direction, epsilon)
    }
}

impl GeometricEq for Line3 {
    /// Two lines are the same if they are collinear, whatever their anchor point and sense.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        let aligned = self.direction.cross(other.direction).length() <= epsilon;
        aligned && self.distance(other.point) <= epsilon
    }
}

impl Transformable for Line3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.point = transform.transform_point(self.point);
        self.direction = transform.transform_vector(self.direction);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.point = transform.inverse_transform_point(self.point);
        self.direction = transform.inverse_transform_vector(self.direction);
    }
}

// --- LineSegment3 ---

/// A finite segment between two end points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment3 {
    /// The first end point.
    pub first: Point3,
    /// The second end point.
    pub second: Point3,
}

impl LineSegment3 {
    /// Creates a segment.
    #[inline]
    pub fn new(first: Point3, second: Point3) -> Self {
        Self { first, second }
    }

    /// The vector from `first` to `second`.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.second - self.first
    }

    /// The unit vector from `first` to `second`, or zero for a degenerate segment.
    #[inline]
    pub fn unit_direction(&self) -> Vec3 {
        self.direction().normalize()
    }

    /// The length of the segment.
    #[inline]
    pub fn length(&self) -> f32 {
        self.first.distance(self.second)
    }

    /// The point halfway between both end points.
    #[inline]
    pub fn midpoint(&self) -> Point3 {
        Point3::lerp(self.first, self.second, 0.5)
    }

    /// The point at `percentage` of the way from `first` (0) to `second` (1).
    #[inline]
    pub fn point_between(&self, percentage: f32) -> Point3 {
        Point3::lerp(self.first, self.second, percentage)
    }

    /// Where the projection of `p` falls along the segment, clamped to `[0, 1]`.
    pub fn percentage_along(&self, p: Point3) -> f32 {
        let d = self.direction();
        let length_squared = d.length_squared();
        if length_squared < EPSILON * EPSILON {
            return 0.0;
        }
        ((p - self.first).dot(d) / length_squared).clamp(0.0, 1.0)
    }

    /// The point of the segment closest to `p`.
    #[inline]
    pub fn orthogonal_projection(&self, p: Point3) -> Point3 {
        self.point_between(self.percentage_along(p))
    }

    /// The distance from `p` to the closest point of the segment.
    #[inline]
    pub fn distance(&self, p: Point3) -> f32 {
        p.distance(self.orthogonal_projection(p))
    }

    /// The infinite line supporting this segment.
    #[inline]
    pub fn to_line(&self) -> Line3 {
        Line3::from_two_points(self.first, self.second)
    }
}

impl AbsDiffEq for LineSegment3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.first.abs_diff_eq(&other.first, epsilon)
            && self.second.abs_diff_eq(&other.second, epsilon)
    }
}

impl GeometricEq for LineSegment3 {
    /// End points are compared in either order.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        let same = self.first.geometrically_equals(&other.first, epsilon)
            && self.second.geometrically_equals(&other.second, epsilon);
        let flipped = self.first.geometrically_equals(&other.second, epsilon)
            && self.second.geometrically_equals(&other.first, epsilon);
        same || flipped
    }
}

impl Transformable for LineSegment3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.first = transform.transform_point(self.first);
        self.second = transform.transform_point(self.second);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.first = transform.inverse_transform_point(self.first);
        self.second = transform.inverse_transform_point(self.second);
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quaternion, FRAC_PI_4};
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_from_min_max_swapped() {
        let aabb = Aabb::from_min_max(Point3::new(4.0, 5.0, 6.0), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.min, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Point3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Point3::new(1.0, 5.0, -1.0),
            Point3::new(-2.0, 3.0, 4.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, Point3::new(-2.0, 0.0, -1.0));
        assert_eq!(aabb.max, Point3::new(1.0, 5.0, 4.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_aabb_contains_and_intersects() {
        let a = Aabb::from_min_max(Point3::ORIGIN, Point3::new(2.0, 2.0, 2.0));
        let b = Aabb::from_min_max(Point3::new(2.0, 2.0, 2.0), Point3::new(3.0, 3.0, 3.0));
        let c = Aabb::from_min_max(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        assert!(a.contains_point(Point3::new(1.0, 1.0, 1.0)));
        assert!(a.contains_point(Point3::new(2.0, 0.0, 1.0)));
        assert!(!a.contains_point(Point3::new(2.1, 0.0, 1.0)));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_aabb_merge_with_invalid() {
        let a = Aabb::from_min_max(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(Aabb::INVALID.merge(&a), a);
        assert!(!Aabb::default().is_valid());
    }

    #[test]
    fn test_aabb_rotation_grows_box() {
        let mut aabb = Aabb::from_center_half_extents(Point3::ORIGIN, Vec3::ONE);
        aabb.apply_transform(&RigidTransform::from_rotation(Quaternion::from_axis_angle(
            Vec3::Z,
            FRAC_PI_4,
        )));
        let s = 2.0f32.sqrt();
        assert_relative_eq!(aabb.max, Point3::new(s, s, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_line_projection_and_distance() {
        let line = Line3::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(line.direction, Vec3::X);
        let p = Point3::new(3.0, 4.0, 0.0);
        assert_relative_eq!(line.orthogonal_projection(p), Point3::new(3.0, 1.0, 0.0));
        assert_relative_eq!(line.distance(p), 3.0);
    }

    #[test]
    fn test_line_geometric_equality_ignores_sense() {
        let a = Line3::new(Point3::ORIGIN, Vec3::X);
        let b = Line3::new(Point3::new(5.0, 0.0, 0.0), -Vec3::X);
        assert!(a.geometrically_equals(&b, 1e-6));
        let c = Line3::new(Point3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(!a.geometrically_equals(&c, 1e-6));
    }

    #[test]
    fn test_segment_projection_clamps() {
        let segment = LineSegment3::new(Point3::ORIGIN, Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(segment.midpoint(), Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(
            segment.orthogonal_projection(Point3::new(5.0, 1.0, 0.0)),
            Point3::new(2.0, 0.0, 0.0)
        );
        assert_relative_eq!(segment.distance(Point3::new(-1.0, 0.0, 0.0)), 1.0);
        assert_relative_eq!(segment.distance(Point3::new(1.0, 3.0, 0.0)), 3.0);
    }
}
