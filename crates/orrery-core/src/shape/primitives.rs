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

//! Frameless shape primitives and their point queries.

use serde::{Deserialize, Serialize};

use super::{ConvexPolytope3, PointCollision};
use crate::math::{
    Aabb, GeometricEq, LineSegment3, Point3, RigidTransform, Transformable, Vec3, EPSILON,
};

/// Unit vector from `from` towards `to`, or `fallback` when they coincide.
fn direction_or(from: Point3, to: Point3, fallback: Vec3) -> Vec3 {
    let delta = to - from;
    if delta.length() > EPSILON {
        delta.normalize()
    } else {
        fallback
    }
}

// --- PointShape3 ---

/// A shape reduced to a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointShape3 {
    pub position: Point3,
}

impl PointShape3 {
    pub fn new(position: Point3) -> Self {
        Self { position }
    }

    pub fn evaluate_point_collision(&self, p: Point3) -> PointCollision {
        PointCollision {
            signed_distance: p.distance(self.position),
            closest: self.position,
            normal: direction_or(self.position, p, Vec3::Z),
        }
    }

    pub fn support_point(&self, _direction: Vec3) -> Point3 {
        self.position
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_min_max(self.position, self.position)
    }
}

impl Transformable for PointShape3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.position.apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.position.apply_inverse_transform(transform);
    }
}

impl GeometricEq for PointShape3 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.position.geometrically_equals(&other.position, epsilon)
    }
}

// --- Sphere3 ---

/// A sphere given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere3 {
    pub center: Point3,
    pub radius: f32,
}

impl Sphere3 {
    pub fn new(center: Point3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    /// The query point at the center reports the +z pole.
    pub fn evaluate_point_collision(&self, p: Point3) -> PointCollision {
        let normal = direction_or(self.center, p, Vec3::Z);
        PointCollision {
            signed_distance: p.distance(self.center) - self.radius,
            closest: self.center + normal * self.radius,
            normal,
        }
    }

    pub fn support_point(&self, direction: Vec3) -> Point3 {
        self.center + direction.normalize() * self.radius
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vec3::splat(self.radius))
    }

    pub fn volume(&self) -> f32 {
        4.0 / 3.0 * std::f32::consts::PI * self.radius.powi(3)
    }
}

impl Transformable for Sphere3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.center.apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.center.apply_inverse_transform(transform);
    }
}

impl GeometricEq for Sphere3 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.center.geometrically_equals(&other.center, epsilon)
            && (self.radius - other.radius).abs() <= epsilon
    }
}

// --- Box3 ---

/// An oriented box: a pose locating its center and a full size along each local axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3 {
    pub pose: RigidTransform,
    pub size: Vec3,
}

impl Box3 {
    pub fn new(pose: RigidTransform, size: Vec3) -> Self {
        Self {
            pose,
            size: size.abs(),
        }
    }

    /// An axis-aligned box centered at `center`.
    pub fn from_center_size(center: Point3, size: Vec3) -> Self {
        Self::new(RigidTransform::from_translation(center.to_vec()), size)
    }

    #[inline]
    pub fn half_size(&self) -> Vec3 {
        self.size * 0.5
    }

    /// The eight corners in parent coordinates.
    pub fn vertices(&self) -> [Point3; 8] {
        let h = self.half_size();
        let local = Aabb::from_min_max(Point3::ORIGIN - h, Point3::ORIGIN + h);
        local.corners().map(|c| self.pose.transform_point(c))
    }

    pub fn evaluate_point_collision(&self, p: Point3) -> PointCollision {
        let local = self.pose.inverse_transform_point(p);
        let h = self.half_size();
        let clamped = Point3::new(
            local.x.clamp(-h.x, h.x),
            local.y.clamp(-h.y, h.y),
            local.z.clamp(-h.z, h.z),
        );

        let outside = local.distance(clamped) > 0.0;
        let (closest, normal, signed_distance) = if outside {
            let d = local - clamped;
            (clamped, d.normalize(), d.length())
        } else {
            // Push out through the face with the smallest penetration.
            let depths = [h.x - local.x.abs(), h.y - local.y.abs(), h.z - local.z.abs()];
            let axis = (0..3)
                .min_by(|&a, &b| depths[a].total_cmp(&depths[b]))
                .unwrap_or(2);
            let sign = if local.to_vec().get(axis) < 0.0 { -1.0 } else { 1.0 };
            let mut normal = Vec3::ZERO;
            normal[axis] = sign;
            let mut closest = local;
            match axis {
                0 => closest.x = sign * h.x,
                1 => closest.y = sign * h.y,
                _ => closest.z = sign * h.z,
            }
            (closest, normal, -depths[axis])
        };

        PointCollision {
            signed_distance,
            closest: self.pose.transform_point(closest),
            normal: self.pose.transform_vector(normal),
        }
    }

    pub fn support_point(&self, direction: Vec3) -> Point3 {
        let d = self.pose.inverse_transform_vector(direction);
        let h = self.half_size();
        let pick = |c: f32, e: f32| if c >= 0.0 { e } else { -e };
        self.pose
            .transform_point(Point3::new(pick(d.x, h.x), pick(d.y, h.y), pick(d.z, h.z)))
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::from_center_half_extents(Point3::ORIGIN, self.half_size());
        aabb.apply_transform(&self.pose);
        aabb
    }

    pub fn volume(&self) -> f32 {
        self.size.x * self.size.y * self.size.z
    }
}

impl Transformable for Box3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.pose.apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.pose.apply_inverse_transform(transform);
    }
}

impl GeometricEq for Box3 {
    /// Compares the corner sets, so a box turned a half-turn about an axis still matches.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        let ours = self.vertices();
        let theirs = other.vertices();
        ours.iter()
            .all(|v| theirs.iter().any(|w| v.geometrically_equals(w, epsilon)))
    }
}

// --- Capsule3 ---

/// A capsule: the set of points within `radius` of a segment.
///
/// The segment is centered on `position`, runs along the unit `axis` and has length `length`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule3 {
    pub position: Point3,
    pub axis: Vec3,
    pub length: f32,
    pub radius: f32,
}

impl Capsule3 {
    pub fn new(position: Point3, axis: Vec3, length: f32, radius: f32) -> Self {
        Self {
            position,
            axis: axis.normalize(),
            length: length.abs(),
            radius: radius.abs(),
        }
    }

    /// The end points of the inner segment.
    pub fn segment(&self) -> LineSegment3 {
        let half = self.axis * (0.5 * self.length);
        LineSegment3::new(self.position - half, self.position + half)
    }

    pub fn evaluate_point_collision(&self, p: Point3) -> PointCollision {
        let core = self.segment().orthogonal_projection(p);
        let fallback = self.axis.any_orthogonal().normalize();
        let normal = direction_or(core, p, fallback);
        PointCollision {
            signed_distance: p.distance(core) - self.radius,
            closest: core + normal * self.radius,
            normal,
        }
    }

    pub fn support_point(&self, direction: Vec3) -> Point3 {
        let segment = self.segment();
        let end = if direction.dot(self.axis) >= 0.0 {
            segment.second
        } else {
            segment.first
        };
        end + direction.normalize() * self.radius
    }

    pub fn bounding_box(&self) -> Aabb {
        let segment = self.segment();
        let r = Vec3::splat(self.radius);
        Aabb::from_min_max(segment.first.min(segment.second) - r, segment.first.max(segment.second) + r)
    }
}

impl Transformable for Capsule3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.position.apply_transform(transform);
        self.axis.apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.position.apply_inverse_transform(transform);
        self.axis.apply_inverse_transform(transform);
    }
}

impl GeometricEq for Capsule3 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.segment().geometrically_equals(&other.segment(), epsilon)
            && (self.radius - other.radius).abs() <= epsilon
    }
}

// --- Cylinder3 ---

/// A solid cylinder centered on `position`, running along the unit `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder3 {
    pub position: Point3,
    pub axis: Vec3,
    pub length: f32,
    pub radius: f32,
}

impl Cylinder3 {
    pub fn new(position: Point3, axis: Vec3, length: f32, radius: f32) -> Self {
        Self {
            position,
            axis: axis.normalize(),
            length: length.abs(),
            radius: radius.abs(),
        }
    }

    /// Splits `p - position` into its height along the axis and its radial part.
    fn decompose(&self, p: Point3) -> (f32, Vec3) {
        let offset = p - self.position;
        let height = offset.dot(self.axis);
        (height, offset - self.axis * height)
    }

    pub fn evaluate_point_collision(&self, p: Point3) -> PointCollision {
        let half = 0.5 * self.length;
        let (height, radial) = self.decompose(p);
        let rho = radial.length();
        let radial_dir = if rho > EPSILON {
            radial / rho
        } else {
            self.axis.any_orthogonal().normalize()
        };

        if height.abs() <= half && rho <= self.radius {
            let side_depth = self.radius - rho;
            let cap_depth = half - height.abs();
            let cap_sign = if height < 0.0 { -1.0 } else { 1.0 };
            let (closest, normal, depth) = if cap_depth <= side_depth {
                (
                    self.position + self.axis * (cap_sign * half) + radial,
                    self.axis * cap_sign,
                    cap_depth,
                )
            } else {
                (
                    self.position + self.axis * height + radial_dir * self.radius,
                    radial_dir,
                    side_depth,
                )
            };
            return PointCollision {
                signed_distance: -depth,
                closest,
                normal,
            };
        }

        let closest = self.position
            + self.axis * height.clamp(-half, half)
            + radial_dir * rho.min(self.radius);
        PointCollision {
            signed_distance: p.distance(closest),
            closest,
            normal: direction_or(closest, p, radial_dir),
        }
    }

    pub fn support_point(&self, direction: Vec3) -> Point3 {
        let along = direction.dot(self.axis);
        let cap = if along >= 0.0 { 0.5 } else { -0.5 } * self.length;
        let radial = direction - self.axis * along;
        let radial = if radial.length() > EPSILON {
            radial.normalize() * self.radius
        } else {
            Vec3::ZERO
        };
        self.position + self.axis * cap + radial
    }

    pub fn bounding_box(&self) -> Aabb {
        let half = self.axis * (0.5 * self.length);
        // Extent of a disk of radius r with normal a along world axis i is r * sqrt(1 - a_i²).
        let disk = Vec3::new(
            (1.0 - self.axis.x * self.axis.x).max(0.0).sqrt(),
            (1.0 - self.axis.y * self.axis.y).max(0.0).sqrt(),
            (1.0 - self.axis.z * self.axis.z).max(0.0).sqrt(),
        ) * self.radius;
        let extent = half.abs() + disk;
        Aabb::from_center_half_extents(self.position, extent)
    }
}

impl Transformable for Cylinder3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.position.apply_transform(transform);
        self.axis.apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.position.apply_inverse_transform(transform);
        self.axis.apply_inverse_transform(transform);
    }
}

impl GeometricEq for Cylinder3 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.position.geometrically_equals(&other.position, epsilon)
            && self.axis.cross(other.axis).length() <= epsilon
            && (self.length - other.length).abs() <= epsilon
            && (self.radius - other.radius).abs() <= epsilon
    }
}

// --- Ellipsoid3 ---

/// An ellipsoid with semi-axes `radii` along the local axes of `pose`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid3 {
    pub pose: RigidTransform,
    pub radii: Vec3,
}

impl Ellipsoid3 {
    pub fn new(pose: RigidTransform, radii: Vec3) -> Self {
        Self {
            pose,
            radii: radii.abs(),
        }
    }

    /// Point query by radial projection onto the surface.
    ///
    /// The closest point is where the ray from the center through `p` leaves the
    /// ellipsoid. It is exact for spheres and close for mild eccentricities.
    pub fn evaluate_point_collision(&self, p: Point3) -> PointCollision {
        let local = self.pose.inverse_transform_point(p).to_vec();
        let r = self.radii;
        let scaled = Vec3::new(local.x / r.x, local.y / r.y, local.z / r.z);
        let scaled_length = scaled.length();

        let surface = if scaled_length > EPSILON {
            local / scaled_length
        } else {
            Vec3::new(0.0, 0.0, r.z)
        };
        let gradient = Vec3::new(
            surface.x / (r.x * r.x),
            surface.y / (r.y * r.y),
            surface.z / (r.z * r.z),
        )
        .normalize();
        let distance = local.distance(surface);
        let signed_distance = if scaled_length < 1.0 { -distance } else { distance };

        PointCollision {
            signed_distance,
            closest: self.pose.transform_point(Point3::from(surface)),
            normal: self.pose.transform_vector(gradient),
        }
    }

    pub fn support_point(&self, direction: Vec3) -> Point3 {
        let d = self.pose.inverse_transform_vector(direction);
        let r = self.radii;
        let rd = Vec3::new(r.x * d.x, r.y * d.y, r.z * d.z);
        let length = rd.length();
        let local = if length > EPSILON {
            Vec3::new(r.x * rd.x, r.y * rd.y, r.z * rd.z) / length
        } else {
            Vec3::ZERO
        };
        self.pose.transform_point(Point3::from(local))
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::from_center_half_extents(Point3::ORIGIN, self.radii);
        aabb.apply_transform(&self.pose);
        aabb
    }
}

impl Transformable for Ellipsoid3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.pose.apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.pose.apply_inverse_transform(transform);
    }
}

impl GeometricEq for Ellipsoid3 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.pose.geometrically_equals(&other.pose, epsilon)
            && self.radii.geometrically_equals(&other.radii, epsilon)
    }
}

// --- Ramp3 ---

/// A wedge. In its local frame the base spans `x ∈ [0, size.x]`,
/// `y ∈ [-size.y / 2, size.y / 2]` at `z = 0`, and the slope rises along +x
/// up to the vertical back face of height `size.z` at `x = size.x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp3 {
    pub pose: RigidTransform,
    pub size: Vec3,
}

impl Ramp3 {
    pub fn new(pose: RigidTransform, size: Vec3) -> Self {
        Self {
            pose,
            size: size.abs(),
        }
    }

    /// The six corners in parent coordinates.
    pub fn vertices(&self) -> [Point3; 6] {
        let Vec3 { x, y, z } = self.size;
        let hy = 0.5 * y;
        [
            Point3::new(0.0, -hy, 0.0),
            Point3::new(0.0, hy, 0.0),
            Point3::new(x, -hy, 0.0),
            Point3::new(x, hy, 0.0),
            Point3::new(x, -hy, z),
            Point3::new(x, hy, z),
        ]
        .map(|c| self.pose.transform_point(c))
    }

    /// The angle of the slope with respect to the base.
    pub fn incline(&self) -> f32 {
        self.size.z.atan2(self.size.x)
    }

    /// Evaluated through the ramp's polytope.
    pub fn evaluate_point_collision(&self, p: Point3) -> PointCollision {
        ConvexPolytope3::from_ramp(self)
            .evaluate_point_collision(p)
            .unwrap_or(PointCollision {
                signed_distance: p.distance(self.pose.transform_point(Point3::ORIGIN)),
                closest: self.pose.transform_point(Point3::ORIGIN),
                normal: Vec3::Z,
            })
    }

    pub fn support_point(&self, direction: Vec3) -> Point3 {
        let corners = self.vertices();
        corners
            .iter()
            .copied()
            .max_by(|a, b| a.to_vec().dot(direction).total_cmp(&b.to_vec().dot(direction)))
            .unwrap_or(corners[0])
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices()).unwrap_or_default()
    }

    pub fn volume(&self) -> f32 {
        0.5 * self.size.x * self.size.y * self.size.z
    }
}

impl Transformable for Ramp3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        self.pose.apply_transform(transform);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.pose.apply_inverse_transform(transform);
    }
}

impl GeometricEq for Ramp3 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.pose.geometrically_equals(&other.pose, epsilon)
            && self.size.geometrically_equals(&other.size, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quaternion, FRAC_PI_2};
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_point_collision() {
        let sphere = Sphere3::new(Point3::new(1.0, 0.0, 0.0), 0.5);
        let c = sphere.evaluate_point_collision(Point3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(c.signed_distance, 1.5);
        assert_relative_eq!(c.closest, Point3::new(1.5, 0.0, 0.0));
        assert_relative_eq!(c.normal, Vec3::X);
        assert!(!c.is_inside());
    }

    #[test]
    fn test_box_inside_pushes_through_nearest_face() {
        let b = Box3::from_center_size(Point3::ORIGIN, Vec3::new(2.0, 4.0, 6.0));
        let c = b.evaluate_point_collision(Point3::new(0.8, 0.0, 0.0));
        assert_relative_eq!(c.signed_distance, -0.2, epsilon = 1e-6);
        assert_relative_eq!(c.closest, Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(c.normal, Vec3::X);
    }

    #[test]
    fn test_rotated_box_outside() {
        let pose = RigidTransform::new(
            Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let b = Box3::new(pose, Vec3::new(4.0, 2.0, 2.0));
        // The long local x axis now lies along world y.
        let c = b.evaluate_point_collision(Point3::new(0.0, 3.0, 1.0));
        assert_relative_eq!(c.signed_distance, 1.0, epsilon = 1e-5);
        assert_relative_eq!(c.normal, Vec3::Y, epsilon = 1e-5);
        assert_relative_eq!(
            b.support_point(Vec3::new(1.0, 1.0, 1.0)),
            Point3::new(1.0, 2.0, 2.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_capsule_point_collision() {
        let capsule = Capsule3::new(Point3::ORIGIN, Vec3::Z, 2.0, 0.5);
        let side = capsule.evaluate_point_collision(Point3::new(2.0, 0.0, 0.5));
        assert_relative_eq!(side.signed_distance, 1.5, epsilon = 1e-6);
        let cap = capsule.evaluate_point_collision(Point3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(cap.signed_distance, 1.5, epsilon = 1e-6);
        assert_relative_eq!(cap.closest, Point3::new(0.0, 0.0, 1.5), epsilon = 1e-6);
    }

    #[test]
    fn test_cylinder_point_collision() {
        let cylinder = Cylinder3::new(Point3::ORIGIN, Vec3::Z, 2.0, 1.0);
        let inside = cylinder.evaluate_point_collision(Point3::new(0.0, 0.0, 0.9));
        assert_relative_eq!(inside.signed_distance, -0.1, epsilon = 1e-6);
        assert_relative_eq!(inside.normal, Vec3::Z);
        let corner = cylinder.evaluate_point_collision(Point3::new(2.0, 0.0, 2.0));
        assert_relative_eq!(corner.closest, Point3::new(1.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(corner.signed_distance, 2.0f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_ellipsoid_reduces_to_sphere() {
        let e = Ellipsoid3::new(RigidTransform::IDENTITY, Vec3::splat(2.0));
        let c = e.evaluate_point_collision(Point3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(c.signed_distance, 1.0, epsilon = 1e-6);
        assert_relative_eq!(c.normal, Vec3::Y, epsilon = 1e-6);
        assert_relative_eq!(e.support_point(Vec3::X), Point3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_ramp_slope() {
        let ramp = Ramp3::new(RigidTransform::IDENTITY, Vec3::new(2.0, 1.0, 2.0));
        assert_relative_eq!(ramp.incline(), std::f32::consts::FRAC_PI_4);
        // Above the middle of the slope, along its normal.
        let n = Vec3::new(-1.0, 0.0, 1.0).normalize();
        let on_slope = Point3::new(1.0, 0.0, 1.0);
        let c = ramp.evaluate_point_collision(on_slope + n * 0.5);
        assert_relative_eq!(c.signed_distance, 0.5, epsilon = 1e-5);
        assert_relative_eq!(c.closest, on_slope, epsilon = 1e-5);
        assert_relative_eq!(ramp.volume(), 2.0);
    }
}
