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

//! Rigid-body transformations (rotation followed by translation).

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{GeometricEq, Mat3, Mat4, Point3, Quaternion, Transformable, Vec3, EPSILON};
use std::ops::{Mul, MulAssign};

/// A proper rigid-body transform: a rotation followed by a translation.
///
/// Applied to a point `p`, the result is `rotation * p + translation`. There is
/// no scale or shear, so the inverse always exists and is cheap to compute.
///
/// Composition follows the matrix convention: `a * b` applies `b` first, then `a`.
/// A frame's transform to its root is therefore
/// `parent.transform_to_root * transform_to_parent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// The rotational part. Kept as a unit quaternion.
    pub rotation: Quaternion,
    /// The translational part, applied after the rotation.
    pub translation: Vec3,
}

impl RigidTransform {
    /// The identity transform, which results in no change.
    pub const IDENTITY: Self = Self {
        rotation: Quaternion::IDENTITY,
        translation: Vec3::ZERO,
    };

    // --- CONSTRUCTORS ---

    /// Creates a transform from a rotation and a translation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use orrery_core::math::{Point3, Quaternion, RigidTransform, Vec3};
    ///
    /// let t = RigidTransform::new(Quaternion::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
    /// assert_eq!(t.transform_point(Point3::ORIGIN), Point3::new(1.0, 2.0, 3.0));
    /// ```
    #[inline]
    pub fn new(rotation: Quaternion, translation: Vec3) -> Self {
        Self {
            rotation: rotation.normalize(),
            translation,
        }
    }

    /// Creates a pure translation.
    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quaternion::IDENTITY,
            translation,
        }
    }

    /// Creates a pure rotation.
    #[inline]
    pub fn from_rotation(rotation: Quaternion) -> Self {
        Self::new(rotation, Vec3::ZERO)
    }

    /// Creates a transform from a rotation matrix and a translation.
    #[inline]
    pub fn from_rotation_matrix(rotation: &Mat3, translation: Vec3) -> Self {
        Self::new(Quaternion::from_rotation_matrix(rotation), translation)
    }

    // --- GETTERS ---

    /// The rotational part as a 3x3 matrix.
    #[inline]
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_quat(self.rotation)
    }

    /// The equivalent homogeneous 4x4 matrix.
    #[inline]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(&self.rotation_matrix(), self.translation)
    }

    /// Whether the rotational part differs from identity by more than `epsilon`.
    #[inline]
    pub fn has_rotation(&self, epsilon: f32) -> bool {
        !self.rotation.is_identity(epsilon)
    }

    /// Whether the translational part is longer than `epsilon`.
    #[inline]
    pub fn has_translation(&self, epsilon: f32) -> bool {
        self.translation.length() > epsilon
    }

    /// Whether the rotation only turns about the z axis, leaving the XY plane in place.
    #[inline]
    pub fn is_rotation_2d(&self, epsilon: f32) -> bool {
        self.rotation.x.abs() <= epsilon && self.rotation.y.abs() <= epsilon
    }

    /// Whether this transform is the identity to within `epsilon`.
    #[inline]
    pub fn is_identity(&self, epsilon: f32) -> bool {
        !self.has_rotation(epsilon) && !self.has_translation(epsilon)
    }

    // --- OPERATIONS ---

    /// Computes the inverse transform.
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.conjugate();
        Self {
            rotation: inv_rotation,
            translation: -inv_rotation.rotate_vec3(self.translation),
        }
    }

    /// Re-normalizes the rotation to counter drift from repeated composition.
    #[inline]
    pub fn normalize_rotation(&mut self) {
        self.rotation = self.rotation.normalize();
    }

    /// Transforms a point: rotation, then translation.
    #[inline]
    pub fn transform_point(&self, p: Point3) -> Point3 {
        Point3::from(self.rotation.rotate_vec3(p.to_vec()) + self.translation)
    }

    /// Transforms a direction: rotation only.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation.rotate_vec3(v)
    }

    /// Applies the inverse transform to a point without materialising the inverse.
    #[inline]
    pub fn inverse_transform_point(&self, p: Point3) -> Point3 {
        Point3::from(self.rotation.inverse_rotate_vec3(p.to_vec() - self.translation))
    }

    /// Applies the inverse rotation to a direction.
    #[inline]
    pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation.inverse_rotate_vec3(v)
    }

    /// Transforms an orientation expressed in the source space.
    #[inline]
    pub fn transform_rotation(&self, q: Quaternion) -> Quaternion {
        (self.rotation * q).normalize()
    }

    /// Interpolates translation linearly and rotation spherically.
    pub fn interpolate(start: &Self, end: &Self, t: f32) -> Self {
        Self {
            rotation: Quaternion::slerp(start.rotation, end.rotation, t),
            translation: Vec3::lerp(start.translation, end.translation, t.clamp(0.0, 1.0)),
        }
    }
}

impl Default for RigidTransform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

// --- Operator Overloads ---

impl Mul<RigidTransform> for RigidTransform {
    type Output = RigidTransform;

    /// Composes two transforms. `self * rhs` applies `rhs` first.
    #[inline]
    fn mul(self, rhs: RigidTransform) -> Self::Output {
        Self {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation.rotate_vec3(rhs.translation) + self.translation,
        }
    }
}

impl MulAssign<RigidTransform> for RigidTransform {
    #[inline]
    fn mul_assign(&mut self, rhs: RigidTransform) {
        *self = *self * rhs;
    }
}

impl Mul<Point3> for RigidTransform {
    type Output = Point3;
    #[inline]
    fn mul(self, rhs: Point3) -> Point3 {
        self.transform_point(rhs)
    }
}

impl AbsDiffEq for RigidTransform {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rotation.abs_diff_eq(&other.rotation, epsilon)
            && self.translation.abs_diff_eq(&other.translation, epsilon)
    }
}

impl RelativeEq for RigidTransform {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.rotation.relative_eq(&other.rotation, epsilon, max_relative)
            && self
                .translation
                .relative_eq(&other.translation, epsilon, max_relative)
    }
}

impl GeometricEq for RigidTransform {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.rotation.geometrically_equals(&other.rotation, epsilon)
            && self.translation.geometrically_equals(&other.translation, epsilon)
    }
}

impl Transformable for RigidTransform {
    /// Treats `self` as a pose and moves it: `transform * self`.
    fn apply_transform(&mut self, transform: &RigidTransform) {
        *self = *transform * *self;
        self.normalize_rotation();
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        *self = transform.inverse() * *self;
        self.normalize_rotation();
    }
}
