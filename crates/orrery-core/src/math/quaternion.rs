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

//! Provides a Quaternion type for representing 3D orientations.

use serde::{Deserialize, Serialize};

use super::{
    impl_approx_eq, trim_angle_minus_pi_to_pi, GeometricEq, Mat3, RigidTransform, Transformable,
    Vec3, EPSILON,
};
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

/// Represents a quaternion for 3D rotations.
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the "vector" part
/// and `w` is the "scalar" part. For representing rotations, it should be a "unit
/// quaternion" where `x² + y² + z² + w² = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion. For creating rotations,
    /// prefer using `from_axis_angle` or other rotation-specific constructors.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion representing a rotation around a given axis by a given angle.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation. It does not need to be normalized.
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let normalized_axis = axis.normalize();
        let (s, c) = (angle_radians * 0.5).sin_cos();
        Self {
            x: normalized_axis.x * s,
            y: normalized_axis.y * s,
            z: normalized_axis.z * s,
            w: c,
        }
    }

    /// Creates a quaternion from a rotation vector (axis scaled by angle).
    pub fn from_rotation_vector(rotation_vector: Vec3) -> Self {
        let angle = rotation_vector.length();
        if angle < EPSILON {
            return Self::IDENTITY;
        }
        Self::from_axis_angle(rotation_vector / angle, angle)
    }

    /// Creates a quaternion from yaw (about z), pitch (about y) and roll (about x),
    /// applied in that order.
    pub fn from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::from_axis_angle(Vec3::Z, yaw)
            * Self::from_axis_angle(Vec3::Y, pitch)
            * Self::from_axis_angle(Vec3::X, roll)
    }

    /// Creates a quaternion from a 3x3 rotation matrix.
    pub fn from_rotation_matrix(m: &Mat3) -> Self {
        let m00 = m.cols[0].x;
        let m10 = m.cols[0].y;
        let m20 = m.cols[0].z;
        let m01 = m.cols[1].x;
        let m11 = m.cols[1].y;
        let m21 = m.cols[1].z;
        let m02 = m.cols[2].x;
        let m12 = m.cols[2].y;
        let m22 = m.cols[2].z;

        // Algorithm from http://www.euclideanspace.com/maths/geometry/rotations/conversions/matrixToQuaternion/index.htm
        let trace = m00 + m11 + m22;
        let mut q = Self::IDENTITY;

        if trace > 0.0 {
            let s = 2.0 * (trace + 1.0).sqrt();
            q.w = 0.25 * s;
            q.x = (m21 - m12) / s;
            q.y = (m02 - m20) / s;
            q.z = (m10 - m01) / s;
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            q.w = (m21 - m12) / s;
            q.x = 0.25 * s;
            q.y = (m01 + m10) / s;
            q.z = (m02 + m20) / s;
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            q.w = (m02 - m20) / s;
            q.x = (m01 + m10) / s;
            q.y = 0.25 * s;
            q.z = (m12 + m21) / s;
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            q.w = (m10 - m01) / s;
            q.x = (m02 + m20) / s;
            q.y = (m12 + m21) / s;
            q.z = 0.25 * s;
        }
        q.normalize()
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a normalized version of the quaternion with a length of 1.
    /// If the quaternion has a near-zero magnitude, it returns the identity quaternion.
    pub fn normalize(&self) -> Self {
        let mag_squared = self.magnitude_squared();
        if mag_squared > EPSILON * EPSILON {
            *self * (1.0 / mag_squared.sqrt())
        } else {
            Self::IDENTITY
        }
    }

    /// Tests whether this quaternion is within `epsilon` of the identity orientation.
    #[inline]
    pub fn is_identity(&self, epsilon: f32) -> bool {
        self.angle() <= epsilon
    }

    /// Computes the conjugate of the quaternion, which negates the vector part.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Computes the inverse of the quaternion.
    /// For a unit quaternion, the inverse is equal to its conjugate.
    #[inline]
    pub fn inverse(&self) -> Self {
        let mag_squared = self.magnitude_squared();
        if mag_squared > EPSILON * EPSILON {
            self.conjugate() * (1.0 / mag_squared)
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// The rotation angle in `[0, PI]` represented by this quaternion.
    pub fn angle(&self) -> f32 {
        let q = self.normalize();
        let vector_part = Vec3::new(q.x, q.y, q.z).length();
        trim_angle_minus_pi_to_pi(2.0 * vector_part.atan2(q.w)).abs()
    }

    /// The angle of the rotation that takes `self` onto `other`, in `[0, PI]`.
    pub fn distance(&self, other: Self) -> f32 {
        (self.conjugate() * other).angle()
    }

    /// Decomposes the rotation into a unit axis and an angle in `[0, PI]`.
    ///
    /// The identity rotation returns the x-axis with a zero angle.
    pub fn to_axis_angle(&self) -> (Vec3, f32) {
        let q = if self.w < 0.0 { -self.normalize() } else { self.normalize() };
        let vector_part = Vec3::new(q.x, q.y, q.z);
        let sin_half = vector_part.length();
        if sin_half < EPSILON {
            return (Vec3::X, 0.0);
        }
        (vector_part / sin_half, 2.0 * sin_half.atan2(q.w))
    }

    /// Rotates a 3D vector by this quaternion.
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s: f32 = self.w;
        2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
    }

    /// Rotates a 3D vector by the inverse of this quaternion.
    #[inline]
    pub fn inverse_rotate_vec3(&self, v: Vec3) -> Vec3 {
        self.conjugate().rotate_vec3(v)
    }

    /// Performs a Spherical Linear Interpolation (Slerp) between two quaternions.
    ///
    /// *   `t` - The interpolation factor, clamped to the `[0.0, 1.0]` range.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut cos_theta = start.dot(end);
        let mut end_adjusted = end;

        // Take the short way around the 4D sphere.
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            end_adjusted = -end;
        }

        if cos_theta > 1.0 - EPSILON {
            ((start * (1.0 - t)) + (end_adjusted * t)).normalize()
        } else {
            let angle = cos_theta.acos();
            let sin_theta_inv = 1.0 / angle.sin();
            let scale_start = ((1.0 - t) * angle).sin() * sin_theta_inv;
            let scale_end = (t * angle).sin() * sin_theta_inv;
            (start * scale_start) + (end_adjusted * scale_end)
        }
    }
}

// --- Operator Overloads ---

impl Default for Quaternion {
    /// Returns the identity quaternion, representing no rotation.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product.
    /// `a * b` applies `b` first, then `a`.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    /// Rotates a `Vec3` by this quaternion.
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.normalize().rotate_vec3(rhs)
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    /// Note: This is not a standard rotation operation.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub<Quaternion> for Quaternion {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components of the quaternion by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar, self.w * scalar)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl_approx_eq!(Quaternion, x, y, z, w);

impl GeometricEq for Quaternion {
    /// `q` and `-q` are the same orientation.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.distance(*other) <= epsilon
    }
}

impl Transformable for Quaternion {
    /// Pre-multiplies the orientation by the transform's rotation. The translation
    /// part has no effect on an orientation.
    fn apply_transform(&mut self, transform: &RigidTransform) {
        *self = (transform.rotation * *self).normalize();
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        *self = (transform.rotation.conjugate() * *self).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FRAC_PI_2, FRAC_PI_4, PI};
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_and_default() {
        assert_eq!(Quaternion::IDENTITY, Quaternion::default());
        assert_relative_eq!(Quaternion::IDENTITY.magnitude(), 1.0, epsilon = EPSILON);
        assert!(Quaternion::IDENTITY.is_identity(EPSILON));
    }

    #[test]
    fn test_from_axis_angle_normalizes_axis() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.0, 5.0, 0.0), FRAC_PI_2);
        let (s, c) = (FRAC_PI_2 * 0.5).sin_cos();
        assert_relative_eq!(q, Quaternion::new(0.0, s, 0.0, c), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_vec3() {
        let q = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        assert_relative_eq!(q * Vec3::X, Vec3::Y, epsilon = EPSILON);
        assert_relative_eq!(q.inverse_rotate_vec3(Vec3::Y), Vec3::X, epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_round_trip() {
        let q = Quaternion::from_axis_angle(Vec3::new(-1.0, 2.5, 0.7), 1.85);
        let m = Mat3::from_quat(q);
        let back = Quaternion::from_rotation_matrix(&m);
        assert!(q.geometrically_equals(&back, 1e-4));
    }

    #[test]
    fn test_distance_ignores_double_cover() {
        let q = Quaternion::from_axis_angle(Vec3::X, 0.3);
        assert!(q.distance(-q) < 1e-4);
        assert_relative_eq!(
            q.distance(Quaternion::from_axis_angle(Vec3::X, 0.8)),
            0.5,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_to_axis_angle() {
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        let (a, angle) = Quaternion::from_axis_angle(axis, 2.0).to_axis_angle();
        assert_relative_eq!(a, axis, epsilon = 1e-4);
        assert_relative_eq!(angle, 2.0, epsilon = 1e-4);
        assert_eq!(Quaternion::IDENTITY.to_axis_angle().1, 0.0);
    }

    #[test]
    fn test_yaw_pitch_roll_order() {
        let q = Quaternion::from_yaw_pitch_roll(FRAC_PI_2, 0.0, 0.0);
        assert_relative_eq!(q * Vec3::X, Vec3::Y, epsilon = EPSILON);
        let q = Quaternion::from_yaw_pitch_roll(0.0, 0.0, FRAC_PI_2);
        assert_relative_eq!(q * Vec3::Y, Vec3::Z, epsilon = EPSILON);
    }

    #[test]
    fn test_slerp_midpoint() {
        let start = Quaternion::IDENTITY;
        let end = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let mid = Quaternion::slerp(start, end, 0.5);
        assert!(mid.geometrically_equals(&Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_4), 1e-4));
    }

    #[test]
    fn test_transform_pre_multiplies() {
        let mut q = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_4);
        let transform = RigidTransform::new(
            Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_4),
            Vec3::new(3.0, 2.0, 1.0),
        );
        q.apply_transform(&transform);
        assert_relative_eq!(q.angle(), FRAC_PI_2, epsilon = 1e-4);
        q.apply_inverse_transform(&transform);
        assert_relative_eq!(q.angle(), FRAC_PI_4, epsilon = 1e-4);
        assert!(Quaternion::from_axis_angle(Vec3::Y, PI).angle() > PI - 1e-4);
    }
}
