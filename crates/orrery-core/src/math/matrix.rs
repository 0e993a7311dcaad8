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

//! Defines the `Mat3` and `Mat4` types and associated operations.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{GeometricEq, Point3, Quaternion, RigidTransform, Transformable, Vec3, Vec4, EPSILON};
use std::ops::{Index, IndexMut, Mul};

// --- Mat3 ---

/// A 3x3 column-major matrix.
///
/// Used both as a general linear map and as a rotation matrix. When it is a
/// rotation, changing its frame conjugates it by the frame rotation
/// (`R * M * Rᵀ`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat3 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// A 3x3 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec3::ZERO; 3],
    };

    /// Creates a new matrix from three column vectors.
    #[inline]
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Returns a row of the matrix as a `Vec3`.
    #[inline]
    pub fn row(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
        )
    }

    /// Creates a 3D scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec3::new(scale.x, 0.0, 0.0),
            Vec3::new(0.0, scale.y, 0.0),
            Vec3::new(0.0, 0.0, scale.z),
        )
    }

    /// Creates a matrix for a rotation around the X-axis.
    #[inline]
    pub fn from_rotation_x(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, c, s),
            Vec3::new(0.0, -s, c),
        )
    }

    /// Creates a matrix for a right-handed rotation around the Y-axis.
    #[inline]
    pub fn from_rotation_y(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_cols(
            Vec3::new(c, 0.0, -s),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(s, 0.0, c),
        )
    }

    /// Creates a matrix for a rotation around the Z-axis.
    #[inline]
    pub fn from_rotation_z(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_cols(
            Vec3::new(c, s, 0.0),
            Vec3::new(-s, c, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Creates a rotation matrix from an axis and an angle.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation. It is normalized internally.
    /// * `angle_radians`: The angle of rotation in radians.
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let axis = axis.normalize();
        let (s, c) = angle_radians.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        Self::from_cols(
            Vec3::new(t * x * x + c, t * x * y + s * z, t * x * z - s * y),
            Vec3::new(t * y * x - s * z, t * y * y + c, t * y * z + s * x),
            Vec3::new(t * z * x + s * y, t * z * y - s * x, t * z * z + c),
        )
    }

    /// Creates a rotation matrix from a quaternion.
    /// The quaternion is normalized before conversion to ensure a valid rotation matrix.
    pub fn from_quat(q: Quaternion) -> Self {
        let q = q.normalize();
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let x2 = x + x;
        let y2 = y + y;
        let z2 = z + z;
        let xx = x * x2;
        let xy = x * y2;
        let xz = x * z2;
        let yy = y * y2;
        let yz = y * z2;
        let zz = z * z2;
        let wx = w * x2;
        let wy = w * y2;
        let wz = w * z2;

        Self::from_cols(
            Vec3::new(1.0 - (yy + zz), xy + wz, xz - wy),
            Vec3::new(xy - wz, 1.0 - (xx + zz), yz + wx),
            Vec3::new(xz + wy, yz - wx, 1.0 - (xx + yy)),
        )
    }

    /// Computes the determinant of the matrix.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let [c0, c1, c2] = self.cols;
        c0.dot(c1.cross(c2))
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2))
    }

    /// Computes the inverse of the matrix.
    ///
    /// If the matrix is not invertible (i.e., its determinant is close to zero),
    /// this method returns `None`.
    pub fn inverse(&self) -> Option<Self> {
        let [c0, c1, c2] = self.cols;
        let r0 = c1.cross(c2);
        let r1 = c2.cross(c0);
        let r2 = c0.cross(c1);
        let det = c0.dot(r0);
        if det.abs() < EPSILON {
            return None;
        }
        Some(Self::from_cols(r0, r1, r2).transpose() * (1.0 / det))
    }

    /// Tests whether this matrix is orthonormal with a determinant of +1.
    pub fn is_rotation_matrix(&self, epsilon: f32) -> bool {
        let should_be_identity = *self * self.transpose();
        should_be_identity.abs_diff_eq(&Self::IDENTITY, epsilon)
            && (self.determinant() - 1.0).abs() <= epsilon
    }

    /// The sum of the diagonal elements.
    #[inline]
    pub fn trace(&self) -> f32 {
        self.cols[0].x + self.cols[1].y + self.cols[2].z
    }
}

// --- Operator Overloads ---

impl Default for Mat3 {
    /// Returns the 3x3 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat3) -> Self::Output {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    /// Transforms a `Vec3` by this matrix.
    #[inline]
    fn mul(self, v: Vec3) -> Self::Output {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, s: f32) -> Self::Output {
        Self::from_cols(self.cols[0] * s, self.cols[1] * s, self.cols[2] * s)
    }
}

impl Index<usize> for Mat3 {
    type Output = Vec3;
    /// Allows accessing a matrix column by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

impl AbsDiffEq for Mat3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat3 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl GeometricEq for Mat3 {
    /// Compares the matrices as linear maps: the largest column difference.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.distance(*b) <= epsilon)
    }
}

impl Transformable for Mat3 {
    /// Treats the matrix as an orientation and prepends the transform's rotation,
    /// like [`Quaternion`] does. The translation part has no effect.
    fn apply_transform(&mut self, transform: &RigidTransform) {
        *self = Mat3::from_quat(transform.rotation) * *self;
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        *self = Mat3::from_quat(transform.rotation).transpose() * *self;
    }
}

// --- Mat4 ---

/// A 4x4 column-major homogeneous matrix.
///
/// Frames never store a `Mat4`; it exists so that composed transforms can be
/// handed to consumers that expect one (renderers, exporters).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Builds the homogeneous matrix of a rotation followed by a translation.
    pub fn from_rotation_translation(rotation: &Mat3, translation: Vec3) -> Self {
        Self::from_cols(
            Vec4::from_vec3(rotation.cols[0], 0.0),
            Vec4::from_vec3(rotation.cols[1], 0.0),
            Vec4::from_vec3(rotation.cols[2], 0.0),
            Vec4::from_vec3(translation, 1.0),
        )
    }

    /// The upper-left 3x3 block.
    #[inline]
    pub fn linear_part(&self) -> Mat3 {
        Mat3::from_cols(
            self.cols[0].truncate(),
            self.cols[1].truncate(),
            self.cols[2].truncate(),
        )
    }

    /// The translation column.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Transforms a point (w = 1).
    #[inline]
    pub fn transform_point(&self, p: Point3) -> Point3 {
        (*self * Vec4::from_vec3(p.to_vec(), 1.0)).truncate().into()
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, v: Vec4) -> Self::Output {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z + self.cols[3] * v.w
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FRAC_PI_2, FRAC_PI_4};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_rotation_constructors_agree() {
        let angle = FRAC_PI_4;
        assert_abs_diff_eq!(
            Mat3::from_rotation_x(angle),
            Mat3::from_axis_angle(Vec3::X, angle),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            Mat3::from_rotation_y(angle),
            Mat3::from_quat(Quaternion::from_axis_angle(Vec3::Y, angle)),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            Mat3::from_rotation_z(angle),
            Mat3::from_axis_angle(Vec3::Z, angle),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_inverse() {
        let m = Mat3::from_cols(
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        );
        let inv = m.inverse().unwrap();
        assert_abs_diff_eq!(m * inv, Mat3::IDENTITY, epsilon = 1e-5);
        assert!(Mat3::ZERO.inverse().is_none());
    }

    #[test]
    fn test_is_rotation_matrix() {
        assert!(Mat3::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.7).is_rotation_matrix(1e-5));
        assert!(!Mat3::from_scale(Vec3::new(2.0, 1.0, 1.0)).is_rotation_matrix(1e-5));
    }

    #[test]
    fn test_transformable_prepends_like_quaternion() {
        let transform = RigidTransform::new(
            Quaternion::from_axis_angle(Vec3::Z, 0.7),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let q = Quaternion::from_axis_angle(Vec3::X, 0.4);
        let mut m = Mat3::from_quat(q);
        let mut expected = q;
        m.apply_transform(&transform);
        expected.apply_transform(&transform);
        assert_abs_diff_eq!(m, Mat3::from_quat(expected), epsilon = 1e-5);
        assert_abs_diff_eq!(m, Mat3::from_rotation_z(0.7) * Mat3::from_rotation_x(0.4), epsilon = 1e-5);

        m.apply_inverse_transform(&transform);
        assert_abs_diff_eq!(m, Mat3::from_rotation_x(0.4), epsilon = 1e-5);
    }

    #[test]
    fn test_mat4_transform_point() {
        let m = Mat4::from_rotation_translation(&Mat3::from_rotation_z(FRAC_PI_2), Vec3::new(1.0, 0.0, 0.0));
        let p = m.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-6);
        assert_eq!(m.translation(), Vec3::new(1.0, 0.0, 0.0));
    }
}
