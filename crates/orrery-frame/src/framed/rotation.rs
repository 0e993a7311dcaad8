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

//! Checked operations on framed orientations and poses.

use orrery_core::math::{Mat3, Point3, Quaternion, RigidTransform, Vec3};

use super::{
    Fixed, FrameHolder, FrameKind, FramePoint3, FramePose3, FrameQuaternion, FrameRotationMatrix,
    FrameVector3, Framed,
};
use crate::api::{frame_api, ApiEntry, Operand};
use crate::error::Result;

impl<K: FrameKind> Framed<Quaternion, K> {
    /// `self = self * other`. Both must share a frame.
    pub fn multiply<K2: FrameKind>(&mut self, other: &Framed<Quaternion, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a = (*a * *b).normalize())
    }

    /// `self = other * self`. Both must share a frame.
    pub fn pre_multiply<K2: FrameKind>(&mut self, other: &Framed<Quaternion, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a = (*b * *a).normalize())
    }

    /// Angle of the rotation taking `self` to `other`, in `[0, pi]`.
    pub fn distance<K2: FrameKind>(&self, other: &Framed<Quaternion, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.distance(*b))
    }

    /// Rotates `vector` in place. The vector must be in this frame.
    pub fn transform_vector<K2: FrameKind>(&self, vector: &mut Framed<Vec3, K2>) -> Result<()> {
        vector.checked_mut(self, |v, q| *v = q.rotate_vec3(*v))
    }

    pub fn inverse_transform_vector<K2: FrameKind>(
        &self,
        vector: &mut Framed<Vec3, K2>,
    ) -> Result<()> {
        vector.checked_mut(self, |v, q| *v = q.inverse_rotate_vec3(*v))
    }

    /// Rotates `point` about the frame origin.
    pub fn transform_point<K2: FrameKind>(&self, point: &mut Framed<Point3, K2>) -> Result<()> {
        point.checked_mut(self, |p, q| *p = Point3::from(q.rotate_vec3(p.to_vec())))
    }

    pub fn inverse_transform_point<K2: FrameKind>(
        &self,
        point: &mut Framed<Point3, K2>,
    ) -> Result<()> {
        point.checked_mut(self, |p, q| *p = Point3::from(q.inverse_rotate_vec3(p.to_vec())))
    }

    /// Inverts the rotation in place.
    pub fn invert(&mut self) {
        self.value = self.value.inverse();
    }

    pub fn to_rotation_matrix(&self) -> Framed<Mat3, K> {
        self.sibling(Mat3::from_quat(self.value))
    }
}

impl<K: FrameKind> Framed<Mat3, K> {
    /// `self = self * other`. Both must share a frame.
    pub fn multiply<K2: FrameKind>(&mut self, other: &Framed<Mat3, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a = *a * *b)
    }

    /// Multiplies `vector` in place. The vector must be in this frame.
    pub fn transform_vector<K2: FrameKind>(&self, vector: &mut Framed<Vec3, K2>) -> Result<()> {
        vector.checked_mut(self, |v, m| *v = *m * *v)
    }

    /// The same rotation as a quaternion. The matrix must be a rotation.
    pub fn to_quaternion(&self) -> Framed<Quaternion, K> {
        self.sibling(Quaternion::from_rotation_matrix(&self.value))
    }
}

impl<K: FrameKind> Framed<RigidTransform, K> {
    /// The pose translation, as a point pinned to this frame.
    pub fn position(&self) -> Framed<Point3, Fixed> {
        Framed::new(&self.frame, Point3::from(self.value.translation))
    }

    /// The pose rotation, as an orientation pinned to this frame.
    pub fn orientation(&self) -> Framed<Quaternion, Fixed> {
        Framed::new(&self.frame, self.value.rotation)
    }

    pub fn set_position<K2: FrameKind>(&mut self, position: &Framed<Point3, K2>) -> Result<()> {
        self.checked_mut(position, |pose, p| pose.translation = p.to_vec())
    }

    pub fn set_orientation<K2: FrameKind>(
        &mut self,
        orientation: &Framed<Quaternion, K2>,
    ) -> Result<()> {
        self.checked_mut(orientation, |pose, q| pose.rotation = q.normalize())
    }

    /// Maps `point` from the pose's local coordinates into this frame.
    pub fn transform_point<K2: FrameKind>(&self, point: &mut Framed<Point3, K2>) -> Result<()> {
        point.checked_mut(self, |p, pose| *p = pose.transform_point(*p))
    }

    /// Maps `point` from this frame into the pose's local coordinates.
    pub fn inverse_transform_point<K2: FrameKind>(
        &self,
        point: &mut Framed<Point3, K2>,
    ) -> Result<()> {
        point.checked_mut(self, |p, pose| *p = pose.inverse_transform_point(*p))
    }

    /// Sets this pose between `start` (t = 0) and `end` (t = 1).
    pub fn interpolate<K2: FrameKind, K3: FrameKind>(
        &mut self,
        start: &Framed<RigidTransform, K2>,
        end: &Framed<RigidTransform, K3>,
        t: f32,
    ) -> Result<()> {
        self.check_reference_frame_match(start)?;
        self.check_reference_frame_match(end)?;
        self.value = RigidTransform::interpolate(&start.value, &end.value, t);
        Ok(())
    }
}

frame_api! {
    kind: FrameQuaternion,
    frameless: Quaternion,
    sample: Quaternion::from_axis_angle(Vec3::Z, 0.5),
    operations: [
        ApiEntry::checked("multiply", |a, b| {
            FrameQuaternion::zero(a).multiply(&FrameQuaternion::zero(b))
        }),
        ApiEntry::checked("pre_multiply", |a, b| {
            FrameQuaternion::zero(a).pre_multiply(&FrameQuaternion::zero(b))
        }),
        ApiEntry::checked("distance", |a, b| {
            FrameQuaternion::zero(a).distance(&FrameQuaternion::zero(b)).map(drop)
        }),
        ApiEntry::checked("transform_vector", |a, b| {
            FrameQuaternion::zero(a).transform_vector(&mut FrameVector3::zero(b))
        }),
        ApiEntry::checked("inverse_transform_vector", |a, b| {
            FrameQuaternion::zero(a).inverse_transform_vector(&mut FrameVector3::zero(b))
        }),
        ApiEntry::checked("transform_point", |a, b| {
            FrameQuaternion::zero(a).transform_point(&mut FramePoint3::zero(b))
        }),
        ApiEntry::checked("inverse_transform_point", |a, b| {
            FrameQuaternion::zero(a).inverse_transform_point(&mut FramePoint3::zero(b))
        }),
        ApiEntry::unchecked("invert", Operand::None),
        ApiEntry::unchecked("to_rotation_matrix", Operand::None),
    ],
}

frame_api! {
    kind: FrameRotationMatrix,
    frameless: Mat3,
    sample: Mat3::from_rotation_x(0.25),
    operations: [
        ApiEntry::checked("multiply", |a, b| {
            FrameRotationMatrix::zero(a).multiply(&FrameRotationMatrix::zero(b))
        }),
        ApiEntry::checked("transform_vector", |a, b| {
            FrameRotationMatrix::zero(a).transform_vector(&mut FrameVector3::zero(b))
        }),
        ApiEntry::unchecked("to_quaternion", Operand::None),
    ],
}

frame_api! {
    kind: FramePose3,
    frameless: RigidTransform,
    sample: RigidTransform::new(Quaternion::from_axis_angle(Vec3::Y, 1.0), Vec3::ONE),
    operations: [
        ApiEntry::checked("set_position", |a, b| {
            FramePose3::zero(a).set_position(&FramePoint3::zero(b))
        }),
        ApiEntry::checked("set_orientation", |a, b| {
            FramePose3::zero(a).set_orientation(&FrameQuaternion::zero(b))
        }),
        ApiEntry::checked("transform_point", |a, b| {
            FramePose3::zero(a).transform_point(&mut FramePoint3::zero(b))
        }),
        ApiEntry::checked("inverse_transform_point", |a, b| {
            FramePose3::zero(a).inverse_transform_point(&mut FramePoint3::zero(b))
        }),
        ApiEntry::checked("interpolate", |a, b| {
            FramePose3::zero(a).interpolate(&FramePose3::zero(a), &FramePose3::zero(b), 0.5)
        }),
        ApiEntry::unchecked("position", Operand::None),
        ApiEntry::unchecked("orientation", Operand::None),
    ],
}

#[cfg(test)]
mod tests {
    use crate::{
        FixedFrameMutable, FrameHolder, FrameMutable, FramePoint3, FramePose3, FrameQuaternion,
        FrameReadOnly, FrameRotationMatrix, FrameVector3, ReferenceFrame,
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use orrery_core::math::{Mat3, Point3, Quaternion, RigidTransform, Vec3, FRAC_PI_2};

    #[test]
    fn test_quaternion_rotates_vectors_in_its_frame() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let q = FrameQuaternion::new(&world, Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2));
        let mut v = FrameVector3::new(&world, Vec3::X);
        q.transform_vector(&mut v).unwrap();
        assert_relative_eq!(*v.frameless(), Vec3::Y, epsilon = 1e-6);
        q.inverse_transform_vector(&mut v).unwrap();
        assert_relative_eq!(*v.frameless(), Vec3::X, epsilon = 1e-6);

        let other = world.fixed_translation_child("other", Vec3::X).unwrap();
        let mut foreign = FrameVector3::new(&other, Vec3::X);
        assert!(q.transform_vector(&mut foreign).is_err());
        assert_eq!(*foreign.frameless(), Vec3::X);
    }

    #[test]
    fn test_quaternion_composition() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let quarter = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let mut q = FrameQuaternion::new(&world, quarter);
        q.multiply(&FrameQuaternion::new(&world, quarter)).unwrap();
        let half = FrameQuaternion::new(&world, Quaternion::from_axis_angle(Vec3::Z, 2.0 * FRAC_PI_2));
        assert!(q.geometrically_equals(&half, 1e-5).unwrap());
        assert_relative_eq!(q.distance(&half).unwrap(), 0.0, epsilon = 1e-3);

        let m = q.to_rotation_matrix();
        let mut v = FrameVector3::new(&world, Vec3::X);
        m.transform_vector(&mut v).unwrap();
        assert_relative_eq!(*v.frameless(), -Vec3::X, epsilon = 1e-5);
    }

    #[test]
    fn test_pose_accessors_are_fixed_to_the_pose_frame() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let mut pose = FramePose3::new(&world, RigidTransform::IDENTITY);
        pose.set_position(&FramePoint3::new(&world, Point3::new(1.0, 2.0, 3.0)))
            .unwrap();
        let position = pose.position();
        assert_eq!(position.reference_frame(), &world);
        assert_eq!(*position.frameless(), Point3::new(1.0, 2.0, 3.0));

        let mut p = FramePoint3::new(&world, Point3::ORIGIN);
        pose.transform_point(&mut p).unwrap();
        assert_eq!(*p, Point3::new(1.0, 2.0, 3.0));

        pose.set_to_zero();
        assert!(pose.is_identity(1e-6));
    }

    #[test]
    fn test_quaternion_and_matrix_change_frame_alike() {
        let root = ReferenceFrame::new_root("root").unwrap();
        let turned = root
            .fixed_child(
                "turned",
                RigidTransform::new(Quaternion::from_axis_angle(Vec3::Z, 0.7), Vec3::new(1.0, 0.0, 2.0)),
            )
            .unwrap();
        let local = Quaternion::from_axis_angle(Vec3::X, 0.4);

        let mut q = FrameQuaternion::new(&turned, local);
        let mut m = FrameRotationMatrix::new(&turned, Mat3::from_quat(local));
        q.change_frame(&root).unwrap();
        m.change_frame(&root).unwrap();
        assert_abs_diff_eq!(*m.frameless(), Mat3::from_quat(*q.frameless()), epsilon = 1e-5);
        assert_abs_diff_eq!(
            *m.frameless(),
            Mat3::from_rotation_z(0.7) * Mat3::from_rotation_x(0.4),
            epsilon = 1e-5
        );

        m.change_frame(&turned).unwrap();
        assert_abs_diff_eq!(*m.frameless(), Mat3::from_quat(local), epsilon = 1e-5);
    }
}
