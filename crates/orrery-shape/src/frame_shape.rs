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

//! Shapes tagged with the frame they are expressed in.

use orrery_core::math::{GeometricEq, Point3, RigidTransform, Transformable, Vec3};
use orrery_core::shape::{PointCollision, Shape3, Sphere3};
use orrery_frame::{
    ensure, ApiEntry, FixedFrameMutable, FixedFramePoint3, FixedFrameVector3, FrameApi, FrameBoundingBox3,
    FrameError, FrameHolder, FrameKind, FrameMutable, FramePoint3, FrameReadOnly, FrameVector3,
    Framed, Operand, ReferenceFrame,
};

/// The answer of a point query, in the frame of the shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePointCollision {
    /// Distance to the surface, negative inside.
    pub signed_distance: f32,
    pub closest: FixedFramePoint3,
    /// Outward unit normal at `closest`.
    pub normal: FixedFrameVector3,
}

impl FramePointCollision {
    fn new(frame: &ReferenceFrame, collision: PointCollision) -> Self {
        Self {
            signed_distance: collision.signed_distance,
            closest: Framed::new(frame, collision.closest),
            normal: Framed::new(frame, collision.normal),
        }
    }

    pub fn is_inside(&self) -> bool {
        self.signed_distance <= 0.0
    }
}

/// A [`Shape3`] expressed in a reference frame.
#[derive(Debug, Clone)]
pub struct FrameShape3 {
    frame: ReferenceFrame,
    shape: Shape3,
}

impl FrameShape3 {
    pub fn new(frame: &ReferenceFrame, shape: impl Into<Shape3>) -> Self {
        Self {
            frame: frame.clone(),
            shape: shape.into(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.shape.kind_name()
    }

    /// Point query. `Ok(None)` only for an empty polytope.
    pub fn evaluate_point_collision<K: FrameKind>(
        &self,
        point: &Framed<Point3, K>,
    ) -> Result<Option<FramePointCollision>, FrameError> {
        self.check_reference_frame_match(point)?;
        Ok(self
            .shape
            .evaluate_point_collision(*point.frameless())
            .map(|c| FramePointCollision::new(&self.frame, c)))
    }

    pub fn signed_distance<K: FrameKind>(
        &self,
        point: &Framed<Point3, K>,
    ) -> Result<Option<f32>, FrameError> {
        self.check_reference_frame_match(point)?;
        Ok(self.shape.signed_distance(*point.frameless()))
    }

    pub fn is_point_inside<K: FrameKind>(&self, point: &Framed<Point3, K>) -> Result<bool, FrameError> {
        self.check_reference_frame_match(point)?;
        Ok(self.shape.is_point_inside(*point.frameless()))
    }

    /// The point of the shape furthest along `direction`.
    pub fn support_point<K: FrameKind>(
        &self,
        direction: &Framed<Vec3, K>,
    ) -> Result<Option<FixedFramePoint3>, FrameError> {
        self.check_reference_frame_match(direction)?;
        Ok(self
            .shape
            .support_point(*direction.frameless())
            .map(|p| Framed::new(&self.frame, p)))
    }

    pub fn bounding_box(&self) -> FrameBoundingBox3 {
        Framed::new(&self.frame, self.shape.bounding_box())
    }

    /// Strict geometric comparison. Shapes of different kinds are never equal.
    pub fn geometrically_equals(&self, other: &FrameShape3, epsilon: f32) -> Result<bool, FrameError> {
        self.check_reference_frame_match(other)?;
        Ok(self.shape.geometrically_equals(&other.shape, epsilon))
    }

    /// Shapes have no component-wise comparison; this is the geometric one.
    pub fn epsilon_equals(&self, other: &FrameShape3, epsilon: f32) -> Result<bool, FrameError> {
        self.geometrically_equals(other, epsilon)
    }

    /// Applies a frameless transform to the shape. The frame tag is kept.
    pub fn apply_transform(&mut self, transform: &RigidTransform) {
        self.shape.apply_transform(transform);
    }
}

impl FrameHolder for FrameShape3 {
    fn reference_frame(&self) -> &ReferenceFrame {
        &self.frame
    }
}

impl FrameReadOnly<Shape3> for FrameShape3 {
    fn frameless(&self) -> &Shape3 {
        &self.shape
    }
}

impl FixedFrameMutable<Shape3> for FrameShape3 {
    fn frameless_mut(&mut self) -> &mut Shape3 {
        &mut self.shape
    }
}

impl FrameMutable<Shape3> for FrameShape3 {
    fn set_reference_frame(&mut self, frame: &ReferenceFrame) {
        self.frame = frame.clone();
    }
}

/// Loose equality: shapes in different frames are not equal.
impl PartialEq for FrameShape3 {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.shape == other.shape
    }
}

fn unit_sphere(frame: &ReferenceFrame) -> FrameShape3 {
    FrameShape3::new(frame, Sphere3::new(Point3::ORIGIN, 1.0))
}

inventory::submit! {
    FrameApi {
        kind: "FrameShape3",
        frameless: "Shape3",
        operations: &[
            ApiEntry::loose("equals", |a, b| ensure(unit_sphere(a) != unit_sphere(b), a, b)),
            ApiEntry::checked("epsilon_equals", |a, b| {
                unit_sphere(a).epsilon_equals(&unit_sphere(b), 1e-5).map(drop)
            }),
            ApiEntry::checked("geometrically_equals", |a, b| {
                unit_sphere(a).geometrically_equals(&unit_sphere(b), 1e-5).map(drop)
            }),
            ApiEntry::checked("set", |a, b| unit_sphere(a).set(&unit_sphere(b))),
            ApiEntry::checked("evaluate_point_collision", |a, b| {
                unit_sphere(a)
                    .evaluate_point_collision(&FramePoint3::zero(b))
                    .map(drop)
            }),
            ApiEntry::checked("signed_distance", |a, b| {
                unit_sphere(a).signed_distance(&FramePoint3::zero(b)).map(drop)
            }),
            ApiEntry::checked("is_point_inside", |a, b| {
                unit_sphere(a).is_point_inside(&FramePoint3::zero(b)).map(drop)
            }),
            ApiEntry::checked("support_point", |a, b| {
                unit_sphere(a)
                    .support_point(&FrameVector3::new(b, Vec3::X))
                    .map(drop)
            }),
            ApiEntry::frame_changing("change_frame", Operand::Frame, |a, b| {
                unit_sphere(a).change_frame(b)
            }),
            ApiEntry::frame_changing("set_including_frame", Operand::FrameTagged, |a, b| {
                unit_sphere(a).set_including_frame(&unit_sphere(b));
                Ok(())
            }),
            ApiEntry::frame_changing("set_matching_frame", Operand::FrameTagged, |a, b| {
                unit_sphere(a).set_matching_frame(&unit_sphere(b))
            }),
            ApiEntry::frame_changing("round_trip", Operand::Frame, |a, b| {
                let before = unit_sphere(a);
                let mut value = before.clone();
                value.change_frame(b)?;
                value.change_frame(a)?;
                ensure(value.geometrically_equals(&before, 1e-4)?, a, b)
            }),
            ApiEntry::unchecked("set_frameless", Operand::Frameless),
            ApiEntry::unchecked("apply_transform", Operand::Frameless),
            ApiEntry::unchecked("bounding_box", Operand::None),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use orrery_core::shape::Box3;

    #[test]
    fn test_point_queries_check_frames() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let other = world.fixed_translation_child("other", Vec3::X).unwrap();
        let sphere = FrameShape3::new(&world, Sphere3::new(Point3::ORIGIN, 1.0));

        let query = sphere
            .evaluate_point_collision(&FramePoint3::new(&world, Point3::new(0.0, 3.0, 0.0)))
            .unwrap()
            .unwrap();
        assert_relative_eq!(query.signed_distance, 2.0, epsilon = 1e-6);
        assert_eq!(query.closest.reference_frame(), &world);
        assert_relative_eq!(*query.normal.frameless(), Vec3::Y, epsilon = 1e-6);

        let foreign = FramePoint3::new(&other, Point3::ORIGIN);
        assert!(sphere.is_point_inside(&foreign).unwrap_err().is_frame_mismatch());
    }

    #[test]
    fn test_change_frame_moves_the_shape() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let lifted = world.fixed_translation_child("lifted", Vec3::new(0.0, 0.0, 2.0)).unwrap();
        let mut cube = FrameShape3::new(&lifted, Box3::from_center_size(Point3::ORIGIN, Vec3::ONE));
        cube.change_frame(&world).unwrap();

        let centre = FramePoint3::new(&world, Point3::new(0.0, 0.0, 2.0));
        assert!(cube.is_point_inside(&centre).unwrap());
        assert_relative_eq!(
            cube.bounding_box().min,
            Point3::new(-0.5, -0.5, 1.5),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_equality_strengths() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let other = world.fixed_translation_child("other", Vec3::X).unwrap();
        let a = unit_sphere(&world);
        let b = unit_sphere(&other);
        assert!(a != b);
        assert!(a.geometrically_equals(&b, 1.0).is_err());
        assert!(a.geometrically_equals(&unit_sphere(&world), 1e-6).unwrap());
    }
}
