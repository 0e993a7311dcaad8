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
//! Collision queries between shapes in possibly different frames.

use orrery_core::collision::{CollisionResult, NarrowPhase};
use orrery_core::math::{RigidTransform, Transformable};
use orrery_core::shape::Shape3;
use orrery_frame::{FixedFramePoint3, FixedFrameVector3, FrameHolder, FrameReadOnly, Framed, ReferenceFrame};

use crate::error::{Result, ShapeError};
use crate::frame_shape::FrameShape3;

/// Result of a shape-versus-shape query.
///
/// Everything about shape A is expressed in the frame of A, everything about
/// shape B in the frame of B.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCollisionResult {
    pub colliding: bool,
    /// Separation distance, negative when the shapes overlap.
    pub signed_distance: f32,
    pub point_on_a: FixedFramePoint3,
    pub point_on_b: FixedFramePoint3,
    pub normal_on_a: FixedFrameVector3,
    pub normal_on_b: FixedFrameVector3,
}

impl FrameCollisionResult {
    /// Tags a result computed in B's frame, moving A's half back by `a_to_b`.
    fn from_frame_of_b(
        frame_a: &ReferenceFrame,
        frame_b: &ReferenceFrame,
        a_to_b: &RigidTransform,
        result: CollisionResult,
    ) -> Self {
        Self {
            colliding: result.colliding,
            signed_distance: result.signed_distance,
            point_on_a: Framed::new(frame_a, a_to_b.inverse_transform_point(result.point_on_a)),
            point_on_b: Framed::new(frame_b, result.point_on_b),
            normal_on_a: Framed::new(frame_a, a_to_b.inverse_transform_vector(result.normal_on_a)),
            normal_on_b: Framed::new(frame_b, result.normal_on_b),
        }
    }

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
}

/// Frame-aware wrapper around the frameless [`NarrowPhase`].
#[derive(Default)]
pub struct FrameNarrowPhase {
    narrow: NarrowPhase,
}

impl FrameNarrowPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates the collision between `a` and `b`.
    ///
    /// Shapes in the same frame go straight to the narrow phase. Otherwise A is
    /// moved into the frame of B for the query and its results are moved back.
    pub fn evaluate(&self, a: &FrameShape3, b: &FrameShape3) -> Result<FrameCollisionResult> {
        let frame_a = a.reference_frame();
        let frame_b = b.reference_frame();
        frame_a.verify_same_roots(frame_b)?;
        reject_empty(a.frameless())?;
        reject_empty(b.frameless())?;

        if frame_a == frame_b {
            let result = self.run(a.frameless(), b.frameless())?;
            return Ok(FrameCollisionResult::from_frame_of_b(
                frame_a,
                frame_b,
                &RigidTransform::IDENTITY,
                result,
            ));
        }

        let a_to_b = frame_a.transform_to_desired_frame(frame_b)?;
        let mut moved = a.frameless().clone();
        moved.apply_transform(&a_to_b);
        let result = self.run(&moved, b.frameless())?;
        Ok(FrameCollisionResult::from_frame_of_b(frame_a, frame_b, &a_to_b, result))
    }

    fn run(&self, a: &Shape3, b: &Shape3) -> Result<CollisionResult> {
        self.narrow.evaluate(a, b).ok_or_else(|| {
            log::debug!("No collision formula for {} against {}", a.kind_name(), b.kind_name());
            ShapeError::UnsupportedPair {
                a: a.kind_name(),
                b: b.kind_name(),
            }
        })
    }
}

fn reject_empty(shape: &Shape3) -> Result<()> {
    match shape {
        Shape3::Polytope(p) if p.is_empty() => Err(ShapeError::EmptyPolytope),
        _ => Ok(()),
    }
}

/// Evaluates the collision between two framed shapes with a default narrow phase.
pub fn evaluate_frame_collision(a: &FrameShape3, b: &FrameShape3) -> Result<FrameCollisionResult> {
    FrameNarrowPhase::new().evaluate(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use orrery_core::math::{Point3, Vec3};
    use orrery_core::shape::{Box3, Capsule3, ConvexPolytope3, Sphere3};
    use orrery_frame::FrameError;

    #[test]
    fn test_same_frame_fast_path() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let a = FrameShape3::new(&world, Sphere3::new(Point3::ORIGIN, 1.0));
        let b = FrameShape3::new(&world, Sphere3::new(Point3::new(1.5, 0.0, 0.0), 1.0));

        let result = evaluate_frame_collision(&a, &b).unwrap();
        assert!(result.colliding);
        assert_relative_eq!(result.signed_distance, -0.5, epsilon = 1e-6);
        assert_eq!(result.point_on_a.reference_frame(), &world);
        assert_relative_eq!(*result.point_on_b.frameless(), Point3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_results_stay_in_their_own_frames() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let left = world.fixed_translation_child("left", Vec3::new(-2.0, 0.0, 0.0)).unwrap();
        let right = world.fixed_translation_child("right", Vec3::new(2.0, 0.0, 0.0)).unwrap();
        let a = FrameShape3::new(&left, Sphere3::new(Point3::ORIGIN, 1.0));
        let b = FrameShape3::new(&right, Sphere3::new(Point3::ORIGIN, 1.0));

        let result = evaluate_frame_collision(&a, &b).unwrap();
        assert!(!result.colliding);
        assert_relative_eq!(result.signed_distance, 2.0, epsilon = 1e-5);
        assert_eq!(result.point_on_a.reference_frame(), &left);
        assert_eq!(result.point_on_b.reference_frame(), &right);
        assert_relative_eq!(*result.point_on_a.frameless(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(*result.point_on_b.frameless(), Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(*result.normal_on_a.frameless(), Vec3::X, epsilon = 1e-5);
        assert_relative_eq!(*result.normal_on_b.frameless(), -Vec3::X, epsilon = 1e-5);
    }

    #[test]
    fn test_failures() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let elsewhere = ReferenceFrame::new_root("elsewhere").unwrap();
        let cube = FrameShape3::new(&world, Box3::from_center_size(Point3::ORIGIN, Vec3::ONE));
        let capsule = FrameShape3::new(&world, Capsule3::new(Point3::ORIGIN, Vec3::Z, 1.0, 0.1));
        let foreign = FrameShape3::new(&elsewhere, Sphere3::new(Point3::ORIGIN, 1.0));
        let empty = FrameShape3::new(&world, ConvexPolytope3::new());

        assert_eq!(
            evaluate_frame_collision(&cube, &capsule),
            Err(ShapeError::UnsupportedPair { a: "box", b: "capsule" })
        );
        assert!(matches!(
            evaluate_frame_collision(&cube, &foreign),
            Err(ShapeError::Frame(FrameError::DifferentTrees { .. }))
        ));
        assert_eq!(evaluate_frame_collision(&empty, &cube), Err(ShapeError::EmptyPolytope));
    }
}
