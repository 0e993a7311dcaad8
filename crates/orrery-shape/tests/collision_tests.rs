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
use approx::assert_relative_eq;
use orrery_core::math::{Point3, Quaternion, RigidTransform, Vec3};
use orrery_core::shape::{Box3, Capsule3, PointShape3, Sphere3};
use orrery_frame::{
    frame_api_registry, FrameBuilder, FrameHolder, FrameMutable, FramePoint3, FrameReadOnly, LiveTransform,
    ReferenceFrame,
};
use orrery_shape::{evaluate_frame_collision, FrameConvexPolytope3, FrameShape3, ShapeError};

#[test]
fn test_collision_follows_a_moving_frame() {
    let world = ReferenceFrame::new_root("world").unwrap();
    let live = LiveTransform::new(RigidTransform::from_translation(Vec3::new(5.0, 0.0, 0.0)));
    let arm = FrameBuilder::new("arm")
        .parent(&world)
        .provider(live.clone())
        .build()
        .unwrap();

    let ball = FrameShape3::new(&arm, Sphere3::new(Point3::ORIGIN, 0.5));
    let wall = FrameShape3::new(&world, Box3::from_center_size(Point3::ORIGIN, Vec3::splat(2.0)));

    arm.update().unwrap();
    let apart = evaluate_frame_collision(&ball, &wall).unwrap();
    assert!(!apart.colliding);
    assert_relative_eq!(apart.signed_distance, 3.5, epsilon = 1e-5);

    live.set(RigidTransform::from_translation(Vec3::new(1.2, 0.0, 0.0)));
    arm.update().unwrap();
    let touching = evaluate_frame_collision(&ball, &wall).unwrap();
    assert!(touching.colliding);
    assert_relative_eq!(touching.signed_distance, -0.3, epsilon = 1e-5);
    // The contact point on the ball stays in the arm frame.
    assert_eq!(touching.point_on_a.reference_frame(), &arm);
    assert_relative_eq!(*touching.point_on_a.frameless(), Point3::new(-0.5, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(*touching.point_on_b.frameless(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_capsules_in_rotated_frames() {
    let world = ReferenceFrame::new_root("world").unwrap();
    let turned = world
        .fixed_child(
            "turned",
            RigidTransform::new(
                Quaternion::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2),
                Vec3::new(0.0, 0.0, 0.8),
            ),
        )
        .unwrap();

    // Both capsules run along their local x axis; the turned one ends up along world y.
    let a = FrameShape3::new(&world, Capsule3::new(Point3::ORIGIN, Vec3::X, 4.0, 0.5));
    let b = FrameShape3::new(&turned, Capsule3::new(Point3::ORIGIN, Vec3::X, 4.0, 0.5));

    let result = evaluate_frame_collision(&a, &b).unwrap();
    assert!(result.colliding);
    assert_relative_eq!(result.signed_distance, -0.2, epsilon = 1e-4);
    assert_relative_eq!(*result.normal_on_a.frameless(), Vec3::Z, epsilon = 1e-4);
    assert_relative_eq!(*result.normal_on_b.frameless(), -Vec3::Z, epsilon = 1e-4);

    let swapped = evaluate_frame_collision(&b, &a).unwrap();
    assert_relative_eq!(swapped.signed_distance, result.signed_distance, epsilon = 1e-4);
    assert_eq!(swapped.point_on_a.reference_frame(), &turned);
}

#[test]
fn test_point_against_polytope_in_another_frame() {
    let world = ReferenceFrame::new_root("world").unwrap();
    let table = world.fixed_translation_child("table", Vec3::new(0.0, 0.0, 1.0)).unwrap();
    let top = FrameConvexPolytope3::from_box(&table, &Box3::from_center_size(Point3::ORIGIN, Vec3::ONE));

    let marker = FrameShape3::new(&world, PointShape3::new(Point3::new(0.0, 0.0, 2.0)));
    let result = evaluate_frame_collision(&marker, &top.to_shape()).unwrap();
    assert!(!result.colliding);
    assert_relative_eq!(result.signed_distance, 0.5, epsilon = 1e-5);
    assert_relative_eq!(*result.point_on_b.frameless(), Point3::new(0.0, 0.0, 0.5), epsilon = 1e-5);

    // The same query through the polytope directly, after moving the point.
    let mut point = FramePoint3::new(&world, Point3::new(0.0, 0.0, 2.0));
    assert!(top.signed_distance(&point).unwrap_err().is_frame_mismatch());
    point.change_frame(&table).unwrap();
    assert_relative_eq!(top.signed_distance(&point).unwrap(), 0.5, epsilon = 1e-5);
}

#[test]
fn test_unsupported_pairs_are_reported() {
    let world = ReferenceFrame::new_root("world").unwrap();
    let child = world.fixed_translation_child("child", Vec3::X).unwrap();
    let a = FrameShape3::new(&world, Box3::from_center_size(Point3::ORIGIN, Vec3::ONE));
    let b = FrameShape3::new(&child, Box3::from_center_size(Point3::ORIGIN, Vec3::ONE));
    assert_eq!(
        evaluate_frame_collision(&a, &b).unwrap_err(),
        ShapeError::UnsupportedPair { a: "box", b: "box" }
    );
}

#[test]
fn test_shape_tables_are_registered_and_valid() {
    let world = ReferenceFrame::new_root("world").unwrap();
    let other = world
        .fixed_child(
            "other",
            RigidTransform::new(Quaternion::from_axis_angle(Vec3::Y, 0.8), Vec3::new(1.0, 2.0, 3.0)),
        )
        .unwrap();

    let registry = frame_api_registry();
    for kind in ["FrameConvexPolytope3", "FrameShape3"] {
        let table = registry
            .iter()
            .find(|api| api.kind == kind)
            .unwrap_or_else(|| panic!("{kind} is not registered"));
        let violations = table.validate(&world, &other);
        assert!(violations.is_empty(), "{violations:?}");
    }
}
