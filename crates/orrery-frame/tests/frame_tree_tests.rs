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

use std::fmt::Debug;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use orrery_core::math::{
    Aabb, ConvexPolygon2, GeometricEq, Line3, LineSegment3, Mat3, Point2, Point3, Quaternion,
    RigidTransform, Transformable, Vec2, Vec3, FRAC_PI_2, FRAC_PI_4,
};
use orrery_frame::{
    FixedFrameMutable, FrameBuilder, FrameError, FrameHolder, FrameMutable, FramePoint2,
    FramePoint3, FrameReadOnly, FrameTree, FrameVector3, Framed, LiveTransform, ReferenceFrame,
};

fn translation(x: f32, y: f32, z: f32) -> RigidTransform {
    RigidTransform::from_translation(Vec3::new(x, y, z))
}

/// Root R with A at +x and B at +y, as in the conversion walkthrough.
fn two_siblings() -> (ReferenceFrame, ReferenceFrame, ReferenceFrame) {
    let root = ReferenceFrame::new_root("R").unwrap();
    let a = root.movable_child("A", translation(1.0, 0.0, 0.0)).unwrap();
    let b = root.fixed_child("B", translation(0.0, 1.0, 0.0)).unwrap();
    (root, a, b)
}

/// A small tree with rotations on several levels.
fn tree() -> Vec<ReferenceFrame> {
    let root = ReferenceFrame::new_root("world").unwrap();
    let base = root
        .movable_child(
            "base",
            RigidTransform::new(Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_4), Vec3::new(1.0, 2.0, 0.0)),
        )
        .unwrap();
    let arm = base
        .fixed_child(
            "arm",
            RigidTransform::new(Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2), Vec3::new(0.0, 0.0, 1.5)),
        )
        .unwrap();
    let tool = arm.fixed_translation_child("tool", Vec3::new(0.3, 0.0, 0.0)).unwrap();
    let camera = base
        .fixed_child(
            "camera",
            RigidTransform::new(Quaternion::from_axis_angle(Vec3::Y, -0.3), Vec3::new(-0.5, 0.0, 0.2)),
        )
        .unwrap();
    let map = root.fixed_translation_child("map", Vec3::new(-10.0, 4.0, 0.0)).unwrap();
    vec![root, base, arm, tool, camera, map]
}

#[test]
fn test_converting_a_point_between_siblings() {
    let (_root, a, b) = two_siblings();
    let mut p = FramePoint3::new(&a, Point3::ORIGIN);
    p.change_frame(&b).unwrap();
    assert_relative_eq!(*p.frameless(), Point3::new(1.0, -1.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_updating_a_frame_changes_later_conversions_only() {
    let (root, a, b) = two_siblings();
    let b_to_root = b.transform_to_root();

    a.set_transform_to_parent(translation(2.0, 0.0, 0.0)).unwrap();
    assert!(a.is_stale());
    assert!(!b.is_stale());
    assert!(!root.is_stale());

    let mut p = FramePoint3::new(&a, Point3::ORIGIN);
    p.change_frame(&b).unwrap();
    assert_relative_eq!(*p.frameless(), Point3::new(2.0, -1.0, 0.0), epsilon = 1e-6);
    assert!(!b.is_stale());
    assert_eq!(b.transform_to_root(), b_to_root);
}

#[test]
fn test_conversion_to_self_is_identity() {
    for frame in tree() {
        let t = frame.transform_to_desired_frame(&frame).unwrap();
        assert!(t.is_identity(1e-6), "{} -> itself is not identity", frame);
    }
}

#[test]
fn test_conversions_compose() {
    let frames = tree();
    let p = Point3::new(0.4, -1.2, 2.5);
    for a in &frames {
        for b in &frames {
            for c in &frames {
                let ab = a.transform_to_desired_frame(b).unwrap();
                let bc = b.transform_to_desired_frame(c).unwrap();
                let ac = a.transform_to_desired_frame(c).unwrap();
                assert_abs_diff_eq!((bc * ab).transform_point(p), ac.transform_point(p), epsilon = 1e-4);
            }
        }
    }
}

#[test]
fn test_change_frame_round_trip_restores_the_value() {
    let frames = tree();
    for a in &frames {
        for b in &frames {
            let original = FramePoint3::new(a, Point3::new(-0.7, 0.1, 3.0));
            let mut p = original.clone();
            p.change_frame(b).unwrap();
            p.change_frame(a).unwrap();
            assert!(p.epsilon_equals(&original, 1e-4).unwrap(), "{} <-> {}", a, b);
        }
    }
}

fn assert_round_trips<T>(frames: &[ReferenceFrame], value: T)
where
    T: Clone + Debug + GeometricEq + Transformable,
{
    for a in frames {
        for b in frames {
            let original = Framed::<T>::new(a, value.clone());
            let mut moved = original.clone();
            moved.change_frame(b).unwrap();
            moved.change_frame(a).unwrap();
            assert!(
                moved.geometrically_equals(&original, 1e-4).unwrap(),
                "{:?}: {} <-> {}",
                value,
                a,
                b
            );
        }
    }
}

#[test]
fn test_round_trip_restores_every_kind() {
    let frames = tree();
    assert_round_trips(&frames, Vec3::new(0.0, 0.6, 0.8));
    assert_round_trips(&frames, Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.9));
    assert_round_trips(&frames, Mat3::from_rotation_x(0.25) * Mat3::from_rotation_z(-1.1));
    assert_round_trips(
        &frames,
        RigidTransform::new(Quaternion::from_axis_angle(Vec3::Y, 1.0), Vec3::ONE),
    );
    assert_round_trips(&frames, Line3::new(Point3::new(0.5, 0.0, -1.0), Vec3::new(1.0, 2.0, 2.0)));
    assert_round_trips(&frames, LineSegment3::new(Point3::ORIGIN, Point3::new(1.0, -1.0, 3.0)));

    // 2D values only survive turns about z.
    let world = ReferenceFrame::new_root("plane").unwrap();
    let turned = world
        .fixed_child(
            "turned",
            RigidTransform::new(Quaternion::from_axis_angle(Vec3::Z, 0.7), Vec3::new(1.0, -2.0, 0.5)),
        )
        .unwrap();
    let spun = turned
        .movable_child("spun", RigidTransform::new(Quaternion::from_axis_angle(Vec3::Z, -2.0), Vec3::X))
        .unwrap();
    let planar = [world.clone(), turned, spun];
    assert_round_trips(&planar, Point2::new(1.0, 2.0));
    assert_round_trips(&planar, Vec2::new(0.6, 0.8));
    assert_round_trips(
        &planar,
        ConvexPolygon2::from_points(&[Point2::ORIGIN, Point2::new(2.0, 0.0), Point2::new(0.0, 2.0)]),
    );

    // A box stays axis-aligned only under translations.
    let shifted = world.fixed_translation_child("shifted", Vec3::new(3.0, -1.0, 2.0)).unwrap();
    let lifted = shifted.fixed_translation_child("lifted", Vec3::Z).unwrap();
    assert_round_trips(
        &[world, shifted, lifted],
        Aabb::from_min_max(Point3::ORIGIN, Point3::new(1.0, 2.0, 3.0)),
    );
}

#[test]
fn test_change_frame_of_a_planar_value_across_a_tilt_is_an_error() {
    let frames = tree();
    let (world, arm) = (&frames[0], &frames[2]);
    let mut p = FramePoint2::new(world, Point2::new(0.0, 1.0));
    let err = p.change_frame(arm).unwrap_err();
    assert!(matches!(err, FrameError::NotXyPlanar { .. }), "{err}");
    assert_eq!(p.reference_frame(), world);
    assert_eq!(*p.frameless(), Point2::new(0.0, 1.0));

    p.change_frame_and_project_to_xy_plane(arm).unwrap();
    assert_eq!(p.reference_frame(), arm);
}

#[test]
fn test_checked_operations_reject_mixed_frames_and_loose_equality_does_not() {
    let (_root, a, b) = two_siblings();
    let pa = FramePoint3::new(&a, Point3::ORIGIN);
    let pb = FramePoint3::new(&b, Point3::ORIGIN);
    let va = FrameVector3::new(&a, Vec3::X);
    let vb = FrameVector3::new(&b, Vec3::X);

    let expected = FrameError::FrameMismatch {
        expected: "R:A".to_string(),
        actual: "R:B".to_string(),
    };
    assert_eq!(pa.distance(&pb).unwrap_err(), expected);
    assert_eq!(va.dot(&vb).unwrap_err(), expected);
    assert_eq!(pa.epsilon_equals(&pb, 1e-3).unwrap_err(), expected);
    assert_eq!(pa.geometrically_equals(&pb, 1e-3).unwrap_err(), expected);
    let mut moved = va.clone();
    assert_eq!(moved.add(&vb).unwrap_err(), expected);
    assert_eq!(moved, va);

    assert!(pa != pb);
    assert!(va != vb);
}

#[test]
fn test_update_reaches_the_bottom_of_a_three_level_chain() {
    let root = ReferenceFrame::new_root("root").unwrap();
    let mid = root.movable_child("mid", translation(1.0, 0.0, 0.0)).unwrap();
    let leaf = mid.fixed_translation_child("leaf", Vec3::new(0.0, 0.0, 1.0)).unwrap();
    assert_relative_eq!(leaf.transform_to_root().translation, Vec3::new(1.0, 0.0, 1.0));

    mid.set_transform_to_parent(RigidTransform::new(
        Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2),
        Vec3::new(5.0, 0.0, 0.0),
    ))
    .unwrap();
    assert!(leaf.is_stale());
    assert_relative_eq!(
        leaf.transform_to_root().translation,
        Vec3::new(6.0, 0.0, 0.0),
        epsilon = 1e-6
    );
    assert!(!leaf.is_stale());
}

#[test]
fn test_live_transform_drives_a_frame_through_update() {
    let root = ReferenceFrame::new_root("world").unwrap();
    let source = LiveTransform::new(RigidTransform::IDENTITY);
    let joint = FrameBuilder::new("joint")
        .parent(&root)
        .provider(source.clone())
        .build()
        .unwrap();
    let tip = joint.fixed_translation_child("tip", Vec3::X).unwrap();

    source.set(translation(0.0, 3.0, 0.0));
    assert_relative_eq!(tip.transform_to_root().translation, Vec3::X);
    joint.update().unwrap();
    assert_relative_eq!(tip.transform_to_root().translation, Vec3::new(1.0, 3.0, 0.0));
}

#[test]
fn test_reparenting_onto_a_descendant_is_rejected() {
    let frames = tree();
    let (base, tool) = (&frames[1], &frames[3]);
    assert!(matches!(base.set_parent(tool), Err(FrameError::InvalidHierarchy(_))));
    assert_eq!(base.parent().as_ref(), Some(&frames[0]));
}

#[test]
fn test_reparenting_moves_a_subtree() {
    let root = ReferenceFrame::new_root("world").unwrap();
    let table = root.fixed_translation_child("table", Vec3::new(2.0, 0.0, 0.0)).unwrap();
    let hand = root.fixed_translation_child("hand", Vec3::new(0.0, 0.0, 1.0)).unwrap();
    let cup = table.movable_child("cup", translation(0.0, 0.0, 0.5)).unwrap();
    let handle = cup.fixed_translation_child("handle", Vec3::new(0.1, 0.0, 0.0)).unwrap();
    assert_relative_eq!(handle.transform_to_root().translation, Vec3::new(2.1, 0.0, 0.5));

    cup.set_parent(&hand).unwrap();
    assert!(handle.is_stale());
    assert_eq!(handle.name_id(), "world:hand:cup:handle");
    assert_relative_eq!(handle.transform_to_root().translation, Vec3::new(0.1, 0.0, 1.5));
}

#[test]
fn test_frames_of_different_trees_do_not_convert() {
    let (_root, a, _b) = two_siblings();
    let other = ReferenceFrame::new_root("other").unwrap();
    let err = a.transform_to_desired_frame(&other).unwrap_err();
    assert!(matches!(err, FrameError::DifferentTrees { .. }));
    assert!(err.is_frame_mismatch());

    let mut p = FramePoint3::new(&a, Point3::ORIGIN);
    assert!(p.set_matching_frame(&FramePoint3::new(&other, Point3::ORIGIN)).is_err());
    assert_eq!(p.reference_frame(), &a);
}

#[test]
fn test_fixed_and_root_frames_cannot_move() {
    let (root, _a, b) = two_siblings();
    for frame in [&root, &b] {
        assert!(matches!(
            frame.set_transform_to_parent(RigidTransform::IDENTITY),
            Err(FrameError::ImmutableFrame(_))
        ));
        assert!(matches!(frame.update(), Err(FrameError::ImmutableFrame(_))));
    }
}

#[test]
fn test_tree_view_lists_every_frame_once() {
    let frames = tree();
    let view = FrameTree::of(&frames[3]);
    let listed = view.frames();
    assert_eq!(listed.len(), frames.len());
    for frame in &frames {
        assert!(listed.contains(frame));
    }
    assert_eq!(listed[0], frames[0]);
    assert_eq!(view.indices().len(), frames.len());
}
