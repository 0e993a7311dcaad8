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

use std::collections::HashSet;

use orrery_core::math::{Quaternion, RigidTransform, Vec3};
use orrery_frame::{frame_api_registry, FrameCheck, Operand, ReferenceFrame, REQUIRED_OPERATIONS};

fn two_frames() -> (ReferenceFrame, ReferenceFrame) {
    let root = ReferenceFrame::new_root("world").unwrap();
    let child = root
        .fixed_child(
            "child",
            RigidTransform::new(Quaternion::from_axis_angle(Vec3::Z, 0.7), Vec3::new(1.0, -2.0, 0.5)),
        )
        .unwrap();
    (root, child)
}

#[test]
fn test_every_changeable_kind_is_registered_once() {
    let kinds: Vec<_> = frame_api_registry().iter().map(|api| api.kind).collect();
    let expected = [
        "FrameBoundingBox3",
        "FrameConvexPolygon2",
        "FrameLine3",
        "FrameLineSegment3",
        "FramePoint2",
        "FramePoint3",
        "FramePose3",
        "FrameQuaternion",
        "FrameRotationMatrix",
        "FrameVector2",
        "FrameVector3",
    ];
    assert_eq!(kinds, expected);
}

#[test]
fn test_every_kind_names_its_frameless_counterpart() {
    let pairs: Vec<_> = frame_api_registry()
        .iter()
        .map(|api| (api.kind, api.frameless))
        .collect();
    assert!(pairs.contains(&("FramePoint3", "Point3")));
    assert!(pairs.contains(&("FrameVector3", "Vec3")));
    assert!(pairs.contains(&("FrameRotationMatrix", "Mat3")));
    assert!(pairs.contains(&("FramePose3", "RigidTransform")));
    assert!(pairs.contains(&("FrameBoundingBox3", "Aabb")));
    assert!(pairs.contains(&("FrameConvexPolygon2", "ConvexPolygon2")));
}

#[test]
fn test_required_operations_are_declared() {
    for api in frame_api_registry() {
        for name in REQUIRED_OPERATIONS {
            assert!(api.operation(name).is_some(), "{} lacks {}", api.kind, name);
        }
    }
}

#[test]
fn test_operand_kinds_match_frame_checks() {
    for api in frame_api_registry() {
        let mut names = HashSet::new();
        for entry in api.operations {
            assert!(names.insert(entry.name), "{}::{} declared twice", api.kind, entry.name);
            match entry.operand {
                Operand::FrameTagged => assert_ne!(
                    entry.check,
                    FrameCheck::Unchecked,
                    "{}::{} takes a framed operand without checking it",
                    api.kind,
                    entry.name
                ),
                Operand::Frameless | Operand::None => assert_eq!(
                    entry.check,
                    FrameCheck::Unchecked,
                    "{}::{}",
                    api.kind,
                    entry.name
                ),
                Operand::Frame => assert_eq!(entry.check, FrameCheck::FrameChanging),
            }
        }
    }
}

#[test]
fn test_equality_strengths_are_asymmetric() {
    for api in frame_api_registry() {
        assert_eq!(api.operation("equals").map(|e| e.check), Some(FrameCheck::Loose));
        assert_eq!(
            api.operation("epsilon_equals").map(|e| e.check),
            Some(FrameCheck::Checked)
        );
        assert_eq!(
            api.operation("geometrically_equals").map(|e| e.check),
            Some(FrameCheck::Checked)
        );
    }
}

#[test]
fn test_checked_exercises_fail_on_mixed_frames_only() {
    let (a, b) = two_frames();
    for api in frame_api_registry() {
        for entry in api.operations.iter().filter(|e| e.check == FrameCheck::Checked) {
            let exercise = entry.exercise.expect("checked entries carry a exercise");
            let err = exercise(&a, &b).expect_err(entry.name);
            assert!(err.is_frame_mismatch(), "{}::{}: {}", api.kind, entry.name, err);
            assert!(exercise(&b, &b).is_ok(), "{}::{}", api.kind, entry.name);
        }
    }
}

#[test]
fn test_loose_and_frame_changing_exercises_accept_mixed_frames() {
    let (a, b) = two_frames();
    for api in frame_api_registry() {
        for entry in api
            .operations
            .iter()
            .filter(|e| matches!(e.check, FrameCheck::Loose | FrameCheck::FrameChanging))
        {
            let exercise = entry.exercise.expect("loose entries carry a exercise");
            assert!(exercise(&a, &b).is_ok(), "{}::{}", api.kind, entry.name);
        }
    }
}

#[test]
fn test_registry_validates_cleanly() {
    let (a, b) = two_frames();
    let violations: Vec<String> = frame_api_registry()
        .into_iter()
        .flat_map(|api| api.validate(&a, &b))
        .collect();
    assert!(violations.is_empty(), "{:#?}", violations);
}

#[test]
fn test_every_kind_round_trips_through_another_frame() {
    let (a, b) = two_frames();
    for api in frame_api_registry() {
        let entry = api.operation("round_trip").expect("round_trip is required");
        assert_eq!(entry.check, FrameCheck::FrameChanging, "{}", api.kind);
        let exercise = entry.exercise.expect("round_trip carries an exercise");
        exercise(&a, &b).unwrap_or_else(|e| panic!("{}: {}", api.kind, e));
        exercise(&b, &a).unwrap_or_else(|e| panic!("{}: {}", api.kind, e));
    }
}

#[test]
fn test_loose_equality_is_false_across_frames() {
    let (a, b) = two_frames();
    for api in frame_api_registry() {
        let exercise = api.operation("equals").and_then(|e| e.exercise).expect(api.kind);
        assert!(exercise(&a, &b).is_ok(), "{}::equals", api.kind);
    }
}
