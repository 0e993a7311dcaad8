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
// Orrery Sandbox
// Walks through frame conversions, frame-checked values and framed collisions.

use anyhow::{anyhow, Result};
use orrery_core::math::{Point3, Quaternion, RigidTransform, Vec3};
use orrery_core::shape::{Box3, Sphere3};
use orrery_frame::{
    frame_api_registry, FrameBuilder, FrameConfig, FrameMutable, FrameNamespace,
    FramePoint3, FrameReadOnly, FrameTree, FrameVector3, LiveTransform, ReferenceFrame,
};
use orrery_shape::{evaluate_frame_collision, FrameShape3};

/// Two siblings of the root: `a` one unit along x, `b` one unit along y.
fn sibling_conversion(root: &ReferenceFrame) -> Result<()> {
    let source = LiveTransform::new(RigidTransform::from_translation(Vec3::X));
    let a = FrameBuilder::new("a")
        .parent(root)
        .provider(source.clone())
        .build()?;
    let b = root.fixed_translation_child("b", Vec3::Y)?;

    let mut point = FramePoint3::zero(&a);
    point.change_frame(&b)?;
    log::info!("Origin of '{}' seen from '{}': {:?}", a, b, point.frameless());

    source.set(RigidTransform::from_translation(Vec3::new(2.0, 0.0, 0.0)));
    a.update()?;
    let mut point = FramePoint3::zero(&a);
    point.change_frame(&b)?;
    log::info!(
        "After moving '{}': {:?} ('{}' stale: {})",
        a,
        point.frameless(),
        b,
        b.is_stale()
    );
    Ok(())
}

/// Values from different frames refuse to combine until one is converted.
fn frame_checks(root: &ReferenceFrame) -> Result<()> {
    let arm = root.fixed_child(
        "arm",
        RigidTransform::new(
            Quaternion::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 0.0, 1.0),
        ),
    )?;
    let up = FrameVector3::new(root, Vec3::Z);
    let mut reach = FrameVector3::new(&arm, Vec3::X);

    match up.dot(&reach) {
        Ok(_) => log::warn!("Mixed-frame dot product unexpectedly succeeded"),
        Err(e) => log::info!("Refused as expected: {e}"),
    }
    log::info!("Loose equality across frames: {}", up == reach);

    reach.change_frame(root)?;
    log::info!("Arm reach in '{}': {:?}, dot with up = {}", root, reach.frameless(), up.dot(&reach)?);
    Ok(())
}

fn framed_collision(root: &ReferenceFrame) -> Result<()> {
    let table = root.fixed_translation_child("table", Vec3::new(0.0, 0.0, 0.5))?;
    let ball_frame = root.movable_child("ball", RigidTransform::from_translation(Vec3::new(0.0, 0.0, 2.0)))?;

    let top = FrameShape3::new(&table, Box3::from_center_size(Point3::ORIGIN, Vec3::new(2.0, 2.0, 1.0)));
    let ball = FrameShape3::new(&ball_frame, Sphere3::new(Point3::ORIGIN, 0.25));

    for height in [2.0, 1.2, 1.1] {
        ball_frame.set_transform_to_parent(RigidTransform::from_translation(Vec3::new(0.0, 0.0, height)))?;
        let result = evaluate_frame_collision(&ball, &top)?;
        log::info!(
            "Ball at {height}: colliding = {}, distance = {:.3}, contact on table = {:?}",
            result.colliding,
            result.signed_distance,
            result.point_on_b.frameless()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => FrameConfig::from_file(&path)
            .map_err(|e| anyhow!("Failed to load frame configuration from {path}: {e}"))?,
        None => FrameConfig::default(),
    };
    let mut namespace = FrameNamespace::with_config(config);
    let root = namespace.create_root("world")?;

    sibling_conversion(&root)?;
    frame_checks(&root)?;
    framed_collision(&root)?;

    let tree = FrameTree::of(&root);
    log::info!("'{}' holds {} frames", root, tree.len());

    let registry = frame_api_registry();
    let mut violations = 0;
    let other = root.fixed_translation_child("offset", Vec3::ONE)?;
    for api in &registry {
        for violation in api.validate(&root, &other) {
            log::warn!("{violation}");
            violations += 1;
        }
    }
    log::info!("{} framed kinds registered, {} violations", registry.len(), violations);
    Ok(())
}
