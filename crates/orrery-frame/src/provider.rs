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

//! Sources of a movable frame's transform to its parent.

use std::cell::Cell;
use std::rc::Rc;

use orrery_core::math::RigidTransform;

/// Recomputes a frame's transform to its parent when the frame is updated.
///
/// The provider receives the current transform and overwrites it in place. It
/// is called by [`ReferenceFrame::update`](crate::ReferenceFrame::update) and
/// nowhere else.
pub trait TransformProvider {
    /// Writes the new transform from the frame to its parent.
    fn update_transform_to_parent(&mut self, transform_to_parent: &mut RigidTransform);
}

impl<F> TransformProvider for F
where
    F: FnMut(&mut RigidTransform),
{
    fn update_transform_to_parent(&mut self, transform_to_parent: &mut RigidTransform) {
        self(transform_to_parent)
    }
}

/// A shared, externally written transform.
///
/// Clones share the same cell: a writer keeps one clone and sets new values,
/// the frame holds another as its provider and picks the latest value up on
/// each `update()`.
#[derive(Debug, Clone, Default)]
pub struct LiveTransform(Rc<Cell<RigidTransform>>);

impl LiveTransform {
    pub fn new(initial: RigidTransform) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn set(&self, transform: RigidTransform) {
        self.0.set(transform);
    }

    pub fn get(&self) -> RigidTransform {
        self.0.get()
    }
}

impl TransformProvider for LiveTransform {
    fn update_transform_to_parent(&mut self, transform_to_parent: &mut RigidTransform) {
        *transform_to_parent = self.0.get();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::math::Vec3;

    #[test]
    fn test_closure_provider() {
        let mut ticks = 0.0;
        let mut provider = move |t: &mut RigidTransform| {
            ticks += 1.0;
            t.translation = Vec3::new(ticks, 0.0, 0.0);
        };
        let mut transform = RigidTransform::IDENTITY;
        provider.update_transform_to_parent(&mut transform);
        provider.update_transform_to_parent(&mut transform);
        assert_eq!(transform.translation, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_live_transform_clones_share_state() {
        let writer = LiveTransform::default();
        let mut reader = writer.clone();
        writer.set(RigidTransform::from_translation(Vec3::Y));
        let mut transform = RigidTransform::IDENTITY;
        reader.update_transform_to_parent(&mut transform);
        assert_eq!(transform.translation, Vec3::Y);
    }
}
