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

//! Frame construction and whole-tree views.

use std::collections::HashSet;

use orrery_core::math::RigidTransform;

use crate::error::{FrameError, Result};
use crate::frame::ReferenceFrame;
use crate::provider::TransformProvider;

/// Collects the options of a new child frame.
///
/// ```ignore
/// let arm = FrameBuilder::new("arm")
///     .parent(&base)
///     .transform_to_parent(RigidTransform::from_translation(Vec3::Z))
///     .provider(live.clone())
///     .build()?;
/// ```
pub struct FrameBuilder {
    name: String,
    parent: Option<ReferenceFrame>,
    transform_to_parent: RigidTransform,
    movable: bool,
    provider: Option<Box<dyn TransformProvider>>,
}

impl FrameBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            transform_to_parent: RigidTransform::IDENTITY,
            movable: false,
            provider: None,
        }
    }

    pub fn parent(mut self, parent: &ReferenceFrame) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Initial transform from the new frame to its parent. Identity by default.
    pub fn transform_to_parent(mut self, transform: RigidTransform) -> Self {
        self.transform_to_parent = transform;
        self
    }

    /// Lets the frame move after construction.
    pub fn movable(mut self) -> Self {
        self.movable = true;
        self
    }

    /// Sets the source `update()` pulls from. Implies [`FrameBuilder::movable`].
    pub fn provider(mut self, provider: impl TransformProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self.movable = true;
        self
    }

    /// Attaches the frame. Fails with `InvalidHierarchy` when no parent was given.
    pub fn build(self) -> Result<ReferenceFrame> {
        let parent = self.parent.ok_or_else(|| {
            FrameError::InvalidHierarchy(format!("frame '{}' has no parent", self.name))
        })?;
        ReferenceFrame::attach_child(
            &parent,
            &self.name,
            self.transform_to_parent,
            self.movable,
            self.provider,
        )
    }

    /// Like [`FrameBuilder::build`], but also requires the parent to belong to `tree`.
    pub fn build_in(self, tree: &FrameTree) -> Result<ReferenceFrame> {
        match &self.parent {
            Some(parent) if !tree.contains(parent) => Err(FrameError::InvalidHierarchy(format!(
                "parent '{}' of frame '{}' is not part of tree '{}'",
                parent.name_id(),
                self.name,
                tree.root().name()
            ))),
            _ => self.build(),
        }
    }
}

/// A view over a whole tree through its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTree {
    root: ReferenceFrame,
}

impl FrameTree {
    /// The tree that `frame` belongs to.
    pub fn of(frame: &ReferenceFrame) -> Self {
        Self { root: frame.root() }
    }

    pub fn root(&self) -> &ReferenceFrame {
        &self.root
    }

    pub fn contains(&self, frame: &ReferenceFrame) -> bool {
        self.root.same_tree(frame)
    }

    /// All live frames, breadth first from the root.
    pub fn frames(&self) -> Vec<ReferenceFrame> {
        self.root.subtree()
    }

    pub fn len(&self) -> usize {
        self.frames().len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Looks a frame up by its full `name_id`.
    pub fn find(&self, name_id: &str) -> Option<ReferenceFrame> {
        self.frames().into_iter().find(|f| f.name_id() == name_id)
    }

    /// Every movable frame of the tree, for a per-tick `update()` sweep.
    pub fn movable_frames(&self) -> Vec<ReferenceFrame> {
        self.frames().into_iter().filter(|f| f.is_movable()).collect()
    }

    /// Calls `update()` on each movable frame, parents before children.
    pub fn update_all(&self) -> Result<usize> {
        let movable = self.movable_frames();
        for frame in &movable {
            frame.update()?;
        }
        Ok(movable.len())
    }

    /// Frame indices of the live frames. Each index appears once.
    pub fn indices(&self) -> HashSet<usize> {
        self.frames().iter().map(|f| f.frame_index()).collect()
    }
}
