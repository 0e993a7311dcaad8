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

//! The reference frame tree and the frame-to-frame conversion algorithm.
//!
//! A [`ReferenceFrame`] is a cheap, cloneable handle to a node of a rooted tree.
//! Children hold their parent strongly and parents hold their children weakly,
//! so a subtree lives exactly as long as someone holds one of its frames.
//!
//! # Cache invalidation
//!
//! Each node caches its transform to the root together with a version number
//! drawn from a per-tree counter. A node's cache is valid when its version is
//! set and no ancestor carries a newer version. Moving a frame only clears
//! its own version, which is O(1); the descendants notice on their next
//! resolution, when the ancestor is recomputed and receives a version newer
//! than theirs.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use orrery_core::math::{RigidTransform, Transformable, Vec3};

use crate::builder::FrameBuilder;
use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::provider::TransformProvider;

/// Version of a node whose cached transform to root must be recomputed.
const STALE: u64 = 0;
/// Version of every root. Roots never change.
const ROOT_VERSION: u64 = 1;

/// State shared by every frame of one tree.
pub(crate) struct TreeState {
    root: Weak<FrameNode>,
    config: FrameConfig,
    next_version: Cell<u64>,
    next_index: Cell<usize>,
}

impl TreeState {
    fn bump_version(&self) -> u64 {
        let version = self.next_version.get();
        self.next_version.set(version + 1);
        version
    }

    fn bump_index(&self) -> usize {
        let index = self.next_index.get();
        self.next_index.set(index + 1);
        index
    }
}

pub(crate) struct FrameNode {
    name: String,
    index: usize,
    tree: Rc<TreeState>,
    parent: RefCell<Option<ReferenceFrame>>,
    children: RefCell<Vec<Weak<FrameNode>>>,
    movable: bool,
    transform_to_parent: Cell<RigidTransform>,
    transform_to_root: Cell<RigidTransform>,
    version: Cell<u64>,
    provider: RefCell<Option<Box<dyn TransformProvider>>>,
}

/// A named coordinate system, node of a rooted tree.
///
/// Equality and hashing are by identity: two handles are equal when they point
/// at the same node, whatever their names or transforms.
///
/// Frames are `!Send` and `!Sync`. A tree belongs to one thread.
#[derive(Clone)]
pub struct ReferenceFrame(pub(crate) Rc<FrameNode>);

impl ReferenceFrame {
    // --- Construction ---

    /// Creates the root of a new tree with the default configuration.
    pub fn new_root(name: &str) -> Result<Self> {
        Self::new_root_with_config(name, FrameConfig::default())
    }

    /// Creates the root of a new tree that uses `config`.
    pub fn new_root_with_config(name: &str, config: FrameConfig) -> Result<Self> {
        validate_name(name, config.name_separator)?;
        let node = Rc::new_cyclic(|root| FrameNode {
            name: name.to_string(),
            index: 0,
            tree: Rc::new(TreeState {
                root: root.clone(),
                config,
                next_version: Cell::new(ROOT_VERSION + 1),
                next_index: Cell::new(1),
            }),
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            movable: false,
            transform_to_parent: Cell::new(RigidTransform::IDENTITY),
            transform_to_root: Cell::new(RigidTransform::IDENTITY),
            version: Cell::new(ROOT_VERSION),
            provider: RefCell::new(None),
        });
        log::info!("Created root frame '{}'", name);
        Ok(Self(node))
    }

    /// Attaches a new child. Used by [`FrameBuilder`].
    pub(crate) fn attach_child(
        parent: &ReferenceFrame,
        name: &str,
        transform_to_parent: RigidTransform,
        movable: bool,
        provider: Option<Box<dyn TransformProvider>>,
    ) -> Result<Self> {
        let tree = parent.0.tree.clone();
        validate_name(name, tree.config.name_separator)?;

        let mut transform_to_root = parent.transform_to_root() * transform_to_parent;
        if tree.config.normalize_rotations {
            transform_to_root.normalize_rotation();
        }
        let node = Rc::new(FrameNode {
            name: name.to_string(),
            index: tree.bump_index(),
            version: Cell::new(tree.bump_version()),
            tree,
            parent: RefCell::new(Some(parent.clone())),
            children: RefCell::new(Vec::new()),
            movable,
            transform_to_parent: Cell::new(transform_to_parent),
            transform_to_root: Cell::new(transform_to_root),
            provider: RefCell::new(provider),
        });
        parent.0.children.borrow_mut().push(Rc::downgrade(&node));
        let frame = Self(node);
        log::debug!(
            "Created {} frame '{}' (index {})",
            if movable { "movable" } else { "fixed" },
            frame.name_id(),
            frame.frame_index()
        );
        Ok(frame)
    }

    /// A fixed child at `transform_to_parent`.
    pub fn fixed_child(&self, name: &str, transform_to_parent: RigidTransform) -> Result<Self> {
        FrameBuilder::new(name)
            .parent(self)
            .transform_to_parent(transform_to_parent)
            .build()
    }

    /// A fixed child offset from this frame by a pure translation.
    pub fn fixed_translation_child(&self, name: &str, translation: Vec3) -> Result<Self> {
        self.fixed_child(name, RigidTransform::from_translation(translation))
    }

    /// A movable child starting at `transform_to_parent`, without a provider.
    pub fn movable_child(&self, name: &str, transform_to_parent: RigidTransform) -> Result<Self> {
        FrameBuilder::new(name)
            .parent(self)
            .transform_to_parent(transform_to_parent)
            .movable()
            .build()
    }

    // --- Identity and structure ---

    /// The frame's own name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The names from the root down to this frame, joined by the tree's separator.
    pub fn name_id(&self) -> String {
        let separator = self.0.tree.config.name_separator.to_string();
        self.path_from_root()
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(&separator)
    }

    /// Unique within the tree. The root is 0, children count up in creation order.
    pub fn frame_index(&self) -> usize {
        self.0.index
    }

    /// The configuration of the tree this frame belongs to.
    pub fn config(&self) -> &FrameConfig {
        &self.0.tree.config
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.borrow().is_none()
    }

    /// Whether this frame can be moved relative to its parent.
    pub fn is_movable(&self) -> bool {
        self.0.movable
    }

    /// True when neither this frame nor any ancestor can move.
    pub fn is_stationary(&self) -> bool {
        let mut current = Some(self.clone());
        while let Some(frame) = current {
            if frame.is_movable() {
                return false;
            }
            current = frame.parent();
        }
        true
    }

    pub fn parent(&self) -> Option<ReferenceFrame> {
        self.0.parent.borrow().clone()
    }

    /// The root of this frame's tree.
    pub fn root(&self) -> ReferenceFrame {
        match self.0.tree.root.upgrade() {
            Some(root) => Self(root),
            // Every frame keeps its ancestors alive, so this only runs for a root
            // being dropped.
            None => self.clone(),
        }
    }

    /// The live children, in creation order. Dropped children are pruned.
    pub fn children(&self) -> Vec<ReferenceFrame> {
        let mut children = self.0.children.borrow_mut();
        children.retain(|w| w.strong_count() > 0);
        children.iter().filter_map(|w| w.upgrade().map(Self)).collect()
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// The chain of frames from the root down to this one, both included.
    pub fn path_from_root(&self) -> Vec<ReferenceFrame> {
        let mut path = vec![self.clone()];
        while let Some(parent) = path[path.len() - 1].parent() {
            path.push(parent);
        }
        path.reverse();
        path
    }

    /// Whether both frames live in the same tree.
    pub fn same_tree(&self, other: &ReferenceFrame) -> bool {
        Rc::ptr_eq(&self.0.tree, &other.0.tree)
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &ReferenceFrame) -> bool {
        if !self.same_tree(other) {
            return false;
        }
        let mut current = other.parent();
        while let Some(frame) = current {
            if frame == *self {
                return true;
            }
            current = frame.parent();
        }
        false
    }

    /// The deepest frame that is an ancestor of, or equal to, both frames.
    pub fn common_ancestor(&self, other: &ReferenceFrame) -> Result<ReferenceFrame> {
        self.verify_same_roots(other)?;
        let ours: HashSet<*const FrameNode> =
            self.path_from_root().iter().map(|f| Rc::as_ptr(&f.0)).collect();
        let mut current = Some(other.clone());
        while let Some(frame) = current {
            if ours.contains(&Rc::as_ptr(&frame.0)) {
                return Ok(frame);
            }
            current = frame.parent();
        }
        Ok(self.root())
    }

    /// Every live frame of the subtree rooted here, breadth first.
    pub fn subtree(&self) -> Vec<ReferenceFrame> {
        let mut frames = Vec::new();
        let mut queue = VecDeque::from([self.clone()]);
        while let Some(frame) = queue.pop_front() {
            queue.extend(frame.children());
            frames.push(frame);
        }
        frames
    }

    // --- Frame checks ---

    /// Fails with a frame mismatch unless `other` is this very frame.
    pub fn check_frame_match(&self, other: &ReferenceFrame) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(FrameError::FrameMismatch {
                expected: self.name_id(),
                actual: other.name_id(),
            })
        }
    }

    /// Fails unless both frames belong to the same tree.
    pub fn verify_same_roots(&self, other: &ReferenceFrame) -> Result<()> {
        if self.same_tree(other) {
            Ok(())
        } else {
            Err(FrameError::DifferentTrees {
                this: self.name_id(),
                other: other.name_id(),
            })
        }
    }

    // --- Motion ---

    /// The current transform from this frame to its parent. Identity for a root.
    pub fn transform_to_parent(&self) -> RigidTransform {
        self.0.transform_to_parent.get()
    }

    fn check_movable(&self) -> Result<()> {
        if self.0.movable {
            Ok(())
        } else {
            Err(FrameError::ImmutableFrame(self.name_id()))
        }
    }

    fn mark_stale(&self) {
        self.0.version.set(STALE);
        log::trace!("Frame '{}' and its subtree are stale", self.name());
    }

    /// Moves the frame relative to its parent. The frame and its subtree become stale.
    pub fn set_transform_to_parent(&self, transform_to_parent: RigidTransform) -> Result<()> {
        self.check_movable()?;
        self.0.transform_to_parent.set(transform_to_parent);
        self.mark_stale();
        Ok(())
    }

    /// Pulls a new transform to parent from the frame's provider.
    ///
    /// Without a provider the transform is kept and the frame is only marked stale.
    pub fn update(&self) -> Result<()> {
        self.check_movable()?;
        if let Some(provider) = self.0.provider.borrow_mut().as_mut() {
            let mut transform = self.0.transform_to_parent.get();
            provider.update_transform_to_parent(&mut transform);
            self.0.transform_to_parent.set(transform);
        }
        self.mark_stale();
        Ok(())
    }

    /// Moves this frame under `new_parent`, keeping its transform to parent.
    pub fn set_parent(&self, new_parent: &ReferenceFrame) -> Result<()> {
        self.check_movable()?;
        if !self.same_tree(new_parent) {
            return Err(FrameError::InvalidHierarchy(format!(
                "'{}' cannot be attached to '{}' from another tree",
                self.name_id(),
                new_parent.name_id()
            )));
        }
        if new_parent == self || self.is_ancestor_of(new_parent) {
            return Err(FrameError::InvalidHierarchy(format!(
                "attaching '{}' to '{}' would create a cycle",
                self.name_id(),
                new_parent.name_id()
            )));
        }

        if let Some(old_parent) = self.parent() {
            old_parent
                .0
                .children
                .borrow_mut()
                .retain(|w| !std::ptr::eq(w.as_ptr(), Rc::as_ptr(&self.0)));
        }
        new_parent
            .0
            .children
            .borrow_mut()
            .push(Rc::downgrade(&self.0));
        *self.0.parent.borrow_mut() = Some(new_parent.clone());
        log::debug!("Re-parented frame '{}'", self.name_id());
        self.mark_stale();
        Ok(())
    }

    /// Whether the cached transform to root would be recomputed by the next read.
    pub fn is_stale(&self) -> bool {
        let mut max_version = 0;
        for frame in self.path_from_root() {
            let version = frame.0.version.get();
            if version == STALE || version < max_version {
                return true;
            }
            max_version = version;
        }
        false
    }

    /// The transform from this frame to the root of its tree.
    ///
    /// Stale ancestors are recomputed top-down and cached on the way.
    pub fn transform_to_root(&self) -> RigidTransform {
        if self.is_root() {
            return RigidTransform::IDENTITY;
        }

        let tree = &self.0.tree;
        let path = self.path_from_root();
        let mut max_version = path[0].0.version.get();
        let mut recomputed = 0usize;
        for pair in path.windows(2) {
            let (parent, node) = (&pair[0].0, &pair[1].0);
            let version = node.version.get();
            if version == STALE || version < max_version {
                let mut transform =
                    parent.transform_to_root.get() * node.transform_to_parent.get();
                if tree.config.normalize_rotations {
                    transform.normalize_rotation();
                }
                node.transform_to_root.set(transform);
                node.version.set(tree.bump_version());
                recomputed += 1;
            }
            max_version = max_version.max(node.version.get());
        }
        if recomputed > 0 {
            log::trace!(
                "Recomputed {} cached transform(s) resolving '{}'",
                recomputed,
                self.name()
            );
        }
        self.0.transform_to_root.get()
    }

    // --- Conversion ---

    /// The transform that maps coordinates in this frame to coordinates in `desired`.
    ///
    /// Direct relatives are handled from the local transforms alone; any other
    /// pair goes through the root. Fails if the frames are in different trees.
    pub fn transform_to_desired_frame(&self, desired: &ReferenceFrame) -> Result<RigidTransform> {
        if self == desired {
            return Ok(RigidTransform::IDENTITY);
        }
        self.verify_same_roots(desired)?;

        let parent = self.parent();
        let desired_parent = desired.parent();
        let transform = if self.is_root() {
            desired.transform_to_root().inverse()
        } else if desired.is_root() {
            self.transform_to_root()
        } else if parent.as_ref() == Some(desired) {
            self.transform_to_parent()
        } else if desired_parent.as_ref() == Some(self) {
            desired.transform_to_parent().inverse()
        } else if parent.is_some() && parent == desired_parent {
            desired.transform_to_parent().inverse() * self.transform_to_parent()
        } else {
            desired.transform_to_root().inverse() * self.transform_to_root()
        };
        Ok(transform)
    }

    /// Re-expresses `value`, given in this frame, in `desired`.
    pub fn transform_from_this_to<T: Transformable + ?Sized>(
        &self,
        desired: &ReferenceFrame,
        value: &mut T,
    ) -> Result<()> {
        let transform = self.transform_to_desired_frame(desired)?;
        crate::framed::check_supported(value, &transform, self, desired)?;
        value.apply_transform(&transform);
        Ok(())
    }
}

/// Names may not be empty nor contain the tree's separator.
fn validate_name(name: &str, separator: char) -> Result<()> {
    if name.is_empty() || name.contains(separator) {
        Err(FrameError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

impl PartialEq for ReferenceFrame {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ReferenceFrame {}

impl Hash for ReferenceFrame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceFrame")
            .field("name_id", &self.name_id())
            .field("index", &self.0.index)
            .field("movable", &self.0.movable)
            .finish()
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use orrery_core::math::{Point3, Quaternion, FRAC_PI_2};

    fn translation(x: f32, y: f32, z: f32) -> RigidTransform {
        RigidTransform::from_translation(Vec3::new(x, y, z))
    }

    #[test]
    fn test_root_properties() {
        let root = ReferenceFrame::new_root("world").unwrap();
        assert!(root.is_root());
        assert!(root.is_stationary());
        assert_eq!(root.frame_index(), 0);
        assert_eq!(root.root(), root);
        assert!(!root.is_stale());
        assert!(root.transform_to_root().is_identity(1e-6));
        assert!(matches!(
            root.set_transform_to_parent(translation(1.0, 0.0, 0.0)),
            Err(FrameError::ImmutableFrame(_))
        ));
    }

    #[test]
    fn test_name_validation() {
        assert!(matches!(
            ReferenceFrame::new_root("a:b"),
            Err(FrameError::InvalidName(_))
        ));
        let root = ReferenceFrame::new_root("world").unwrap();
        assert!(matches!(
            root.fixed_child("", RigidTransform::IDENTITY),
            Err(FrameError::InvalidName(_))
        ));
    }

    #[test]
    fn test_name_id_and_indices() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let robot = root.movable_child("robot", RigidTransform::IDENTITY).unwrap();
        let camera = robot.fixed_child("camera", RigidTransform::IDENTITY).unwrap();
        assert_eq!(camera.name_id(), "world:robot:camera");
        assert_eq!(robot.frame_index(), 1);
        assert_eq!(camera.frame_index(), 2);
        assert!(!camera.is_stationary());
        assert_eq!(root.child_count(), 1);
        assert_eq!(camera.path_from_root(), vec![root.clone(), robot, camera.clone()]);
        assert_eq!(camera.root(), root);
    }

    #[test]
    fn test_new_frame_is_fresh() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let a = root.fixed_child("a", translation(1.0, 0.0, 0.0)).unwrap();
        assert!(!a.is_stale());
        assert_relative_eq!(a.transform_to_root().translation, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_staleness_reaches_descendants_lazily() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let mid = root.movable_child("mid", translation(1.0, 0.0, 0.0)).unwrap();
        let leaf = mid.fixed_child("leaf", translation(0.0, 1.0, 0.0)).unwrap();
        let sibling = root.fixed_child("sibling", translation(0.0, 0.0, 1.0)).unwrap();

        mid.set_transform_to_parent(translation(5.0, 0.0, 0.0)).unwrap();
        assert!(mid.is_stale());
        assert!(leaf.is_stale());
        assert!(!sibling.is_stale());

        assert_relative_eq!(leaf.transform_to_root().translation, Vec3::new(5.0, 1.0, 0.0));
        assert!(!mid.is_stale());
        assert!(!leaf.is_stale());
    }

    #[test]
    fn test_descendant_resolved_after_ancestor_already_recomputed() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let mid = root.movable_child("mid", translation(1.0, 0.0, 0.0)).unwrap();
        let leaf = mid.fixed_child("leaf", translation(0.0, 1.0, 0.0)).unwrap();

        mid.set_transform_to_parent(translation(2.0, 0.0, 0.0)).unwrap();
        // Resolving mid first clears its own staleness but must leave leaf stale.
        assert_relative_eq!(mid.transform_to_root().translation, Vec3::new(2.0, 0.0, 0.0));
        assert!(leaf.is_stale());
        assert_relative_eq!(leaf.transform_to_root().translation, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_update_pulls_from_provider() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let mut x = 0.0;
        let joint = FrameBuilder::new("joint")
            .parent(&root)
            .provider(move |t: &mut RigidTransform| {
                x += 1.0;
                t.translation = Vec3::new(x, 0.0, 0.0);
            })
            .build()
            .unwrap();
        joint.update().unwrap();
        joint.update().unwrap();
        assert_relative_eq!(joint.transform_to_root().translation, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_update_without_provider_marks_stale() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let frame = root.movable_child("m", translation(1.0, 0.0, 0.0)).unwrap();
        frame.update().unwrap();
        assert!(frame.is_stale());
        assert_relative_eq!(frame.transform_to_root().translation, Vec3::new(1.0, 0.0, 0.0));

        let fixed = root.fixed_child("f", RigidTransform::IDENTITY).unwrap();
        assert!(matches!(fixed.update(), Err(FrameError::ImmutableFrame(_))));
    }

    #[test]
    fn test_fast_paths_agree_with_general_path() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let rotation = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let a = root
            .fixed_child("a", RigidTransform::new(rotation, Vec3::new(1.0, 2.0, 0.0)))
            .unwrap();
        let b = a.fixed_child("b", translation(0.0, 0.0, 3.0)).unwrap();
        let c = a.fixed_child("c", RigidTransform::new(rotation, Vec3::X)).unwrap();

        let general = |from: &ReferenceFrame, to: &ReferenceFrame| {
            to.transform_to_root().inverse() * from.transform_to_root()
        };
        for (from, to) in [(&b, &a), (&a, &b), (&b, &c), (&root, &b), (&b, &root)] {
            let fast = from.transform_to_desired_frame(to).unwrap();
            let slow = general(from, to);
            let p = Point3::new(0.3, -0.7, 1.1);
            assert_relative_eq!(fast.transform_point(p), slow.transform_point(p), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_set_parent_rules() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let a = root.movable_child("a", translation(1.0, 0.0, 0.0)).unwrap();
        let b = a.movable_child("b", translation(0.0, 1.0, 0.0)).unwrap();
        let c = root.fixed_child("c", translation(0.0, 0.0, 1.0)).unwrap();

        assert!(matches!(a.set_parent(&b), Err(FrameError::InvalidHierarchy(_))));
        assert!(matches!(a.set_parent(&a), Err(FrameError::InvalidHierarchy(_))));
        assert!(matches!(c.set_parent(&a), Err(FrameError::ImmutableFrame(_))));

        b.set_parent(&c).unwrap();
        assert_eq!(b.parent(), Some(c.clone()));
        assert_eq!(a.child_count(), 0);
        assert_eq!(c.child_count(), 1);
        assert_eq!(b.name_id(), "world:c:b");
        assert_relative_eq!(b.transform_to_root().translation, Vec3::new(0.0, 1.0, 1.0));

        let other = ReferenceFrame::new_root("other").unwrap();
        assert!(matches!(b.set_parent(&other), Err(FrameError::InvalidHierarchy(_))));
    }

    #[test]
    fn test_dropped_children_are_pruned() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let kept = root.fixed_child("kept", RigidTransform::IDENTITY).unwrap();
        {
            let _temporary = root.fixed_child("temporary", RigidTransform::IDENTITY).unwrap();
            assert_eq!(root.child_count(), 2);
        }
        assert_eq!(root.children(), vec![kept]);
    }

    #[test]
    fn test_common_ancestor() {
        let root = ReferenceFrame::new_root("world").unwrap();
        let a = root.fixed_child("a", RigidTransform::IDENTITY).unwrap();
        let b = a.fixed_child("b", RigidTransform::IDENTITY).unwrap();
        let c = a.fixed_child("c", RigidTransform::IDENTITY).unwrap();
        let d = root.fixed_child("d", RigidTransform::IDENTITY).unwrap();
        assert_eq!(b.common_ancestor(&c).unwrap(), a);
        assert_eq!(b.common_ancestor(&a).unwrap(), a);
        assert_eq!(b.common_ancestor(&d).unwrap(), root);
        assert!(a.is_ancestor_of(&b));
        assert!(!b.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));

        let other = ReferenceFrame::new_root("other").unwrap();
        assert!(b.common_ancestor(&other).unwrap_err().is_frame_mismatch());
    }
}
