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

//! Defines the errors raised by the reference-frame layer.

/// An error raised by a frame-checked operation or by a frame tree edit.
///
/// None of these describe an expected runtime condition: they flag a
/// programming error (mixing frames, building a malformed tree) and are never
/// retried or swallowed internally. An operation that returns one of them has
/// not modified its output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Two frame-tagged operands are expressed in different frames of one tree.
    #[error("Frame mismatch: expected '{expected}', found '{actual}'")]
    FrameMismatch {
        /// Full name of the frame the operation required.
        expected: String,
        /// Full name of the frame the operand carried.
        actual: String,
    },
    /// Two frames have no common root, so no transform relates them.
    #[error("Frames '{this}' and '{other}' do not belong to the same tree")]
    DifferentTrees {
        /// Full name of the first frame.
        this: String,
        /// Full name of the second frame.
        other: String,
    },
    /// A frame would be attached to a missing, foreign or descendant parent.
    #[error("Invalid frame hierarchy: {0}")]
    InvalidHierarchy(String),
    /// A root or fixed frame was asked to move.
    #[error("Frame '{0}' is not movable")]
    ImmutableFrame(String),
    /// A frame name is empty or contains the tree's name separator.
    #[error("Invalid frame name '{0}'")]
    InvalidName(String),
    /// A namespace already holds a live root with this name.
    #[error("A root frame named '{0}' already exists in this namespace")]
    DuplicateRoot(String),
    /// A value confined to the XY plane would leave it when changing frame.
    #[error("Transform from '{from}' to '{to}' tilts the XY plane")]
    NotXyPlanar {
        /// Full name of the frame the value is expressed in.
        from: String,
        /// Full name of the requested frame.
        to: String,
    },
}

impl FrameError {
    /// True for both flavours of frame mismatch: same-tree operands in different
    /// frames, and frames from different trees.
    pub fn is_frame_mismatch(&self) -> bool {
        matches!(
            self,
            FrameError::FrameMismatch { .. } | FrameError::DifferentTrees { .. }
        )
    }
}

/// Result alias for the reference-frame layer.
pub type Result<T> = std::result::Result<T, FrameError>;
