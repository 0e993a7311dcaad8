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
//! # Orrery Shape
//!
//! Shapes, convex polytopes and collision queries tagged with reference frames.
//!
//! Queries that take a framed point or vector fail with a frame mismatch when
//! it is not in the frame of the shape. Collisions between shapes in different
//! frames of one tree are evaluated in the frame of the second shape and
//! reported back in the frame of each shape.

pub mod error;
pub mod frame_collision;
pub mod frame_polytope;
pub mod frame_shape;

pub use error::{Result, ShapeError};
pub use frame_collision::{evaluate_frame_collision, FrameCollisionResult, FrameNarrowPhase};
pub use frame_polytope::{FrameConvexPolytope3, FrameFace3View, FrameHalfEdge3View, FrameVertex3View};
pub use frame_shape::{FramePointCollision, FrameShape3};
