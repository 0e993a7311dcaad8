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

//! # Orrery Core
//!
//! Frameless geometry: vectors, points, rotations, rigid transforms, bounding
//! volumes, polygons, convex polytopes and shape primitives, plus the narrow
//! phase that evaluates collisions between shapes.
//!
//! Nothing in this crate knows about reference frames. The `orrery-frame` and
//! `orrery-shape` crates wrap these values and check frames before calling in.

pub mod collision;
pub mod math;
pub mod shape;

pub use collision::{CollisionResult, NarrowPhase};
pub use math::{GeometricEq, Transformable};
