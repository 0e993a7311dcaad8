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

//! # Orrery Frame
//!
//! Reference frames and frame-checked geometry.
//!
//! A [`ReferenceFrame`] is a node of a rooted tree. Each frame knows its
//! transform to its parent and caches its transform to the root, recomputing
//! it lazily when an ancestor moves. [`Framed`] values pair a frameless value
//! from `orrery-core` with the frame it is expressed in, and refuse to combine
//! values from different frames.
//!
//! Trees are single-threaded: frames are neither `Send` nor `Sync`.

pub mod api;
pub mod builder;
pub mod config;
pub mod error;
pub mod frame;
pub mod framed;
pub mod namespace;
pub mod provider;
pub mod supplier;

pub use api::{
    ensure, frame_api_registry, ApiEntry, Exercise, FrameApi, FrameCheck, Operand, REQUIRED_OPERATIONS,
};
pub use builder::{FrameBuilder, FrameTree};
pub use config::FrameConfig;
pub use error::{FrameError, Result};
pub use frame::ReferenceFrame;
pub use framed::*;
pub use namespace::FrameNamespace;
pub use provider::{LiveTransform, TransformProvider};
pub use supplier::{FrameVertex2Supplier, FrameVertex3Supplier};
