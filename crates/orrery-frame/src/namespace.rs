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

//! Named scopes for root frames.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frame::{FrameNode, ReferenceFrame};

/// A registry of live roots, keyed by name.
///
/// Two live roots of one namespace never share a name. A root whose last
/// handle is dropped frees its name. The namespace itself holds no frame alive.
#[derive(Default)]
pub struct FrameNamespace {
    roots: HashMap<String, Weak<FrameNode>>,
    config: FrameConfig,
}

impl FrameNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A namespace whose roots are all created with `config`.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            roots: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Creates and registers a new root. Fails with `DuplicateRoot` while a
    /// root of that name is alive.
    pub fn create_root(&mut self, name: &str) -> Result<ReferenceFrame> {
        if self.get(name).is_some() {
            log::warn!("Root frame '{}' already exists in this namespace", name);
            return Err(FrameError::DuplicateRoot(name.to_string()));
        }
        let root = ReferenceFrame::new_root_with_config(name, self.config.clone())?;
        self.roots.insert(name.to_string(), Rc::downgrade(&root.0));
        log::info!("Registered root frame '{}' ({} live)", name, self.len());
        Ok(root)
    }

    /// The live root named `name`, if any.
    pub fn get(&self, name: &str) -> Option<ReferenceFrame> {
        self.roots.get(name)?.upgrade().map(ReferenceFrame)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Live roots, sorted by name.
    pub fn roots(&self) -> Vec<ReferenceFrame> {
        let mut roots: Vec<_> = self
            .roots
            .values()
            .filter_map(|w| w.upgrade().map(ReferenceFrame))
            .collect();
        roots.sort_by(|a, b| a.name().cmp(b.name()));
        roots
    }

    pub fn len(&self) -> usize {
        self.roots.values().filter(|w| w.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets the names of dropped roots.
    pub fn prune(&mut self) {
        self.roots.retain(|_, w| w.strong_count() > 0);
    }
}
