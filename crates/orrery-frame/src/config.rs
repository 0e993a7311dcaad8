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

use serde::{Deserialize, Serialize};

use orrery_core::math::EPSILON;

/// Per-tree settings, fixed when the root is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Joins frame names into the full `name_id`. Frame names may not contain it.
    pub name_separator: char,
    /// Re-normalize the rotation after each composition in the transform cache.
    pub normalize_rotations: bool,
    /// Default tolerance for comparisons that do not take one explicitly.
    pub epsilon: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            name_separator: ':',
            normalize_rotations: true,
            epsilon: EPSILON,
        }
    }
}

impl FrameConfig {
    /// Load frame configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load frame configuration from JSON file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded frame configuration from '{}': {:?}", path, config);
        Ok(config)
    }

    /// Save frame configuration to JSON file
    pub fn to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = FrameConfig::from_json(r#"{ "name_separator": "/" }"#).unwrap();
        assert_eq!(config.name_separator, '/');
        assert!(config.normalize_rotations);
        assert_eq!(config.epsilon, EPSILON);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("orrery_frame_config_test.json");
        let path = path.to_string_lossy().to_string();
        let config = FrameConfig {
            name_separator: '.',
            normalize_rotations: false,
            epsilon: 1e-3,
        };
        config.to_file(&path).unwrap();
        let loaded = FrameConfig::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(FrameConfig::from_json("{ not json").is_err());
    }
}
