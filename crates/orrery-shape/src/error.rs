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

//! Errors of the frame-checked shape layer.

use orrery_frame::FrameError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// The operands' frames do not allow the operation.
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// The narrow phase has no formula for this pair of shape kinds.
    #[error("No collision formula between a {a} and a {b}")]
    UnsupportedPair {
        a: &'static str,
        b: &'static str,
    },
    /// The query needs at least one vertex.
    #[error("The polytope has no vertices")]
    EmptyPolytope,
}

impl ShapeError {
    pub fn is_frame_mismatch(&self) -> bool {
        matches!(self, ShapeError::Frame(e) if e.is_frame_mismatch())
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_errors_convert() {
        fn fails() -> Result<()> {
            Err(FrameError::ImmutableFrame("world".to_string()))?;
            Ok(())
        }
        assert_eq!(
            fails().unwrap_err(),
            ShapeError::Frame(FrameError::ImmutableFrame("world".to_string()))
        );
        assert_eq!(
            ShapeError::UnsupportedPair { a: "box", b: "capsule" }.to_string(),
            "No collision formula between a box and a capsule"
        );
    }
}
