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

//! Collections of framed vertices handed to frame-aware consumers.
//!
//! Building a supplier never looks at frames. The consumer checks that every
//! vertex is in its own frame when it takes the vertices, and fails before
//! modifying anything if one is not.

use orrery_core::math::{Point2, Point3};

use crate::error::Result;
use crate::frame::ReferenceFrame;
use crate::framed::{FrameHolder, FrameReadOnly, Framed};

macro_rules! vertex_supplier {
    ($(#[$meta:meta])* $name:ident, $point:ty) => {
        $(#[$meta])*
        pub trait $name {
            type Vertex: FrameReadOnly<$point>;

            fn vertices(&self) -> &[Self::Vertex];

            fn vertex_count(&self) -> usize {
                self.vertices().len()
            }

            fn is_empty(&self) -> bool {
                self.vertices().is_empty()
            }

            /// The frameless vertices, once every vertex is known to be in `frame`.
            fn frameless_vertices_in(&self, frame: &ReferenceFrame) -> Result<Vec<$point>> {
                self.vertices()
                    .iter()
                    .map(|v| {
                        frame.check_frame_match(v.reference_frame())?;
                        Ok(*v.frameless())
                    })
                    .collect()
            }

            /// The frame shared by all vertices. `None` for an empty supplier.
            fn common_frame(&self) -> Result<Option<ReferenceFrame>> {
                let Some(first) = self.vertices().first() else {
                    return Ok(None);
                };
                let frame = first.reference_frame().clone();
                for v in self.vertices() {
                    frame.check_frame_match(v.reference_frame())?;
                }
                Ok(Some(frame))
            }
        }

        impl<K> $name for [Framed<$point, K>] {
            type Vertex = Framed<$point, K>;

            fn vertices(&self) -> &[Self::Vertex] {
                self
            }
        }

        impl<K> $name for Vec<Framed<$point, K>> {
            type Vertex = Framed<$point, K>;

            fn vertices(&self) -> &[Self::Vertex] {
                self
            }
        }

        impl<K, const N: usize> $name for [Framed<$point, K>; N] {
            type Vertex = Framed<$point, K>;

            fn vertices(&self) -> &[Self::Vertex] {
                self
            }
        }
    };
}

vertex_supplier!(
    /// A source of framed 3D vertices.
    FrameVertex3Supplier,
    Point3
);

vertex_supplier!(
    /// A source of framed 2D vertices.
    FrameVertex2Supplier,
    Point2
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::framed::{FixedFramePoint3, FramePoint2, FramePoint3};
    use orrery_core::math::Vec3;

    #[test]
    fn test_construction_does_not_check_frames() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let other = world.fixed_translation_child("other", Vec3::X).unwrap();
        let mixed = vec![
            FramePoint3::new(&world, Point3::ORIGIN),
            FramePoint3::new(&other, Point3::ORIGIN),
        ];
        assert_eq!(mixed.vertex_count(), 2);
        assert!(matches!(
            mixed.frameless_vertices_in(&world),
            Err(FrameError::FrameMismatch { .. })
        ));
        assert!(mixed.common_frame().is_err());
    }

    #[test]
    fn test_arrays_and_slices_supply_vertices() {
        let world = ReferenceFrame::new_root("world").unwrap();
        let square = [
            FramePoint2::new(&world, Point2::new(0.0, 0.0)),
            FramePoint2::new(&world, Point2::new(1.0, 0.0)),
            FramePoint2::new(&world, Point2::new(1.0, 1.0)),
        ];
        assert_eq!(square.common_frame().unwrap(), Some(world.clone()));
        assert_eq!(square[..2].frameless_vertices_in(&world).unwrap().len(), 2);

        let empty: Vec<FixedFramePoint3> = Vec::new();
        assert!(FrameVertex3Supplier::is_empty(&empty));
        assert_eq!(empty.common_frame().unwrap(), None);
    }
}
