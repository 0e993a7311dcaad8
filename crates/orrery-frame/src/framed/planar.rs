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

//! Framed values that live in the XY plane of their frame.
//!
//! A 2D value changes frame by being lifted to z = 0, moved by the 3D
//! transform, then dropped back onto the XY plane of the new frame. That is
//! exact only when the transform turns about z. `change_frame` refuses any
//! other transform with `NotXyPlanar`. `change_frame_and_project_to_xy_plane`
//! accepts it and keeps the projection.

use orrery_core::math::{ConvexPolygon2, Point2, Transformable, Vec2};

use super::{
    Changeable, Fixed, FrameConvexPolygon2, FrameKind, FrameMutable, FramePoint2, FrameVector2,
    Framed,
};
use crate::api::{frame_api, ApiEntry, Operand};
use crate::error::Result;
use crate::frame::ReferenceFrame;
use crate::supplier::FrameVertex2Supplier;

/// Values confined to the XY plane of their frame.
pub trait XyPlanar: Transformable {}

impl XyPlanar for Point2 {}
impl XyPlanar for Vec2 {}
impl XyPlanar for ConvexPolygon2 {}

impl<T: XyPlanar> Framed<T, Changeable> {
    /// Like [`FrameMutable::change_frame`], but projects onto the XY plane of
    /// `desired` when the transform tilts the plane instead of failing.
    pub fn change_frame_and_project_to_xy_plane(&mut self, desired: &ReferenceFrame) -> Result<()> {
        let transform = self.frame.transform_to_desired_frame(desired)?;
        log::trace!("Projecting from '{}' onto the XY plane of '{}'", self.frame, desired);
        self.value.apply_transform(&transform);
        self.frame = desired.clone();
        Ok(())
    }
}

impl<K: FrameKind> Framed<Point2, K> {
    pub fn distance<K2: FrameKind>(&self, other: &Framed<Point2, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.distance(*b))
    }

    pub fn distance_squared<K2: FrameKind>(&self, other: &Framed<Point2, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.distance_squared(*b))
    }

    pub fn add_vector<K2: FrameKind>(&mut self, vector: &Framed<Vec2, K2>) -> Result<()> {
        self.checked_mut(vector, |p, v| *p += *v)
    }

    /// The vector from `other` to `self`.
    pub fn sub_point<K2: FrameKind>(&self, other: &Framed<Point2, K2>) -> Result<Framed<Vec2, K>> {
        let v = self.checked(other, |a, b| *a - *b)?;
        Ok(self.sibling(v))
    }
}

impl<K: FrameKind> Framed<Vec2, K> {
    pub fn dot<K2: FrameKind>(&self, other: &Framed<Vec2, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.dot(*b))
    }

    /// The z component of the 3D cross product.
    pub fn cross<K2: FrameKind>(&self, other: &Framed<Vec2, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.cross(*b))
    }

    pub fn add<K2: FrameKind>(&mut self, other: &Framed<Vec2, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a += *b)
    }

    pub fn sub<K2: FrameKind>(&mut self, other: &Framed<Vec2, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a -= *b)
    }

    pub fn length(&self) -> f32 {
        self.value.length()
    }
}

impl<K: FrameKind> Framed<ConvexPolygon2, K> {
    /// Builds the hull of the supplied vertices, which must share a frame.
    /// `None` for an empty supplier.
    pub fn from_vertices<S>(vertices: &S) -> Result<Option<Self>>
    where
        S: FrameVertex2Supplier + ?Sized,
    {
        let Some(frame) = vertices.common_frame()? else {
            return Ok(None);
        };
        let points = vertices.frameless_vertices_in(&frame)?;
        Ok(Some(Self::new(&frame, ConvexPolygon2::from_points(&points))))
    }

    pub fn is_point_inside<K2: FrameKind>(
        &self,
        point: &Framed<Point2, K2>,
        epsilon: f32,
    ) -> Result<bool> {
        self.checked(point, |polygon, p| polygon.is_point_inside(*p, epsilon))
    }

    /// Negative inside. `None` for an empty polygon.
    pub fn signed_distance<K2: FrameKind>(&self, point: &Framed<Point2, K2>) -> Result<Option<f32>> {
        self.checked(point, |polygon, p| polygon.signed_distance(*p))
    }

    /// The polygon point closest to `point`. A point inside is returned as is.
    pub fn orthogonal_projection<K2: FrameKind>(
        &self,
        point: &Framed<Point2, K2>,
    ) -> Result<Option<Framed<Point2, K>>> {
        let projection = self.checked(point, |polygon, p| polygon.orthogonal_projection(*p))?;
        Ok(projection.map(|p| self.sibling(p)))
    }

    pub fn add_vertex<K2: FrameKind>(&mut self, vertex: &Framed<Point2, K2>) -> Result<()> {
        self.checked_mut(vertex, |polygon, v| polygon.add_vertex(*v))
    }

    /// Adds every supplied vertex and rebuilds the hull. The whole supplier is
    /// checked before the polygon changes.
    pub fn add_vertices<S>(&mut self, vertices: &S) -> Result<()>
    where
        S: FrameVertex2Supplier + ?Sized,
    {
        let points = vertices.frameless_vertices_in(&self.frame)?;
        self.value.add_vertices(points);
        Ok(())
    }

    pub fn vertex(&self, index: usize) -> Option<Framed<Point2, Fixed>> {
        self.value.vertex(index).map(|v| Framed::new(&self.frame, v))
    }

    pub fn centroid(&self) -> Option<Framed<Point2, Fixed>> {
        self.value.centroid().map(|c| Framed::new(&self.frame, c))
    }
}

fn unit_triangle(frame: &ReferenceFrame) -> FrameConvexPolygon2 {
    FrameConvexPolygon2::new(
        frame,
        ConvexPolygon2::from_points(&[Point2::ORIGIN, Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)]),
    )
}

frame_api! {
    kind: FramePoint2,
    frameless: Point2,
    sample: Point2::new(1.0, 2.0),
    operations: [
        ApiEntry::checked("distance", |a, b| {
            FramePoint2::zero(a).distance(&FramePoint2::zero(b)).map(drop)
        }),
        ApiEntry::checked("distance_squared", |a, b| {
            FramePoint2::zero(a).distance_squared(&FramePoint2::zero(b)).map(drop)
        }),
        ApiEntry::checked("add_vector", |a, b| {
            FramePoint2::zero(a).add_vector(&FrameVector2::zero(b))
        }),
        ApiEntry::checked("sub_point", |a, b| {
            FramePoint2::zero(a).sub_point(&FramePoint2::zero(b)).map(drop)
        }),
        ApiEntry::frame_changing("change_frame_and_project_to_xy_plane", Operand::Frame, |a, b| {
            FramePoint2::zero(a).change_frame_and_project_to_xy_plane(b)
        }),
    ],
}

frame_api! {
    kind: FrameVector2,
    frameless: Vec2,
    sample: Vec2::new(0.6, 0.8),
    operations: [
        ApiEntry::checked("dot", |a, b| FrameVector2::zero(a).dot(&FrameVector2::zero(b)).map(drop)),
        ApiEntry::checked("cross", |a, b| {
            FrameVector2::zero(a).cross(&FrameVector2::zero(b)).map(drop)
        }),
        ApiEntry::checked("add", |a, b| FrameVector2::zero(a).add(&FrameVector2::zero(b))),
        ApiEntry::checked("sub", |a, b| FrameVector2::zero(a).sub(&FrameVector2::zero(b))),
        ApiEntry::unchecked("length", Operand::None),
        ApiEntry::frame_changing("change_frame_and_project_to_xy_plane", Operand::Frame, |a, b| {
            FrameVector2::zero(a).change_frame_and_project_to_xy_plane(b)
        }),
    ],
}

frame_api! {
    kind: FrameConvexPolygon2,
    frameless: ConvexPolygon2,
    sample: ConvexPolygon2::from_points(&[Point2::ORIGIN, Point2::new(2.0, 0.0), Point2::new(0.0, 2.0)]),
    operations: [
        ApiEntry::checked("from_vertices", |a, b| {
            FrameConvexPolygon2::from_vertices(&[FramePoint2::zero(a), FramePoint2::zero(b)]).map(drop)
        }),
        ApiEntry::checked("is_point_inside", |a, b| {
            unit_triangle(a).is_point_inside(&FramePoint2::zero(b), 1e-5).map(drop)
        }),
        ApiEntry::checked("signed_distance", |a, b| {
            unit_triangle(a).signed_distance(&FramePoint2::zero(b)).map(drop)
        }),
        ApiEntry::checked("orthogonal_projection", |a, b| {
            unit_triangle(a).orthogonal_projection(&FramePoint2::zero(b)).map(drop)
        }),
        ApiEntry::checked("add_vertex", |a, b| unit_triangle(a).add_vertex(&FramePoint2::zero(b))),
        ApiEntry::checked("add_vertices", |a, b| {
            unit_triangle(a).add_vertices(&[FramePoint2::new(b, Point2::new(1.0, 1.0))])
        }),
        ApiEntry::unchecked("vertex", Operand::Frameless),
        ApiEntry::unchecked("centroid", Operand::None),
        ApiEntry::frame_changing("change_frame_and_project_to_xy_plane", Operand::Frame, |a, b| {
            unit_triangle(a).change_frame_and_project_to_xy_plane(b)
        }),
    ],
}
