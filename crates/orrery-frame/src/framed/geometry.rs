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

//! Checked operations on framed lines, segments and bounding boxes.

use orrery_core::math::{Aabb, Line3, LineSegment3, Point3, Vec3};

use super::{
    Fixed, FrameBoundingBox3, FrameKind, FrameLine3, FrameLineSegment3, FramePoint3, Framed,
};
use crate::api::{frame_api, ApiEntry, Operand};
use crate::error::Result;
use crate::frame::ReferenceFrame;
use crate::supplier::FrameVertex3Supplier;

impl<K: FrameKind> Framed<Line3, K> {
    /// A line through two points of the same frame.
    pub fn through<K2: FrameKind, K3: FrameKind>(
        first: &Framed<Point3, K2>,
        second: &Framed<Point3, K3>,
    ) -> Result<Self> {
        let line = first.checked(second, |a, b| Line3::from_two_points(*a, *b))?;
        Ok(Self::new(&first.frame, line))
    }

    pub fn distance<K2: FrameKind>(&self, point: &Framed<Point3, K2>) -> Result<f32> {
        self.checked(point, |line, p| line.distance(*p))
    }

    /// The point of the line closest to `point`, in the line's frame.
    pub fn orthogonal_projection<K2: FrameKind>(
        &self,
        point: &Framed<Point3, K2>,
    ) -> Result<Framed<Point3, K>> {
        let p = self.checked(point, |line, p| line.orthogonal_projection(*p))?;
        Ok(self.sibling(p))
    }

    pub fn point(&self) -> Framed<Point3, Fixed> {
        Framed::new(&self.frame, self.value.point)
    }

    pub fn direction(&self) -> Framed<Vec3, Fixed> {
        Framed::new(&self.frame, self.value.direction)
    }
}

impl<K: FrameKind> Framed<LineSegment3, K> {
    /// A segment between two points of the same frame.
    pub fn between<K2: FrameKind, K3: FrameKind>(
        first: &Framed<Point3, K2>,
        second: &Framed<Point3, K3>,
    ) -> Result<Self> {
        let segment = first.checked(second, |a, b| LineSegment3::new(*a, *b))?;
        Ok(Self::new(&first.frame, segment))
    }

    pub fn distance<K2: FrameKind>(&self, point: &Framed<Point3, K2>) -> Result<f32> {
        self.checked(point, |segment, p| segment.distance(*p))
    }

    /// The point of the segment closest to `point`.
    pub fn orthogonal_projection<K2: FrameKind>(
        &self,
        point: &Framed<Point3, K2>,
    ) -> Result<Framed<Point3, K>> {
        let p = self.checked(point, |segment, p| segment.orthogonal_projection(*p))?;
        Ok(self.sibling(p))
    }

    pub fn midpoint(&self) -> Framed<Point3, K> {
        self.sibling(self.value.midpoint())
    }

    /// `second - first`.
    pub fn direction(&self) -> Framed<Vec3, Fixed> {
        Framed::new(&self.frame, self.value.direction())
    }

    pub fn first_endpoint(&self) -> Framed<Point3, Fixed> {
        Framed::new(&self.frame, self.value.first)
    }

    pub fn second_endpoint(&self) -> Framed<Point3, Fixed> {
        Framed::new(&self.frame, self.value.second)
    }

    pub fn set_first_endpoint<K2: FrameKind>(&mut self, point: &Framed<Point3, K2>) -> Result<()> {
        self.checked_mut(point, |segment, p| segment.first = *p)
    }

    pub fn set_second_endpoint<K2: FrameKind>(&mut self, point: &Framed<Point3, K2>) -> Result<()> {
        self.checked_mut(point, |segment, p| segment.second = *p)
    }
}

impl<K: FrameKind> Framed<Aabb, K> {
    /// The smallest box enclosing the supplied vertices, which must share a frame.
    pub fn enclosing<S>(vertices: &S) -> Result<Option<Self>>
    where
        S: FrameVertex3Supplier + ?Sized,
    {
        let Some(frame) = vertices.common_frame()? else {
            return Ok(None);
        };
        let points = vertices.frameless_vertices_in(&frame)?;
        Ok(Aabb::from_points(&points).map(|bbox| Self::new(&frame, bbox)))
    }

    pub fn is_inside<K2: FrameKind>(&self, point: &Framed<Point3, K2>) -> Result<bool> {
        self.checked(point, |bbox, p| bbox.contains_point(*p))
    }

    pub fn intersects<K2: FrameKind>(&self, other: &Framed<Aabb, K2>) -> Result<bool> {
        self.checked(other, |a, b| a.intersects(b))
    }

    /// Grows this box to also enclose `other`.
    pub fn combine<K2: FrameKind>(&mut self, other: &Framed<Aabb, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a = a.merge(b))
    }

    /// Grows this box to also enclose `point`.
    pub fn update_to_include<K2: FrameKind>(&mut self, point: &Framed<Point3, K2>) -> Result<()> {
        self.checked_mut(point, |bbox, p| *bbox = bbox.merged_with_point(*p))
    }

    pub fn center(&self) -> Framed<Point3, Fixed> {
        Framed::new(&self.frame, self.value.center())
    }
}

fn x_axis(frame: &ReferenceFrame) -> FrameLine3 {
    FrameLine3::new(frame, Line3::new(Point3::ORIGIN, Vec3::X))
}

fn unit_segment(frame: &ReferenceFrame) -> FrameLineSegment3 {
    FrameLineSegment3::new(frame, LineSegment3::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)))
}

fn unit_box(frame: &ReferenceFrame) -> FrameBoundingBox3 {
    FrameBoundingBox3::new(frame, Aabb::from_min_max(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0)))
}

frame_api! {
    kind: FrameLine3,
    frameless: Line3,
    sample: Line3::new(Point3::ORIGIN, Vec3::X),
    operations: [
        ApiEntry::checked("through", |a, b| {
            FrameLine3::through(&FramePoint3::zero(a), &FramePoint3::new(b, Point3::new(0.0, 1.0, 0.0)))
                .map(drop)
        }),
        ApiEntry::checked("distance", |a, b| x_axis(a).distance(&FramePoint3::zero(b)).map(drop)),
        ApiEntry::checked("orthogonal_projection", |a, b| {
            x_axis(a).orthogonal_projection(&FramePoint3::zero(b)).map(drop)
        }),
        ApiEntry::unchecked("point", Operand::None),
        ApiEntry::unchecked("direction", Operand::None),
    ],
}

frame_api! {
    kind: FrameLineSegment3,
    frameless: LineSegment3,
    sample: LineSegment3::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)),
    operations: [
        ApiEntry::checked("between", |a, b| {
            FrameLineSegment3::between(&FramePoint3::zero(a), &FramePoint3::zero(b)).map(drop)
        }),
        ApiEntry::checked("distance", |a, b| {
            unit_segment(a).distance(&FramePoint3::zero(b)).map(drop)
        }),
        ApiEntry::checked("orthogonal_projection", |a, b| {
            unit_segment(a).orthogonal_projection(&FramePoint3::zero(b)).map(drop)
        }),
        ApiEntry::checked("set_first_endpoint", |a, b| {
            unit_segment(a).set_first_endpoint(&FramePoint3::zero(b))
        }),
        ApiEntry::checked("set_second_endpoint", |a, b| {
            unit_segment(a).set_second_endpoint(&FramePoint3::zero(b))
        }),
        ApiEntry::unchecked("midpoint", Operand::None),
        ApiEntry::unchecked("direction", Operand::None),
        ApiEntry::unchecked("first_endpoint", Operand::None),
        ApiEntry::unchecked("second_endpoint", Operand::None),
    ],
}

frame_api! {
    kind: FrameBoundingBox3,
    frameless: Aabb,
    sample: Aabb::from_min_max(Point3::ORIGIN, Point3::new(1.0, 2.0, 3.0)),
    // A rotated box only grows, so the trip must enclose where it started.
    round_trip: |before, after| {
        let mut grown = after.clone();
        grown.combine(before)?;
        grown.geometrically_equals(after, 1e-4)
    },
    operations: [
        ApiEntry::checked("is_inside", |a, b| unit_box(a).is_inside(&FramePoint3::zero(b)).map(drop)),
        ApiEntry::checked("intersects", |a, b| unit_box(a).intersects(&unit_box(b)).map(drop)),
        ApiEntry::checked("combine", |a, b| unit_box(a).combine(&unit_box(b))),
        ApiEntry::checked("update_to_include", |a, b| {
            unit_box(a).update_to_include(&FramePoint3::zero(b))
        }),
        ApiEntry::checked("enclosing", |a, b| {
            FrameBoundingBox3::enclosing(&[FramePoint3::zero(a), FramePoint3::zero(b)]).map(drop)
        }),
        ApiEntry::unchecked("center", Operand::None),
    ],
}
