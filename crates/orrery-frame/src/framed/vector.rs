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

//! Checked operations on framed points and vectors in 3D.

use orrery_core::math::{Point3, Vec3};

use super::{FrameHolder, FrameKind, FramePoint3, FrameVector3, Framed};
use crate::api::{frame_api, ApiEntry, Operand};
use crate::error::Result;

impl<K: FrameKind> Framed<Point3, K> {
    pub fn distance<K2: FrameKind>(&self, other: &Framed<Point3, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.distance(*b))
    }

    pub fn distance_squared<K2: FrameKind>(&self, other: &Framed<Point3, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.distance_squared(*b))
    }

    pub fn distance_from_origin(&self) -> f32 {
        self.value.distance_from_origin()
    }

    /// The vector from `other` to `self`, in the shared frame.
    pub fn sub_point<K2: FrameKind>(&self, other: &Framed<Point3, K2>) -> Result<Framed<Vec3, K>> {
        let v = self.checked(other, |a, b| *a - *b)?;
        Ok(self.sibling(v))
    }

    pub fn add_vector<K2: FrameKind>(&mut self, vector: &Framed<Vec3, K2>) -> Result<()> {
        self.checked_mut(vector, |p, v| *p += *v)
    }

    pub fn sub_vector<K2: FrameKind>(&mut self, vector: &Framed<Vec3, K2>) -> Result<()> {
        self.checked_mut(vector, |p, v| *p -= *v)
    }

    /// Offsets the point by a frameless vector, assumed to be in this frame.
    pub fn add_frameless(&mut self, offset: Vec3) {
        self.value += offset;
    }

    /// Sets this point to `start + t * (end - start)`. All three must share a frame.
    pub fn interpolate<K2: FrameKind, K3: FrameKind>(
        &mut self,
        start: &Framed<Point3, K2>,
        end: &Framed<Point3, K3>,
        t: f32,
    ) -> Result<()> {
        self.check_reference_frame_match(start)?;
        self.check_reference_frame_match(end)?;
        self.value = Point3::lerp(start.value, end.value, t);
        Ok(())
    }
}

impl<K: FrameKind> Framed<Vec3, K> {
    pub fn dot<K2: FrameKind>(&self, other: &Framed<Vec3, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.dot(*b))
    }

    pub fn cross<K2: FrameKind>(&self, other: &Framed<Vec3, K2>) -> Result<Framed<Vec3, K>> {
        let v = self.checked(other, |a, b| a.cross(*b))?;
        Ok(self.sibling(v))
    }

    /// Unsigned angle between the two vectors, in radians.
    pub fn angle<K2: FrameKind>(&self, other: &Framed<Vec3, K2>) -> Result<f32> {
        self.checked(other, |a, b| a.angle(*b))
    }

    pub fn add<K2: FrameKind>(&mut self, other: &Framed<Vec3, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a += *b)
    }

    pub fn sub<K2: FrameKind>(&mut self, other: &Framed<Vec3, K2>) -> Result<()> {
        self.checked_mut(other, |a, b| *a -= *b)
    }

    pub fn add_frameless(&mut self, offset: Vec3) {
        self.value += offset;
    }

    pub fn scale(&mut self, factor: f32) {
        self.value *= factor;
    }

    pub fn length(&self) -> f32 {
        self.value.length()
    }

    /// Normalizes in place. A zero vector stays zero.
    pub fn normalize(&mut self) {
        self.value = self.value.normalize();
    }
}

frame_api! {
    kind: FramePoint3,
    frameless: Point3,
    sample: Point3::new(1.0, 2.0, 3.0),
    operations: [
        ApiEntry::checked("distance", |a, b| {
            FramePoint3::zero(a).distance(&FramePoint3::zero(b)).map(drop)
        }),
        ApiEntry::checked("distance_squared", |a, b| {
            FramePoint3::zero(a).distance_squared(&FramePoint3::zero(b)).map(drop)
        }),
        ApiEntry::checked("sub_point", |a, b| {
            FramePoint3::zero(a).sub_point(&FramePoint3::zero(b)).map(drop)
        }),
        ApiEntry::checked("add_vector", |a, b| {
            FramePoint3::zero(a).add_vector(&FrameVector3::zero(b))
        }),
        ApiEntry::checked("sub_vector", |a, b| {
            FramePoint3::zero(a).sub_vector(&FrameVector3::zero(b))
        }),
        ApiEntry::checked("interpolate", |a, b| {
            FramePoint3::zero(a).interpolate(&FramePoint3::zero(a), &FramePoint3::zero(b), 0.5)
        }),
        ApiEntry::unchecked("add_frameless", Operand::Frameless),
        ApiEntry::unchecked("distance_from_origin", Operand::None),
    ],
}

frame_api! {
    kind: FrameVector3,
    frameless: Vec3,
    sample: Vec3::new(0.0, 0.6, 0.8),
    operations: [
        ApiEntry::checked("dot", |a, b| FrameVector3::zero(a).dot(&FrameVector3::zero(b)).map(drop)),
        ApiEntry::checked("cross", |a, b| {
            FrameVector3::zero(a).cross(&FrameVector3::zero(b)).map(drop)
        }),
        ApiEntry::checked("angle", |a, b| {
            FrameVector3::new(a, Vec3::X).angle(&FrameVector3::new(b, Vec3::Y)).map(drop)
        }),
        ApiEntry::checked("add", |a, b| FrameVector3::zero(a).add(&FrameVector3::zero(b))),
        ApiEntry::checked("sub", |a, b| FrameVector3::zero(a).sub(&FrameVector3::zero(b))),
        ApiEntry::unchecked("add_frameless", Operand::Frameless),
        ApiEntry::unchecked("scale", Operand::Frameless),
        ApiEntry::unchecked("length", Operand::None),
        ApiEntry::unchecked("normalize", Operand::None),
    ],
}
