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

//! Frame-tagged geometric values.
//!
//! [`Framed<T, K>`] pairs a frameless value `T` with the [`ReferenceFrame`] it
//! is expressed in. Operations that combine two framed values check that both
//! carry the very same frame before touching any number. Operations that take
//! a frameless operand run unchecked.
//!
//! The kind marker `K` decides whether the frame tag can change:
//!
//! - [`Changeable`] values implement [`FrameMutable`] and can be moved to
//!   another frame with [`FrameMutable::change_frame`].
//! - [`Fixed`] values keep the frame they were created in for their whole life.
//!
//! Equality comes in two strengths. `PartialEq` is loose and simply answers
//! `false` for values in different frames. [`Framed::epsilon_equals`] and
//! [`Framed::geometrically_equals`] are strict and fail with a frame mismatch.

mod geometry;
mod planar;
mod rotation;
mod vector;

pub use self::planar::XyPlanar;

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use approx::AbsDiffEq;
use orrery_core::math::{
    Aabb, ConvexPolygon2, GeometricEq, Line3, LineSegment3, Mat3, Point2, Point3, Quaternion,
    RigidTransform, Transformable, Vec2, Vec3,
};

use crate::error::{FrameError, Result};
use crate::frame::ReferenceFrame;

/// Marker for values whose frame can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changeable;

/// Marker for values pinned to the frame they were created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fixed;

/// The kind marker of a [`Framed`] value. Implemented by [`Changeable`] and [`Fixed`] only.
pub trait FrameKind: sealed::Sealed + Copy + Default + fmt::Debug + 'static {
    /// Whether values of this kind may change frame.
    const CHANGEABLE: bool;
}

impl FrameKind for Changeable {
    const CHANGEABLE: bool = true;
}

impl FrameKind for Fixed {
    const CHANGEABLE: bool = false;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Changeable {}
    impl Sealed for super::Fixed {}
}

// --- Capability traits ---

/// Anything that is expressed in a reference frame.
pub trait FrameHolder {
    fn reference_frame(&self) -> &ReferenceFrame;

    /// Fails with a frame mismatch unless `other` is in the same frame.
    fn check_reference_frame_match<H: FrameHolder + ?Sized>(&self, other: &H) -> Result<()> {
        self.reference_frame()
            .check_frame_match(other.reference_frame())
    }

    /// Loose frame comparison. Never fails.
    fn is_in_same_frame<H: FrameHolder + ?Sized>(&self, other: &H) -> bool {
        self.reference_frame() == other.reference_frame()
    }
}

impl FrameHolder for ReferenceFrame {
    fn reference_frame(&self) -> &ReferenceFrame {
        self
    }
}

/// Read access to the frameless value behind a frame tag.
pub trait FrameReadOnly<T>: FrameHolder {
    fn frameless(&self) -> &T;
}

/// Mutation of the value while the frame stays pinned.
pub trait FixedFrameMutable<T>: FrameReadOnly<T> {
    /// Mutable frameless view. Writes through it are unchecked.
    fn frameless_mut(&mut self) -> &mut T;

    /// Overwrites the value, assuming it is already expressed in this frame.
    fn set_frameless(&mut self, value: T) {
        *self.frameless_mut() = value;
    }

    /// Copies the value of `other`, which must be in the same frame.
    fn set<O>(&mut self, other: &O) -> Result<()>
    where
        O: FrameReadOnly<T> + ?Sized,
        T: Clone,
    {
        self.check_reference_frame_match(other)?;
        *self.frameless_mut() = other.frameless().clone();
        Ok(())
    }

    /// Copies the value of `other` from whatever frame it is in and converts it
    /// into this frame. Fails when the frames belong to different trees, or with
    /// `NotXyPlanar` when a 2D value would leave its plane.
    fn set_matching_frame<O>(&mut self, other: &O) -> Result<()>
    where
        O: FrameReadOnly<T> + ?Sized,
        T: Clone + Transformable,
    {
        let transform = other
            .reference_frame()
            .transform_to_desired_frame(self.reference_frame())?;
        check_supported(other.frameless(), &transform, other.reference_frame(), self.reference_frame())?;
        let mut value = other.frameless().clone();
        value.apply_transform(&transform);
        *self.frameless_mut() = value;
        Ok(())
    }

    /// Resets the value to its neutral element: origin, zero vector, identity rotation.
    fn set_to_zero(&mut self)
    where
        T: Default,
    {
        *self.frameless_mut() = T::default();
    }
}

/// Full mutation, including the frame tag.
pub trait FrameMutable<T>: FixedFrameMutable<T> {
    /// Re-tags the value without touching its numbers.
    fn set_reference_frame(&mut self, frame: &ReferenceFrame);

    /// Expresses the value in `desired`, converting its numbers in place.
    fn change_frame(&mut self, desired: &ReferenceFrame) -> Result<()>
    where
        T: Transformable,
    {
        let transform = self.reference_frame().transform_to_desired_frame(desired)?;
        check_supported(self.frameless(), &transform, self.reference_frame(), desired)?;
        log::trace!(
            "Changing frame from '{}' to '{}'",
            self.reference_frame(),
            desired
        );
        self.frameless_mut().apply_transform(&transform);
        self.set_reference_frame(desired);
        Ok(())
    }

    /// Copies both the value and the frame tag of `other`, without any conversion.
    fn set_including_frame<O>(&mut self, other: &O)
    where
        O: FrameReadOnly<T> + ?Sized,
        T: Clone,
    {
        let frame = other.reference_frame().clone();
        *self.frameless_mut() = other.frameless().clone();
        self.set_reference_frame(&frame);
    }

    /// Takes `value` as expressed in `frame`.
    fn set_frameless_including_frame(&mut self, frame: &ReferenceFrame, value: T) {
        *self.frameless_mut() = value;
        self.set_reference_frame(frame);
    }

    /// Moves to `frame` and resets the value to its neutral element there.
    fn set_to_zero_in(&mut self, frame: &ReferenceFrame)
    where
        T: Default,
    {
        self.set_frameless_including_frame(frame, T::default());
    }
}

/// Fails with `NotXyPlanar` when `value` cannot take `transform` whole.
pub(crate) fn check_supported<T: Transformable + ?Sized>(
    value: &T,
    transform: &RigidTransform,
    from: &ReferenceFrame,
    to: &ReferenceFrame,
) -> Result<()> {
    if value.supports_transform(transform) {
        Ok(())
    } else {
        Err(FrameError::NotXyPlanar {
            from: from.name_id(),
            to: to.name_id(),
        })
    }
}

// --- The wrapper ---

/// A frameless value tagged with the reference frame it is expressed in.
pub struct Framed<T, K = Changeable> {
    frame: ReferenceFrame,
    value: T,
    kind: PhantomData<K>,
}

impl<T, K: FrameKind> Framed<T, K> {
    pub fn new(frame: &ReferenceFrame, value: T) -> Self {
        Self {
            frame: frame.clone(),
            value,
            kind: PhantomData,
        }
    }

    /// The neutral value (origin, zero vector, identity rotation) in `frame`.
    pub fn zero(frame: &ReferenceFrame) -> Self
    where
        T: Default,
    {
        Self::new(frame, T::default())
    }

    pub fn into_frameless(self) -> T {
        self.value
    }

    /// A copy of this value that can never change frame.
    pub fn to_fixed(&self) -> Framed<T, Fixed>
    where
        T: Clone,
    {
        Framed::new(&self.frame, self.value.clone())
    }

    /// A copy of this value whose frame can be changed.
    pub fn to_changeable(&self) -> Framed<T, Changeable>
    where
        T: Clone,
    {
        Framed::new(&self.frame, self.value.clone())
    }

    /// Applies a frameless transform to the value. The frame tag is kept.
    pub fn apply_transform(&mut self, transform: &RigidTransform)
    where
        T: Transformable,
    {
        self.value.apply_transform(transform);
    }

    pub fn apply_inverse_transform(&mut self, transform: &RigidTransform)
    where
        T: Transformable,
    {
        self.value.apply_inverse_transform(transform);
    }

    /// Component-wise comparison. Fails on a frame mismatch.
    pub fn epsilon_equals<K2: FrameKind>(&self, other: &Framed<T, K2>, epsilon: f32) -> Result<bool>
    where
        T: AbsDiffEq<Epsilon = f32>,
    {
        self.check_reference_frame_match(other)?;
        Ok(self.value.abs_diff_eq(&other.value, epsilon))
    }

    /// [`Framed::epsilon_equals`] with the tolerance of this frame's tree.
    pub fn epsilon_equals_default<K2: FrameKind>(&self, other: &Framed<T, K2>) -> Result<bool>
    where
        T: AbsDiffEq<Epsilon = f32>,
    {
        self.epsilon_equals(other, self.frame.config().epsilon)
    }

    /// Geometric comparison (see [`GeometricEq`]). Fails on a frame mismatch.
    pub fn geometrically_equals<K2: FrameKind>(
        &self,
        other: &Framed<T, K2>,
        epsilon: f32,
    ) -> Result<bool>
    where
        T: GeometricEq,
    {
        self.check_reference_frame_match(other)?;
        Ok(self.value.geometrically_equals(&other.value, epsilon))
    }

    /// Runs `f` on the values of `self` and `other` once their frames are known to match.
    pub(crate) fn checked<U, R, K2: FrameKind>(
        &self,
        other: &Framed<U, K2>,
        f: impl FnOnce(&T, &U) -> R,
    ) -> Result<R> {
        self.check_reference_frame_match(other)?;
        Ok(f(&self.value, &other.value))
    }

    /// Mutating twin of [`Framed::checked`].
    pub(crate) fn checked_mut<U, R, K2: FrameKind>(
        &mut self,
        other: &Framed<U, K2>,
        f: impl FnOnce(&mut T, &U) -> R,
    ) -> Result<R> {
        self.check_reference_frame_match(other)?;
        Ok(f(&mut self.value, &other.value))
    }

    /// Wraps `value` in this value's frame, keeping the kind.
    pub(crate) fn sibling<U>(&self, value: U) -> Framed<U, K> {
        Framed::new(&self.frame, value)
    }
}

impl<T> Framed<T, Changeable> {
    /// Consumes the value and returns it expressed in `desired`.
    pub fn changed_frame(mut self, desired: &ReferenceFrame) -> Result<Self>
    where
        T: Transformable,
    {
        self.change_frame(desired)?;
        Ok(self)
    }
}

impl<T, K> FrameHolder for Framed<T, K> {
    fn reference_frame(&self) -> &ReferenceFrame {
        &self.frame
    }
}

impl<T, K> FrameReadOnly<T> for Framed<T, K> {
    fn frameless(&self) -> &T {
        &self.value
    }
}

impl<T, K> FixedFrameMutable<T> for Framed<T, K> {
    fn frameless_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> FrameMutable<T> for Framed<T, Changeable> {
    fn set_reference_frame(&mut self, frame: &ReferenceFrame) {
        self.frame = frame.clone();
    }
}

impl<T, K> Deref for Framed<T, K> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Clone, K> Clone for Framed<T, K> {
    fn clone(&self) -> Self {
        Self {
            frame: self.frame.clone(),
            value: self.value.clone(),
            kind: PhantomData,
        }
    }
}

/// Loose equality: values in different frames are simply not equal.
impl<T: PartialEq, K, K2> PartialEq<Framed<T, K2>> for Framed<T, K> {
    fn eq(&self, other: &Framed<T, K2>) -> bool {
        self.frame == other.frame && self.value == other.value
    }
}

impl<T: fmt::Debug, K: FrameKind> fmt::Debug for Framed<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framed")
            .field("frame", &self.frame.name_id())
            .field("value", &self.value)
            .field("changeable", &K::CHANGEABLE)
            .finish()
    }
}

// --- Aliases ---

pub type FramePoint3 = Framed<Point3>;
pub type FrameVector3 = Framed<Vec3>;
pub type FramePoint2 = Framed<Point2>;
pub type FrameVector2 = Framed<Vec2>;
pub type FrameQuaternion = Framed<Quaternion>;
pub type FrameRotationMatrix = Framed<Mat3>;
pub type FramePose3 = Framed<RigidTransform>;
pub type FrameLine3 = Framed<Line3>;
pub type FrameLineSegment3 = Framed<LineSegment3>;
pub type FrameBoundingBox3 = Framed<Aabb>;
pub type FrameConvexPolygon2 = Framed<ConvexPolygon2>;

pub type FixedFramePoint3 = Framed<Point3, Fixed>;
pub type FixedFrameVector3 = Framed<Vec3, Fixed>;
pub type FixedFramePoint2 = Framed<Point2, Fixed>;
pub type FixedFrameVector2 = Framed<Vec2, Fixed>;
pub type FixedFrameQuaternion = Framed<Quaternion, Fixed>;
pub type FixedFrameRotationMatrix = Framed<Mat3, Fixed>;
pub type FixedFramePose3 = Framed<RigidTransform, Fixed>;
pub type FixedFrameLine3 = Framed<Line3, Fixed>;
pub type FixedFrameLineSegment3 = Framed<LineSegment3, Fixed>;
pub type FixedFrameBoundingBox3 = Framed<Aabb, Fixed>;
pub type FixedFrameConvexPolygon2 = Framed<ConvexPolygon2, Fixed>;
