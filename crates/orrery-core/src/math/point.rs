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

//! Positions in 2D and 3D space.
//!
//! A point differs from a vector in how it reacts to a rigid transform: points
//! are rotated *and* translated. The arithmetic follows the affine rules
//! `point - point = vector` and `point + vector = point`.

use serde::{Deserialize, Serialize};

use super::{impl_approx_eq, GeometricEq, RigidTransform, Transformable, Vec2, Vec3, EPSILON};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A position in 2D space.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Point2 {
    /// The x coordinate.
    pub x: f32,
    /// The y coordinate.
    pub y: f32,
}

impl Point2 {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The displacement from the origin to this point.
    #[inline]
    pub fn to_vec(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Calculates the distance between two points.
    #[inline]
    pub fn distance(&self, other: Self) -> f32 {
        (*self - other).length()
    }

    /// Calculates the squared distance between two points.
    #[inline]
    pub fn distance_squared(&self, other: Self) -> f32 {
        (*self - other).length_squared()
    }

    /// Linear interpolation between `start` (t = 0) and `end` (t = 1).
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    /// Lifts the point into 3D with the given `z`.
    #[inline]
    pub fn extend(&self, z: f32) -> Point3 {
        Point3::new(self.x, self.y, z)
    }
}

impl From<Vec2> for Point2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl Sub for Point2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Self) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vec2> for Point2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Vec2) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Point2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Vec2) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign<Vec2> for Point2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl_approx_eq!(Point2, x, y);

impl GeometricEq for Point2 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.distance(*other) <= epsilon
    }
}

impl Transformable for Point2 {
    /// Transforms the point as if it lay on the XY plane, then projects the
    /// result back onto that plane.
    fn apply_transform(&mut self, transform: &RigidTransform) {
        let p = transform.transform_point(self.extend(0.0));
        *self = Self::new(p.x, p.y);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        let p = transform.inverse_transform_point(self.extend(0.0));
        *self = Self::new(p.x, p.y);
    }

    fn supports_transform(&self, transform: &RigidTransform) -> bool {
        transform.is_rotation_2d(EPSILON)
    }
}

/// A position in 3D space.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Point3 {
    /// The x coordinate.
    pub x: f32,
    /// The y coordinate.
    pub y: f32,
    /// The z coordinate.
    pub z: f32,
}

impl Point3 {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new point.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The displacement from the origin to this point.
    #[inline]
    pub fn to_vec(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Calculates the distance between two points.
    #[inline]
    pub fn distance(&self, other: Self) -> f32 {
        (*self - other).length()
    }

    /// Calculates the squared distance between two points.
    #[inline]
    pub fn distance_squared(&self, other: Self) -> f32 {
        (*self - other).length_squared()
    }

    /// Distance from the origin.
    #[inline]
    pub fn distance_from_origin(&self) -> f32 {
        self.to_vec().length()
    }

    /// Linear interpolation between `start` (t = 0) and `end` (t = 1).
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(&self, other: Self) -> Self {
        self.to_vec().min(other.to_vec()).into()
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(&self, other: Self) -> Self {
        self.to_vec().max(other.to_vec()).into()
    }

    /// Drops the z coordinate.
    #[inline]
    pub fn truncate(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Vec3) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Vec3) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl AddAssign<Vec3> for Point3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl SubAssign<Vec3> for Point3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        *self = *self - rhs;
    }
}

impl_approx_eq!(Point3, x, y, z);

impl GeometricEq for Point3 {
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.distance(*other) <= epsilon
    }
}

impl Transformable for Point3 {
    fn apply_transform(&mut self, transform: &RigidTransform) {
        *self = transform.transform_point(*self);
    }

    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        *self = transform.inverse_transform_point(*self);
    }
}
