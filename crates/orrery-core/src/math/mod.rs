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

//! Frameless linear algebra and geometry primitives.
//!
//! Every type in this module is a plain numeric value: it knows nothing about
//! the coordinate system it is expressed in. The `orrery-frame` crate pairs
//! these values with a reference frame and checks frame agreement before
//! delegating to the arithmetic defined here.
//!
//! All angular functions operate in **radians**.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// --- Declare Sub-Modules ---

pub mod geometry;
pub mod matrix;
pub mod point;
pub mod polygon;
pub mod quaternion;
pub mod rigid_transform;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::geometry::{Aabb, Line3, LineSegment3};
pub use self::matrix::{Mat3, Mat4};
pub use self::point::{Point2, Point3};
pub use self::polygon::ConvexPolygon2;
pub use self::quaternion::Quaternion;
pub use self::rigid_transform::RigidTransform;
pub use self::vector::{Vec2, Vec3, Vec4};

// --- Shared Traits ---

/// A frameless value that can be moved by a rigid-body transform.
///
/// This is the seam between the numeric types and the reference frame layer:
/// changing the frame of a value is implemented as applying the composed
/// frame-to-frame transform through this trait.
pub trait Transformable {
    /// Applies `transform` to this value in place.
    fn apply_transform(&mut self, transform: &RigidTransform);

    /// Applies the inverse of `transform` to this value in place.
    fn apply_inverse_transform(&mut self, transform: &RigidTransform) {
        self.apply_transform(&transform.inverse());
    }

    /// Whether `transform` can be applied without losing information.
    ///
    /// Values confined to the XY plane refuse rotations that tilt the plane.
    fn supports_transform(&self, _transform: &RigidTransform) -> bool {
        true
    }
}

/// Geometric comparison, as opposed to the per-component comparison of
/// [`approx::AbsDiffEq`].
///
/// Two quaternions `q` and `-q` describe the same orientation, two lines with
/// opposite directions describe the same line, and so on. `geometrically_equals`
/// answers that question.
pub trait GeometricEq {
    /// Tests whether `self` and `other` describe the same geometry to within `epsilon`.
    fn geometrically_equals(&self, other: &Self, epsilon: f32) -> bool;
}

/// Implements `approx::AbsDiffEq` and `approx::RelativeEq` component-wise.
macro_rules! impl_approx_eq {
    ($ty:ty, $($field:ident),+) => {
        impl approx::AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                $crate::math::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                $(<f32 as approx::AbsDiffEq>::abs_diff_eq(&self.$field, &other.$field, epsilon))&&+
            }
        }

        impl approx::RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                <f32 as approx::RelativeEq>::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                $(<f32 as approx::RelativeEq>::relative_eq(&self.$field, &other.$field, epsilon, max_relative))&&+
            }
        }
    };
}

pub(crate) use impl_approx_eq;

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use orrery_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Shifts an angle into the `(-PI, PI]` range.
///
/// # Examples
///
/// ```
/// use orrery_core::math::{trim_angle_minus_pi_to_pi, PI};
/// assert!((trim_angle_minus_pi_to_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
/// ```
#[inline]
pub fn trim_angle_minus_pi_to_pi(angle: f32) -> f32 {
    let mut trimmed = angle % TAU;
    if trimmed > PI {
        trimmed -= TAU;
    } else if trimmed <= -PI {
        trimmed += TAU;
    }
    trimmed
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use orrery_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}
