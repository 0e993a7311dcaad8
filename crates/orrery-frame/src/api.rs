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

//! A declarative table of the frame-checked API, collected at link time.
//!
//! Every changeable framed kind submits one [`FrameApi`] listing its public
//! operations, what kind of operand each takes, and how each treats frames.
//! Checked and loose operations also carry an exercise: a small function that runs
//! the operation on values built in two given frames. [`FrameApi::validate`]
//! runs the exercises and reports every entry whose behaviour contradicts its
//! declaration.

use std::collections::HashSet;
use std::fmt;

use crate::error::{FrameError, Result};
use crate::frame::ReferenceFrame;

/// Runs one operation on values expressed in the two given frames.
pub type Exercise = fn(&ReferenceFrame, &ReferenceFrame) -> Result<()>;

/// Turns the answer of an exercised comparison into an exercise result.
///
/// Fails with a mismatch between `a` and `b` unless `holds`.
pub fn ensure(holds: bool, a: &ReferenceFrame, b: &ReferenceFrame) -> Result<()> {
    if holds {
        Ok(())
    } else {
        Err(FrameError::FrameMismatch {
            expected: a.name_id(),
            actual: b.name_id(),
        })
    }
}

/// What an operation takes besides `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Frameless,
    FrameTagged,
    /// A bare reference frame.
    Frame,
}

/// How an operation treats the frames involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCheck {
    /// Fails with a frame mismatch unless both operands share a frame.
    Checked,
    /// Never fails on a frame mismatch, answers as if the values differ.
    Loose,
    /// Converts or re-tags a value into another frame.
    FrameChanging,
    /// Looks at no frame.
    Unchecked,
}

#[derive(Clone, Copy)]
pub struct ApiEntry {
    pub name: &'static str,
    pub operand: Operand,
    pub check: FrameCheck,
    pub exercise: Option<Exercise>,
}

impl ApiEntry {
    pub const fn checked(name: &'static str, exercise: Exercise) -> Self {
        Self {
            name,
            operand: Operand::FrameTagged,
            check: FrameCheck::Checked,
            exercise: Some(exercise),
        }
    }

    pub const fn loose(name: &'static str, exercise: Exercise) -> Self {
        Self {
            name,
            operand: Operand::FrameTagged,
            check: FrameCheck::Loose,
            exercise: Some(exercise),
        }
    }

    pub const fn frame_changing(name: &'static str, operand: Operand, exercise: Exercise) -> Self {
        Self {
            name,
            operand,
            check: FrameCheck::FrameChanging,
            exercise: Some(exercise),
        }
    }

    pub const fn unchecked(name: &'static str, operand: Operand) -> Self {
        Self {
            name,
            operand,
            check: FrameCheck::Unchecked,
            exercise: None,
        }
    }
}

impl fmt::Debug for ApiEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiEntry")
            .field("name", &self.name)
            .field("operand", &self.operand)
            .field("check", &self.check)
            .field("exercised", &self.exercise.is_some())
            .finish()
    }
}

/// The operation table of one framed kind.
#[derive(Debug)]
pub struct FrameApi {
    /// Alias of the framed type, e.g. `FramePoint3`.
    pub kind: &'static str,
    /// Its frameless counterpart, e.g. `Point3`.
    pub frameless: &'static str,
    pub operations: &'static [ApiEntry],
}

inventory::collect!(FrameApi);

/// Operations every table must declare.
///
/// `round_trip` is not an operation of the kind. Its exercise changes a value
/// to the other frame and back, and fails unless the value came back.
pub const REQUIRED_OPERATIONS: [&str; 5] = [
    "change_frame",
    "set_including_frame",
    "equals",
    "epsilon_equals",
    "round_trip",
];

impl FrameApi {
    pub const fn new(
        kind: &'static str,
        frameless: &'static str,
        operations: &'static [ApiEntry],
    ) -> Self {
        Self {
            kind,
            frameless,
            operations,
        }
    }

    pub fn operation(&self, name: &str) -> Option<&ApiEntry> {
        self.operations.iter().find(|e| e.name == name)
    }

    /// Checks the declarations and runs the exercises.
    ///
    /// `this` and `other` must be two different frames of one tree. Returns one
    /// message per violated rule.
    pub fn validate(&self, this: &ReferenceFrame, other: &ReferenceFrame) -> Vec<String> {
        let mut violations = Vec::new();
        let mut report = |entry: &str, message: &str| {
            violations.push(format!("{}::{}: {}", self.kind, entry, message));
        };

        for required in REQUIRED_OPERATIONS {
            if self.operation(required).is_none() {
                report(required, "missing");
            }
        }

        let mut seen = HashSet::new();
        for entry in self.operations {
            if !seen.insert(entry.name) {
                report(entry.name, "declared twice");
            }

            let allowed = match entry.operand {
                Operand::FrameTagged => matches!(
                    entry.check,
                    FrameCheck::Checked | FrameCheck::Loose | FrameCheck::FrameChanging
                ),
                Operand::Frameless | Operand::None => entry.check == FrameCheck::Unchecked,
                Operand::Frame => entry.check == FrameCheck::FrameChanging,
            };
            if !allowed {
                report(entry.name, "frame check does not fit its operand");
            }

            let expected = match entry.name {
                "equals" => Some(FrameCheck::Loose),
                "epsilon_equals" | "geometrically_equals" => Some(FrameCheck::Checked),
                _ => None,
            };
            if expected.is_some_and(|check| check != entry.check) {
                report(entry.name, "wrong equality strength");
            }

            let exercise = match (entry.check, entry.exercise) {
                (FrameCheck::Unchecked, _) => continue,
                (_, Some(exercise)) => exercise,
                (_, None) => {
                    report(entry.name, "missing exercise");
                    continue;
                }
            };
            match entry.check {
                FrameCheck::Checked => {
                    match exercise(this, other) {
                        Err(e) if e.is_frame_mismatch() => {}
                        Err(_) => report(entry.name, "mixed frames raised the wrong error"),
                        Ok(()) => report(entry.name, "mixed frames were accepted"),
                    }
                    if exercise(this, this).is_err() {
                        report(entry.name, "failed within one frame");
                    }
                }
                FrameCheck::Loose | FrameCheck::FrameChanging => {
                    if exercise(this, other).is_err() {
                        let message = match entry.name {
                            "round_trip" => "did not come back to its value",
                            "equals" => "reported equal across two frames",
                            _ => "failed on mixed frames",
                        };
                        report(entry.name, message);
                    }
                }
                FrameCheck::Unchecked => {}
            }
        }
        violations
    }
}

/// Every submitted table, sorted by kind.
pub fn frame_api_registry() -> Vec<&'static FrameApi> {
    let mut tables: Vec<_> = inventory::iter::<FrameApi>.into_iter().collect();
    tables.sort_by_key(|api| api.kind);
    tables
}

/// Submits the table of a changeable framed kind.
///
/// The operations shared by every kind are listed first, built from `sample`,
/// a frameless value of the kind. The kind's own entries follow.
///
/// `round_trip` compares the value before and after the trip. It defaults to
/// geometric equality; kinds whose frame change is lossy pass a weaker test.
macro_rules! frame_api {
    (@same) => {
        |before, after| after.geometrically_equals(before, 1e-4)
    };
    (@same $same:expr) => {
        $same
    };
    (
        kind: $kind:ident,
        frameless: $frameless:ident,
        sample: $sample:expr,
        $(round_trip: $same:expr,)?
        operations: [$($entry:expr),* $(,)?] $(,)?
    ) => {
        inventory::submit! {
            $crate::api::FrameApi {
                kind: stringify!($kind),
                frameless: stringify!($frameless),
                operations: &[
                    $crate::api::ApiEntry::loose("equals", |a, b| {
                        let equal = $crate::framed::$kind::new(a, $sample)
                            == $crate::framed::$kind::new(b, $sample);
                        $crate::api::ensure(!equal, a, b)
                    }),
                    $crate::api::ApiEntry::checked("epsilon_equals", |a, b| {
                        $crate::framed::$kind::new(a, $sample)
                            .epsilon_equals(&$crate::framed::$kind::new(b, $sample), 1e-5)
                            .map(drop)
                    }),
                    $crate::api::ApiEntry::checked("geometrically_equals", |a, b| {
                        $crate::framed::$kind::new(a, $sample)
                            .geometrically_equals(&$crate::framed::$kind::new(b, $sample), 1e-5)
                            .map(drop)
                    }),
                    $crate::api::ApiEntry::checked("set", |a, b| {
                        let mut value = $crate::framed::$kind::new(a, $sample);
                        $crate::framed::FixedFrameMutable::set(
                            &mut value,
                            &$crate::framed::$kind::new(b, $sample),
                        )
                    }),
                    $crate::api::ApiEntry::frame_changing(
                        "change_frame",
                        $crate::api::Operand::Frame,
                        |a, b| {
                            let mut value = $crate::framed::$kind::new(a, $sample);
                            $crate::framed::FrameMutable::change_frame(&mut value, b)
                        },
                    ),
                    $crate::api::ApiEntry::frame_changing(
                        "set_including_frame",
                        $crate::api::Operand::FrameTagged,
                        |a, b| {
                            let mut value = $crate::framed::$kind::new(a, $sample);
                            $crate::framed::FrameMutable::set_including_frame(
                                &mut value,
                                &$crate::framed::$kind::new(b, $sample),
                            );
                            Ok(())
                        },
                    ),
                    $crate::api::ApiEntry::frame_changing(
                        "set_matching_frame",
                        $crate::api::Operand::FrameTagged,
                        |a, b| {
                            let mut value = $crate::framed::$kind::new(a, $sample);
                            $crate::framed::FixedFrameMutable::set_matching_frame(
                                &mut value,
                                &$crate::framed::$kind::new(b, $sample),
                            )
                        },
                    ),
                    $crate::api::ApiEntry::frame_changing(
                        "round_trip",
                        $crate::api::Operand::Frame,
                        |a, b| {
                            let same: fn(
                                &$crate::framed::$kind,
                                &$crate::framed::$kind,
                            ) -> $crate::error::Result<bool> =
                                $crate::api::frame_api!(@same $($same)?);
                            let before = $crate::framed::$kind::new(a, $sample);
                            let mut value = before.clone();
                            $crate::framed::FrameMutable::change_frame(&mut value, b)?;
                            $crate::framed::FrameMutable::change_frame(&mut value, a)?;
                            $crate::api::ensure(same(&before, &value)?, a, b)
                        },
                    ),
                    $crate::api::ApiEntry::unchecked("set_frameless", $crate::api::Operand::Frameless),
                    $crate::api::ApiEntry::unchecked("apply_transform", $crate::api::Operand::Frameless),
                    $($entry),*
                ],
            }
        }
    };
}

pub(crate) use frame_api;
