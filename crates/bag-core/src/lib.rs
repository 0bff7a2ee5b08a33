// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! bag-core: rotational dynamics for a suspended heavy bag.
//!
//! The bag is a 2-axis oscillator: it tilts about world X and Z and never
//! translates or yaws. Torque contributors (a restoring spring, a damper, and
//! any number of timed pushes) are summed every step by [`RigidBody2D`];
//! collision code kicks the bag through [`RigidBody2D::apply_impulse`].
//!
//! Time is always passed in. Timed contributors expire against a
//! [`SimInstant`] supplied by the caller, never against ambient wall time.
#![forbid(unsafe_code)]

pub mod math;
pub mod time;
pub mod torque;

mod body;
mod schedule;

pub use body::{BodyError, OrientationUpdate, RigidBody2D};
pub use math::{Tilt, Vec3};
pub use schedule::{TorqueHandle, TorqueSet};
pub use time::{Clock, ManualClock, MonotonicClock, SimInstant};
pub use torque::{BodyState, InertiaFn, TorqueFn};
