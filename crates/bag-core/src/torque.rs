// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Torque contributors: pure functions from body state to a tilt torque.

use crate::math::Tilt;

/// Read-only view of the body handed to torque and inertia functions.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct BodyState {
    /// Current tilt angles in radians.
    pub orientation: Tilt,
    /// Tilt change per integration step.
    pub angular_velocity: Tilt,
    /// Body mass (always positive).
    pub mass: f32,
}

/// Torque contributor evaluated every integration step.
///
/// Must depend only on the state it is given. `Send + Sync` lets a host move
/// the whole simulation behind a lock.
pub type TorqueFn = Box<dyn Fn(&BodyState) -> Tilt + Send + Sync>;

/// Moment-of-inertia function `(mass, state) -> I`.
pub type InertiaFn = Box<dyn Fn(f32, &BodyState) -> f32 + Send + Sync>;

/// Default restoring stiffness, `5 / 9.8`.
pub const DEFAULT_STIFFNESS: f32 = 5.0 / 9.8;

/// Default damping coefficient.
pub const DEFAULT_DAMPING: f32 = 4.0;

/// Restoring spring pulling both tilt angles back to zero: `-θ · k`.
pub fn spring(stiffness: f32) -> TorqueFn {
    Box::new(move |s: &BodyState| -s.orientation * stiffness)
}

/// Linear damper opposing angular velocity: `-w · γ`.
pub fn damper(damping: f32) -> TorqueFn {
    Box::new(move |s: &BodyState| -s.angular_velocity * damping)
}

/// State-independent torque, typically attached with a lifetime.
pub fn constant(torque: Tilt) -> TorqueFn {
    Box::new(move |_: &BodyState| torque)
}

/// Default inertia: the mass itself.
pub fn mass_inertia() -> InertiaFn {
    Box::new(|mass, _: &BodyState| mass)
}
