// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two-axis rotational rigid body and its semi-implicit integrator.

use std::time::Duration;

use thiserror::Error;
use tracing::{trace, warn};

use crate::math::{Tilt, Vec3, EPSILON};
use crate::schedule::{TorqueHandle, TorqueSet};
use crate::time::SimInstant;
use crate::torque::{self, BodyState, InertiaFn, TorqueFn};

/// Errors raised when configuring a body.
#[derive(Debug, Error, PartialEq)]
pub enum BodyError {
    /// Mass must be finite and strictly positive.
    #[error("invalid mass: {0}")]
    InvalidMass(f32),
    /// The moment-of-inertia function evaluated to zero, a negative value, or
    /// a non-finite value.
    #[error("degenerate moment of inertia: {0}")]
    DegenerateInertia(f32),
    /// No contributor is registered under the handle.
    #[error("unknown torque handle: {0:?}")]
    UnknownTorque(TorqueHandle),
}

/// How the orientation advances after the velocity update.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OrientationUpdate {
    /// `θ += w`: angular velocity is a per-step delta and `dt` only scales
    /// the torque contribution. This is the observed bag feel.
    #[default]
    PerStep,
    /// `θ += w · dt`: a consistent semi-implicit Euler step. Changes the
    /// tuning of every stiffness and damping constant.
    TimeScaled,
}

/// Suspended body modelled as a 2-axis rotational oscillator.
///
/// Owns its tilt, its angular velocity, and the set of torque contributors
/// summed every step. Angular velocity changes only through
/// [`integrate`](Self::integrate) and [`apply_impulse`](Self::apply_impulse).
pub struct RigidBody2D {
    state: BodyState,
    torques: TorqueSet,
    inertia: InertiaFn,
    update: OrientationUpdate,
}

impl core::fmt::Debug for RigidBody2D {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RigidBody2D")
            .field("state", &self.state)
            .field("torques", &self.torques)
            .field("update", &self.update)
            .finish_non_exhaustive()
    }
}

fn check_mass(mass: f32) -> Result<f32, BodyError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(BodyError::InvalidMass(mass))
    }
}

fn inertia_is_usable(i: f32) -> bool {
    i.is_finite() && i > EPSILON
}

impl RigidBody2D {
    /// Body at rest with no contributors and inertia equal to `mass`.
    pub fn new(mass: f32) -> Result<Self, BodyError> {
        let mass = check_mass(mass)?;
        Ok(Self {
            state: BodyState {
                orientation: Tilt::ZERO,
                angular_velocity: Tilt::ZERO,
                mass,
            },
            torques: TorqueSet::new(),
            inertia: torque::mass_inertia(),
            update: OrientationUpdate::default(),
        })
    }

    /// Body with the restoring spring and linear damper installed.
    pub fn with_default_torques(
        mass: f32,
        stiffness: f32,
        damping: f32,
    ) -> Result<Self, BodyError> {
        let mut body = Self::new(mass)?;
        body.add_torque(torque::spring(stiffness));
        body.add_torque(torque::damper(damping));
        Ok(body)
    }

    /// Selects the orientation update rule.
    pub fn set_orientation_update(&mut self, update: OrientationUpdate) {
        self.update = update;
    }

    /// Active orientation update rule.
    pub fn orientation_update(&self) -> OrientationUpdate {
        self.update
    }

    /// Snapshot of the state torque functions see.
    pub fn state(&self) -> BodyState {
        self.state
    }

    /// Current tilt angles.
    pub fn orientation(&self) -> Tilt {
        self.state.orientation
    }

    /// Overrides the tilt, e.g. the initial pose at startup.
    pub fn set_orientation(&mut self, orientation: Tilt) {
        self.state.orientation = orientation;
    }

    /// Current angular velocity.
    pub fn angular_velocity(&self) -> Tilt {
        self.state.angular_velocity
    }

    /// Overrides the angular velocity.
    pub fn set_angular_velocity(&mut self, w: Tilt) {
        self.state.angular_velocity = w;
    }

    /// Body mass.
    pub fn mass(&self) -> f32 {
        self.state.mass
    }

    /// Euler rotation `(θ_x, 0, θ_z)` for the renderer; yaw is always zero.
    pub fn euler_rotation(&self) -> Vec3 {
        Vec3::new(self.state.orientation.x, 0.0, self.state.orientation.z)
    }

    /// Registers a contributor that stays active until removed.
    pub fn add_torque(&mut self, torque: TorqueFn) -> TorqueHandle {
        self.torques.insert(torque)
    }

    /// Registers a contributor removed once the schedule is drained at or
    /// after `now + lifetime`.
    ///
    /// Expiry cannot be cancelled; calling [`remove_torque`](Self::remove_torque)
    /// first only turns the eventual expiry into a no-op.
    pub fn add_timed_torque(
        &mut self,
        torque: TorqueFn,
        lifetime: Duration,
        now: SimInstant,
    ) -> TorqueHandle {
        let at = now.saturating_add(lifetime);
        let h = self.torques.insert_until(torque, at);
        trace!(handle = h.value(), expires_us = at.as_micros(), "timed torque added");
        h
    }

    /// Removes a contributor by handle.
    pub fn remove_torque(&mut self, handle: TorqueHandle) -> Result<TorqueFn, BodyError> {
        self.torques
            .remove(handle)
            .ok_or(BodyError::UnknownTorque(handle))
    }

    /// `true` when the contributor is still registered.
    pub fn has_torque(&self, handle: TorqueHandle) -> bool {
        self.torques.contains(handle)
    }

    /// Number of registered contributors.
    pub fn torque_count(&self) -> usize {
        self.torques.len()
    }

    /// Read access to the contributor set.
    pub fn torques(&self) -> &TorqueSet {
        &self.torques
    }

    /// Drops every timed contributor that expired at or before `now`.
    pub fn expire_torques(&mut self, now: SimInstant) -> usize {
        let n = self.torques.expire(now);
        if n > 0 {
            trace!(expired = n, now_us = now.as_micros(), "timed torques expired");
        }
        n
    }

    /// Replaces the moment-of-inertia function.
    ///
    /// The function is evaluated once against the current state; a zero,
    /// negative, or non-finite result is rejected and the previous function
    /// stays in place.
    pub fn set_moment_of_inertia(&mut self, inertia: InertiaFn) -> Result<(), BodyError> {
        let sample = inertia(self.state.mass, &self.state);
        if !inertia_is_usable(sample) {
            return Err(BodyError::DegenerateInertia(sample));
        }
        self.inertia = inertia;
        Ok(())
    }

    /// Moment of inertia at the current state.
    pub fn moment_of_inertia(&self) -> f32 {
        (self.inertia)(self.state.mass, &self.state)
    }

    /// Adds `delta` straight onto the angular velocity.
    ///
    /// Independent of `dt` and of the torque set.
    pub fn apply_impulse(&mut self, delta: Tilt) {
        self.state.angular_velocity += delta;
    }

    /// Advances the body one step.
    ///
    /// 1. `T = Σ torque(state)`
    /// 2. `I = inertia(mass, state)`
    /// 3. `w += T / I · dt`
    /// 4. `θ += w` (or `w · dt` under [`OrientationUpdate::TimeScaled`])
    ///
    /// An inertia at or below [`EPSILON`] trips a debug assertion and is
    /// clamped to `EPSILON` in release builds.
    pub fn integrate(&mut self, dt: f32) {
        let total = self.torques.total(&self.state);
        let mut i = self.moment_of_inertia();
        debug_assert!(inertia_is_usable(i), "moment of inertia degenerated to {i}");
        if !inertia_is_usable(i) {
            warn!(inertia = i, "moment of inertia clamped");
            i = EPSILON;
        }

        self.state.angular_velocity += total * (dt / i);
        let delta = match self.update {
            OrientationUpdate::PerStep => self.state.angular_velocity,
            OrientationUpdate::TimeScaled => self.state.angular_velocity * dt,
        };
        self.state.orientation += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_mass() {
        assert_eq!(RigidBody2D::new(0.0).err(), Some(BodyError::InvalidMass(0.0)));
        assert!(RigidBody2D::new(f32::NAN).is_err());
    }

    #[test]
    fn rejected_inertia_keeps_previous_function() {
        let mut body = RigidBody2D::new(2.0).expect("valid mass");
        let err = body.set_moment_of_inertia(Box::new(|_, _| 0.0));
        assert_eq!(err, Err(BodyError::DegenerateInertia(0.0)));
        assert!((body.moment_of_inertia() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn time_scaled_update_scales_orientation_by_dt() {
        let mut body = RigidBody2D::new(1.0).expect("valid mass");
        body.set_orientation_update(OrientationUpdate::TimeScaled);
        body.apply_impulse(Tilt::new(1.0, -1.0));
        body.integrate(0.5);
        assert_eq!(body.orientation(), Tilt::new(0.5, -0.5));
    }
}
