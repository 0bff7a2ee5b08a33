// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-hand contact tracking: finite-difference speed and glove bounds.

use bag_core::math::Vec3;
use bag_geom::{Aabb, Transform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which tracked hand a contact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactId {
    /// Left controller grip.
    Left,
    /// Right controller grip.
    Right,
}

impl ContactId {
    /// Both hands, left first.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Array slot for this hand.
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Errors raised while building a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ContactError {
    /// The speed interval is zero, negative, or not finite.
    #[error("nominal interval must be finite and > 0, got {0}")]
    InvalidInterval(f32),
}

/// Tracks one hand between frames.
///
/// Speed is `|current − previous| / nominal_interval`. The interval is a
/// fixed per-hand constant, not the real frame time.
#[derive(Debug, Clone)]
pub struct ContactTracker {
    id: ContactId,
    nominal_interval: f32,
    pose: Transform,
    current: Vec3,
    previous: Vec3,
    speed: f32,
    seeded: bool,
    glove: Option<Aabb>,
    bounds: Option<Aabb>,
}

impl ContactTracker {
    /// Tracker with no observations and no glove shape yet.
    ///
    /// Rejects an interval that would turn any movement into an infinite or
    /// NaN speed.
    pub fn new(id: ContactId, nominal_interval: f32) -> Result<Self, ContactError> {
        if !(nominal_interval.is_finite() && nominal_interval > 0.0) {
            return Err(ContactError::InvalidInterval(nominal_interval));
        }
        Ok(Self {
            id,
            nominal_interval,
            pose: Transform::identity(),
            current: Vec3::ZERO,
            previous: Vec3::ZERO,
            speed: 0.0,
            seeded: false,
            glove: None,
            bounds: None,
        })
    }

    /// Which hand this is.
    pub fn id(&self) -> ContactId {
        self.id
    }

    /// Interval used for the speed estimate.
    pub fn nominal_interval(&self) -> f32 {
        self.nominal_interval
    }

    /// Shifts `previous ← current`, `current ← position`, and recomputes the
    /// speed estimate, which is returned.
    ///
    /// The first observation seeds both positions, so it reports speed 0.
    pub fn update(&mut self, position: Vec3) -> f32 {
        if !self.seeded {
            self.current = position;
            self.seeded = true;
        }
        self.previous = self.current;
        self.current = position;
        self.speed = self.current.distance(&self.previous) / self.nominal_interval;
        self.speed
    }

    /// Records a full tracked pose and updates the speed from its translation.
    pub fn observe(&mut self, pose: Transform) -> f32 {
        self.pose = pose;
        self.update(pose.translation())
    }

    /// Latest tracked position.
    pub fn position(&self) -> Vec3 {
        self.current
    }

    /// Position one observation ago.
    pub fn previous_position(&self) -> Vec3 {
        self.previous
    }

    /// Latest speed estimate.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Latest tracked pose.
    pub fn pose(&self) -> Transform {
        self.pose
    }

    /// Installs the glove box once its visual has loaded.
    pub fn attach_glove(&mut self, local: Aabb) {
        self.glove = Some(local);
    }

    /// Recomputes the world-space glove box from the latest pose.
    ///
    /// Stays `None` until a glove is attached.
    pub fn refresh_bounds(&mut self) -> Option<Aabb> {
        self.bounds = self.glove.map(|g| g.transformed(&self.pose.to_mat4()));
        self.bounds
    }

    /// World-space glove box from the last refresh.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}
