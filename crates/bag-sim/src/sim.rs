// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frame driver owning the whole simulation context.

use std::time::Duration;

use bag_core::math::{Tilt, Vec3};
use bag_core::{BodyError, RigidBody2D, SimInstant, TorqueFn, TorqueHandle};
use bag_geom::{Aabb, Transform};
use thiserror::Error;
use tracing::{debug, info, instrument, trace};

use crate::collision::{CollisionResolver, Hit, ImpactEvent};
use crate::config::{ConfigError, SimConfig};
use crate::contact::{ContactError, ContactId, ContactTracker};
use crate::port::ImpactSink;

/// Errors raised while building a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The config failed validation.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    /// The body rejected its parameters.
    #[error("body: {0}")]
    Body(#[from] BodyError),
    /// A hand tracker rejected its parameters.
    #[error("contact: {0}")]
    Contact(#[from] ContactError),
}

/// Tracking data for one frame. `None` means the hand was not tracked; its
/// tracker keeps the last pose and reports zero speed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Left grip pose.
    pub left: Option<Transform>,
    /// Right grip pose.
    pub right: Option<Transform>,
}

impl FrameInput {
    /// Input with both hands at plain positions.
    pub fn positions(left: Vec3, right: Vec3) -> Self {
        Self {
            left: Some(Transform::from_translation(left)),
            right: Some(Transform::from_translation(right)),
        }
    }

    fn pose(&self, id: ContactId) -> Option<Transform> {
        match id {
            ContactId::Left => self.left,
            ContactId::Right => self.right,
        }
    }
}

/// What one step produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Index of the frame just simulated (starting at 0).
    pub frame: u64,
    /// Bag rotation `(θ_x, 0, θ_z)` for the renderer.
    pub rotation: Vec3,
    /// Timed torques that expired before integrating.
    pub expired: usize,
    /// Overlaps that kicked the bag.
    pub hits: Vec<Hit>,
    /// Impacts forwarded to the sink.
    pub impacts: Vec<ImpactEvent>,
}

/// Simulation context: the bag, both hand trackers, and the collision stage.
///
/// Nothing here is global; the host owns a `Simulation` and calls
/// [`step`](Self::step) once per rendered frame.
#[derive(Debug)]
pub struct Simulation {
    dt: f32,
    pivot: Vec3,
    body: RigidBody2D,
    bag_shape: Option<Aabb>,
    trackers: [ContactTracker; 2],
    resolver: CollisionResolver,
    frame: u64,
}

impl Simulation {
    /// Builds the bag with its spring and damper, tilted to the configured
    /// startup pose. No shapes are attached yet.
    #[instrument(skip_all)]
    pub fn new(cfg: &SimConfig) -> Result<Self, SimError> {
        cfg.validate()?;
        let mut body = RigidBody2D::with_default_torques(cfg.mass, cfg.stiffness, cfg.damping)?;
        body.set_orientation_update(cfg.orientation_update.into());
        body.set_orientation(cfg.initial_tilt());
        info!(
            dt = cfg.dt,
            stiffness = cfg.stiffness,
            damping = cfg.damping,
            punch_force = cfg.punch_force,
            "simulation ready"
        );
        Ok(Self {
            dt: cfg.dt,
            pivot: cfg.pivot(),
            body,
            bag_shape: None,
            trackers: [
                ContactTracker::new(ContactId::Left, cfg.left.nominal_interval)?,
                ContactTracker::new(ContactId::Right, cfg.right.nominal_interval)?,
            ],
            resolver: CollisionResolver::from_config(cfg),
            frame: 0,
        })
    }

    /// Builds a simulation and attaches every shape from the config at once,
    /// as if all assets were already loaded.
    pub fn with_loaded_shapes(cfg: &SimConfig) -> Result<Self, SimError> {
        let mut sim = Self::new(cfg)?;
        sim.attach_bag(cfg.bag.to_aabb());
        sim.attach_glove(ContactId::Left, cfg.left.glove.to_aabb());
        sim.attach_glove(ContactId::Right, cfg.right.glove.to_aabb());
        Ok(sim)
    }

    /// Bag asset finished loading: installs its box in the pivot frame.
    pub fn attach_bag(&mut self, local: Aabb) {
        debug!(?local, "bag shape attached");
        self.bag_shape = Some(local);
    }

    /// Glove asset finished loading for `id`.
    pub fn attach_glove(&mut self, id: ContactId, local: Aabb) {
        debug!(?id, ?local, "glove shape attached");
        self.trackers[id.index()].attach_glove(local);
    }

    /// Fixed timestep.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Bag pivot in world space.
    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    /// Frames simulated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The bag.
    pub fn body(&self) -> &RigidBody2D {
        &self.body
    }

    /// Mutable bag, for custom contributors or inertia.
    pub fn body_mut(&mut self) -> &mut RigidBody2D {
        &mut self.body
    }

    /// Tracker for one hand.
    pub fn tracker(&self, id: ContactId) -> &ContactTracker {
        &self.trackers[id.index()]
    }

    /// Collision stage (bounds from the last step).
    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// Current bag pose: pivot translation plus tilt.
    pub fn body_pose(&self) -> Transform {
        Transform::from_pivot_tilt(self.pivot, self.body.orientation())
    }

    /// Pushes the bag with a constant torque for `lifetime`, starting at `now`.
    pub fn push(&mut self, torque: Tilt, lifetime: Duration, now: SimInstant) -> TorqueHandle {
        self.add_timed_torque(bag_core::torque::constant(torque), lifetime, now)
    }

    /// Registers any timed contributor on the bag.
    pub fn add_timed_torque(
        &mut self,
        torque: TorqueFn,
        lifetime: Duration,
        now: SimInstant,
    ) -> TorqueHandle {
        self.body.add_timed_torque(torque, lifetime, now)
    }

    /// Runs one frame at scheduling time `now`:
    /// expire timed torques, integrate, update trackers, refresh bounds,
    /// resolve collisions, forward impacts to `sink`.
    #[instrument(level = "trace", skip_all, fields(frame = self.frame))]
    pub fn step(
        &mut self,
        now: SimInstant,
        input: &FrameInput,
        sink: &mut dyn ImpactSink,
    ) -> FrameReport {
        let expired = self.body.expire_torques(now);
        self.body.integrate(self.dt);

        for t in &mut self.trackers {
            match input.pose(t.id()) {
                Some(pose) => t.observe(pose),
                None => t.update(t.position()),
            };
        }

        let pose = self.body_pose();
        self.resolver
            .refresh_bounds(self.bag_shape.as_ref(), &pose, &mut self.trackers);
        let resolution = self
            .resolver
            .check_and_resolve(&mut self.body, self.pivot, &self.trackers);

        for ev in &resolution.impacts {
            sink.impact(ev);
        }

        let report = FrameReport {
            frame: self.frame,
            rotation: self.body.euler_rotation(),
            expired,
            hits: resolution.hits,
            impacts: resolution.impacts,
        };
        trace!(rotation = ?report.rotation.to_array(), hits = report.hits.len(), "step");
        self.frame += 1;
        report
    }
}
