// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Overlap tests between the bag and the gloves, and the angular impulse a
//! hit delivers.

use bag_core::math::{Tilt, Vec3};
use bag_core::RigidBody2D;
use bag_geom::{Aabb, Transform};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::contact::{ContactId, ContactTracker};

/// Emitted for hits fast enough to be heard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEvent {
    /// Hand that struck.
    pub contact: ContactId,
    /// Contact speed estimate at the hit.
    pub speed: f32,
    /// Playback volume hint, `max(speed, 1)`.
    pub volume: f32,
}

/// One resolved glove/bag overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Hand that struck.
    pub contact: ContactId,
    /// Contact speed estimate used for the impulse.
    pub speed: f32,
    /// Signed vertical offset `body.y − contact.y`.
    pub lever_arm: f32,
    /// Angular-velocity change applied to the bag.
    pub impulse: Tilt,
}

/// Everything `check_and_resolve` produced in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Overlaps that kicked the bag.
    pub hits: Vec<Hit>,
    /// Subset of hits above the impact threshold.
    pub impacts: Vec<ImpactEvent>,
}

/// Angular-velocity impulse for a contact at `contact` hitting a body whose
/// reference point is `body`.
///
/// With `n = normalize(contact − body)`, `r = body.y − contact.y` and
/// `s = max(speed, 0)`:
/// `Δw = (n.z · f · s · r, −n.x · f · s · r)`.
///
/// Returns `None` when the contact sits on the reference point, where the
/// direction is undefined, or when the speed or resulting impulse is not
/// finite.
pub fn contact_impulse(body: Vec3, contact: Vec3, speed: f32, punch_force: f32) -> Option<Tilt> {
    if !speed.is_finite() {
        return None;
    }
    let normal = (contact - body).try_normalize()?;
    let r = body.y() - contact.y();
    let k = punch_force * speed.max(0.0) * r;
    Some(Tilt::new(normal.z() * k, -normal.x() * k)).filter(Tilt::is_finite)
}

/// Per-frame collision stage.
///
/// Holds the bag's world box between [`refresh_bounds`](Self::refresh_bounds)
/// and [`check_and_resolve`](Self::check_and_resolve).
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    punch_force: f32,
    impact_threshold: f32,
    body_bounds: Option<Aabb>,
}

impl CollisionResolver {
    /// Resolver with explicit tuning.
    pub fn new(punch_force: f32, impact_threshold: f32) -> Self {
        Self {
            punch_force,
            impact_threshold,
            body_bounds: None,
        }
    }

    /// Resolver tuned from the config.
    pub fn from_config(cfg: &SimConfig) -> Self {
        Self::new(cfg.punch_force, cfg.impact_threshold)
    }

    /// Impulse scale.
    pub fn punch_force(&self) -> f32 {
        self.punch_force
    }

    /// Speed above which impacts are emitted.
    pub fn impact_threshold(&self) -> f32 {
        self.impact_threshold
    }

    /// Bag world box from the last refresh; `None` while the bag is not loaded.
    pub fn body_bounds(&self) -> Option<Aabb> {
        self.body_bounds
    }

    /// Recomputes the bag box from its local shape and pose, and every
    /// tracker's glove box. A missing shape leaves that box empty.
    pub fn refresh_bounds(
        &mut self,
        bag: Option<&Aabb>,
        body_pose: &Transform,
        trackers: &mut [ContactTracker],
    ) {
        self.body_bounds = bag.map(|b| b.transformed(&body_pose.to_mat4()));
        for t in trackers.iter_mut() {
            t.refresh_bounds();
        }
    }

    /// Tests each tracker against the bag and kicks the bag for every overlap.
    ///
    /// `body_position` is the bag's reference point (its pivot). Does nothing
    /// while the bag box is absent.
    pub fn check_and_resolve(
        &self,
        body: &mut RigidBody2D,
        body_position: Vec3,
        trackers: &[ContactTracker],
    ) -> Resolution {
        let mut out = Resolution::default();
        let Some(bag) = self.body_bounds else {
            return out;
        };

        for t in trackers {
            let Some(glove) = t.bounds() else { continue };
            if !bag.overlaps(&glove) {
                continue;
            }
            let contact = t.position();
            let speed = t.speed();
            let Some(impulse) = contact_impulse(body_position, contact, speed, self.punch_force)
            else {
                warn!(contact = ?t.id(), speed, "degenerate contact skipped");
                continue;
            };

            let dv = contact - body_position;
            let axis = dv.cross(&Vec3::new(1.0, 0.0, 1.0)).normalize();
            debug!(
                contact = ?t.id(),
                speed,
                distance = dv.length(),
                axis = ?axis.to_array(),
                impulse = ?impulse.to_array(),
                "glove hit"
            );

            body.apply_impulse(impulse);
            out.hits.push(Hit {
                contact: t.id(),
                speed,
                lever_arm: body_position.y() - contact.y(),
                impulse,
            });
            if speed > self.impact_threshold {
                out.impacts.push(ImpactEvent {
                    contact: t.id(),
                    speed,
                    volume: speed.max(1.0),
                });
            }
        }
        out
    }
}
