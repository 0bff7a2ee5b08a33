// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted hand paths for headless replays.

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use bag_core::math::{Tilt, Vec3};
use bag_sim::FrameInput;
use serde::{Deserialize, Serialize};

/// A constant torque held on the bag for a while.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shove {
    /// Torque `[x, z]`.
    pub torque: [f32; 2],
    /// How long it stays registered.
    pub duration_ms: u64,
}

/// One frame of tracking data. Missing hands keep their last position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFrame {
    /// Left grip position.
    pub left: Option<[f32; 3]>,
    /// Right grip position.
    pub right: Option<[f32; 3]>,
    /// Timed torque registered at the start of this frame.
    pub shove: Option<Shove>,
}

impl ScenarioFrame {
    /// Tracking input for the simulation.
    pub fn input(&self) -> FrameInput {
        FrameInput {
            left: self.left.map(|p| bag_geom::Transform::from_translation(Vec3::from(p))),
            right: self.right.map(|p| bag_geom::Transform::from_translation(Vec3::from(p))),
        }
    }

    /// The shove as a torque and lifetime.
    pub fn shove(&self) -> Option<(Tilt, Duration)> {
        self.shove
            .map(|s| (Tilt::from(s.torque), Duration::from_millis(s.duration_ms)))
    }
}

/// A whole replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Wall time between frames.
    pub frame_period_ms: u64,
    /// Frame at which the bag asset "finishes loading"; no collisions before.
    pub bag_loaded_at_frame: u64,
    /// Per-frame tracking data.
    pub frames: Vec<ScenarioFrame>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            frame_period_ms: 11,
            bag_loaded_at_frame: 0,
            frames: Vec::new(),
        }
    }
}

impl Scenario {
    /// Reads a scenario from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let scenario: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        scenario.check()?;
        Ok(scenario)
    }

    /// Frame period as a duration.
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }

    fn check(&self) -> Result<()> {
        ensure!(self.frame_period_ms > 0, "frame_period_ms must be > 0");
        let finite = |p: &Option<[f32; 3]>| p.map_or(true, |p| p.iter().all(|v| v.is_finite()));
        for (i, f) in self.frames.iter().enumerate() {
            ensure!(
                finite(&f.left) && finite(&f.right),
                "frame {i}: hand positions must be finite"
            );
        }
        Ok(())
    }

    /// Right-hand jab into a bag hanging at rest in front of the player.
    ///
    /// The left hand stays guarded beside the head. The bag loads a few
    /// frames in, the right hand winds up, drives through the front face, and
    /// retracts; the bag is then left to swing out.
    pub fn builtin_jab() -> Self {
        const LEFT: [f32; 3] = [-0.6, 1.4, -0.2];
        let mut frames = Vec::new();
        let mut right = |z: f32| {
            frames.push(ScenarioFrame {
                left: Some(LEFT),
                right: Some([0.05, 1.2, z]),
                shove: None,
            });
        };

        for _ in 0..5 {
            right(-0.3);
        }
        for i in 0..9 {
            right(-0.3 - 0.1 * i as f32);
        }
        for i in 1..8 {
            right(-1.1 + 0.1 * i as f32);
        }
        for _ in 0..200 {
            right(-0.3);
        }

        Self {
            frame_period_ms: 11,
            bag_loaded_at_frame: 3,
            frames,
        }
    }
}
