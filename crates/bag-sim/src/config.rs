// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation tunables plus the storage port used to load and persist them.

use std::cell::RefCell;
use std::collections::HashMap;

use bag_core::math::{Tilt, Vec3};
use bag_core::torque::{DEFAULT_DAMPING, DEFAULT_STIFFNESS};
use bag_core::OrientationUpdate;
use bag_geom::Aabb;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Key under which [`SimConfig`] is stored.
pub const SIM_CONFIG_KEY: &str = "heavybag";

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field path.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Stored simulation config, or the defaults when none is stored.
    ///
    /// A stored config that fails [`SimConfig::validate`] is an error rather
    /// than silently replaced.
    pub fn load_sim_config(&self) -> Result<SimConfig, ConfigError> {
        let cfg = self.load::<SimConfig>(SIM_CONFIG_KEY)?.unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates and persists the simulation config.
    pub fn save_sim_config(&self, cfg: &SimConfig) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.save(SIM_CONFIG_KEY, cfg)
    }
}

/// In-process store, mainly for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl ConfigStore for MemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        self.blobs
            .borrow()
            .get(key)
            .cloned()
            .ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

/// Serializable mirror of [`OrientationUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrientationMode {
    /// `θ += w` every step.
    #[default]
    PerStep,
    /// `θ += w · dt` every step.
    TimeScaled,
}

impl From<OrientationMode> for OrientationUpdate {
    fn from(value: OrientationMode) -> Self {
        match value {
            OrientationMode::PerStep => Self::PerStep,
            OrientationMode::TimeScaled => Self::TimeScaled,
        }
    }
}

/// Local-space box for a visual (bag mesh or glove), relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Box centre in the owner's frame.
    pub center: [f32; 3],
    /// Non-negative half extents.
    pub half_extents: [f32; 3],
}

impl ShapeConfig {
    /// The shape as a local-space box.
    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(Vec3::from(self.center), Vec3::from(self.half_extents))
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.center.iter().chain(&self.half_extents).all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid {
                field,
                reason: "must be finite",
            });
        }
        if self.half_extents.iter().any(|v| *v < 0.0) {
            return Err(ConfigError::Invalid {
                field,
                reason: "half extents must be non-negative",
            });
        }
        Ok(())
    }
}

/// Per-hand tracking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandConfig {
    /// Fixed interval (seconds) used to turn displacement into speed.
    pub nominal_interval: f32,
    /// Glove box in the tracked hand's frame.
    pub glove: ShapeConfig,
}

const DEFAULT_GLOVE: ShapeConfig = ShapeConfig {
    center: [0.0, 0.0, 0.0],
    half_extents: [0.06, 0.06, 0.08],
};

/// Every tunable of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed integration timestep.
    pub dt: f32,
    /// Bag mass.
    pub mass: f32,
    /// Restoring spring stiffness `k`.
    pub stiffness: f32,
    /// Linear damping `γ`.
    pub damping: f32,
    /// Scale from contact speed and lever arm to angular-velocity impulse.
    pub punch_force: f32,
    /// Contact speed above which an impact event is emitted.
    pub impact_threshold: f32,
    /// Orientation update rule.
    pub orientation_update: OrientationMode,
    /// Tilt `[θ_x, θ_z]` at startup.
    pub initial_tilt: [f32; 2],
    /// World position the bag hangs from.
    pub pivot: [f32; 3],
    /// Bag box in the pivot frame.
    pub bag: ShapeConfig,
    /// Left hand.
    pub left: HandConfig,
    /// Right hand.
    pub right: HandConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            mass: 1.0,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            punch_force: 0.05,
            impact_threshold: 0.5,
            orientation_update: OrientationMode::PerStep,
            initial_tilt: [1.0, 0.0],
            pivot: [0.0, 3.0, -1.3],
            bag: ShapeConfig {
                center: [0.0, -1.9, 0.0],
                half_extents: [0.2, 0.6, 0.2],
            },
            left: HandConfig {
                nominal_interval: 0.02,
                glove: DEFAULT_GLOVE,
            },
            right: HandConfig {
                nominal_interval: 0.05,
                glove: DEFAULT_GLOVE,
            },
        }
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be finite and > 0",
        })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be finite and >= 0",
        })
    }
}

impl SimConfig {
    /// Checks every value is finite and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("dt", self.dt)?;
        positive("mass", self.mass)?;
        non_negative("stiffness", self.stiffness)?;
        non_negative("damping", self.damping)?;
        non_negative("impact_threshold", self.impact_threshold)?;
        if !self.punch_force.is_finite() {
            return Err(ConfigError::Invalid {
                field: "punch_force",
                reason: "must be finite",
            });
        }
        if !self.initial_tilt.iter().chain(&self.pivot).all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "initial_tilt/pivot",
                reason: "must be finite",
            });
        }
        positive("left.nominal_interval", self.left.nominal_interval)?;
        positive("right.nominal_interval", self.right.nominal_interval)?;
        self.bag.validate("bag")?;
        self.left.glove.validate("left.glove")?;
        self.right.glove.validate("right.glove")?;
        Ok(())
    }

    /// Startup tilt.
    pub fn initial_tilt(&self) -> Tilt {
        Tilt::from(self.initial_tilt)
    }

    /// Pivot position.
    pub fn pivot(&self) -> Vec3 {
        Vec3::from(self.pivot)
    }
}
