// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Heavy bag simulation: hand tracking, collision impulses, and the per-frame
//! driver.
//!
//! A host feeds [`Simulation::step`] one [`FrameInput`] per rendered frame
//! and reads back the bag rotation; impact events go out through an
//! [`ImpactSink`]. Tunables live in [`SimConfig`] and are loaded through a
//! [`ConfigStore`].
#![forbid(unsafe_code)]

pub mod collision;
pub mod config;
pub mod contact;
pub mod port;
pub mod sim;

pub use collision::{contact_impulse, CollisionResolver, Hit, ImpactEvent, Resolution};
pub use config::{
    ConfigError, ConfigService, ConfigStore, HandConfig, MemoryConfigStore, OrientationMode,
    ShapeConfig, SimConfig, SIM_CONFIG_KEY,
};
pub use contact::{ContactError, ContactId, ContactTracker};
pub use port::{ImpactSink, LogSink, NullSink};
pub use sim::{FrameInput, FrameReport, SimError, Simulation};
