// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Output port for impact events so audio and haptics adapters stay outside
//! the simulation.

use tracing::info;

use crate::collision::ImpactEvent;

/// Receives impact events as they are produced during a step.
///
/// Implementations should be cheap; they run inside the frame.
pub trait ImpactSink {
    /// Called once per emitted impact.
    fn impact(&mut self, event: &ImpactEvent);
}

/// Collects events, handy for tests and batch tools.
impl ImpactSink for Vec<ImpactEvent> {
    fn impact(&mut self, event: &ImpactEvent) {
        self.push(*event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ImpactSink for NullSink {
    fn impact(&mut self, _event: &ImpactEvent) {}
}

/// Logs each event at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ImpactSink for LogSink {
    fn impact(&mut self, event: &ImpactEvent) {
        info!(
            contact = ?event.contact,
            speed = event.speed,
            volume = event.volume,
            "impact"
        );
    }
}
