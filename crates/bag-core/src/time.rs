// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scheduling clock used for timed torque expiry.
//!
//! The simulation never reads ambient time. The driver owns a [`Clock`] and
//! passes its reading into every call that schedules or drains expiries, so
//! tests can pin time exactly.

use std::time::{Duration, Instant};

/// Point on the scheduling timeline, in microseconds since the clock origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant {
    micros: u64,
}

impl SimInstant {
    /// The clock origin.
    pub const ZERO: Self = Self { micros: 0 };

    /// Creates an instant `micros` after the origin.
    pub const fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    /// Creates an instant `millis` after the origin.
    pub const fn from_millis(millis: u64) -> Self {
        Self::from_micros(millis.saturating_mul(1_000))
    }

    /// Microseconds since the origin.
    pub const fn as_micros(&self) -> u64 {
        self.micros
    }

    /// `self + d`, saturating at the end of the timeline.
    #[must_use]
    pub fn saturating_add(&self, d: Duration) -> Self {
        let add = u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
        Self::from_micros(self.micros.saturating_add(add))
    }
}

/// Source of scheduling time.
pub trait Clock {
    /// Current reading.
    fn now(&self) -> SimInstant;
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: SimInstant,
}

impl ManualClock {
    /// Clock starting at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `d`.
    pub fn advance(&mut self, d: Duration) {
        self.now = self.now.saturating_add(d);
    }

    /// Sets the reading; going backwards is ignored.
    pub fn set(&mut self, at: SimInstant) {
        self.now = self.now.max(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SimInstant {
        self.now
    }
}

/// Wall-clock time measured from construction with [`Instant`].
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> SimInstant {
        SimInstant::ZERO.saturating_add(self.origin.elapsed())
    }
}
