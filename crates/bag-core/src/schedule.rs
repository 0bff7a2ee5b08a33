// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Torque contributor storage with stable handles and an expiry schedule.
//!
//! Contributors are keyed by a monotonically increasing token, so removing
//! one never shifts another's identity. Timed contributors additionally sit
//! in a min-heap of `(expires_at, token)` that the driver drains once per
//! frame before integrating.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::math::Tilt;
use crate::time::SimInstant;
use crate::torque::{BodyState, TorqueFn};

/// Stable identity of a registered torque contributor.
///
/// Handles are never reused within one body.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TorqueHandle(u64);

impl TorqueHandle {
    /// Raw token value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Ordered set of torque contributors.
///
/// Iteration (and therefore summation) follows insertion order.
#[derive(Default)]
pub struct TorqueSet {
    entries: BTreeMap<TorqueHandle, TorqueFn>,
    expiries: BinaryHeap<Reverse<(SimInstant, TorqueHandle)>>,
    next: u64,
}

impl TorqueSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> TorqueHandle {
        let h = TorqueHandle(self.next);
        self.next += 1;
        h
    }

    /// Adds a contributor that stays until explicitly removed.
    pub fn insert(&mut self, torque: TorqueFn) -> TorqueHandle {
        let h = self.mint();
        self.entries.insert(h, torque);
        h
    }

    /// Adds a contributor that is dropped once the schedule is drained at or
    /// after `expires_at`.
    pub fn insert_until(&mut self, torque: TorqueFn, expires_at: SimInstant) -> TorqueHandle {
        let h = self.mint();
        self.entries.insert(h, torque);
        self.expiries.push(Reverse((expires_at, h)));
        h
    }

    /// Removes a contributor, returning it if it was present.
    pub fn remove(&mut self, handle: TorqueHandle) -> Option<TorqueFn> {
        // A pending heap entry for `handle` becomes a no-op on drain.
        self.entries.remove(&handle)
    }

    /// Drops every timed contributor whose expiry is at or before `now`.
    ///
    /// Returns how many contributors were actually removed.
    pub fn expire(&mut self, now: SimInstant) -> usize {
        let mut removed = 0;
        while let Some(Reverse((at, handle))) = self.expiries.peek().copied() {
            if at > now {
                break;
            }
            self.expiries.pop();
            if self.entries.remove(&handle).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Earliest pending expiry, if any.
    pub fn next_expiry(&self) -> Option<SimInstant> {
        self.expiries
            .iter()
            .map(|Reverse((at, h))| (*at, *h))
            .filter(|(_, h)| self.entries.contains_key(h))
            .map(|(at, _)| at)
            .min()
    }

    /// `true` when `handle` is still registered.
    pub fn contains(&self, handle: TorqueHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Number of registered contributors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no contributor is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all contributors evaluated at `state`.
    pub fn total(&self, state: &BodyState) -> Tilt {
        self.entries.values().map(|torque| torque(state)).sum()
    }
}

impl core::fmt::Debug for TorqueSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TorqueSet")
            .field("handles", &self.entries.keys().collect::<Vec<_>>())
            .field("pending_expiries", &self.expiries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torque::constant;

    #[test]
    fn removing_one_handle_leaves_later_handles_intact() {
        let mut set = TorqueSet::new();
        let a = set.insert(constant(Tilt::new(1.0, 0.0)));
        let b = set.insert_until(constant(Tilt::new(0.0, 1.0)), SimInstant::from_millis(10));
        let c = set.insert(constant(Tilt::new(2.0, 2.0)));
        assert!(set.remove(a).is_some());
        assert!(set.contains(b));
        assert!(set.contains(c));
        assert_eq!(set.total(&BodyState::default()), Tilt::new(2.0, 3.0));
    }

    #[test]
    fn expiry_of_removed_handle_is_a_no_op() {
        let mut set = TorqueSet::new();
        let t = set.insert_until(constant(Tilt::new(1.0, 1.0)), SimInstant::from_millis(5));
        let keep = set.insert(constant(Tilt::ZERO));
        assert!(set.remove(t).is_some());
        assert_eq!(set.expire(SimInstant::from_millis(5)), 0);
        assert!(set.contains(keep));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn next_expiry_skips_stale_entries() {
        let mut set = TorqueSet::new();
        let early = set.insert_until(constant(Tilt::ZERO), SimInstant::from_millis(1));
        set.insert_until(constant(Tilt::ZERO), SimInstant::from_millis(9));
        assert!(set.remove(early).is_some());
        assert_eq!(set.next_expiry(), Some(SimInstant::from_millis(9)));
    }
}
