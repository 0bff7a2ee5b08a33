// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bag_core::torque::constant;
use bag_core::{Clock, ManualClock, RigidBody2D, SimInstant, Tilt};

const FRAME: Duration = Duration::from_millis(10);

/// Counts how many integrate calls evaluated the contributor.
fn counting_torque(counter: Arc<AtomicUsize>) -> bag_core::TorqueFn {
    Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Tilt::ZERO
    })
}

#[test]
fn timed_torque_is_seen_strictly_before_expiry_only() {
    let mut clock = ManualClock::new();
    let mut body = RigidBody2D::new(1.0).expect("valid mass");
    let seen = Arc::new(AtomicUsize::new(0));
    let h = body.add_timed_torque(
        counting_torque(Arc::clone(&seen)),
        Duration::from_millis(55),
        clock.now(),
    );

    // Frames at t = 0, 10, 20, 30, 40, 50 see the contributor; t = 60 onwards does not.
    for frame in 0..10u64 {
        body.expire_torques(clock.now());
        body.integrate(0.01);
        let expected = usize::try_from((frame + 1).min(6)).expect("small");
        assert_eq!(seen.load(Ordering::SeqCst), expected, "frame {frame}");
        clock.advance(FRAME);
    }
    assert!(!body.has_torque(h));
}

#[test]
fn expiry_at_exact_instant_removes() {
    let mut body = RigidBody2D::new(1.0).expect("valid mass");
    let h = body.add_timed_torque(constant(Tilt::new(1.0, 0.0)), FRAME, SimInstant::ZERO);
    assert_eq!(body.expire_torques(SimInstant::from_micros(9_999)), 0);
    assert!(body.has_torque(h));
    assert_eq!(body.expire_torques(SimInstant::from_millis(10)), 1);
    assert!(!body.has_torque(h));
}

#[test]
fn out_of_order_expiry_removes_the_right_contributors() {
    // Three timed pushes and a persistent spring registered in between; the
    // middle push expires first. Index-based removal would drop the wrong one.
    let mut body = RigidBody2D::new(1.0).expect("valid mass");
    let long = body.add_timed_torque(
        constant(Tilt::new(1.0, 0.0)),
        Duration::from_millis(300),
        SimInstant::ZERO,
    );
    let short = body.add_timed_torque(
        constant(Tilt::new(0.0, 1.0)),
        Duration::from_millis(100),
        SimInstant::ZERO,
    );
    let spring = body.add_torque(bag_core::torque::spring(1.0));
    let mid = body.add_timed_torque(
        constant(Tilt::new(5.0, 5.0)),
        Duration::from_millis(200),
        SimInstant::ZERO,
    );

    body.expire_torques(SimInstant::from_millis(150));
    assert!(body.has_torque(long));
    assert!(!body.has_torque(short));
    assert!(body.has_torque(spring));
    assert!(body.has_torque(mid));

    assert!(body.remove_torque(long).is_ok());
    assert_eq!(body.expire_torques(SimInstant::from_millis(400)), 1);
    assert_eq!(body.torque_count(), 1);
    assert!(body.has_torque(spring));
}

#[test]
fn timed_push_changes_velocity_only_while_active() {
    let mut body = RigidBody2D::new(1.0).expect("valid mass");
    body.add_timed_torque(constant(Tilt::new(2.0, 0.0)), FRAME * 2, SimInstant::ZERO);

    let mut clock = ManualClock::new();
    for _ in 0..5 {
        body.expire_torques(clock.now());
        body.integrate(0.01);
        clock.advance(FRAME);
    }
    // Two active frames, each adding 2 · 0.01.
    assert!((body.angular_velocity().x - 0.04).abs() < 1e-6);
    assert_eq!(body.torques().next_expiry(), None);
}
