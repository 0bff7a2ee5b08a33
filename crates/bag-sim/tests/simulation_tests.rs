// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::time::Duration;

use bag_core::math::{Tilt, Vec3};
use bag_core::{Clock, ManualClock};
use bag_sim::{ContactId, FrameInput, ImpactEvent, NullSink, SimConfig, Simulation};

const FRAME: Duration = Duration::from_millis(11);

fn at_rest_config() -> SimConfig {
    SimConfig {
        initial_tilt: [0.0, 0.0],
        ..SimConfig::default()
    }
}

/// Left hand parked out of reach; right hand at `z` in front of the bag.
fn right_jab(z: f32) -> FrameInput {
    FrameInput::positions(Vec3::new(-0.6, 1.1, 0.0), Vec3::new(0.0, 1.1, z))
}

#[test]
fn jab_from_the_front_swings_bag_away_and_sounds() {
    let mut sim = Simulation::with_loaded_shapes(&at_rest_config()).expect("valid config");
    let mut clock = ManualClock::new();
    let mut heard: Vec<ImpactEvent> = Vec::new();

    let mut last = None;
    for z in [-0.8, -0.9, -1.0, -1.05] {
        last = Some(sim.step(clock.now(), &right_jab(z), &mut heard));
        clock.advance(FRAME);
    }
    let report = last.expect("stepped");

    assert_eq!(report.frame, 3);
    assert_eq!(report.hits.len(), 1);
    assert_eq!(report.hits[0].contact, ContactId::Right);
    assert!(sim.body().angular_velocity().x > 0.0);
    assert_eq!(heard.len(), 1);
    assert_eq!(heard[0].contact, ContactId::Right);
    assert!((heard[0].speed - 1.0).abs() < 1e-3);
    assert_eq!(report.rotation.y(), 0.0);
}

#[test]
fn no_collisions_until_bag_asset_loads() {
    let cfg = at_rest_config();
    let mut sim = Simulation::new(&cfg).expect("valid config");
    sim.attach_glove(ContactId::Right, cfg.right.glove.to_aabb());
    let mut clock = ManualClock::new();

    for z in [-0.9, -1.1, -1.3] {
        let r = sim.step(clock.now(), &right_jab(z), &mut NullSink);
        assert!(r.hits.is_empty());
        clock.advance(FRAME);
    }
    assert!(sim.resolver().body_bounds().is_none());

    sim.attach_bag(cfg.bag.to_aabb());
    let r = sim.step(clock.now(), &right_jab(-1.2), &mut NullSink);
    assert_eq!(r.hits.len(), 1);
}

#[test]
fn untracked_hand_reports_zero_speed() {
    let mut sim = Simulation::with_loaded_shapes(&at_rest_config()).expect("valid config");
    sim.step(
        ManualClock::new().now(),
        &FrameInput::positions(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
        &mut NullSink,
    );
    sim.step(
        ManualClock::new().now(),
        &FrameInput {
            left: None,
            right: None,
        },
        &mut NullSink,
    );
    assert_eq!(sim.tracker(ContactId::Right).speed(), 0.0);
    assert_eq!(sim.tracker(ContactId::Right).position(), Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn trackers_keep_their_asymmetric_intervals() {
    let sim = Simulation::new(&SimConfig::default()).expect("valid config");
    assert!((sim.tracker(ContactId::Left).nominal_interval() - 0.02).abs() < 1e-9);
    assert!((sim.tracker(ContactId::Right).nominal_interval() - 0.05).abs() < 1e-9);
}

#[test]
fn startup_tilt_decays_with_default_tuning() {
    let mut sim = Simulation::new(&SimConfig::default()).expect("valid config");
    assert_eq!(sim.body().orientation(), Tilt::new(1.0, 0.0));
    let mut clock = ManualClock::new();
    for _ in 0..3_000 {
        sim.step(clock.now(), &FrameInput::default(), &mut NullSink);
        clock.advance(FRAME);
    }
    assert!(sim.body().orientation().length() < 1e-3);
}

#[test]
fn timed_push_expires_on_the_scheduling_clock() {
    let mut sim = Simulation::new(&at_rest_config()).expect("valid config");
    let mut clock = ManualClock::new();
    let h = sim.push(Tilt::new(0.5, 0.0), Duration::from_millis(30), clock.now());

    let mut expired_at = None;
    for _ in 0..6 {
        let r = sim.step(clock.now(), &FrameInput::default(), &mut NullSink);
        if r.expired > 0 {
            expired_at = Some(r.frame);
        }
        clock.advance(Duration::from_millis(10));
    }
    // Active at t = 0, 10, 20; removed when the t = 30 frame drains.
    assert_eq!(expired_at, Some(3));
    assert!(!sim.body().has_torque(h));
}

#[test]
fn step_never_yields_nan_rotation_for_hands_on_the_pivot() {
    let cfg = SimConfig {
        bag: bag_sim::ShapeConfig {
            center: [0.0, 0.0, 0.0],
            half_extents: [0.5, 0.5, 0.5],
        },
        ..at_rest_config()
    };
    let mut sim = Simulation::with_loaded_shapes(&cfg).expect("valid config");
    let pivot = sim.pivot();
    let mut clock = ManualClock::new();
    for dz in [0.3f32, 0.0, 0.0] {
        let input = FrameInput::positions(pivot + Vec3::new(0.0, 0.0, dz), pivot);
        let r = sim.step(clock.now(), &input, &mut NullSink);
        assert!(r.rotation.is_finite());
        clock.advance(FRAME);
    }
}
