// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Integration tests for bag-geom boxes and transforms.

use bag_core::math::{Tilt, Vec3};
use bag_geom::{Aabb, Transform};
use proptest::prelude::*;

fn cube(min: [f32; 3], max: [f32; 3]) -> Aabb {
    Aabb::new(Vec3::from(min), Vec3::from(max))
}

#[test]
fn partially_overlapping_glove_box_intersects_bag() {
    let bag = cube([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
    let glove = cube([0.5, 0.5, 0.5], [1.5, 1.5, 1.5]);
    assert!(bag.overlaps(&glove));
    assert!(glove.overlaps(&bag));
}

#[test]
fn distant_glove_box_does_not_intersect() {
    let bag = cube([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
    let glove = cube([2.0, 2.0, 2.0], [3.0, 3.0, 3.0]);
    assert!(!bag.overlaps(&glove));
}

#[test]
fn touching_faces_count_as_overlap() {
    let a = cube([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let b = cube([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
    assert!(a.overlaps(&b));
}

#[test]
fn tilted_bag_box_swings_away_from_pivot() {
    // A bag hanging 1m below its pivot, tilted 90° about X, ends up level
    // with the pivot and 1m out along Z.
    let local = Aabb::from_center_half_extents(
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(0.1, 0.5, 0.1),
    );
    let pose = Transform::from_pivot_tilt(
        Vec3::new(0.0, 3.0, 0.0),
        Tilt::new(core::f32::consts::FRAC_PI_2, 0.0),
    );
    let world = local.transformed(&pose.to_mat4());
    let c = world.center();
    assert!((c.y() - 3.0).abs() < 1e-5, "centre y {}", c.y());
    assert!((c.z().abs() - 1.0).abs() < 1e-5, "centre z {}", c.z());
}

#[test]
fn positive_x_tilt_moves_hanging_point_towards_negative_z() {
    // R_x(θ) maps (0, -1, 0) to (0, -cos θ, -sin θ).
    let pose = Transform::from_pivot_tilt(Vec3::ZERO, Tilt::new(0.5, 0.0));
    let p = pose.to_mat4().transform_point(&Vec3::new(0.0, -1.0, 0.0));
    assert!((p.z() + 0.5f32.sin()).abs() < 1e-6);
    assert!((p.y() + 0.5f32.cos()).abs() < 1e-6);
}

#[test]
fn compose_applies_child_then_parent() {
    let parent = Transform::from_translation(Vec3::new(0.0, 3.0, -1.3));
    let child = Transform::new(
        Vec3::new(0.0, -3.5, 0.0),
        bag_core::math::Quat::identity(),
        Vec3::new(2.0, 2.0, 2.0),
    );
    let m = parent.compose(&child);
    let p = m.transform_point(&Vec3::new(0.0, 1.0, 0.0));
    assert!((p.y() - 1.5).abs() < 1e-6);
    assert!((p.z() + 1.3).abs() < 1e-6);
}

#[test]
fn from_points_of_empty_slice_is_none() {
    assert!(Aabb::from_points(&[]).is_none());
    let b = Aabb::from_points(&[Vec3::new(1.0, -1.0, 0.0), Vec3::new(-1.0, 2.0, 0.5)])
        .expect("non-empty");
    assert_eq!(b.min().to_array(), [-1.0, -1.0, 0.0]);
    assert_eq!(b.max().to_array(), [1.0, 2.0, 0.5]);
}

fn arb_box() -> impl Strategy<Value = Aabb> {
    let corner = prop::array::uniform3(-50.0f32..50.0);
    (corner.clone(), corner).prop_map(|(a, b)| Aabb::from_corners(Vec3::from(a), Vec3::from(b)))
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in arb_box(), b in arb_box()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn union_contains_both_centres(a in arb_box(), b in arb_box()) {
        let u = a.union(&b);
        prop_assert!(u.contains_point(&a.center()));
        prop_assert!(u.contains_point(&b.center()));
    }
}
