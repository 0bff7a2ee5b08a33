// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for the heavy bag simulator.

This crate provides:
- Axis-aligned bounding boxes (`Aabb`) with inclusive, symmetric overlap.
- Rigid transforms with non-uniform scale (`Transform`).

Overlap is inclusive on faces: a glove resting exactly on the bag surface
counts as touching.
"]
#![forbid(unsafe_code)]

/// Axis-aligned bounding boxes (world space).
pub mod aabb;
/// Rigid transforms with non-uniform scale.
pub mod transform;

pub use aabb::Aabb;
pub use transform::Transform;
