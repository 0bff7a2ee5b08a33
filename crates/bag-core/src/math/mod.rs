// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Float32 math shared by the integrator and the collision layer.
//!
//! Everything is `f32`, matching the tracking and render data the simulator
//! consumes.

mod mat4;
mod quat;
mod vec2;
mod vec3;

pub use mat4::Mat4;
pub use quat::Quat;
pub use vec2::Tilt;
pub use vec3::Vec3;

/// Degeneracy threshold for lengths and divisors.
///
/// Vectors at or below this length are not normalised, and moments of
/// inertia at or below it are treated as zero.
pub const EPSILON: f32 = 1e-6;
