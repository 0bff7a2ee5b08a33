// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Pair of values on the two tilt axes of the bag.
///
/// `x` is rotation about world +X and `z` rotation about world +Z; the yaw
/// axis is never simulated. The same type carries orientation, angular
/// velocity, torque, and impulses.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Tilt {
    /// Component about the X axis.
    pub x: f32,
    /// Component about the Z axis.
    pub z: f32,
}

impl Tilt {
    /// Both components zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a pair from its two components.
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Scales both components.
    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.z * s)
    }

    /// Euclidean magnitude.
    pub fn length(&self) -> f32 {
        self.x.hypot(self.z)
    }

    /// `true` when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    /// Returns `[x, z]`.
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.z]
    }
}

impl Add for Tilt {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl AddAssign for Tilt {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.z += rhs.z;
    }
}

impl Sub for Tilt {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f32> for Tilt {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Tilt {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.z)
    }
}

impl core::iter::Sum for Tilt {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, t| acc + t)
    }
}

impl From<[f32; 2]> for Tilt {
    fn from(value: [f32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}
