// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::math::{Mat4, Tilt, Vec3, EPSILON};

/// Rotation quaternion stored as `(x, y, z, w)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    data: [f32; 4],
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quat {
    /// Creates a quaternion from raw components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// The identity rotation.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Returns `[x, y, z, w]`.
    pub const fn to_array(self) -> [f32; 4] {
        self.data
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// A degenerate axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let Some(n) = axis.try_normalize() else {
            return Self::identity();
        };
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(n.x() * s, n.y() * s, n.z() * s, c)
    }

    /// Rotation for a bag tilt, matching Euler order `XYZ` with yaw fixed at 0.
    ///
    /// Equivalent to `R = R_x(tilt.x) * R_z(tilt.z)`.
    pub fn from_tilt(tilt: Tilt) -> Self {
        Self::from_axis_angle(Vec3::UNIT_X, tilt.x)
            .multiply(&Self::from_axis_angle(Vec3::UNIT_Z, tilt.z))
    }

    /// Hamilton product `self * other` (apply `other`, then `self`).
    pub fn multiply(&self, other: &Self) -> Self {
        let [ax, ay, az, aw] = self.data;
        let [bx, by, bz, bw] = other.data;
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Normalises the quaternion; identity when the norm is ~0.
    pub fn normalize(&self) -> Self {
        let [x, y, z, w] = self.data;
        let len = (x * x + y * y + z * z + w * w).sqrt();
        if len <= EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / len;
        Self::new(x * inv, y * inv, z * inv, w * inv)
    }

    /// Column-major rotation matrix.
    pub fn to_mat4(&self) -> Mat4 {
        let [x, y, z, w] = self.normalize().data;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Mat4::new([
            1.0 - 2.0 * (yy + zz),
            2.0 * (xy + wz),
            2.0 * (xz - wy),
            0.0,
            2.0 * (xy - wz),
            1.0 - 2.0 * (xx + zz),
            2.0 * (yz + wx),
            0.0,
            2.0 * (xz + wy),
            2.0 * (yz - wx),
            1.0 - 2.0 * (xx + yy),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }
}
