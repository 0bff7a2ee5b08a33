// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::math::{Quat, Vec3};

/// Column-major 4×4 affine matrix.
///
/// # Examples
/// ```
/// use bag_core::math::{Mat4, Vec3};
/// let t = Mat4::translation(Vec3::new(0.0, 3.0, -1.3));
/// let p = t.transform_point(&Vec3::new(0.0, -3.5, 0.0));
/// assert!((p.y() + 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    /// Creates a matrix from column-major data.
    pub const fn new(data: [f32; 16]) -> Self {
        Self { data }
    }

    /// Identity matrix.
    pub const fn identity() -> Self {
        Self::new([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Translation by `t`.
    pub const fn translation(t: Vec3) -> Self {
        let [tx, ty, tz] = t.to_array();
        Self::new([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            tx, ty, tz, 1.0,
        ])
    }

    /// Non-uniform scale.
    pub const fn scale(s: Vec3) -> Self {
        let [sx, sy, sz] = s.to_array();
        Self::new([
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, sz, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation matrix for `q`.
    pub fn from_quat(q: &Quat) -> Self {
        q.to_mat4()
    }

    /// Returns the column-major data.
    pub const fn to_array(self) -> [f32; 16] {
        self.data
    }

    fn at(&self, row: usize, col: usize) -> f32 {
        self.data[col * 4 + row]
    }

    /// `self * rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.at(row, k) * rhs.at(k, col)).sum();
            }
        }
        Self::new(out)
    }

    /// Transforms a point (`w = 1`).
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        let [x, y, z] = p.to_array();
        Vec3::new(
            self.at(0, 0) * x + self.at(0, 1) * y + self.at(0, 2) * z + self.at(0, 3),
            self.at(1, 0) * x + self.at(1, 1) * y + self.at(1, 2) * z + self.at(1, 3),
            self.at(2, 0) * x + self.at(2, 1) * y + self.at(2, 2) * z + self.at(2, 3),
        )
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}
