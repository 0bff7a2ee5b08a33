// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use bag_core::math::{Mat4, Quat, Tilt, Vec3};

/// Rigid transform with non-uniform scale.
///
/// Applied as `M = T * R * S`: scale first, then rotation, then translation.
/// Tracked hands arrive as transforms; the bag pose is built from its pivot
/// and tilt with [`Transform::from_pivot_tilt`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// No translation, no rotation, unit scale.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Transform from components.
    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Pure translation.
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity(), Vec3::new(1.0, 1.0, 1.0))
    }

    /// Pose of a body hanging from `pivot` and tilted by `tilt` (yaw held at 0).
    #[must_use]
    pub fn from_pivot_tilt(pivot: Vec3, tilt: Tilt) -> Self {
        Self::new(pivot, Quat::from_tilt(tilt), Vec3::new(1.0, 1.0, 1.0))
    }

    /// Translation component.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Rotation component.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Scale component.
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Column-major `T * R * S`.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::translation(self.translation)
            * Mat4::from_quat(&self.rotation)
            * Mat4::scale(self.scale)
    }

    /// `self` applied after `child`, as for a node parented under `self`.
    #[must_use]
    pub fn compose(&self, child: &Self) -> Mat4 {
        self.to_mat4() * child.to_mat4()
    }
}
