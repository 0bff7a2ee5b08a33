// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use bag_core::math::{Mat4, Vec3};

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - every `min` component is less than or equal to its `max` counterpart;
/// - values are metres in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs a box from its corners.
    ///
    /// # Panics
    /// Panics if any component of `min` exceeds its counterpart in `max`.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        assert!(
            min.x() <= max.x() && min.y() <= max.y() && min.z() <= max.z(),
            "invalid AABB: min > max"
        );
        Self { min, max }
    }

    /// Box from two opposite corners given in any order.
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Box centred at `center` with half-extents `half`.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::from_corners(center - half, center + half)
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// `true` when the boxes overlap, touching faces included.
    ///
    /// Symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x() < other.min.x()
            || self.min.x() > other.max.x()
            || self.max.y() < other.min.y()
            || self.min.y() > other.max.y()
            || self.max.z() < other.min.z()
            || self.min.z() > other.max.z())
    }

    /// `true` when `p` lies inside or on the box.
    #[must_use]
    pub fn contains_point(&self, p: &Vec3) -> bool {
        (self.min.x()..=self.max.x()).contains(&p.x())
            && (self.min.y()..=self.max.y()).contains(&p.y())
            && (self.min.z()..=self.max.z()).contains(&p.z())
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// World-space bound of this box after the affine transform `mat`.
    ///
    /// Bounds all eight transformed corners, so a rotated box grows.
    #[must_use]
    pub fn transformed(&self, mat: &Mat4) -> Self {
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x(), lo.y(), lo.z()),
            Vec3::new(lo.x(), lo.y(), hi.z()),
            Vec3::new(lo.x(), hi.y(), lo.z()),
            Vec3::new(lo.x(), hi.y(), hi.z()),
            Vec3::new(hi.x(), lo.y(), lo.z()),
            Vec3::new(hi.x(), lo.y(), hi.z()),
            Vec3::new(hi.x(), hi.y(), lo.z()),
            Vec3::new(hi.x(), hi.y(), hi.z()),
        ]
        .map(|c| mat.transform_point(&c));
        let (min, max) = corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }
}
