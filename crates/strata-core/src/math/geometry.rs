// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounding volumes used for culling and for the bounds carried by render records.

use super::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Represents an Axis-Aligned Bounding Box (AABB).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// An invalid `Aabb` where `min` components are positive infinity and `max` are negative infinity.
    ///
    /// Merging any valid `Aabb` with `INVALID` results in that valid `Aabb`.
    pub const INVALID: Self = Self {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Creates a new `Aabb` from two corner points given in any order.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a new `Aabb` from a center point and half-extents.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Returns the smallest box enclosing all `points`, or `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::from_min_max(*first, *first), |acc, p| {
            acc.merged_with_point(*p)
        }))
    }

    /// The center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box size along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The full size of the box along each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// `true` when `min <= max` on every axis and all values are finite.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
            && self.min.x.is_finite()
            && self.max.x.is_finite()
    }

    /// Returns the union of two boxes.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns this box grown to include `point`.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Grows this box in place to include `other`. Invalid inputs are ignored.
    pub fn expand_to_include(&mut self, other: &Aabb) {
        if other.is_valid() {
            *self = self.merge(other);
        }
    }

    /// Computes the box enclosing this one after an affine transformation.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        if !self.is_valid() {
            return *self;
        }
        let center = matrix.transform_point(self.center());
        let h = self.half_extents();
        let col = |i: usize| matrix.cols[i].truncate().abs();
        let extents = col(0) * h.x + col(1) * h.y + col(2) * h.z;
        Aabb::from_center_half_extents(center, extents)
    }
}

impl Default for Aabb {
    /// Returns `Aabb::INVALID`.
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

/// A combined bounding box and bounding sphere sharing one center.
///
/// Asset descriptors store bounds in this form so both culling tests are
/// available without recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxSphere {
    /// Shared center of the box and the sphere.
    pub center: Vec3,
    /// Half extents of the box.
    pub half_extents: Vec3,
    /// Radius of the sphere.
    pub radius: f32,
}

impl BoundingBoxSphere {
    /// Builds the volume that tightly wraps `aabb`.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let half_extents = aabb.half_extents();
        Self {
            center: aabb.center(),
            half_extents,
            radius: half_extents.length(),
        }
    }

    /// Returns the box part.
    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points(&[
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-2.0, 4.0, 1.0),
            Vec3::new(0.0, 0.0, -3.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 1.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_invalid_is_neutral_for_merge() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        assert_eq!(Aabb::INVALID.merge(&a), a);
        assert!(!Aabb::INVALID.is_valid());

        let mut b = Aabb::INVALID;
        b.expand_to_include(&Aabb::INVALID);
        assert!(!b.is_valid());
        b.expand_to_include(&a);
        assert_eq!(b, a);
    }

    #[test]
    fn test_transform_translated_and_scaled() {
        let a = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::ONE);
        let m = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let t = a.transform(&m);
        assert_eq!(t.min, Vec3::new(8.0, -2.0, -2.0));
        assert_eq!(t.max, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_box_sphere_from_aabb() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let bs = BoundingBoxSphere::from_aabb(&a);
        assert_eq!(bs.center, Vec3::ONE);
        assert_abs_diff_eq!(bs.radius, 3.0f32.sqrt(), epsilon = 1e-6);
        assert_eq!(bs.to_aabb(), a);
    }
}
