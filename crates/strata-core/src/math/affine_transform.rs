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

//! Affine transformations for 3D space.

use crate::math::{Mat4, Quaternion, Vec3, Vec4, EPSILON};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Represents a 3D affine transformation (translation, rotation, scale).
///
/// This is a semantic wrapper around a `Mat4` that guarantees the matrix
/// represents a valid affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(transparent)]
pub struct AffineTransform(pub Mat4);

impl AffineTransform {
    /// The identity transform, which results in no change.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    // --- CONSTRUCTORS ---

    /// Creates an `AffineTransform` from a translation vector.
    ///
    /// ```rust
    /// use strata_core::math::Vec3;
    /// use strata_core::math::affine_transform::AffineTransform;
    ///
    /// let transform = AffineTransform::from_translation(Vec3::new(1.0, 2.0, 3.0));
    /// assert_eq!(transform.translation(), Vec3::new(1.0, 2.0, 3.0));
    /// ```
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self(Mat4::from_translation(v))
    }

    /// Creates an `AffineTransform` from a (possibly non-uniform) scale vector.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self(Mat4::from_scale(scale))
    }

    /// Creates an `AffineTransform` from a rotation quaternion.
    #[inline]
    pub fn from_quat(q: Quaternion) -> Self {
        Self(Mat4::from_quat(q))
    }

    /// Creates a transform that scales, then rotates, then translates.
    pub fn from_trs(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        let r = Mat4::from_quat(rotation);
        Self(Mat4::from_cols(
            r.cols[0] * scale.x,
            r.cols[1] * scale.y,
            r.cols[2] * scale.z,
            Vec4::from_vec3(translation, 1.0),
        ))
    }

    // --- SEMANTIC ACCESSORS ---

    /// Returns the underlying matrix.
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        self.0
    }

    /// Extracts the translation component.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.0.cols[3].truncate()
    }

    /// Extracts the per-axis scale. A mirrored basis reports a negative X scale.
    pub fn scale(&self) -> Vec3 {
        let sx = self.0.cols[0].truncate().length();
        let sy = self.0.cols[1].truncate().length();
        let sz = self.0.cols[2].truncate().length();
        if self.contains_negative_scale() {
            Vec3::new(-sx, sy, sz)
        } else {
            Vec3::new(sx, sy, sz)
        }
    }

    /// Extracts the rotation component, removing scale from the basis first.
    pub fn rotation(&self) -> Quaternion {
        let s = self.scale();
        if s.x.abs() < EPSILON || s.y.abs() < EPSILON || s.z.abs() < EPSILON {
            return Quaternion::IDENTITY;
        }
        let basis = Mat4::from_cols(
            self.0.cols[0] * (1.0 / s.x),
            self.0.cols[1] * (1.0 / s.y),
            self.0.cols[2] * (1.0 / s.z),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        Quaternion::from_rotation_matrix(&basis)
    }

    /// `true` if the transform mirrors space, i.e. flips triangle winding.
    #[inline]
    pub fn contains_negative_scale(&self) -> bool {
        self.0.determinant3() < 0.0
    }

    /// `true` if all three axes share the same scale magnitude.
    pub fn contains_uniform_scale(&self) -> bool {
        let sx = self.0.cols[0].truncate().length_squared();
        let sy = self.0.cols[1].truncate().length_squared();
        let sz = self.0.cols[2].truncate().length_squared();
        let tolerance = EPSILON * sx.max(sy).max(sz).max(1.0);
        (sx - sy).abs() <= tolerance && (sx - sz).abs() <= tolerance
    }

    /// Transforms a point by this transform.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.0.transform_point(p)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for AffineTransform {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl From<AffineTransform> for Mat4 {
    #[inline]
    fn from(transform: AffineTransform) -> Self {
        transform.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_negative_scale_detection() {
        assert!(!AffineTransform::IDENTITY.contains_negative_scale());
        assert!(AffineTransform::from_scale(Vec3::new(1.0, -1.0, 1.0)).contains_negative_scale());
        // Two mirrored axes cancel out.
        assert!(!AffineTransform::from_scale(Vec3::new(-1.0, -1.0, 1.0)).contains_negative_scale());
    }

    #[test]
    fn test_uniform_scale_detection() {
        assert!(AffineTransform::from_scale(Vec3::splat(3.0)).contains_uniform_scale());
        assert!(!AffineTransform::from_scale(Vec3::new(1.0, 2.0, 1.0)).contains_uniform_scale());
        let rotated = AffineTransform::from_trs(
            Vec3::new(4.0, 0.0, 0.0),
            Quaternion::from_axis_angle(Vec3::Y, 1.1),
            Vec3::splat(2.0),
        );
        assert!(rotated.contains_uniform_scale());
    }

    #[test]
    fn test_trs_decomposition() {
        let q = Quaternion::from_axis_angle(Vec3::Z, 0.5);
        let t = AffineTransform::from_trs(Vec3::new(1.0, 2.0, 3.0), q, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(t.translation(), Vec3::new(1.0, 2.0, 3.0));
        let s = t.scale();
        assert_abs_diff_eq!(s.x, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(s.y, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(s.z, 4.0, epsilon = 1e-5);
        assert!(t.rotation().approx_same_rotation(&q, 1e-4));
    }
}
