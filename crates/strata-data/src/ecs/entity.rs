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

use serde::{Deserialize, Serialize};
use strata_core::math::{AffineTransform, Quaternion, Vec3};

/// A unique identifier for a game object in a [`World`](super::World).
///
/// It combines an index with a generation count: when an object is despawned
/// its index can be recycled, but the generation is incremented so old ids no
/// longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameObjectId {
    /// The slot index of the object in the world.
    pub index: u32,
    /// A generation counter that is incremented each time the index is recycled.
    pub generation: u32,
}

impl GameObjectId {
    /// The picking base id of the object: its index, limited to the 24 bits
    /// that render records keep below the material index.
    #[inline]
    pub fn picking_id(&self) -> u32 {
        self.index & 0x00FF_FFFF
    }
}

/// Describes an object's position, rotation and scale relative to the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The translation (position) of the object.
    pub translation: Vec3,
    /// The rotation of the object.
    pub rotation: Quaternion,
    /// The scale of the object. Negative components mirror it.
    pub scale: Vec3,
}

impl Transform {
    /// Creates a new `Transform` with a given translation, rotation, and scale.
    pub fn new(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Creates a new `Transform` with a given translation, and identity rotation/scale.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Creates a new identity `Transform`.
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Builds the affine matrix in the `Scale -> Rotate -> Translate` order.
    pub fn to_affine(&self) -> AffineTransform {
        AffineTransform::from_trs(self.translation, self.rotation, self.scale)
    }
}

impl Default for Transform {
    /// Returns the identity `Transform`.
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picking_id_keeps_low_24_bits() {
        let id = GameObjectId {
            index: 0x0123_4567,
            generation: 3,
        };
        assert_eq!(id.picking_id(), 0x0023_4567);
    }

    #[test]
    fn test_mirrored_scale_is_detected_on_affine() {
        let t = Transform::new(Vec3::ZERO, Quaternion::IDENTITY, Vec3::new(-1.0, 1.0, 1.0));
        assert!(t.to_affine().contains_negative_scale());
        assert!(t.to_affine().contains_uniform_scale());
    }
}
