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

//! Builds immutable render records from an object snapshot.

use super::batch_key::BatchKey;
use crate::{
    asset::Handle,
    math::{Aabb, AffineTransform, LinearRgba},
    renderer::{
        material::MaterialResource,
        mesh::MeshResource,
        render_data::{RenderCategory, RenderRecord},
    },
};

/// The per-object state copied into every record the object emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSnapshot {
    /// The owner's global transform.
    pub transform: AffineTransform,
    /// The owner's global bounds.
    pub global_bounds: Aabb,
    /// The owner's picking base id. Only the low 24 bits survive in records.
    pub base_id: u32,
    /// Per-instance tint.
    pub color: LinearRgba,
}

/// The per-part inputs of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordPart {
    /// The mesh to draw.
    pub mesh: Handle<MeshResource>,
    /// The resolved material.
    pub material: Handle<MaterialResource>,
    /// The submesh index.
    pub submesh_index: u32,
    /// The submesh's material index, stored in the top byte of the unique id.
    pub material_index: u32,
    /// The precomputed batch key.
    pub batch_key: BatchKey,
    /// The resolved category.
    pub category: RenderCategory,
    /// Optional sort key.
    pub sort_key: Option<u32>,
    /// Mirrored transform flag.
    pub flip_winding: bool,
    /// Uniform scale flag.
    pub uniform_scale: bool,
}

/// Combines a snapshot and a part into a [`RenderRecord`]. Infallible.
///
/// `unique_id = base_id | (material_index << 24)`.
#[inline]
pub fn build_record(snapshot: &RenderSnapshot, part: RecordPart) -> RenderRecord {
    RenderRecord {
        transform: snapshot.transform,
        global_bounds: snapshot.global_bounds,
        mesh: part.mesh,
        material: part.material,
        submesh_index: part.submesh_index,
        batch_key: part.batch_key,
        color: snapshot.color,
        unique_id: snapshot.base_id | (part.material_index << 24),
        flip_winding: part.flip_winding,
        uniform_scale: part.uniform_scale,
        category: part.category,
        sort_key: part.sort_key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn test_record_copies_snapshot() {
        let snapshot = RenderSnapshot {
            transform: AffineTransform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            global_bounds: Aabb::from_min_max(Vec3::ZERO, Vec3::ONE),
            base_id: 0x0000_0042,
            color: LinearRgba::GREY,
        };
        let part = RecordPart {
            mesh: Handle::from_raw_parts(1, 0),
            material: Handle::from_raw_parts(2, 0),
            submesh_index: 1,
            material_index: 3,
            batch_key: 0xDEAD_BEEF,
            category: RenderCategory::Masked,
            sort_key: Some(7),
            flip_winding: true,
            uniform_scale: false,
        };

        let record = build_record(&snapshot, part);
        assert_eq!(record.unique_id, 0x0300_0042);
        assert_eq!(record.transform.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(record.global_bounds, snapshot.global_bounds);
        assert_eq!(record.batch_key, 0xDEAD_BEEF);
        assert_eq!(record.category, RenderCategory::Masked);
        assert_eq!(record.sort_key, Some(7));
        assert!(record.flip_winding);
        assert_eq!(record.color, LinearRgba::GREY);
    }
}
