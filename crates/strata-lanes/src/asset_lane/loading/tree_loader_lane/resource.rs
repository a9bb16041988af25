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

//! The runtime tree resource: LOD meshes and shared materials.

use strata_core::{
    asset::{Asset, AssetUUID, Handle},
    math::BoundingBoxSphere,
    renderer::{MaterialResource, MeshResource},
};

/// One level of detail of a tree, backed by a registered mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLod {
    /// The LOD is used from this distance on.
    pub min_distance: f32,
    /// The LOD is used up to (excluding) this distance.
    pub max_distance: f32,
    /// The LOD mesh.
    pub mesh: Handle<MeshResource>,
}

/// A loaded tree.
#[derive(Debug, Clone)]
pub struct TreeResource {
    /// The key of the tree asset.
    pub key: AssetUUID,
    /// Bounds over all LODs.
    pub bounds: BoundingBoxSphere,
    /// LODs, nearest first.
    pub lods: Vec<TreeLod>,
    /// The tree's materials, shared with every tree that uses the same
    /// textures, type and color.
    pub materials: Vec<Handle<MaterialResource>>,
}

impl Asset for TreeResource {}

impl TreeResource {
    /// The LOD whose `[min_distance, max_distance)` range holds `distance`.
    pub fn select_lod(&self, distance: f32) -> Option<&TreeLod> {
        self.lods
            .iter()
            .find(|lod| distance >= lod.min_distance && distance < lod.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::math::Vec3;

    #[test]
    fn test_select_lod_uses_half_open_ranges() {
        let lod = |min, max, index| TreeLod {
            min_distance: min,
            max_distance: max,
            mesh: Handle::from_raw_parts(index, 0),
        };
        let tree = TreeResource {
            key: AssetUUID::new_v5("trees/oak"),
            bounds: BoundingBoxSphere {
                center: Vec3::ZERO,
                half_extents: Vec3::ONE,
                radius: 2.0,
            },
            lods: vec![lod(0.0, 10.0, 0), lod(10.0, 50.0, 1)],
            materials: Vec::new(),
        };

        assert_eq!(tree.select_lod(0.0).map(|l| l.mesh.index()), Some(0));
        assert_eq!(tree.select_lod(9.99).map(|l| l.mesh.index()), Some(0));
        assert_eq!(tree.select_lod(10.0).map(|l| l.mesh.index()), Some(1));
        assert!(tree.select_lod(50.0).is_none());
        assert!(tree.select_lod(-1.0).is_none());
    }
}
