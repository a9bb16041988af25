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

//! Loads tree assets and turns them into mesh and material resources.

mod descriptor;
mod resource;

pub use descriptor::*;
pub use resource::*;

use crate::asset_lane::AssetLoaderLane;
use std::error::Error;
use strata_core::{
    asset::{AssetUUID, Handle},
    hashing::xx_hash32,
    lane::{Lane, LaneKind},
    math::Vec2,
    renderer::{MaterialResource, MeshResource, ResourceError, TextureSlot},
};
use strata_data::assets::Resources;
use thiserror::Error;

/// Errors raised while reading or instantiating a tree.
#[derive(Debug, Error)]
pub enum TreeLoadError {
    /// The descriptor was written by an unsupported version.
    #[error("unsupported tree descriptor version {0}")]
    UnsupportedVersion(u8),
    /// The descriptor ends early.
    #[error("tree descriptor truncated at byte {offset} ({needed} more bytes needed)")]
    UnexpectedEof {
        /// Where reading stopped.
        offset: usize,
        /// How many bytes the next value needed.
        needed: usize,
    },
    /// A texture path is not valid UTF-8.
    #[error("invalid texture path: {0}")]
    InvalidString(#[from] std::string::FromUtf8Error),
    /// A collection is too large for the descriptor format.
    #[error("too many {what} ({count}) for the tree descriptor format")]
    TooMany {
        /// What overflowed.
        what: &'static str,
        /// How many there were.
        count: usize,
    },
    /// Reading or writing the descriptor file failed.
    #[error("tree descriptor I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A generated resource was rejected.
    #[error("failed to create tree resources: {0}")]
    Resource(#[from] ResourceError),
}

/// Base materials of the tree material types.
const BASE_MATERIALS: [&str; 3] = ["tree/branch", "tree/frond", "tree/leaf"];

/// Loads tree descriptors and creates their runtime resources.
#[derive(Debug, Default)]
pub struct TreeLoaderLane;

impl TreeLoaderLane {
    /// Creates a new `TreeLoaderLane`.
    pub fn new() -> Self {
        Self
    }

    /// Creates the materials and LOD meshes of `desc` and returns the tree.
    ///
    /// `change_counter` distinguishes the meshes of successive reloads of the
    /// same asset. Materials are shared: two materials with equal type, color
    /// and texture paths map to one resource, across all trees.
    pub fn create_resource(
        &self,
        key: AssetUUID,
        change_counter: u32,
        desc: &TreeDescriptor,
        resources: &mut Resources,
    ) -> Result<TreeResource, TreeLoadError> {
        let materials: Vec<_> = desc
            .materials
            .iter()
            .map(|mat| self.ensure_material(mat, resources))
            .collect::<Result<_, _>>()?;

        let mut lods = Vec::with_capacity(desc.lods.len());
        for (lod_index, lod) in (0u32..).zip(&desc.lods) {
            let mut mesh = MeshResource::new(lod_mesh_key(key, change_counter, lod_index));
            mesh.positions = lod.vertices.iter().map(|v| v.position).collect();
            mesh.tex_coords0 = Some(
                lod.vertices
                    .iter()
                    .map(|v| Vec2::new(v.tex_coord.x, v.tex_coord.y))
                    .collect(),
            );
            mesh.tex_coords1 = Some(
                lod.vertices
                    .iter()
                    .map(|v| Vec2::new(v.tex_coord.z, 1.0 / v.tex_coord.z))
                    .collect(),
            );
            mesh.normals = Some(lod.vertices.iter().map(|v| v.normal).collect());
            mesh.tangents = Some(lod.vertices.iter().map(|v| v.tangent).collect());
            mesh.colors = Some(lod.vertices.iter().map(|v| v.variation_color).collect());
            mesh.triangles = lod.triangles.clone();
            for sm in &lod.submeshes {
                mesh.add_submesh(sm.triangle_count, sm.first_triangle, sm.material_index);
            }
            mesh.compute_bounds();
            for (slot, material) in (0u32..).zip(&materials) {
                mesh.set_material(slot, *material);
            }

            lods.push(TreeLod {
                min_distance: lod.min_distance,
                max_distance: lod.max_distance,
                mesh: resources.register_mesh(mesh)?,
            });
        }

        log::info!(
            "Created tree {key} with {} LODs and {} materials",
            lods.len(),
            materials.len()
        );
        Ok(TreeResource {
            key,
            bounds: desc.bounds,
            lods,
            materials,
        })
    }

    fn ensure_material(
        &self,
        mat: &TreeMaterialDescriptor,
        resources: &mut Resources,
    ) -> Result<Handle<MaterialResource>, TreeLoadError> {
        let key = material_key(mat);
        if let Some(existing) = resources.find_material(&key) {
            return Ok(existing);
        }

        let mut material = MaterialResource::new(key);
        if let Some(base) = BASE_MATERIALS.get(mat.material_type as usize) {
            material.base = Some(resources.ensure_material(AssetUUID::new_v5(base)));
        }
        material.set_texture(TextureSlot::BaseTexture, mat.diffuse_texture.as_str());
        material.set_texture(TextureSlot::NormalTexture, mat.normal_texture.as_str());
        Ok(resources.register_material(material)?)
    }
}

/// The dedup key of a tree material.
///
/// xxHash32 chained over the variation color, the diffuse path and the normal
/// path, seeded with the material type.
pub fn material_hash(mat: &TreeMaterialDescriptor) -> u32 {
    let mut hash = mat.material_type as u32;
    hash = xx_hash32(&mat.variation_color.to_bytes(), hash);
    hash = xx_hash32(mat.diffuse_texture.as_bytes(), hash);
    xx_hash32(mat.normal_texture.as_bytes(), hash)
}

fn material_key(mat: &TreeMaterialDescriptor) -> AssetUUID {
    AssetUUID::from_content("tree-material", &material_hash(mat).to_le_bytes())
}

fn lod_mesh_key(tree: AssetUUID, change_counter: u32, lod_index: u32) -> AssetUUID {
    let mut bytes = [0u8; 24];
    bytes[..16].copy_from_slice(tree.as_bytes());
    bytes[16..20].copy_from_slice(&change_counter.to_le_bytes());
    bytes[20..].copy_from_slice(&lod_index.to_le_bytes());
    AssetUUID::from_content("tree-lod", &bytes)
}

impl AssetLoaderLane<TreeDescriptor> for TreeLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<TreeDescriptor, Box<dyn Error + Send + Sync>> {
        Ok(TreeDescriptor::load(bytes)?)
    }
}

impl Lane for TreeLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "TreeLoader"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Asset
    }
}
