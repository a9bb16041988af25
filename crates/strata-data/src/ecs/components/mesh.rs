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

//! A component that draws a mesh resource.

use super::{resolve_material_key, resolve_mesh_key};
use crate::{
    assets::Resources,
    ecs::{
        component::{decode, encode},
        Component, ComponentType, ExtractRenderData, GameObject, Message, MessageKind,
        UpdateLocalBounds,
    },
    ComponentError,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use strata_core::{
    asset::{AssetUUID, Handle},
    math::LinearRgba,
    renderer::{
        build_record, compute_part_ordered_batch_key, resolve_material, ExtractError,
        MaterialResource, MeshResource, RecordPart, RenderCategory, RenderSnapshot,
    },
};

/// Draws every submesh of a mesh resource.
///
/// Materials come from the mesh's own table unless overridden per material
/// index. Records use part-ordered batch keys, so lower submeshes of a mesh
/// draw first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshComponent {
    mesh: Handle<MeshResource>,
    materials: Vec<Option<Handle<MaterialResource>>>,
    /// Per-instance tint.
    pub color: LinearRgba,
    /// The component-level category. Falls back to the global default.
    pub category: Option<RenderCategory>,
    /// Picking base id. Falls back to the owner's id.
    pub picking_id: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct MeshComponentData {
    mesh: Option<AssetUUID>,
    color: LinearRgba,
    category: Option<RenderCategory>,
    picking_id: Option<u32>,
    materials: Vec<Option<AssetUUID>>,
}

impl MeshComponent {
    /// Creates a component drawing `mesh` with its default materials.
    pub fn new(mesh: Handle<MeshResource>) -> Self {
        Self {
            mesh,
            ..Self::default()
        }
    }

    /// The drawn mesh.
    pub fn mesh(&self) -> Handle<MeshResource> {
        self.mesh
    }

    /// Replaces the drawn mesh. Material overrides are kept.
    pub fn set_mesh(&mut self, mesh: Handle<MeshResource>) {
        self.mesh = mesh;
    }

    /// The override for material index `index`, if any.
    pub fn material(&self, index: u32) -> Option<Handle<MaterialResource>> {
        self.materials.get(index as usize).copied().flatten()
    }

    /// Overrides material index `index`, growing the table with empty slots.
    pub fn set_material(&mut self, index: u32, material: Option<Handle<MaterialResource>>) {
        let index = index as usize;
        if self.materials.len() <= index {
            self.materials.resize(index + 1, None);
        }
        self.materials[index] = material;
    }

    /// Inserts an override slot at `index`, shifting later slots up.
    pub fn insert_material(&mut self, index: u32, material: Option<Handle<MaterialResource>>) {
        let index = (index as usize).min(self.materials.len());
        self.materials.insert(index, material);
    }

    /// Removes the override slot at `index`, shifting later slots down.
    pub fn remove_material(&mut self, index: u32) -> Option<Option<Handle<MaterialResource>>> {
        let index = index as usize;
        (index < self.materials.len()).then(|| self.materials.remove(index))
    }

    /// The number of override slots.
    pub fn material_count(&self) -> u32 {
        self.materials.len() as u32
    }

    fn update_bounds(&self, message: &mut UpdateLocalBounds<'_>) {
        if let Some(mesh) = message.resources.mesh(self.mesh) {
            message.local_bounds.expand_to_include(&mesh.bounds);
        }
    }

    fn extract(&self, owner: &GameObject, message: &ExtractRenderData<'_>) -> Result<(), ExtractError> {
        let resources = message.resources;
        let mesh = resources
            .mesh(self.mesh)
            .ok_or(ExtractError::ResourceNotLoaded { kind: "mesh" })?;
        let mesh_id = resources.mesh_identity(self.mesh).unwrap_or(0);

        let category = RenderCategory::resolve(
            message.override_category,
            self.category,
            message
                .settings
                .default_category
                .unwrap_or(RenderCategory::Opaque),
        );
        let snapshot = RenderSnapshot {
            transform: owner.global_transform,
            global_bounds: owner.global_bounds,
            base_id: self.picking_id.unwrap_or_else(|| owner.id.picking_id()) & 0x00FF_FFFF,
            color: self.color,
        };
        let flip_winding = owner.global_transform.contains_negative_scale();
        let uniform_scale = owner.global_transform.contains_uniform_scale();

        let mut records = Vec::with_capacity(mesh.submeshes.len());
        for (part, submesh) in (0u32..).zip(&mesh.submeshes) {
            let material = resolve_material(
                resources,
                self.mesh,
                part,
                self.material(submesh.material_index),
            )?;
            let material_id = resources.material_identity(material).unwrap_or(0);
            records.push(build_record(
                &snapshot,
                RecordPart {
                    mesh: self.mesh,
                    material,
                    submesh_index: part,
                    material_index: submesh.material_index,
                    batch_key: compute_part_ordered_batch_key(mesh_id, material_id, part),
                    category,
                    sort_key: None,
                    flip_winding,
                    uniform_scale,
                },
            ));
        }
        message.sink.add_all(records);
        Ok(())
    }
}

impl Component for MeshComponent {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn handled_messages(&self) -> &'static [MessageKind] {
        Self::MESSAGES
    }

    fn on_message(&self, owner: &GameObject, message: &mut Message<'_>) -> Result<(), ExtractError> {
        match message {
            Message::ExtractRenderData(extract) => self.extract(owner, extract),
            Message::UpdateLocalBounds(update) => {
                self.update_bounds(update);
                Ok(())
            }
            Message::AnimationPoseUpdated(_) => Ok(()),
        }
    }

    fn serialize(&self, resources: &Resources) -> Result<Vec<u8>, ComponentError> {
        encode(&MeshComponentData {
            mesh: resources.meshes.key_of(self.mesh),
            color: self.color,
            category: self.category,
            picking_id: self.picking_id,
            materials: self
                .materials
                .iter()
                .map(|m| m.and_then(|h| resources.materials.key_of(h)))
                .collect(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentType for MeshComponent {
    const TYPE_TAG: &'static str = "MeshComponent";
    const MESSAGES: &'static [MessageKind] =
        &[MessageKind::ExtractRenderData, MessageKind::UpdateLocalBounds];

    fn deserialize(bytes: &[u8], resources: &Resources) -> Result<Self, ComponentError> {
        let data: MeshComponentData = decode(bytes)?;
        Ok(Self {
            mesh: resolve_mesh_key(resources, data.mesh),
            materials: data
                .materials
                .into_iter()
                .map(|key| resolve_material_key(resources, key))
                .collect(),
            color: data.color,
            category: data.category,
            picking_id: data.picking_id,
        })
    }
}
