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

//! A procedural prototyping box.

use super::resolve_material_key;
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
    math::{LinearRgba, Vec3},
    renderer::{
        build_record, compute_batch_key, compute_sort_key, resolve_material, ExtractError,
        MaterialResource, MeshResource, RecordPart, RenderCategory, RenderSnapshot,
    },
};

/// The procedural shapes a grey box can take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GreyBoxShape {
    /// An axis-aligned box.
    #[default]
    Box,
}

impl GreyBoxShape {
    /// The stable tag of the shape in serialized data and mesh keys.
    pub const fn tag(self) -> u32 {
        match self {
            GreyBoxShape::Box => 0,
        }
    }

    /// Parses a serialized tag.
    pub fn from_tag(tag: u32) -> Result<Self, ExtractError> {
        match tag {
            0 => Ok(GreyBoxShape::Box),
            other => Err(ExtractError::UnsupportedShapeVariant(other)),
        }
    }
}

/// How far a grey box reaches from its origin along each axis.
///
/// `neg` holds the (positive) distances towards -X, -Y and -Z, `pos` the
/// distances towards +X, +Y and +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreyBoxExtents {
    /// Distances towards the negative axes.
    pub neg: Vec3,
    /// Distances towards the positive axes.
    pub pos: Vec3,
}

impl GreyBoxExtents {
    /// A box centered on its origin.
    pub fn symmetric(half_extents: Vec3) -> Self {
        Self {
            neg: half_extents,
            pos: half_extents,
        }
    }

    /// The full size along each axis.
    pub fn size(&self) -> Vec3 {
        self.neg + self.pos
    }

    /// The center of the box relative to its origin.
    pub fn center(&self) -> Vec3 {
        (self.pos - self.neg) * 0.5
    }
}

impl Default for GreyBoxExtents {
    /// A unit cube centered on the origin.
    fn default() -> Self {
        Self::symmetric(Vec3::splat(0.5))
    }
}

/// A box drawn with a prototyping material, for blocking out levels.
///
/// The mesh is generated outside of extraction by the grey-box mesh lane and
/// cached on the component. Every setter drops the cached mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GreyBoxComponent {
    shape: GreyBoxShape,
    extents: GreyBoxExtents,
    material: Option<Handle<MaterialResource>>,
    category: Option<RenderCategory>,
    mesh: Handle<MeshResource>,
}

#[derive(Serialize, Deserialize)]
struct GreyBoxData {
    shape: u32,
    extents: GreyBoxExtents,
    material: Option<AssetUUID>,
    category: Option<RenderCategory>,
}

impl GreyBoxComponent {
    /// Creates a box with the given extents.
    pub fn new(extents: GreyBoxExtents) -> Self {
        Self {
            extents,
            ..Self::default()
        }
    }

    /// The shape.
    pub fn shape(&self) -> GreyBoxShape {
        self.shape
    }

    /// The extents.
    pub fn extents(&self) -> GreyBoxExtents {
        self.extents
    }

    /// The material override.
    pub fn material(&self) -> Option<Handle<MaterialResource>> {
        self.material
    }

    /// The component-level category. Falls back to the global default.
    pub fn category(&self) -> Option<RenderCategory> {
        self.category
    }

    /// The cached mesh, [`Handle::INVALID`] until generated.
    pub fn mesh(&self) -> Handle<MeshResource> {
        self.mesh
    }

    /// Changes the shape.
    pub fn set_shape(&mut self, shape: GreyBoxShape) {
        self.shape = shape;
        self.mesh = Handle::INVALID;
    }

    /// Changes the extents.
    pub fn set_extents(&mut self, extents: GreyBoxExtents) {
        self.extents = extents;
        self.mesh = Handle::INVALID;
    }

    /// Changes the material override.
    pub fn set_material(&mut self, material: Option<Handle<MaterialResource>>) {
        self.material = material;
        self.mesh = Handle::INVALID;
    }

    /// Changes the component-level category.
    pub fn set_category(&mut self, category: Option<RenderCategory>) {
        self.category = category;
        self.mesh = Handle::INVALID;
    }

    /// Stores the mesh generated for the current parameters.
    pub fn set_cached_mesh(&mut self, mesh: Handle<MeshResource>) {
        self.mesh = mesh;
    }

    /// The content-hash key of the mesh the current parameters generate.
    ///
    /// Hashes the shape tag and the bit patterns of the six extents, so equal
    /// boxes share one mesh resource.
    pub fn mesh_key(&self) -> AssetUUID {
        let e = &self.extents;
        let mut bytes = Vec::with_capacity(28);
        bytes.extend_from_slice(&self.shape.tag().to_le_bytes());
        for value in [e.neg.x, e.neg.y, e.neg.z, e.pos.x, e.pos.y, e.pos.z] {
            bytes.extend_from_slice(&value.to_bits().to_le_bytes());
        }
        AssetUUID::from_content("grey-box", &bytes)
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
                .unwrap_or(RenderCategory::LitOpaque),
        );
        let snapshot = RenderSnapshot {
            transform: owner.global_transform,
            global_bounds: owner.global_bounds,
            base_id: owner.id.picking_id(),
            color: LinearRgba::WHITE,
        };
        let flip_winding = owner.global_transform.contains_negative_scale();
        let uniform_scale = owner.global_transform.contains_uniform_scale();

        let mut records = Vec::with_capacity(mesh.submeshes.len());
        for (part, submesh) in (0u32..).zip(&mesh.submeshes) {
            let material = resolve_material(resources, self.mesh, part, self.material)?;
            let material_id = resources.material_identity(material).unwrap_or(0);
            let sort_key = message
                .settings
                .emit_sort_keys
                .then(|| compute_sort_key(material_id, mesh_id, flip_winding));
            records.push(build_record(
                &snapshot,
                RecordPart {
                    mesh: self.mesh,
                    material,
                    submesh_index: part,
                    material_index: submesh.material_index,
                    batch_key: compute_batch_key(mesh_id, material_id, part, flip_winding, None),
                    category,
                    sort_key,
                    flip_winding,
                    uniform_scale,
                },
            ));
        }
        message.sink.add_all(records);
        Ok(())
    }
}

impl Component for GreyBoxComponent {
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
        encode(&GreyBoxData {
            shape: self.shape.tag(),
            extents: self.extents,
            material: self.material.and_then(|h| resources.materials.key_of(h)),
            category: self.category,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentType for GreyBoxComponent {
    const TYPE_TAG: &'static str = "GreyBoxComponent";
    const MESSAGES: &'static [MessageKind] =
        &[MessageKind::ExtractRenderData, MessageKind::UpdateLocalBounds];

    fn deserialize(bytes: &[u8], resources: &Resources) -> Result<Self, ComponentError> {
        let data: GreyBoxData = decode(bytes)?;
        Ok(Self {
            shape: GreyBoxShape::from_tag(data.shape)?,
            extents: data.extents,
            material: resolve_material_key(resources, data.material),
            category: data.category,
            mesh: Handle::INVALID,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{GameObjectId, Transform};
    use strata_core::{
        math::Quaternion,
        renderer::{ExtractedRenderData, RenderRecord, RenderResourceQuery},
        settings::ExtractionSettings,
    };

    fn resources_with_box() -> (Resources, Handle<MeshResource>, Handle<MaterialResource>) {
        let mut resources = Resources::new();
        let grey = resources.ensure_material(AssetUUID::new_v5("materials/grey"));
        let mut mesh = MeshResource::new(AssetUUID::new_v5("meshes/triangle"));
        mesh.positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        mesh.triangles = vec![[0, 1, 2]];
        mesh.add_submesh(1, 0, 0);
        mesh.set_material(0, grey);
        mesh.compute_bounds();
        let mesh = resources.register_mesh(mesh).unwrap();
        (resources, mesh, grey)
    }

    fn extract_one(
        component: GreyBoxComponent,
        transform: Transform,
        resources: &Resources,
        settings: &ExtractionSettings,
    ) -> Vec<RenderRecord> {
        let id = GameObjectId {
            index: 3,
            generation: 1,
        };
        let mut object = GameObject::new(id, "box".into(), transform);
        object.add_component(component);
        let sink = ExtractedRenderData::new();
        let mut message = Message::ExtractRenderData(ExtractRenderData {
            resources,
            sink: &sink,
            override_category: None,
            settings,
        });
        assert!(object.send_message(&mut message).is_empty());
        sink.categories()
            .into_iter()
            .flat_map(|category| sink.records(category))
            .collect()
    }

    #[test]
    fn test_defaults_to_lit_opaque_with_sort_key() {
        let (resources, mesh, grey) = resources_with_box();
        let mut component = GreyBoxComponent::default();
        component.set_cached_mesh(mesh);

        let records = extract_one(
            component,
            Transform::identity(),
            &resources,
            &ExtractionSettings::default(),
        );
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.category, RenderCategory::LitOpaque);
        assert_eq!(record.material, grey);
        assert_eq!(record.unique_id, 3);
        assert_eq!(record.color, LinearRgba::WHITE);

        let mesh_id = resources.mesh_identity(mesh).unwrap();
        let material_id = resources.material_identity(grey).unwrap();
        assert_eq!(record.sort_key, Some(compute_sort_key(material_id, mesh_id, false)));
        assert_eq!(record.batch_key, compute_batch_key(mesh_id, material_id, 0, false, None));
    }

    #[test]
    fn test_mirrored_transform_flips_winding() {
        let (resources, mesh, _) = resources_with_box();
        let mut component = GreyBoxComponent::default();
        component.set_cached_mesh(mesh);
        let mirrored = Transform::new(Vec3::ZERO, Quaternion::IDENTITY, Vec3::new(-2.0, 2.0, 2.0));

        let settings = ExtractionSettings {
            emit_sort_keys: false,
            ..ExtractionSettings::default()
        };
        let records = extract_one(component, mirrored, &resources, &settings);
        assert!(records[0].flip_winding);
        assert!(records[0].uniform_scale);
        assert_eq!(records[0].sort_key, None);
    }

    #[test]
    fn test_setters_drop_cached_mesh() {
        let (_, mesh, _) = resources_with_box();
        let mut component = GreyBoxComponent::default();
        component.set_cached_mesh(mesh);
        component.set_extents(GreyBoxExtents::symmetric(Vec3::ONE));
        assert!(component.mesh().is_null());

        component.set_cached_mesh(mesh);
        component.set_material(None);
        assert!(component.mesh().is_null());
    }

    #[test]
    fn test_mesh_key_follows_parameters() {
        let a = GreyBoxComponent::default();
        let b = GreyBoxComponent::default();
        assert_eq!(a.mesh_key(), b.mesh_key());

        let mut shifted = GreyBoxExtents::default();
        shifted.pos.x = 0.75;
        let c = GreyBoxComponent::new(shifted);
        assert_ne!(a.mesh_key(), c.mesh_key());

        // Same size, different center.
        let d = GreyBoxComponent::new(GreyBoxExtents {
            neg: Vec3::new(0.25, 0.5, 0.5),
            pos: Vec3::new(0.75, 0.5, 0.5),
        });
        assert_ne!(a.mesh_key(), d.mesh_key());
    }

    #[test]
    fn test_unknown_shape_tag_is_rejected() {
        let bytes = encode(&GreyBoxData {
            shape: 7,
            extents: GreyBoxExtents::default(),
            material: None,
            category: None,
        })
        .unwrap();
        assert!(matches!(
            GreyBoxComponent::deserialize(&bytes, &Resources::new()),
            Err(ComponentError::Extract(ExtractError::UnsupportedShapeVariant(7)))
        ));
    }

    #[test]
    fn test_serialization_round_trip() {
        let (resources, _, grey) = resources_with_box();
        let mut component = GreyBoxComponent::new(GreyBoxExtents::symmetric(Vec3::splat(2.0)));
        component.set_material(Some(grey));
        component.set_category(Some(RenderCategory::Masked));

        let bytes = component.serialize(&resources).unwrap();
        let restored = GreyBoxComponent::deserialize(&bytes, &resources).unwrap();
        assert_eq!(restored, component);
    }
}
