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

//! A stable, serializable representation of a [`World`].
//!
//! Components are stored as type-tagged byte blobs so the scene format does
//! not depend on which component types exist; the [`ComponentRegistry`] turns
//! the blobs back into components.

use super::{ComponentRegistry, Transform, World};
use crate::{assets::Resources, ComponentError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while saving or loading a scene.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The scene could not be encoded.
    #[error("failed to encode scene: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    /// The scene bytes are malformed.
    #[error("failed to decode scene: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    /// A component of an object failed to (de)serialize.
    #[error("component of object '{object}': {source}")]
    Component {
        /// The object name.
        object: String,
        /// The component error.
        #[source]
        source: ComponentError,
    },
}

/// A serialized component: its type tag and its own bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// The tag the registry resolves to a deserializer.
    pub type_tag: String,
    /// The component's serialized state.
    pub data: Vec<u8>,
}

/// A serialized game object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    /// The object name.
    pub name: String,
    /// The local transform.
    pub transform: Transform,
    /// Whether the object takes part in frames.
    pub active: bool,
    /// The components, in attachment order.
    pub components: Vec<ComponentDefinition>,
}

/// The root container of a serialized scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    /// All objects, in world slot order.
    pub objects: Vec<ObjectDefinition>,
}

impl SceneDefinition {
    /// Encodes the scene with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        Ok(bincode::serde::encode_to_vec(
            self,
            bincode::config::standard(),
        )?)
    }

    /// Decodes a scene written by [`SceneDefinition::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        let (scene, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(scene)
    }
}

impl World {
    /// Captures every object and component of the world.
    ///
    /// Resource handles are written as resource keys.
    pub fn to_definition(&self, resources: &Resources) -> Result<SceneDefinition, SerializationError> {
        let objects = self
            .iter()
            .map(|object| -> Result<ObjectDefinition, SerializationError> {
                let components = object
                    .components()
                    .iter()
                    .map(|component| -> Result<ComponentDefinition, ComponentError> {
                        Ok(ComponentDefinition {
                            type_tag: component.type_tag().to_owned(),
                            data: component.serialize(resources)?,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| SerializationError::Component {
                        object: object.name.clone(),
                        source,
                    })?;
                Ok(ObjectDefinition {
                    name: object.name.clone(),
                    transform: object.local_transform,
                    active: object.active,
                    components,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SceneDefinition { objects })
    }

    /// Builds a world from a scene definition.
    ///
    /// Resource keys are looked up in `resources`; keys that are not
    /// registered become null handles. Global transforms and bounds are
    /// refreshed before returning.
    pub fn from_definition(
        definition: &SceneDefinition,
        registry: &ComponentRegistry,
        resources: &Resources,
    ) -> Result<World, SerializationError> {
        let mut world = World::new();
        for object_def in &definition.objects {
            let id = world.spawn(object_def.name.clone(), object_def.transform);
            let Some(object) = world.get_mut(id) else {
                continue;
            };
            object.active = object_def.active;
            for component_def in &object_def.components {
                let component = registry
                    .deserialize(&component_def.type_tag, &component_def.data, resources)
                    .map_err(|source| SerializationError::Component {
                        object: object_def.name.clone(),
                        source,
                    })?;
                object.add_boxed_component(component);
            }
        }
        world.update_transforms(resources);
        log::info!("Loaded scene with {} objects", world.len());
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{GreyBoxComponent, GreyBoxExtents, JointAttachmentComponent, MeshComponent};
    use strata_core::{
        asset::AssetUUID,
        math::{Aabb, Vec3},
        renderer::MeshResource,
    };

    fn resources() -> Resources {
        let mut resources = Resources::new();
        let mut mesh = MeshResource::new(AssetUUID::new_v5("meshes/triangle"));
        mesh.positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        mesh.triangles = vec![[0, 1, 2]];
        mesh.add_submesh(1, 0, 0);
        mesh.compute_bounds();
        resources.register_mesh(mesh).unwrap();
        resources
    }

    #[test]
    fn test_scene_round_trip() {
        let resources = resources();
        let mesh = resources
            .find_mesh(&AssetUUID::new_v5("meshes/triangle"))
            .unwrap();

        let mut world = World::new();
        let a = world.spawn("triangle", Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)));
        let b = world.spawn("blocker", Transform::identity());
        if let Some(object) = world.get_mut(a) {
            object.add_component(MeshComponent::new(mesh));
            object.add_component(JointAttachmentComponent::new("hand"));
        }
        if let Some(object) = world.get_mut(b) {
            object.active = false;
            object.add_component(GreyBoxComponent::new(GreyBoxExtents::symmetric(Vec3::ONE)));
        }

        let bytes = world.to_definition(&resources).unwrap().to_bytes().unwrap();
        let definition = SceneDefinition::from_bytes(&bytes).unwrap();
        let loaded =
            World::from_definition(&definition, &ComponentRegistry::with_builtin(), &resources)
                .unwrap();

        assert_eq!(loaded.len(), 2);
        let objects: Vec<_> = loaded.iter().collect();
        assert_eq!(objects[0].name, "triangle");
        assert_eq!(objects[0].component::<MeshComponent>().map(|c| c.mesh()), Some(mesh));
        assert!(objects[0].component::<JointAttachmentComponent>().is_some());
        assert_eq!(
            objects[0].global_bounds,
            Aabb::from_min_max(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 1.0, 5.0))
        );
        assert!(!objects[1].active);
        assert_eq!(
            objects[1].component::<GreyBoxComponent>().map(|c| c.extents()),
            Some(GreyBoxExtents::symmetric(Vec3::ONE))
        );
    }

    #[test]
    fn test_unknown_component_tag_names_object() {
        let definition = SceneDefinition {
            objects: vec![ObjectDefinition {
                name: "ghost".into(),
                transform: Transform::identity(),
                active: true,
                components: vec![ComponentDefinition {
                    type_tag: "GhostComponent".into(),
                    data: Vec::new(),
                }],
            }],
        };
        let result =
            World::from_definition(&definition, &ComponentRegistry::with_builtin(), &Resources::new());
        assert!(matches!(
            result,
            Err(SerializationError::Component { object, source: ComponentError::UnknownTypeTag(_) })
                if object == "ghost"
        ));
    }
}
