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

use super::{Component, ComponentType};
use crate::{assets::Resources, ComponentError};
use std::collections::HashMap;

type Deserializer = fn(&[u8], &Resources) -> Result<Box<dyn Component>, ComponentError>;

fn deserialize_boxed<T: ComponentType>(
    bytes: &[u8],
    resources: &Resources,
) -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(T::deserialize(bytes, resources)?))
}

/// Maps component type tags to their deserializers.
///
/// Registration is explicit: the application (or [`ComponentRegistry::with_builtin`])
/// calls [`ComponentRegistry::register`] once per component type. Message
/// dispatch does not go through the registry; each type declares the kinds it
/// handles in [`ComponentType::MESSAGES`].
#[derive(Default)]
pub struct ComponentRegistry {
    deserializers: HashMap<&'static str, Deserializer>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.deserializers.keys().collect();
        tags.sort();
        f.debug_struct("ComponentRegistry")
            .field("types", &tags)
            .finish()
    }
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every component type of this crate registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.insert::<super::MeshComponent>();
        registry.insert::<super::GreyBoxComponent>();
        registry.insert::<super::JointAttachmentComponent>();
        registry
    }

    /// Registers component type `T`.
    pub fn register<T: ComponentType>(&mut self) -> Result<(), ComponentError> {
        if self.is_registered(T::TYPE_TAG) {
            return Err(ComponentError::DuplicateTypeTag(T::TYPE_TAG));
        }
        self.insert::<T>();
        Ok(())
    }

    fn insert<T: ComponentType>(&mut self) {
        self.deserializers
            .insert(T::TYPE_TAG, deserialize_boxed::<T> as Deserializer);
        log::debug!("Registered component type '{}'", T::TYPE_TAG);
    }

    /// `true` if a type with this tag is registered.
    pub fn is_registered(&self, type_tag: &str) -> bool {
        self.deserializers.contains_key(type_tag)
    }

    /// Rebuilds a boxed component from its type tag and serialized bytes.
    pub fn deserialize(
        &self,
        type_tag: &str,
        bytes: &[u8],
        resources: &Resources,
    ) -> Result<Box<dyn Component>, ComponentError> {
        let deserializer = self
            .deserializers
            .get(type_tag)
            .ok_or_else(|| ComponentError::UnknownTypeTag(type_tag.to_owned()))?;
        deserializer(bytes, resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{GreyBoxComponent, JointAttachmentComponent, MeshComponent};

    #[test]
    fn test_builtin_types_are_registered() {
        let mut registry = ComponentRegistry::with_builtin();
        for tag in [
            MeshComponent::TYPE_TAG,
            GreyBoxComponent::TYPE_TAG,
            JointAttachmentComponent::TYPE_TAG,
        ] {
            assert!(registry.is_registered(tag), "{tag}");
        }
        assert!(matches!(
            registry.register::<GreyBoxComponent>(),
            Err(ComponentError::DuplicateTypeTag(tag)) if tag == GreyBoxComponent::TYPE_TAG
        ));
    }

    #[test]
    fn test_builtin_round_trip_through_registry() {
        let registry = ComponentRegistry::with_builtin();
        let resources = Resources::new();
        let joint = JointAttachmentComponent::new("hand");
        let bytes = joint.serialize(&resources).unwrap();
        let restored = registry
            .deserialize(JointAttachmentComponent::TYPE_TAG, &bytes, &resources)
            .unwrap();
        assert_eq!(restored.type_tag(), JointAttachmentComponent::TYPE_TAG);
        assert_eq!(
            restored
                .as_any()
                .downcast_ref::<JointAttachmentComponent>()
                .map(|c| c.joint_name().to_owned()),
            Some("hand".to_owned())
        );
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.register::<MeshComponent>().is_ok());
        assert!(matches!(
            registry.register::<MeshComponent>(),
            Err(ComponentError::DuplicateTypeTag(_))
        ));
    }

    #[test]
    fn test_unknown_tag() {
        let registry = ComponentRegistry::with_builtin();
        assert!(matches!(
            registry.deserialize("Nope", &[], &Resources::new()),
            Err(ComponentError::UnknownTypeTag(tag)) if tag == "Nope"
        ));
    }
}
