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

use super::{Component, ComponentFailure, GameObjectId, Message, Transform};
use strata_core::math::{Aabb, AffineTransform};

/// A named object in the scene, carrying transforms, bounds and components.
pub struct GameObject {
    /// The object's id in its world.
    pub id: GameObjectId,
    /// A human-readable name.
    pub name: String,
    /// The transform authored by the user or set by handlers.
    pub local_transform: Transform,
    /// The world-space transform, recomputed by [`World::update_transforms`](super::World::update_transforms).
    pub global_transform: AffineTransform,
    /// The world-space bounds of everything the components draw.
    pub global_bounds: Aabb,
    /// Inactive objects receive no messages from the frame driver.
    pub active: bool,
    components: Vec<Box<dyn Component>>,
}

impl GameObject {
    pub(crate) fn new(id: GameObjectId, name: String, local_transform: Transform) -> Self {
        Self {
            id,
            name,
            local_transform,
            global_transform: local_transform.to_affine(),
            global_bounds: Aabb::INVALID,
            active: true,
            components: Vec::new(),
        }
    }

    /// Attaches a component.
    pub fn add_component(&mut self, component: impl Component) {
        self.components.push(Box::new(component));
    }

    /// Attaches an already boxed component.
    pub fn add_boxed_component(&mut self, component: Box<dyn Component>) {
        self.components.push(component);
    }

    /// All components, in attachment order.
    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    /// The first component of type `T`.
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// The first component of type `T`, mutably.
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// All components of type `T`, mutably.
    pub fn components_mut<T: Component>(&mut self) -> impl Iterator<Item = &mut T> {
        self.components
            .iter_mut()
            .filter_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Delivers `message` to every component that handles its kind, in
    /// attachment order.
    ///
    /// A failing component does not stop delivery to the others. The
    /// failures are returned in attachment order; empty means success.
    pub fn send_message(&self, message: &mut Message<'_>) -> Vec<ComponentFailure> {
        let kind = message.kind();
        self.components
            .iter()
            .filter(|component| component.handled_messages().contains(&kind))
            .filter_map(|component| {
                component
                    .on_message(self, message)
                    .err()
                    .map(|error| ComponentFailure {
                        type_tag: component.type_tag(),
                        error,
                    })
            })
            .collect()
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.active)
            .field(
                "components",
                &self
                    .components
                    .iter()
                    .map(|c| c.type_tag())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
