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

use super::{
    AnimationPoseUpdated, ComponentFailure, GameObject, GameObjectId, Message, Transform,
    UpdateLocalBounds,
};
use crate::animation::Skeleton;
use strata_core::{
    math::{Aabb, Mat4},
    renderer::RenderResourceQuery,
};

struct ObjectSlot {
    generation: u32,
    object: Option<GameObject>,
}

/// The scene: an arena of [`GameObject`]s addressed by [`GameObjectId`].
///
/// The scene is flat: every object's local transform is relative to the world
/// origin.
#[derive(Default)]
pub struct World {
    slots: Vec<ObjectSlot>,
    free: Vec<u32>,
    len: usize,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object with no components and returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, local_transform: Transform) -> GameObjectId {
        let id = match self.free.pop() {
            Some(index) => GameObjectId {
                index,
                generation: self.slots[index as usize].generation,
            },
            None => {
                self.slots.push(ObjectSlot {
                    generation: 0,
                    object: None,
                });
                GameObjectId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.slots[id.index as usize].object =
            Some(GameObject::new(id, name.into(), local_transform));
        self.len += 1;
        id
    }

    /// Removes an object. Its id, and every copy of it, stops resolving.
    pub fn despawn(&mut self, id: GameObjectId) -> Option<GameObject> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(object)
    }

    /// Borrows an object.
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_ref()
    }

    /// Mutably borrows an object.
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_mut()
    }

    /// The number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the world holds no object.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over all live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.slots.iter().filter_map(|s| s.object.as_ref())
    }

    /// Iterates mutably over all live objects in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.slots.iter_mut().filter_map(|s| s.object.as_mut())
    }

    /// Collects the active objects, in slot order.
    pub fn active_objects(&self) -> Vec<&GameObject> {
        self.iter().filter(|o| o.active).collect()
    }

    /// Recomputes every object's global transform from its local one and its
    /// global bounds from what its components report.
    pub fn update_transforms(&mut self, resources: &dyn RenderResourceQuery) {
        for object in self.iter_mut() {
            object.global_transform = object.local_transform.to_affine();

            let mut message = Message::UpdateLocalBounds(UpdateLocalBounds {
                resources,
                local_bounds: Aabb::INVALID,
            });
            for failure in object.send_message(&mut message) {
                log::warn!("Failed to update bounds of '{}': {failure}", object.name);
            }
            let Message::UpdateLocalBounds(update) = message else {
                continue;
            };

            object.global_bounds = if update.local_bounds.is_valid() {
                update.local_bounds.transform(&object.global_transform.to_matrix())
            } else {
                Aabb::INVALID
            };
        }
    }

    /// Delivers `message` to the components of object `id` and returns the
    /// components that failed. An unknown id delivers nothing.
    pub fn send_message(
        &self,
        id: GameObjectId,
        message: &mut Message<'_>,
    ) -> Vec<ComponentFailure> {
        self.get(id)
            .map(|object| object.send_message(message))
            .unwrap_or_default()
    }

    /// Delivers an animation pose to object `id` and applies the local
    /// position and rotation its handlers asked for.
    ///
    /// Returns `true` if the object moved. Failing handlers are logged; the
    /// requests of the others are still applied.
    pub fn apply_animation_pose(
        &mut self,
        id: GameObjectId,
        skeleton: &Skeleton,
        pose: &[Mat4],
    ) -> bool {
        let Some(object) = self.get_mut(id) else {
            return false;
        };

        let mut message = Message::AnimationPoseUpdated(AnimationPoseUpdated {
            skeleton,
            pose,
            local_position: None,
            local_rotation: None,
        });
        for failure in object.send_message(&mut message) {
            log::warn!("Failed to apply pose to '{}': {failure}", object.name);
        }
        let Message::AnimationPoseUpdated(update) = message else {
            return false;
        };

        let mut moved = false;
        if let Some(position) = update.local_position {
            object.local_transform.translation = position;
            moved = true;
        }
        if let Some(rotation) = update.local_rotation {
            object.local_transform.rotation = rotation;
            moved = true;
        }
        if moved {
            object.global_transform = object.local_transform.to_affine();
        }
        moved
    }

    /// Sets the local transform of object `id` and refreshes its global transform.
    pub fn set_local_transform(&mut self, id: GameObjectId, transform: Transform) -> bool {
        match self.get_mut(id) {
            Some(object) => {
                object.local_transform = transform;
                object.global_transform = transform.to_affine();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::math::Vec3;

    #[test]
    fn test_spawn_and_despawn_recycle_with_new_generation() {
        let mut world = World::new();
        let a = world.spawn("a", Transform::identity());
        let b = world.spawn("b", Transform::identity());
        assert_eq!(world.len(), 2);

        assert!(world.despawn(a).is_some());
        assert!(world.get(a).is_none());
        assert!(world.despawn(a).is_none());

        let c = world.spawn("c", Transform::identity());
        assert_eq!(c.index, a.index);
        assert_ne!(c.generation, a.generation);
        assert_eq!(world.get(c).map(|o| o.name.as_str()), Some("c"));
        assert_eq!(world.get(b).map(|o| o.id), Some(b));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_active_objects_skip_inactive() {
        let mut world = World::new();
        let a = world.spawn("a", Transform::identity());
        world.spawn("b", Transform::identity());
        if let Some(object) = world.get_mut(a) {
            object.active = false;
        }
        let names: Vec<_> = world.active_objects().iter().map(|o| o.name.clone()).collect();
        assert_eq!(names, vec!["b".to_string()]);
    }

    #[test]
    fn test_set_local_transform_refreshes_global() {
        let mut world = World::new();
        let id = world.spawn("a", Transform::identity());
        assert!(world.set_local_transform(id, Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))));
        assert_eq!(
            world.get(id).map(|o| o.global_transform.translation()),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
    }
}
