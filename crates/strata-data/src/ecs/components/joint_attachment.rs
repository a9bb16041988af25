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

//! Pins an object to a joint of an animated skeleton.

use crate::{
    assets::Resources,
    ecs::{
        component::{decode, encode},
        AnimationPoseUpdated, Component, ComponentType, GameObject, Message, MessageKind,
    },
    ComponentError,
};
use serde::{Deserialize, Serialize};
use std::{
    any::Any,
    sync::atomic::{AtomicU32, Ordering},
};
use strata_core::{math::AffineTransform, renderer::ExtractError};

const UNRESOLVED: u32 = u32::MAX;

/// Moves its owner onto a named joint whenever a new pose arrives.
///
/// The joint index is looked up by name on the first pose that contains the
/// joint, then cached. Poses of skeletons without the joint are ignored.
#[derive(Debug)]
pub struct JointAttachmentComponent {
    joint_name: String,
    joint_index: AtomicU32,
}

#[derive(Serialize, Deserialize)]
struct JointAttachmentData {
    joint_name: String,
}

impl JointAttachmentComponent {
    /// Attaches to the joint called `joint_name`.
    pub fn new(joint_name: impl Into<String>) -> Self {
        Self {
            joint_name: joint_name.into(),
            joint_index: AtomicU32::new(UNRESOLVED),
        }
    }

    /// The joint name.
    pub fn joint_name(&self) -> &str {
        &self.joint_name
    }

    /// Changes the joint. The cached index is dropped.
    pub fn set_joint_name(&mut self, joint_name: impl Into<String>) {
        self.joint_name = joint_name.into();
        *self.joint_index.get_mut() = UNRESOLVED;
    }

    /// The cached joint index, once resolved.
    pub fn cached_joint_index(&self) -> Option<u32> {
        match self.joint_index.load(Ordering::Relaxed) {
            UNRESOLVED => None,
            index => Some(index),
        }
    }

    fn apply_pose(&self, message: &mut AnimationPoseUpdated<'_>) {
        let index = match self.cached_joint_index() {
            Some(index) => index,
            None => match message.skeleton.find_joint(&self.joint_name) {
                Some(index) => {
                    self.joint_index.store(index, Ordering::Relaxed);
                    index
                }
                None => return,
            },
        };

        let Some(joint) = message.pose.get(index as usize) else {
            log::debug!(
                "Pose has no matrix for joint '{}' ({index})",
                self.joint_name
            );
            return;
        };
        let joint = AffineTransform(*joint);
        message.local_position = Some(joint.translation());
        message.local_rotation = Some(joint.rotation());
    }
}

impl Clone for JointAttachmentComponent {
    fn clone(&self) -> Self {
        Self {
            joint_name: self.joint_name.clone(),
            joint_index: AtomicU32::new(self.joint_index.load(Ordering::Relaxed)),
        }
    }
}

impl Component for JointAttachmentComponent {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn handled_messages(&self) -> &'static [MessageKind] {
        Self::MESSAGES
    }

    fn on_message(&self, _owner: &GameObject, message: &mut Message<'_>) -> Result<(), ExtractError> {
        if let Message::AnimationPoseUpdated(pose) = message {
            self.apply_pose(pose);
        }
        Ok(())
    }

    fn serialize(&self, _resources: &Resources) -> Result<Vec<u8>, ComponentError> {
        encode(&JointAttachmentData {
            joint_name: self.joint_name.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentType for JointAttachmentComponent {
    const TYPE_TAG: &'static str = "JointAttachmentComponent";
    const MESSAGES: &'static [MessageKind] = &[MessageKind::AnimationPoseUpdated];

    fn deserialize(bytes: &[u8], _resources: &Resources) -> Result<Self, ComponentError> {
        let data: JointAttachmentData = decode(bytes)?;
        Ok(Self::new(data.joint_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::Skeleton,
        ecs::{Transform, World},
    };
    use approx::assert_abs_diff_eq;
    use strata_core::math::{Mat4, Quaternion, Vec3};

    #[test]
    fn test_pose_moves_owner_and_caches_index() {
        let skeleton = Skeleton::new(["root", "hand"]);
        let rotation = Quaternion::from_axis_angle(Vec3::Y, 0.5);
        let hand = AffineTransform::from_trs(Vec3::new(1.0, 2.0, 3.0), rotation, Vec3::ONE);
        let pose = [Mat4::IDENTITY, hand.to_matrix()];

        let mut world = World::new();
        let id = world.spawn("sword", Transform::identity());
        if let Some(object) = world.get_mut(id) {
            object.add_component(JointAttachmentComponent::new("hand"));
        }

        assert!(world.apply_animation_pose(id, &skeleton, &pose));
        let object = world.get(id).unwrap();
        assert_eq!(object.local_transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert!(object.local_transform.rotation.approx_same_rotation(&rotation, 1e-4));
        assert_abs_diff_eq!(object.global_transform.translation().z, 3.0, epsilon = 1e-6);
        assert_eq!(
            object
                .component::<JointAttachmentComponent>()
                .and_then(|c| c.cached_joint_index()),
            Some(1)
        );
    }

    #[test]
    fn test_unknown_joint_is_a_no_op() {
        let skeleton = Skeleton::new(["root"]);
        let mut world = World::new();
        let id = world.spawn("sword", Transform::from_translation(Vec3::X));
        if let Some(object) = world.get_mut(id) {
            object.add_component(JointAttachmentComponent::new("hand"));
        }

        assert!(!world.apply_animation_pose(id, &skeleton, &[Mat4::IDENTITY]));
        let object = world.get(id).unwrap();
        assert_eq!(object.local_transform.translation, Vec3::X);
        assert_eq!(
            object
                .component::<JointAttachmentComponent>()
                .and_then(|c| c.cached_joint_index()),
            None
        );
    }

    #[test]
    fn test_renaming_drops_cached_index() {
        let skeleton = Skeleton::new(["root", "hand"]);
        let mut component = JointAttachmentComponent::new("hand");
        let mut message = AnimationPoseUpdated {
            skeleton: &skeleton,
            pose: &[Mat4::IDENTITY, Mat4::IDENTITY],
            local_position: None,
            local_rotation: None,
        };
        component.apply_pose(&mut message);
        assert_eq!(component.cached_joint_index(), Some(1));

        component.set_joint_name("root");
        assert_eq!(component.cached_joint_index(), None);
    }

    #[test]
    fn test_serializes_joint_name() {
        let resources = Resources::new();
        let bytes = JointAttachmentComponent::new("spine_02")
            .serialize(&resources)
            .unwrap();
        let restored = JointAttachmentComponent::deserialize(&bytes, &resources).unwrap();
        assert_eq!(restored.joint_name(), "spine_02");
        assert_eq!(restored.cached_joint_index(), None);
    }
}
