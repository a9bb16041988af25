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

//! Messages dispatched to components.
//!
//! A message is delivered to every component of an object that lists its
//! [`MessageKind`] in [`Component::handled_messages`](super::Component::handled_messages).
//! Handlers take the component by `&self`; results travel back through the
//! message's own fields.

use crate::animation::Skeleton;
use std::fmt;
use strata_core::{
    math::{Aabb, Mat4, Quaternion, Vec3},
    renderer::{ExtractError, ExtractedRenderData, RenderCategory, RenderResourceQuery},
    settings::ExtractionSettings,
};

/// The kinds of messages components can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    /// See [`ExtractRenderData`].
    ExtractRenderData,
    /// See [`UpdateLocalBounds`].
    UpdateLocalBounds,
    /// See [`AnimationPoseUpdated`].
    AnimationPoseUpdated,
}

/// Asks components to emit this frame's render records into the sink.
pub struct ExtractRenderData<'a> {
    /// Read-only resource access.
    pub resources: &'a dyn RenderResourceQuery,
    /// The frame's sink.
    pub sink: &'a ExtractedRenderData,
    /// When set, every record is filed under this category.
    pub override_category: Option<RenderCategory>,
    /// Extraction settings.
    pub settings: &'a ExtractionSettings,
}

/// Asks components to grow the object's local bounds by their own.
pub struct UpdateLocalBounds<'a> {
    /// Read-only resource access.
    pub resources: &'a dyn RenderResourceQuery,
    /// The accumulated local bounds. Starts as [`Aabb::INVALID`].
    pub local_bounds: Aabb,
}

/// Delivers a freshly evaluated animation pose of the object's skeleton.
pub struct AnimationPoseUpdated<'a> {
    /// The skeleton the pose belongs to.
    pub skeleton: &'a Skeleton,
    /// Object-space joint matrices, one per skeleton joint.
    pub pose: &'a [Mat4],
    /// Set by a handler that wants the owner moved.
    pub local_position: Option<Vec3>,
    /// Set by a handler that wants the owner rotated.
    pub local_rotation: Option<Quaternion>,
}

/// A message addressed to an object's components.
pub enum Message<'a> {
    /// Render-data extraction.
    ExtractRenderData(ExtractRenderData<'a>),
    /// Local bounds update.
    UpdateLocalBounds(UpdateLocalBounds<'a>),
    /// New animation pose.
    AnimationPoseUpdated(AnimationPoseUpdated<'a>),
}

/// A component that failed to handle a message.
///
/// Delivery continues to the object's other components, so one object can
/// report several failures for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFailure {
    /// The type tag of the failing component.
    pub type_tag: &'static str,
    /// What went wrong.
    pub error: ExtractError,
}

impl fmt::Display for ComponentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_tag, self.error)
    }
}

impl Message<'_> {
    /// The kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::ExtractRenderData(_) => MessageKind::ExtractRenderData,
            Message::UpdateLocalBounds(_) => MessageKind::UpdateLocalBounds,
            Message::AnimationPoseUpdated(_) => MessageKind::AnimationPoseUpdated,
        }
    }
}
