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

//! Defines the per-frame render records and their categories.

use super::{material::MaterialResource, mesh::MeshResource};
use crate::{
    asset::Handle,
    math::{Aabb, AffineTransform, LinearRgba},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The bucket a render record is filed under in the per-frame sink.
///
/// Each render pass consumes one or more categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderCategory {
    /// Opaque geometry drawn without lighting.
    Opaque,
    /// Opaque geometry drawn with lighting.
    LitOpaque,
    /// Alpha-tested geometry.
    Masked,
    /// Alpha-blended geometry.
    Transparent,
    /// Highlighted (selected) geometry.
    Selection,
    /// A category registered by a custom pass.
    Custom(u16),
}

impl RenderCategory {
    /// The built-in categories, in their storage order.
    pub const BUILTIN: [RenderCategory; 5] = [
        RenderCategory::Opaque,
        RenderCategory::LitOpaque,
        RenderCategory::Masked,
        RenderCategory::Transparent,
        RenderCategory::Selection,
    ];

    /// Picks the effective category: per-call override, then the component's
    /// own default, then the global default.
    #[inline]
    pub fn resolve(
        call_override: Option<RenderCategory>,
        component_default: Option<RenderCategory>,
        global_default: RenderCategory,
    ) -> RenderCategory {
        call_override.or(component_default).unwrap_or(global_default)
    }

    /// The storage slot of a built-in category, `None` for [`RenderCategory::Custom`].
    #[inline]
    pub fn builtin_index(self) -> Option<usize> {
        match self {
            RenderCategory::Opaque => Some(0),
            RenderCategory::LitOpaque => Some(1),
            RenderCategory::Masked => Some(2),
            RenderCategory::Transparent => Some(3),
            RenderCategory::Selection => Some(4),
            RenderCategory::Custom(_) => None,
        }
    }
}

impl fmt::Display for RenderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderCategory::Opaque => write!(f, "Opaque"),
            RenderCategory::LitOpaque => write!(f, "LitOpaque"),
            RenderCategory::Masked => write!(f, "Masked"),
            RenderCategory::Transparent => write!(f, "Transparent"),
            RenderCategory::Selection => write!(f, "Selection"),
            RenderCategory::Custom(id) => write!(f, "Custom({id})"),
        }
    }
}

/// One draw's worth of data, snapshotted from the scene for the current frame.
///
/// Records are plain values: they hold copies of the transform and bounds and
/// handles to resources, never references into the scene. They are built
/// once, moved into the sink and dropped together at the next frame reset.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    /// The owner's global transform.
    pub transform: AffineTransform,
    /// The owner's global bounds.
    pub global_bounds: Aabb,
    /// The mesh to draw.
    pub mesh: Handle<MeshResource>,
    /// The resolved material. May be invalid when the mesh has no material for the part.
    pub material: Handle<MaterialResource>,
    /// The submesh (part) of the mesh to draw.
    pub submesh_index: u32,
    /// The batching key. Records sharing it can be instanced together.
    pub batch_key: u32,
    /// Per-instance tint.
    pub color: LinearRgba,
    /// Picking id: the owner's base id with the material index in the top byte.
    pub unique_id: u32,
    /// `true` when the transform mirrors space.
    pub flip_winding: bool,
    /// `true` when the transform scales uniformly.
    pub uniform_scale: bool,
    /// The category this record is filed under.
    pub category: RenderCategory,
    /// Optional ordering key within the category.
    pub sort_key: Option<u32>,
}
