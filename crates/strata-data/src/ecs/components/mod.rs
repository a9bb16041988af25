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

//! The built-in components.

mod grey_box;
mod joint_attachment;
mod mesh;

pub use grey_box::*;
pub use joint_attachment::*;
pub use mesh::*;

use crate::assets::Resources;
use strata_core::{
    asset::{AssetUUID, Handle},
    renderer::{MaterialResource, MeshResource},
};

/// Looks a serialized mesh key up. Unknown keys resolve to [`Handle::INVALID`].
pub(crate) fn resolve_mesh_key(
    resources: &Resources,
    key: Option<AssetUUID>,
) -> Handle<MeshResource> {
    let Some(key) = key else {
        return Handle::INVALID;
    };
    resources.find_mesh(&key).unwrap_or_else(|| {
        log::warn!("Mesh {key} is not registered, the component keeps a null handle");
        Handle::INVALID
    })
}

/// Looks a serialized material key up. Unknown keys resolve to `None`.
pub(crate) fn resolve_material_key(
    resources: &Resources,
    key: Option<AssetUUID>,
) -> Option<Handle<MaterialResource>> {
    let key = key?;
    let handle = resources.find_material(&key);
    if handle.is_none() {
        log::warn!("Material {key} is not registered, the override is dropped");
    }
    handle
}
