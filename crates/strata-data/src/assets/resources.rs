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

//! The explicit resource context shared by components and lanes.

use super::storage::ResourceStore;
use strata_core::{
    asset::{AssetUUID, Handle},
    renderer::{MaterialResource, MeshResource, RenderResourceQuery, ResourceError},
};

/// All resident render resources.
///
/// There is no global resource manager: a `Resources` value is created by the
/// application and passed by reference to whatever needs it. Extraction only
/// ever sees `&Resources`; creating resources needs `&mut Resources` and
/// therefore happens outside of extraction.
#[derive(Default)]
pub struct Resources {
    /// Resident meshes.
    pub meshes: ResourceStore<MeshResource>,
    /// Resident materials.
    pub materials: ResourceStore<MaterialResource>,
}

impl Resources {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `mesh` and registers it under its own key.
    pub fn register_mesh(
        &mut self,
        mesh: MeshResource,
    ) -> Result<Handle<MeshResource>, ResourceError> {
        mesh.validate()?;
        let key = mesh.key;
        let handle = self.meshes.insert(key, mesh)?;
        log::debug!("Registered mesh {key} as {handle:?}");
        Ok(handle)
    }

    /// Registers `material` under its own key.
    pub fn register_material(
        &mut self,
        material: MaterialResource,
    ) -> Result<Handle<MaterialResource>, ResourceError> {
        let key = material.key;
        let handle = self.materials.insert(key, material)?;
        log::debug!("Registered material {key} as {handle:?}");
        Ok(handle)
    }

    /// Returns the material registered under `key`, registering an empty
    /// placeholder material if there is none yet.
    pub fn ensure_material(&mut self, key: AssetUUID) -> Handle<MaterialResource> {
        self.materials
            .get_or_insert_with(key, || MaterialResource::new(key))
    }

    /// Finds a mesh by key.
    pub fn find_mesh(&self, key: &AssetUUID) -> Option<Handle<MeshResource>> {
        self.meshes.find(key)
    }

    /// Finds a material by key.
    pub fn find_material(&self, key: &AssetUUID) -> Option<Handle<MaterialResource>> {
        self.materials.find(key)
    }
}

impl RenderResourceQuery for Resources {
    fn mesh(&self, handle: Handle<MeshResource>) -> Option<&MeshResource> {
        self.meshes.get(handle)
    }

    fn material(&self, handle: Handle<MaterialResource>) -> Option<&MaterialResource> {
        self.materials.get(handle)
    }

    fn mesh_identity(&self, handle: Handle<MeshResource>) -> Option<u32> {
        self.meshes.identity(handle)
    }

    fn material_identity(&self, handle: Handle<MaterialResource>) -> Option<u32> {
        self.materials.identity(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::math::Vec3;

    #[test]
    fn test_register_mesh_validates() {
        let mut resources = Resources::new();
        let mut mesh = MeshResource::new(AssetUUID::new_v5("meshes/bad"));
        mesh.positions = vec![Vec3::ZERO];
        mesh.add_submesh(1, 0, 0);
        assert!(matches!(
            resources.register_mesh(mesh),
            Err(ResourceError::InvalidDescription(_))
        ));
        assert!(resources.meshes.is_empty());
    }

    #[test]
    fn test_identity_matches_key_hash() {
        let mut resources = Resources::new();
        let key = AssetUUID::new_v5("materials/stone");
        let handle = resources.ensure_material(key);
        assert_eq!(resources.ensure_material(key), handle);
        assert_eq!(resources.material_identity(handle), Some(key.identity_hash()));
        assert!(resources.is_material_valid(handle));
        assert!(!resources.is_mesh_valid(Handle::INVALID));
    }
}
