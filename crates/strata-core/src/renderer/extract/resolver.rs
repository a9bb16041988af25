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

//! Read-only resource queries and per-part material resolution.

use crate::{
    asset::Handle,
    renderer::{error::ExtractError, material::MaterialResource, mesh::MeshResource},
};

/// Read-only access to resident render resources during extraction.
///
/// Implemented by the resource context in `strata-data`. All methods take
/// `&self` so the query can be shared across extraction workers; borrowing a
/// resource is a bounds plus generation check and never blocks.
pub trait RenderResourceQuery: Sync {
    /// Borrows a resident mesh. `None` for stale, null or unloaded handles.
    fn mesh(&self, handle: Handle<MeshResource>) -> Option<&MeshResource>;

    /// Borrows a resident material. `None` for stale, null or unloaded handles.
    fn material(&self, handle: Handle<MaterialResource>) -> Option<&MaterialResource>;

    /// `true` if `handle` refers to a resident mesh.
    fn is_mesh_valid(&self, handle: Handle<MeshResource>) -> bool {
        self.mesh(handle).is_some()
    }

    /// `true` if `handle` refers to a resident material.
    fn is_material_valid(&self, handle: Handle<MaterialResource>) -> bool {
        self.material(handle).is_some()
    }

    /// The stable 32-bit identity of a resident mesh.
    fn mesh_identity(&self, handle: Handle<MeshResource>) -> Option<u32> {
        self.mesh(handle).map(|mesh| mesh.key.identity_hash())
    }

    /// The stable 32-bit identity of a resident material.
    fn material_identity(&self, handle: Handle<MaterialResource>) -> Option<u32> {
        self.material(handle).map(|mat| mat.key.identity_hash())
    }
}

/// Resolves the material used to draw one submesh.
///
/// - a valid `material_override` wins;
/// - otherwise the mesh's material table entry for the submesh's material
///   index is used ([`Handle::INVALID`] if the table has no such entry).
///
/// Fails with [`ExtractError::ResourceNotLoaded`] if the mesh is not resident
/// and with [`ExtractError::InvalidSubmeshIndex`] if the mesh has no such submesh.
pub fn resolve_material<Q: RenderResourceQuery + ?Sized>(
    resources: &Q,
    mesh: Handle<MeshResource>,
    submesh_index: u32,
    material_override: Option<Handle<MaterialResource>>,
) -> Result<Handle<MaterialResource>, ExtractError> {
    let mesh_res = resources
        .mesh(mesh)
        .ok_or(ExtractError::ResourceNotLoaded { kind: "mesh" })?;

    let submesh = mesh_res
        .submesh(submesh_index)
        .ok_or(ExtractError::InvalidSubmeshIndex {
            index: submesh_index,
            count: mesh_res.submesh_count(),
        })?;

    match material_override {
        Some(material) if resources.is_material_valid(material) => Ok(material),
        _ => Ok(mesh_res.material(submesh.material_index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetUUID;

    /// A tiny arena-free query over fixed slots; the handle index is the slot.
    struct FixedResources {
        meshes: Vec<MeshResource>,
        materials: Vec<MaterialResource>,
    }

    impl RenderResourceQuery for FixedResources {
        fn mesh(&self, handle: Handle<MeshResource>) -> Option<&MeshResource> {
            self.meshes.get(handle.index() as usize)
        }
        fn material(&self, handle: Handle<MaterialResource>) -> Option<&MaterialResource> {
            self.materials.get(handle.index() as usize)
        }
    }

    fn fixture() -> FixedResources {
        let mut mesh = MeshResource::new(AssetUUID::new_v5("meshes/two-parts"));
        mesh.add_submesh(1, 0, 0);
        mesh.add_submesh(1, 1, 1);
        mesh.set_material(0, Handle::from_raw_parts(0, 0));
        mesh.set_material(1, Handle::from_raw_parts(1, 0));
        FixedResources {
            meshes: vec![mesh],
            materials: (0..3)
                .map(|i| MaterialResource::new(AssetUUID::new_v5(&format!("materials/{i}"))))
                .collect(),
        }
    }

    #[test]
    fn test_mesh_default_material_per_submesh() {
        let res = fixture();
        let mesh = Handle::from_raw_parts(0, 0);
        assert_eq!(resolve_material(&res, mesh, 0, None), Ok(Handle::from_raw_parts(0, 0)));
        assert_eq!(resolve_material(&res, mesh, 1, None), Ok(Handle::from_raw_parts(1, 0)));
    }

    #[test]
    fn test_valid_override_wins() {
        let res = fixture();
        let mesh = Handle::from_raw_parts(0, 0);
        let over = Handle::from_raw_parts(2, 0);
        assert_eq!(resolve_material(&res, mesh, 1, Some(over)), Ok(over));
    }

    #[test]
    fn test_invalid_override_falls_back() {
        let res = fixture();
        let mesh = Handle::from_raw_parts(0, 0);
        assert_eq!(
            resolve_material(&res, mesh, 1, Some(Handle::INVALID)),
            Ok(Handle::from_raw_parts(1, 0))
        );
    }

    #[test]
    fn test_submesh_out_of_range() {
        let res = fixture();
        assert_eq!(
            resolve_material(&res, Handle::from_raw_parts(0, 0), 2, None),
            Err(ExtractError::InvalidSubmeshIndex { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_mesh_not_loaded() {
        let res = fixture();
        assert_eq!(
            resolve_material(&res, Handle::from_raw_parts(5, 0), 0, None),
            Err(ExtractError::ResourceNotLoaded { kind: "mesh" })
        );
    }
}
