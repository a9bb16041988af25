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

//! Defines the CPU-side mesh resource: vertex streams, triangles, submeshes
//! and the default material table.

use super::{error::ResourceError, geometry::Geometry, material::MaterialResource};
use crate::{
    asset::{Asset, AssetUUID, Handle},
    math::{Aabb, Rgba8, Vec2, Vec3},
};

/// A contiguous range of triangles drawn with one material.
///
/// Immutable once the owning mesh is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmeshDescriptor {
    /// Index into the owning mesh's material table.
    pub material_index: u32,
    /// First triangle of the range.
    pub first_triangle: u32,
    /// Number of triangles in the range.
    pub triangle_count: u32,
}

/// A renderable mesh as stored in the resource arena.
///
/// Streams are kept as separate arrays; optional streams are `None` when the
/// source did not provide them.
#[derive(Debug, Clone)]
pub struct MeshResource {
    /// The stable resource key. Its identity hash feeds batch and sort keys.
    pub key: AssetUUID,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals.
    pub normals: Option<Vec<Vec3>>,
    /// Primary texture coordinates.
    pub tex_coords0: Option<Vec<Vec2>>,
    /// Secondary texture coordinates.
    pub tex_coords1: Option<Vec<Vec2>>,
    /// Vertex tangents.
    pub tangents: Option<Vec<Vec3>>,
    /// Per-vertex colors.
    pub colors: Option<Vec<Rgba8>>,
    /// Triangle list, three vertex indices per triangle.
    pub triangles: Vec<[u32; 3]>,
    /// The submeshes, in draw order.
    pub submeshes: Vec<SubmeshDescriptor>,
    /// Default materials, indexed by [`SubmeshDescriptor::material_index`].
    pub materials: Vec<Handle<MaterialResource>>,
    /// Local-space bounds.
    pub bounds: Aabb,
}

impl Asset for MeshResource {}

impl MeshResource {
    /// Creates an empty mesh.
    pub fn new(key: AssetUUID) -> Self {
        Self {
            key,
            positions: Vec::new(),
            normals: None,
            tex_coords0: None,
            tex_coords1: None,
            tangents: None,
            colors: None,
            triangles: Vec::new(),
            submeshes: Vec::new(),
            materials: Vec::new(),
            bounds: Aabb::INVALID,
        }
    }

    /// Allocates position, uv0, normal and tangent streams from triangulated geometry.
    ///
    /// Fails if a polygon of `geometry` still has more than three corners.
    pub fn from_geometry(key: AssetUUID, geometry: &Geometry) -> Result<Self, ResourceError> {
        let mut triangles = Vec::with_capacity(geometry.polygons.len());
        for polygon in &geometry.polygons {
            match polygon.vertices.as_slice() {
                [a, b, c] => triangles.push([*a, *b, *c]),
                other => {
                    return Err(ResourceError::InvalidDescription(format!(
                        "polygon with {} corners, triangulate the geometry first",
                        other.len()
                    )))
                }
            }
        }

        let vertices = &geometry.vertices;
        let mut mesh = Self::new(key);
        mesh.positions = vertices.iter().map(|v| v.position).collect();
        mesh.tex_coords0 = Some(vertices.iter().map(|v| v.tex_coord).collect());
        mesh.normals = Some(vertices.iter().map(|v| v.normal).collect());
        mesh.tangents = Some(vertices.iter().map(|v| v.tangent).collect());
        mesh.triangles = triangles;
        Ok(mesh)
    }

    /// Appends a submesh covering `triangle_count` triangles from `first_triangle`.
    pub fn add_submesh(&mut self, triangle_count: u32, first_triangle: u32, material_index: u32) {
        self.submeshes.push(SubmeshDescriptor {
            material_index,
            first_triangle,
            triangle_count,
        });
    }

    /// Sets the default material for `slot`, growing the table with invalid handles.
    pub fn set_material(&mut self, slot: u32, material: Handle<MaterialResource>) {
        let slot = slot as usize;
        if self.materials.len() <= slot {
            self.materials.resize(slot + 1, Handle::INVALID);
        }
        self.materials[slot] = material;
    }

    /// The default material of `slot`, or [`Handle::INVALID`] when the table has no entry.
    pub fn material(&self, slot: u32) -> Handle<MaterialResource> {
        self.materials
            .get(slot as usize)
            .copied()
            .unwrap_or(Handle::INVALID)
    }

    /// Returns the submesh at `index`.
    pub fn submesh(&self, index: u32) -> Option<&SubmeshDescriptor> {
        self.submeshes.get(index as usize)
    }

    /// The number of submeshes.
    pub fn submesh_count(&self) -> u32 {
        self.submeshes.len() as u32
    }

    /// The number of triangles in the index data.
    pub fn triangle_count(&self) -> u32 {
        self.triangles.len() as u32
    }

    /// Recomputes [`MeshResource::bounds`] from the positions.
    pub fn compute_bounds(&mut self) {
        self.bounds = Aabb::from_points(&self.positions).unwrap_or(Aabb::INVALID);
    }

    /// Checks stream lengths, index ranges and submesh ranges.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let vertex_count = self.positions.len();
        let stream_ok = |len: Option<usize>| len.map_or(true, |len| len == vertex_count);
        if !(stream_ok(self.normals.as_ref().map(Vec::len))
            && stream_ok(self.tex_coords0.as_ref().map(Vec::len))
            && stream_ok(self.tex_coords1.as_ref().map(Vec::len))
            && stream_ok(self.tangents.as_ref().map(Vec::len))
            && stream_ok(self.colors.as_ref().map(Vec::len)))
        {
            return Err(ResourceError::InvalidDescription(
                "vertex stream lengths differ".to_owned(),
            ));
        }

        if let Some(tri) = self
            .triangles
            .iter()
            .find(|tri| tri.iter().any(|&i| i as usize >= vertex_count))
        {
            return Err(ResourceError::InvalidDescription(format!(
                "triangle {tri:?} references a vertex past {vertex_count}"
            )));
        }

        let triangle_count = self.triangle_count() as u64;
        for (index, sm) in self.submeshes.iter().enumerate() {
            if sm.first_triangle as u64 + sm.triangle_count as u64 > triangle_count {
                return Err(ResourceError::InvalidDescription(format!(
                    "submesh {index} ends past the {triangle_count} triangles of the mesh"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> MeshResource {
        let mut mesh = MeshResource::new(AssetUUID::new_v5("meshes/tri"));
        mesh.positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        mesh.triangles = vec![[0, 1, 2]];
        mesh
    }

    #[test]
    fn test_set_material_grows_table() {
        let mut mesh = triangle_mesh();
        let mat = Handle::from_raw_parts(4, 1);
        mesh.set_material(2, mat);
        assert_eq!(mesh.materials.len(), 3);
        assert!(mesh.material(0).is_null());
        assert_eq!(mesh.material(2), mat);
        assert!(mesh.material(9).is_null());
    }

    #[test]
    fn test_validate_rejects_out_of_range_submesh() {
        let mut mesh = triangle_mesh();
        mesh.add_submesh(1, 0, 0);
        assert!(mesh.validate().is_ok());
        mesh.add_submesh(1, 1, 0);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mut mesh = triangle_mesh();
        mesh.triangles.push([0, 1, 3]);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_compute_bounds() {
        let mut mesh = triangle_mesh();
        mesh.compute_bounds();
        assert_eq!(mesh.bounds, Aabb::from_min_max(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)));
    }
}
