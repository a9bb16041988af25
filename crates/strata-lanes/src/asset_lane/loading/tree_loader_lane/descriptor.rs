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

//! The versioned binary descriptor of a tree asset.
//!
//! All values are little-endian. Strings are a `u32` byte length followed by
//! UTF-8 bytes. LOD and material counts are stored as `u8`.

use super::TreeLoadError;
use std::{fs, path::Path};
use strata_core::{
    asset::Asset,
    math::{BoundingBoxSphere, Rgba8, Vec3},
};

/// The only descriptor version this loader reads and writes.
pub const TREE_DESCRIPTOR_VERSION: u8 = 4;

/// One vertex of a tree LOD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeVertex {
    /// Object-space position.
    pub position: Vec3,
    /// Texture coordinates. `z` carries a per-vertex texture scale.
    pub tex_coord: Vec3,
    /// Vertex normal.
    pub normal: Vec3,
    /// Vertex tangent.
    pub tangent: Vec3,
    /// Per-vertex color variation.
    pub variation_color: Rgba8,
}

/// A contiguous triangle range drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSubmesh {
    /// The first triangle of the range.
    pub first_triangle: u32,
    /// The number of triangles.
    pub triangle_count: u32,
    /// Index into [`TreeDescriptor::materials`].
    pub material_index: u32,
}

/// One level of detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLodDescriptor {
    /// The LOD is used from this distance on.
    pub min_distance: f32,
    /// The LOD is used up to (excluding) this distance.
    pub max_distance: f32,
    /// Vertices.
    pub vertices: Vec<TreeVertex>,
    /// Triangles, three vertex indices each.
    pub triangles: Vec<[u32; 3]>,
    /// Submeshes.
    pub submeshes: Vec<TreeSubmesh>,
}

/// A material of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeMaterialDescriptor {
    /// 0 branch, 1 frond, 2 leaf. Other values use no base material.
    pub material_type: u8,
    /// Diffuse texture path.
    pub diffuse_texture: String,
    /// Normal map path.
    pub normal_texture: String,
    /// Color variation applied to the material.
    pub variation_color: Rgba8,
}

/// The whole tree: bounds, LODs and materials.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDescriptor {
    /// Bounds over all LODs.
    pub bounds: BoundingBoxSphere,
    /// LODs, nearest first.
    pub lods: Vec<TreeLodDescriptor>,
    /// Materials referenced by the LOD submeshes.
    pub materials: Vec<TreeMaterialDescriptor>,
}

impl Asset for TreeDescriptor {}

struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], TreeLoadError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(TreeLoadError::UnexpectedEof {
                offset: self.offset,
                needed: len,
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], TreeLoadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, TreeLoadError> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, TreeLoadError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn f32(&mut self) -> Result<f32, TreeLoadError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    fn vec3(&mut self) -> Result<Vec3, TreeLoadError> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    fn rgba8(&mut self) -> Result<Rgba8, TreeLoadError> {
        let [r, g, b, a] = self.array()?;
        Ok(Rgba8::new(r, g, b, a))
    }

    fn string(&mut self) -> Result<String, TreeLoadError> {
        let len = self.u32()? as usize;
        Ok(String::from_utf8(self.take(len)?.to_vec())?)
    }

    /// A count followed by `count` records of at least `record_size` bytes.
    /// Rejects counts the remaining data cannot hold before allocating.
    fn count(&mut self, record_size: usize) -> Result<usize, TreeLoadError> {
        let count = self.u32()? as usize;
        let remaining = self.bytes.len() - self.offset;
        if count.saturating_mul(record_size) > remaining {
            return Err(TreeLoadError::UnexpectedEof {
                offset: self.offset,
                needed: count.saturating_mul(record_size),
            });
        }
        Ok(count)
    }
}

#[derive(Default)]
struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    fn u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    fn u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    fn f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    fn vec3(&mut self, v: Vec3) {
        self.f32(v.x);
        self.f32(v.y);
        self.f32(v.z);
    }

    fn rgba8(&mut self, c: Rgba8) {
        self.bytes.extend_from_slice(&c.to_bytes());
    }

    fn string(&mut self, s: &str) -> Result<(), TreeLoadError> {
        self.u32(checked_len(s.len(), "string bytes")?);
        self.bytes.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

fn checked_len(len: usize, what: &'static str) -> Result<u32, TreeLoadError> {
    u32::try_from(len).map_err(|_| TreeLoadError::TooMany { what, count: len })
}

fn checked_u8(len: usize, what: &'static str) -> Result<u8, TreeLoadError> {
    u8::try_from(len).map_err(|_| TreeLoadError::TooMany { what, count: len })
}

const VERTEX_SIZE: usize = 4 * 3 * 4 + 4;
const TRIANGLE_SIZE: usize = 12;
const SUBMESH_SIZE: usize = 12;

impl TreeDescriptor {
    /// Parses a descriptor.
    pub fn load(bytes: &[u8]) -> Result<Self, TreeLoadError> {
        let mut r = ByteReader::new(bytes);

        let version = r.u8()?;
        if version != TREE_DESCRIPTOR_VERSION {
            return Err(TreeLoadError::UnsupportedVersion(version));
        }

        let bounds = BoundingBoxSphere {
            center: r.vec3()?,
            half_extents: r.vec3()?,
            radius: r.f32()?,
        };

        let lod_count = r.u8()?;
        let mut lods = Vec::with_capacity(lod_count as usize);
        for _ in 0..lod_count {
            let min_distance = r.f32()?;
            let max_distance = r.f32()?;
            let vertex_count = r.count(VERTEX_SIZE)?;
            let triangle_count = r.u32()? as usize;
            let submesh_count = r.u32()? as usize;

            let mut vertices = Vec::with_capacity(vertex_count);
            for _ in 0..vertex_count {
                vertices.push(TreeVertex {
                    position: r.vec3()?,
                    tex_coord: r.vec3()?,
                    normal: r.vec3()?,
                    tangent: r.vec3()?,
                    variation_color: r.rgba8()?,
                });
            }

            let mut triangles = Vec::with_capacity(triangle_count.min(bytes.len() / TRIANGLE_SIZE));
            for _ in 0..triangle_count {
                triangles.push([r.u32()?, r.u32()?, r.u32()?]);
            }

            let mut submeshes = Vec::with_capacity(submesh_count.min(bytes.len() / SUBMESH_SIZE));
            for _ in 0..submesh_count {
                submeshes.push(TreeSubmesh {
                    first_triangle: r.u32()?,
                    triangle_count: r.u32()?,
                    material_index: r.u32()?,
                });
            }

            lods.push(TreeLodDescriptor {
                min_distance,
                max_distance,
                vertices,
                triangles,
                submeshes,
            });
        }

        let material_count = r.u8()?;
        let mut materials = Vec::with_capacity(material_count as usize);
        for _ in 0..material_count {
            materials.push(TreeMaterialDescriptor {
                material_type: r.u8()?,
                diffuse_texture: r.string()?,
                normal_texture: r.string()?,
                variation_color: r.rgba8()?,
            });
        }

        Ok(Self {
            bounds,
            lods,
            materials,
        })
    }

    /// Writes the descriptor in the current version.
    pub fn save(&self) -> Result<Vec<u8>, TreeLoadError> {
        let mut w = ByteWriter::default();
        w.u8(TREE_DESCRIPTOR_VERSION);

        w.vec3(self.bounds.center);
        w.vec3(self.bounds.half_extents);
        w.f32(self.bounds.radius);

        w.u8(checked_u8(self.lods.len(), "LODs")?);
        for lod in &self.lods {
            w.f32(lod.min_distance);
            w.f32(lod.max_distance);
            w.u32(checked_len(lod.vertices.len(), "vertices")?);
            w.u32(checked_len(lod.triangles.len(), "triangles")?);
            w.u32(checked_len(lod.submeshes.len(), "submeshes")?);

            for vtx in &lod.vertices {
                w.vec3(vtx.position);
                w.vec3(vtx.tex_coord);
                w.vec3(vtx.normal);
                w.vec3(vtx.tangent);
                w.rgba8(vtx.variation_color);
            }
            for tri in &lod.triangles {
                tri.iter().for_each(|&i| w.u32(i));
            }
            for sm in &lod.submeshes {
                w.u32(sm.first_triangle);
                w.u32(sm.triangle_count);
                w.u32(sm.material_index);
            }
        }

        w.u8(checked_u8(self.materials.len(), "materials")?);
        for mat in &self.materials {
            w.u8(mat.material_type);
            w.string(&mat.diffuse_texture)?;
            w.string(&mat.normal_texture)?;
            w.rgba8(mat.variation_color);
        }
        Ok(w.bytes)
    }

    /// Reads and parses a descriptor file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, TreeLoadError> {
        Self::load(&fs::read(path)?)
    }

    /// Writes the descriptor to a file.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), TreeLoadError> {
        fs::write(path, self.save()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::tests::sample_tree;

    #[test]
    fn test_save_then_load_is_identity() {
        let tree = sample_tree();
        let bytes = tree.save().unwrap();
        assert_eq!(bytes[0], TREE_DESCRIPTOR_VERSION);
        assert_eq!(TreeDescriptor::load(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let mut bytes = sample_tree().save().unwrap();
        bytes[0] = 3;
        assert!(matches!(
            TreeDescriptor::load(&bytes),
            Err(TreeLoadError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn test_truncated_data_is_rejected() {
        let bytes = sample_tree().save().unwrap();
        for len in [0, 1, 20, bytes.len() / 2, bytes.len() - 1] {
            assert!(
                matches!(
                    TreeDescriptor::load(&bytes[..len]),
                    Err(TreeLoadError::UnexpectedEof { .. })
                ),
                "prefix of {len} bytes was accepted"
            );
        }
    }

    #[test]
    fn test_absurd_vertex_count_fails_without_allocating() {
        let mut bytes = vec![TREE_DESCRIPTOR_VERSION];
        bytes.extend_from_slice(&[0u8; 28]);
        bytes.push(1);
        bytes.extend_from_slice(&0f32.to_le_bytes());
        bytes.extend_from_slice(&10f32.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            TreeDescriptor::load(&bytes),
            Err(TreeLoadError::UnexpectedEof { .. })
        ));
    }
}
