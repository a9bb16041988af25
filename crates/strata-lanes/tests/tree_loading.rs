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

use anyhow::Result;
use strata_core::{
    asset::AssetUUID,
    math::{BoundingBoxSphere, Rgba8, Vec3},
};
use strata_data::assets::Resources;
use strata_lanes::asset_lane::{
    AssetLoaderLane, TreeDescriptor, TreeLoadError, TreeLoaderLane, TreeLodDescriptor,
    TreeMaterialDescriptor, TreeSubmesh, TreeVertex,
};

fn bush() -> TreeDescriptor {
    let vertices = [Vec3::ZERO, Vec3::X, Vec3::Y]
        .map(|position| TreeVertex {
            position,
            tex_coord: Vec3::new(position.x, position.y, 4.0),
            normal: Vec3::Z,
            tangent: Vec3::X,
            variation_color: Rgba8::new(10, 20, 30, 255),
        })
        .to_vec();
    TreeDescriptor {
        bounds: BoundingBoxSphere {
            center: Vec3::new(0.5, 0.5, 0.0),
            half_extents: Vec3::new(0.5, 0.5, 0.0),
            radius: 0.71,
        },
        lods: vec![TreeLodDescriptor {
            min_distance: 0.0,
            max_distance: 100.0,
            vertices,
            triangles: vec![[0, 1, 2]],
            submeshes: vec![TreeSubmesh {
                first_triangle: 0,
                triangle_count: 1,
                material_index: 0,
            }],
        }],
        materials: vec![TreeMaterialDescriptor {
            material_type: 1,
            diffuse_texture: "textures/frond_d.png".into(),
            normal_texture: "textures/frond_n.png".into(),
            variation_color: Rgba8::new(255, 255, 255, 255),
        }],
    }
}

#[test]
fn tree_file_round_trip_and_instantiation() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bush.tree");
    bush().save_file(&path)?;

    let lane = TreeLoaderLane::new();
    let bytes = std::fs::read(&path)?;
    let desc = lane.load(&bytes).map_err(|e| anyhow::anyhow!(e))?;
    assert_eq!(desc, bush());
    assert_eq!(TreeDescriptor::load_file(&path)?, desc);

    let mut resources = Resources::new();
    let tree = lane.create_resource(AssetUUID::new_v5("trees/bush"), 0, &desc, &mut resources)?;
    let lod = tree.select_lod(42.0).map(|lod| lod.mesh);
    assert_eq!(lod, Some(tree.lods[0].mesh));
    let mesh = lod.and_then(|h| resources.meshes.get(h));
    assert_eq!(mesh.map(|m| m.material(0)), Some(tree.materials[0]));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(matches!(
        TreeDescriptor::load_file(dir.path().join("absent.tree")),
        Err(TreeLoadError::Io(_))
    ));
    Ok(())
}
