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

// Strata Sandbox
// Builds a small scene and runs a few frames of mesh generation and extraction.

use anyhow::{Context, Result};
use strata_core::{
    asset::AssetUUID,
    math::{BoundingBoxSphere, Mat4, Quaternion, Rgba8, Vec3},
    renderer::ExtractedRenderData,
    settings::ExtractionSettings,
};
use strata_data::{
    animation::Skeleton,
    assets::Resources,
    ecs::{
        ComponentRegistry, GameObjectId, GreyBoxComponent, GreyBoxExtents,
        JointAttachmentComponent, MeshComponent, SceneDefinition, Transform, World,
    },
};
use strata_lanes::{
    asset_lane::{
        AssetLoaderLane, TreeDescriptor, TreeLoaderLane, TreeLodDescriptor,
        TreeMaterialDescriptor, TreeResource, TreeSubmesh, TreeVertex,
    },
    mesh_lane::GreyBoxMeshLane,
    render_lane::ExtractRenderablesLane,
};

const FRAME_COUNT: u32 = 4;

/// A crossed-quad tree with a detailed and a billboard LOD.
fn sapling() -> TreeDescriptor {
    let vertex = |x: f32, y: f32, z: f32| TreeVertex {
        position: Vec3::new(x, y, z),
        tex_coord: Vec3::new(x * 0.5 + 0.5, y * 0.25, 1.0),
        normal: Vec3::Z,
        tangent: Vec3::X,
        variation_color: Rgba8::new(200, 220, 180, 255),
    };
    let quad = |z: f32| {
        [
            vertex(-1.0, 0.0, z),
            vertex(1.0, 0.0, z),
            vertex(1.0, 4.0, z),
            vertex(-1.0, 4.0, z),
        ]
    };

    let near: Vec<TreeVertex> = quad(0.0).into_iter().chain(quad(0.1)).collect();
    let far: Vec<TreeVertex> = quad(0.0).to_vec();
    TreeDescriptor {
        bounds: BoundingBoxSphere {
            center: Vec3::new(0.0, 2.0, 0.05),
            half_extents: Vec3::new(1.0, 2.0, 0.05),
            radius: 2.24,
        },
        lods: vec![
            TreeLodDescriptor {
                min_distance: 0.0,
                max_distance: 25.0,
                vertices: near,
                triangles: vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]],
                submeshes: vec![
                    TreeSubmesh {
                        first_triangle: 0,
                        triangle_count: 2,
                        material_index: 0,
                    },
                    TreeSubmesh {
                        first_triangle: 2,
                        triangle_count: 2,
                        material_index: 1,
                    },
                ],
            },
            TreeLodDescriptor {
                min_distance: 25.0,
                max_distance: 100.0,
                vertices: far,
                triangles: vec![[0, 1, 2], [0, 2, 3]],
                submeshes: vec![TreeSubmesh {
                    first_triangle: 0,
                    triangle_count: 2,
                    material_index: 1,
                }],
            },
        ],
        materials: vec![
            TreeMaterialDescriptor {
                material_type: 0,
                diffuse_texture: "textures/bark_d.png".into(),
                normal_texture: "textures/bark_n.png".into(),
                variation_color: Rgba8::new(255, 255, 255, 255),
            },
            TreeMaterialDescriptor {
                material_type: 2,
                diffuse_texture: "textures/leaf_d.png".into(),
                normal_texture: "textures/leaf_n.png".into(),
                variation_color: Rgba8::new(180, 255, 160, 255),
            },
        ],
    }
}

fn load_settings() -> ExtractionSettings {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/settings.ron").to_owned());
    ExtractionSettings::load_ron(&path).unwrap_or_else(|e| {
        log::warn!("{e}, using default extraction settings");
        ExtractionSettings::default()
    })
}

fn plant_tree(resources: &mut Resources) -> Result<TreeResource> {
    let lane = TreeLoaderLane::new();
    let bytes = sapling().save()?;
    let desc = lane.load(&bytes).map_err(|e| anyhow::anyhow!(e))?;
    let tree = lane.create_resource(AssetUUID::new_v5("trees/sapling"), 0, &desc, resources)?;
    log::info!(
        "Planted tree with {} LODs and {} materials",
        tree.lods.len(),
        tree.materials.len()
    );
    Ok(tree)
}

struct Scene {
    world: World,
    tree: GameObjectId,
    lantern: GameObjectId,
}

fn build_scene(tree: &TreeResource) -> Result<Scene> {
    let mut world = World::new();

    let floor = world.spawn("floor", Transform::from_translation(Vec3::new(0.0, -0.5, 0.0)));
    world
        .get_mut(floor)
        .context("floor was just spawned")?
        .add_component(GreyBoxComponent::new(GreyBoxExtents::symmetric(Vec3::new(
            20.0, 0.5, 20.0,
        ))));

    for (i, x) in [-6.0f32, 6.0].into_iter().enumerate() {
        // The second wall is mirrored, its records flip winding.
        let scale = Vec3::new(if i == 0 { 1.0 } else { -1.0 }, 1.0, 1.0);
        let wall = world.spawn(
            format!("wall {i}"),
            Transform::new(Vec3::new(x, 1.5, 0.0), Quaternion::IDENTITY, scale),
        );
        world
            .get_mut(wall)
            .context("wall was just spawned")?
            .add_component(GreyBoxComponent::new(GreyBoxExtents {
                neg: Vec3::new(0.25, 1.5, 4.0),
                pos: Vec3::new(0.25, 1.5, 4.0),
            }));
    }

    let tree_id = world.spawn("sapling", Transform::from_translation(Vec3::new(0.0, 0.0, -10.0)));
    let first_lod = tree.lods.first().context("tree has no LOD")?;
    world
        .get_mut(tree_id)
        .context("tree was just spawned")?
        .add_component(MeshComponent::new(first_lod.mesh));

    let lantern = world.spawn("lantern", Transform::identity());
    let object = world.get_mut(lantern).context("lantern was just spawned")?;
    object.add_component(JointAttachmentComponent::new("hand"));
    object.add_component(GreyBoxComponent::new(GreyBoxExtents::symmetric(Vec3::splat(0.2))));

    Ok(Scene { world, tree: tree_id, lantern })
}

/// Swaps the tree mesh for the LOD matching `distance`. Out of range hides it.
fn update_tree_lod(world: &mut World, id: GameObjectId, tree: &TreeResource, distance: f32) {
    let Some(object) = world.get_mut(id) else {
        return;
    };
    match tree.select_lod(distance) {
        Some(lod) => {
            object.active = true;
            if let Some(mesh) = object.component_mut::<MeshComponent>() {
                mesh.set_mesh(lod.mesh);
            }
        }
        None => object.active = false,
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings();
    let mut resources = Resources::new();
    let tree = plant_tree(&mut resources)?;
    let Scene { world, tree: tree_id, lantern } = build_scene(&tree)?;

    // Save and reload the scene, as a level would be.
    let bytes = world.to_definition(&resources)?.to_bytes()?;
    log::info!("Scene saved ({} bytes)", bytes.len());
    let mut world = World::from_definition(
        &SceneDefinition::from_bytes(&bytes)?,
        &ComponentRegistry::with_builtin(),
        &resources,
    )?;

    let skeleton = Skeleton::new(["root", "hand"]);
    let mesh_lane = GreyBoxMeshLane::new();
    let extract_lane = ExtractRenderablesLane::new();
    let mut sink = ExtractedRenderData::new();

    for frame in 0..FRAME_COUNT {
        let generated = mesh_lane.run(&mut world, &mut resources, &settings);
        if generated > 0 {
            log::info!("Frame {frame}: generated {generated} grey-box meshes");
        }

        let angle = frame as f32 * 0.4;
        let hand = Mat4::from_translation(Vec3::new(angle.cos(), 1.2, angle.sin()))
            * Mat4::from_quat(Quaternion::from_axis_angle(Vec3::Y, angle));
        world.apply_animation_pose(lantern, &skeleton, &[Mat4::IDENTITY, hand]);

        update_tree_lod(&mut world, tree_id, &tree, 10.0 + frame as f32 * 30.0);
        world.update_transforms(&resources);

        let stats = extract_lane.run(&world, &resources, &mut sink, None, &settings);
        log::info!(
            "Frame {frame}: {} objects, {} records, {} skipped, {} failed",
            stats.objects,
            stats.records,
            stats.skipped,
            stats.failed
        );
        for category in sink.categories() {
            let sorted = sink.sorted(category);
            log::info!(" -> {category:?}: {} records", sorted.len());
            for record in &sorted {
                log::debug!(
                    "    batch {:08x} sort {:?} id {:08x} flip {}",
                    record.batch_key,
                    record.sort_key,
                    record.unique_id,
                    record.flip_winding
                );
            }
        }
    }
    Ok(())
}
