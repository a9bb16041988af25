use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use strata_core::{
    asset::AssetUUID,
    math::Vec3,
    renderer::{compute_batch_key, ExtractedRenderData, MeshResource},
    settings::ExtractionSettings,
};
use strata_data::{
    assets::Resources,
    ecs::{MeshComponent, Transform, World},
};
use strata_lanes::render_lane::ExtractRenderablesLane;

fn scene(objects: u32) -> (World, Resources) {
    let mut resources = Resources::new();
    let material = resources.ensure_material(AssetUUID::new_v5("materials/bench"));
    let mut mesh = MeshResource::new(AssetUUID::new_v5("meshes/bench"));
    mesh.positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
    mesh.triangles = vec![[0, 1, 2], [2, 1, 3]];
    mesh.add_submesh(1, 0, 0);
    mesh.add_submesh(1, 1, 0);
    mesh.set_material(0, material);
    mesh.compute_bounds();
    let mesh = resources
        .register_mesh(mesh)
        .unwrap_or_else(|e| panic!("bench mesh rejected: {e}"));

    let mut world = World::new();
    for i in 0..objects {
        let id = world.spawn(
            format!("object {i}"),
            Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
        );
        if let Some(object) = world.get_mut(id) {
            object.add_component(MeshComponent::new(mesh));
        }
    }
    world.update_transforms(&resources);
    (world, resources)
}

fn bench_batch_key(c: &mut Criterion) {
    c.bench_function("compute_batch_key", |b| {
        b.iter(|| compute_batch_key(black_box(0xAABB_CCDD), black_box(0x1122_3344), 2, false, None))
    });
}

fn bench_extraction(c: &mut Criterion) {
    let (world, resources) = scene(10_000);
    let lane = ExtractRenderablesLane::new();
    let mut sink = ExtractedRenderData::new();

    let mut group = c.benchmark_group("Extraction");
    for parallel in [false, true] {
        let settings = ExtractionSettings {
            parallel,
            ..ExtractionSettings::default()
        };
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(lane.run(&world, &resources, &mut sink, None, &settings)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_batch_key, bench_extraction);
criterion_main!(benches);
