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

//! Defines the lane that extracts render records from the scene.

use rayon::prelude::*;
use strata_core::{
    lane::{Lane, LaneKind},
    renderer::{ExtractError, ExtractedRenderData, RenderCategory},
    settings::ExtractionSettings,
};
use strata_data::{
    assets::Resources,
    ecs::{ExtractRenderData, GameObject, Message, World},
};

/// What happened during one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Active objects the extraction message was dispatched to.
    pub objects: usize,
    /// Records in the sink after the run.
    pub records: usize,
    /// Components skipped because a resource was not resident.
    pub skipped: usize,
    /// Components whose extraction failed.
    pub failed: usize,
}

impl ExtractionStats {
    fn merge(self, other: Self) -> Self {
        Self {
            objects: self.objects + other.objects,
            records: self.records + other.records,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

/// A lane that performs the "extraction" phase of the rendering pipeline.
///
/// It sends [`ExtractRenderData`] to every active object of the [`World`] and
/// lets the components append their records to the frame's sink. Objects
/// are processed in parallel with rayon unless the settings disable it.
#[derive(Debug, Default)]
pub struct ExtractRenderablesLane;

impl ExtractRenderablesLane {
    /// Creates a new `ExtractRenderablesLane`.
    pub fn new() -> Self {
        Self
    }

    /// Executes the extraction process for one frame.
    ///
    /// The sink is reset first. A resource that is not resident skips the
    /// component that needs it; any other error fails that component only.
    /// The object's other components and the rest of the frame still run.
    pub fn run(
        &self,
        world: &World,
        resources: &Resources,
        sink: &mut ExtractedRenderData,
        override_category: Option<RenderCategory>,
        settings: &ExtractionSettings,
    ) -> ExtractionStats {
        sink.reset();
        let sink: &ExtractedRenderData = sink;

        let objects = world.active_objects();
        let extract = |object: &&GameObject| {
            extract_object(object, resources, sink, override_category, settings)
        };

        let mut stats = if settings.parallel {
            objects
                .par_iter()
                .with_min_len(settings.min_objects_per_task.max(1))
                .map(extract)
                .reduce(ExtractionStats::default, ExtractionStats::merge)
        } else {
            objects
                .iter()
                .map(extract)
                .fold(ExtractionStats::default(), ExtractionStats::merge)
        };
        stats.records = sink.total_len();

        log::debug!(
            "Extracted {} records from {} objects ({} skipped, {} failed)",
            stats.records,
            stats.objects,
            stats.skipped,
            stats.failed
        );
        stats
    }
}

fn extract_object(
    object: &GameObject,
    resources: &Resources,
    sink: &ExtractedRenderData,
    override_category: Option<RenderCategory>,
    settings: &ExtractionSettings,
) -> ExtractionStats {
    let mut message = Message::ExtractRenderData(ExtractRenderData {
        resources,
        sink,
        override_category,
        settings,
    });
    let mut stats = ExtractionStats {
        objects: 1,
        ..ExtractionStats::default()
    };
    for failure in object.send_message(&mut message) {
        match failure.error {
            ExtractError::ResourceNotLoaded { kind } => {
                log::debug!(
                    "Skipping {} of '{}': {kind} is not loaded",
                    failure.type_tag,
                    object.name
                );
                stats.skipped += 1;
            }
            e => {
                log::warn!(
                    "Failed to extract {} of '{}': {e}",
                    failure.type_tag,
                    object.name
                );
                stats.failed += 1;
            }
        }
    }
    stats
}

impl Lane for ExtractRenderablesLane {
    fn strategy_name(&self) -> &'static str {
        "ExtractRenderables"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Extract
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_lane::GreyBoxMeshLane;
    use strata_core::{
        asset::{AssetUUID, Handle},
        math::Vec3,
        renderer::MeshResource,
    };
    use strata_data::ecs::{GreyBoxComponent, GreyBoxExtents, MeshComponent, Transform};

    fn scene() -> (World, Resources) {
        let mut resources = Resources::new();
        let material = resources.ensure_material(AssetUUID::new_v5("materials/default"));
        let mut mesh = MeshResource::new(AssetUUID::new_v5("meshes/triangle"));
        mesh.positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        mesh.triangles = vec![[0, 1, 2]];
        mesh.add_submesh(1, 0, 0);
        mesh.set_material(0, material);
        let mesh = resources.register_mesh(mesh).unwrap();

        let mut world = World::new();
        for i in 0..3 {
            let id = world.spawn(format!("triangle {i}"), Transform::identity());
            if let Some(object) = world.get_mut(id) {
                object.add_component(MeshComponent::new(mesh));
            }
        }
        (world, resources)
    }

    #[test]
    fn test_extract_empty_world() {
        let lane = ExtractRenderablesLane::new();
        let mut sink = ExtractedRenderData::new();
        let stats = lane.run(
            &World::new(),
            &Resources::new(),
            &mut sink,
            None,
            &ExtractionSettings::default(),
        );
        assert_eq!(stats, ExtractionStats::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_frames_do_not_accumulate() {
        let (world, resources) = scene();
        let lane = ExtractRenderablesLane::new();
        let mut sink = ExtractedRenderData::new();
        let settings = ExtractionSettings::default();

        lane.run(&world, &resources, &mut sink, None, &settings);
        let stats = lane.run(&world, &resources, &mut sink, None, &settings);
        assert_eq!(stats.records, 3);
        assert_eq!(sink.len(RenderCategory::Opaque), 3);
    }

    #[test]
    fn test_unloaded_mesh_is_skipped_not_fatal() {
        let (mut world, resources) = scene();
        let broken = world.spawn("broken", Transform::identity());
        if let Some(object) = world.get_mut(broken) {
            object.add_component(MeshComponent::default());
        }

        let mut sink = ExtractedRenderData::new();
        let settings = ExtractionSettings {
            parallel: false,
            ..ExtractionSettings::default()
        };
        let stats = ExtractRenderablesLane::new().run(&world, &resources, &mut sink, None, &settings);
        assert_eq!(
            stats,
            ExtractionStats {
                objects: 4,
                records: 3,
                skipped: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn test_override_category_applies_to_every_record() {
        let (world, resources) = scene();
        let mut sink = ExtractedRenderData::new();
        ExtractRenderablesLane::new().run(
            &world,
            &resources,
            &mut sink,
            Some(RenderCategory::Selection),
            &ExtractionSettings::default(),
        );
        assert_eq!(sink.categories(), vec![RenderCategory::Selection]);
        assert_eq!(sink.len(RenderCategory::Selection), 3);
    }

    #[test]
    fn test_unloaded_component_does_not_silence_its_siblings() {
        for mesh_first in [true, false] {
            let mut resources = Resources::new();
            let settings = ExtractionSettings::default();
            let mut world = World::new();
            let id = world.spawn("prop", Transform::identity());
            if let Some(object) = world.get_mut(id) {
                let unloaded = MeshComponent::new(Handle::from_raw_parts(42, 0));
                let grey_box = GreyBoxComponent::new(GreyBoxExtents::default());
                if mesh_first {
                    object.add_component(unloaded);
                    object.add_component(grey_box);
                } else {
                    object.add_component(grey_box);
                    object.add_component(unloaded);
                }
            }
            assert_eq!(GreyBoxMeshLane::new().run(&mut world, &mut resources, &settings), 1);

            let mut sink = ExtractedRenderData::new();
            let stats = ExtractRenderablesLane::new().run(&world, &resources, &mut sink, None, &settings);
            assert_eq!(
                stats,
                ExtractionStats {
                    objects: 1,
                    records: 1,
                    skipped: 1,
                    failed: 0
                },
                "mesh component first: {mesh_first}"
            );
            assert_eq!(sink.len(RenderCategory::LitOpaque), 1);
        }
    }
}
