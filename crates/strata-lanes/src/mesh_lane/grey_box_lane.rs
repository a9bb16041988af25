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

//! Defines the lane that generates and caches grey-box meshes.

use strata_core::{
    asset::Handle,
    lane::{Lane, LaneKind},
    math::{LinearRgba, Mat4},
    renderer::{ExtractError, Geometry, MeshResource, ResourceError},
    settings::ExtractionSettings,
};
use strata_data::{
    assets::Resources,
    ecs::{GreyBoxComponent, GreyBoxExtents, GreyBoxShape, World},
};
use thiserror::Error;

/// Errors raised while generating a grey-box mesh.
#[derive(Debug, Error)]
pub enum GreyBoxError {
    /// The shape tag names no known shape.
    #[error(transparent)]
    Shape(#[from] ExtractError),
    /// The generated mesh was rejected by the resource store.
    #[error("failed to register grey-box mesh: {0}")]
    Resource(#[from] ResourceError),
}

/// Generates the meshes of [`GreyBoxComponent`]s.
///
/// Runs outside of extraction because it creates resources. Meshes are keyed
/// by a hash of the generating parameters, so identical boxes share one mesh.
#[derive(Debug, Default)]
pub struct GreyBoxMeshLane;

impl GreyBoxMeshLane {
    /// Creates a new `GreyBoxMeshLane`.
    pub fn new() -> Self {
        Self
    }

    /// Builds the geometry of a shape from its serialized tag.
    pub fn generate_geometry(
        &self,
        shape_tag: u32,
        extents: &GreyBoxExtents,
    ) -> Result<Geometry, GreyBoxError> {
        let mut geometry = Geometry::new();
        match GreyBoxShape::from_tag(shape_tag)? {
            GreyBoxShape::Box => {
                geometry.add_textured_box(
                    extents.size(),
                    LinearRgba::WHITE,
                    &Mat4::from_translation(extents.center()),
                );
            }
        }
        geometry.compute_face_normals();
        geometry.triangulate_polygons();
        geometry.compute_tangents();
        Ok(geometry)
    }

    /// Returns the mesh for the component's current parameters, generating
    /// and registering it if no resource exists under its key yet.
    pub fn ensure_mesh(
        &self,
        component: &GreyBoxComponent,
        resources: &mut Resources,
        settings: &ExtractionSettings,
    ) -> Result<Handle<MeshResource>, GreyBoxError> {
        let key = component.mesh_key();
        if let Some(mesh) = resources.find_mesh(&key) {
            return Ok(mesh);
        }

        let geometry = self.generate_geometry(component.shape().tag(), &component.extents())?;
        let mut mesh = MeshResource::from_geometry(key, &geometry)?;
        mesh.add_submesh(mesh.triangle_count(), 0, 0);
        mesh.set_material(0, resources.ensure_material(settings.grey_box_material));
        mesh.compute_bounds();

        let handle = resources.register_mesh(mesh)?;
        log::info!("Generated grey-box mesh {key}");
        Ok(handle)
    }

    /// Gives every grey box of the world whose cached mesh is missing or
    /// stale a mesh. Returns how many components were updated.
    ///
    /// A component whose mesh cannot be generated keeps a null handle and
    /// is skipped by extraction.
    pub fn run(
        &self,
        world: &mut World,
        resources: &mut Resources,
        settings: &ExtractionSettings,
    ) -> usize {
        let mut updated = 0;
        for object in world.iter_mut() {
            let name = object.name.clone();
            for component in object.components_mut::<GreyBoxComponent>() {
                if resources.meshes.is_valid(component.mesh()) {
                    continue;
                }
                match self.ensure_mesh(component, resources, settings) {
                    Ok(mesh) => {
                        component.set_cached_mesh(mesh);
                        updated += 1;
                    }
                    Err(e) => log::warn!("No grey-box mesh for '{name}': {e}"),
                }
            }
        }
        updated
    }
}

impl Lane for GreyBoxMeshLane {
    fn strategy_name(&self) -> &'static str {
        "GreyBoxMesh"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Mesh
    }
}
