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

//! Provides the backend-agnostic render data model and the extraction primitives.
//!
//! This module defines the "what" of rendering as seen by the simulation side:
//! - resource data ([`MeshResource`], [`MaterialResource`]) and procedural
//!   [`Geometry`] that produces meshes;
//! - the per-frame output ([`RenderRecord`], [`RenderCategory`]);
//! - the [`extract`] primitives (material resolution, batch keys, record
//!   building and the concurrent per-frame sink).
//!
//! Walking the scene and fanning out over objects is done by the lanes in
//! `strata-lanes`; this module never touches the scene.

pub mod error;
pub mod extract;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod render_data;

pub use self::error::{ExtractError, ResourceError};
pub use self::extract::*;
pub use self::geometry::Geometry;
pub use self::material::{MaterialResource, TextureSlot};
pub use self::mesh::{MeshResource, SubmeshDescriptor};
pub use self::render_data::{RenderCategory, RenderRecord};
