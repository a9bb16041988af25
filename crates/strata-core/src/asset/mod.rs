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

//! Provides the foundational traits and primitive types for Strata's resource system.
//!
//! This module defines the "common language" for all resource-related operations:
//! - The [`Asset`] trait: a marker for all types that can be stored as resources.
//! - [`AssetUUID`]: the stable, content- or path-derived identity of a resource.
//! - [`Handle`]: a generation-checked index into a resource arena.
//!
//! It has no knowledge of how resources are stored; the arena lives in
//! `strata-data`.

mod handle;
mod uuid;

pub use handle::*;
pub use uuid::*;

/// A marker trait for types that can be managed by the resource system.
///
/// `Send + Sync + 'static` lets resident resources be read from the parallel
/// extraction workers.
///
/// ```
/// use strata_core::asset::Asset;
///
/// struct Texture;
/// impl Asset for Texture {}
/// ```
pub trait Asset: Send + Sync + 'static {}
