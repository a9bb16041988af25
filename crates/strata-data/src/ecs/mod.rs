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

//! The scene: a flat [`World`] of [`GameObject`]s carrying type-erased
//! components that react to [`Message`]s.
//!
//! There is no scheduler. The frame driver in `strata-lanes` dispatches
//! messages to objects, and the [`ComponentRegistry`] is the only place that
//! knows every component type, for deserialization.

mod component;
mod components;
mod entity;
mod message;
mod object;
mod registry;
mod serialization;
mod world;

pub use component::{Component, ComponentType};
pub use components::*;
pub use entity::*;
pub use message::*;
pub use object::GameObject;
pub use registry::ComponentRegistry;
pub use serialization::*;
pub use world::World;
