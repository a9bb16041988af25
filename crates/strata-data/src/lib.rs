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

//! # Strata Data
//!
//! The data layer: generational resource storage and the `Resources`
//! context, the scene of game objects, the built-in components and their
//! serialization.

#![warn(missing_docs)]

pub mod animation;
pub mod assets;
pub mod ecs;

use strata_core::renderer::ExtractError;
use thiserror::Error;

/// Errors raised by component (de)serialization and registration.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// No component type is registered under this tag.
    #[error("unknown component type tag '{0}'")]
    UnknownTypeTag(String),
    /// A component type with this tag is already registered.
    #[error("component type tag '{0}' is already registered")]
    DuplicateTypeTag(&'static str),
    /// The component state could not be encoded.
    #[error("failed to encode component: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    /// The component bytes are malformed.
    #[error("failed to decode component: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    /// The component state is well-formed but describes something unsupported.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}
