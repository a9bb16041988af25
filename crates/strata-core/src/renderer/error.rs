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

//! Defines the error types for render-data extraction and render resources.

use std::fmt;

/// An error raised while extracting render records from one object.
///
/// None of these abort a frame: the extraction lane logs them and moves on to
/// the next object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A referenced resource is not resident (yet). Callers skip silently.
    ResourceNotLoaded {
        /// What kind of resource was missing (e.g. `"mesh"`).
        kind: &'static str,
    },
    /// A submesh index beyond the mesh's submesh count was requested.
    InvalidSubmeshIndex {
        /// The requested submesh index.
        index: u32,
        /// The number of submeshes the mesh actually has.
        count: u32,
    },
    /// A procedural shape variant that has no generator.
    UnsupportedShapeVariant(u32),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::ResourceNotLoaded { kind } => {
                write!(f, "The {kind} resource is not loaded")
            }
            ExtractError::InvalidSubmeshIndex { index, count } => {
                write!(
                    f,
                    "Submesh index {index} is out of range for a mesh with {count} submeshes"
                )
            }
            ExtractError::UnsupportedShapeVariant(tag) => {
                write!(f, "Unsupported procedural shape variant: {tag}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// An error related to the management of render resources in an arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// No resource is registered under the requested key.
    NotFound(String),
    /// The handle refers to a slot that was freed or reused.
    StaleHandle {
        /// The slot index of the handle.
        index: u32,
        /// The generation recorded in the handle.
        generation: u32,
    },
    /// A resource is already registered under this key.
    DuplicateKey(String),
    /// The resource description is inconsistent (e.g. a submesh past the index data).
    InvalidDescription(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound(key) => write!(f, "Resource not found: {key}"),
            ResourceError::StaleHandle { index, generation } => {
                write!(f, "Stale resource handle {index}v{generation}")
            }
            ResourceError::DuplicateKey(key) => {
                write!(f, "A resource is already registered under {key}")
            }
            ResourceError::InvalidDescription(details) => {
                write!(f, "Invalid resource description: {details}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_display() {
        let err = ExtractError::InvalidSubmeshIndex { index: 3, count: 2 };
        assert_eq!(
            err.to_string(),
            "Submesh index 3 is out of range for a mesh with 2 submeshes"
        );
        assert_eq!(
            ExtractError::ResourceNotLoaded { kind: "mesh" }.to_string(),
            "The mesh resource is not loaded"
        );
    }
}
