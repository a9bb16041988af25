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

use std::error::Error;
use strata_core::{asset::Asset, lane::Lane};

/// A lane that parses a specific kind of asset from a byte slice.
///
/// Implementors do the CPU-side decoding only: file access and resource
/// registration happen around them, so a loader can run on any thread.
pub trait AssetLoaderLane<A: Asset>: Lane {
    /// Parses a byte slice into an instance of the asset `A`.
    ///
    /// The error must be thread-safe.
    fn load(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;
}
