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

use crate::hashing::murmur_hash32;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace for name-derived resource identifiers.
const STRATA_NAMESPACE: Uuid = Uuid::from_u128(0x8f3c_2a61_5b7e_4d0a_9c42_71e5_0b3d_a9f6);

/// A globally unique, persistent identifier for a logical resource.
///
/// Two flavours exist:
/// - path/name derived ([`AssetUUID::new_v5`]), stable for the same name in
///   every process;
/// - content derived ([`AssetUUID::from_content`]), stable for the same
///   generating parameters. Procedural meshes use this as their cache key so
///   no name string ever has to be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetUUID(Uuid);

impl AssetUUID {
    /// Creates a new, random (version 4) `AssetUUID`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a stable (version 5) `AssetUUID` from a resource name or path.
    pub fn new_v5(name: &str) -> Self {
        Self(Uuid::new_v5(&STRATA_NAMESPACE, name.as_bytes()))
    }

    /// Creates a stable `AssetUUID` from a content kind and its generating bytes.
    pub fn from_content(kind: &str, content: &[u8]) -> Self {
        let kind_ns = Uuid::new_v5(&STRATA_NAMESPACE, kind.as_bytes());
        Self(Uuid::new_v5(&kind_ns, content))
    }

    /// Wraps a well-known 128-bit identifier (e.g. a built-in asset GUID).
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// The raw 16 bytes, e.g. to derive keys of dependent resources.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// The 32-bit identity hash used by batch and sort keys.
    ///
    /// Derived only from the UUID bytes, so it is stable across runs.
    pub fn identity_hash(&self) -> u32 {
        murmur_hash32(self.0.as_bytes(), 0)
    }
}

impl Default for AssetUUID {
    /// Creates a new, random (version 4) `AssetUUID`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetUUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v5_is_stable() {
        assert_eq!(
            AssetUUID::new_v5("meshes/crate.mesh"),
            AssetUUID::new_v5("meshes/crate.mesh")
        );
        assert_ne!(
            AssetUUID::new_v5("meshes/crate.mesh"),
            AssetUUID::new_v5("meshes/barrel.mesh")
        );
    }

    #[test]
    fn test_content_kind_separates_namespaces() {
        let bytes = [1u8, 2, 3];
        assert_ne!(
            AssetUUID::from_content("grey-box", &bytes),
            AssetUUID::from_content("tree-lod", &bytes)
        );
        assert_eq!(
            AssetUUID::from_content("grey-box", &bytes).identity_hash(),
            AssetUUID::from_content("grey-box", &bytes).identity_hash()
        );
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(AssetUUID::new(), AssetUUID::new());
    }
}
