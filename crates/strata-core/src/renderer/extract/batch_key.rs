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

//! Deterministic batch and sort keys for render records.
//!
//! Keys are built from 32-bit resource identity hashes, never from pointers
//! or handle indices, so they are stable across runs and machines.

use crate::hashing::murmur_hash_words;

/// A 32-bit batching key. Equal keys mean "can be drawn in one batch".
///
/// This is a hash: distinct inputs may collide, and collisions are accepted.
pub type BatchKey = u32;

/// Computes the batch key of one part of a mesh.
///
/// MurmurHash2 (seed 0) over the little-endian words
/// `[mesh_id, material_id, submesh_index, flip_winding]`, followed by `extra`
/// when a category needs one more discriminator (e.g. the uniform-scale flag).
///
/// ```
/// use strata_core::renderer::compute_batch_key;
/// let a = compute_batch_key(1, 2, 0, false, None);
/// assert_eq!(a, compute_batch_key(1, 2, 0, false, None));
/// assert_ne!(a, compute_batch_key(1, 2, 0, true, None));
/// ```
#[inline]
pub fn compute_batch_key(
    mesh_id: u32,
    material_id: u32,
    submesh_index: u32,
    flip_winding: bool,
    extra: Option<u32>,
) -> BatchKey {
    let flip = flip_winding as u32;
    match extra {
        None => murmur_hash_words(&[mesh_id, material_id, submesh_index, flip]),
        Some(extra) => murmur_hash_words(&[mesh_id, material_id, submesh_index, flip, extra]),
    }
}

/// Computes a batch key whose top four bits are the part index.
///
/// Sorting by this key draws lower parts of a mesh first. The low 28 bits are
/// the MurmurHash2 of `[mesh_id, material_id, part_index]`.
#[inline]
pub fn compute_part_ordered_batch_key(mesh_id: u32, material_id: u32, part_index: u32) -> BatchKey {
    (part_index << 28) | (murmur_hash_words(&[mesh_id, material_id, part_index]) & 0x0FFF_FFFF)
}

/// Packs a sort key that orders by material, then mesh, then winding.
///
/// `(material_id << 16) | (mesh_id & 0xFFFE) | flip_winding`. Bit packing,
/// not hashing: the low bit of the mesh identity is given up for the flag.
#[inline]
pub fn compute_sort_key(material_id: u32, mesh_id: u32, flip_winding: bool) -> u32 {
    (material_id << 16) | (mesh_id & 0xFFFE) | flip_winding as u32
}
