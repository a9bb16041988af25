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

//! Deterministic, non-cryptographic hash functions.
//!
//! Everything in here is seedless (or explicitly seeded) and endian-stable so
//! that the values can be persisted, compared across runs, and used as cache
//! keys for render-state caching. None of these functions are suitable for
//! hashing untrusted input into a `HashMap`.

mod murmur;
mod xxhash;

pub use murmur::*;
pub use xxhash::*;

/// Reinterprets a slice of 32-bit words as their little-endian byte sequence.
///
/// Keys built from several identity words are hashed through this so the
/// result does not depend on the host's endianness.
pub fn words_to_le_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
