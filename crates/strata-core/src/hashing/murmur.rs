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

//! 32-bit MurmurHash2.

const M: u32 = 0x5bd1_e995;
const R: u32 = 24;

/// Computes the 32-bit MurmurHash2 of `data` with the given `seed`.
///
/// ```
/// use strata_core::hashing::murmur_hash32;
/// assert_eq!(murmur_hash32(b"", 0), 0);
/// ```
pub fn murmur_hash32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed ^ (data.len() as u32);

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h = h.wrapping_mul(M);
        h ^= k;
    }

    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h
}

/// Hashes a sequence of 32-bit words, serialized little-endian, with seed 0.
///
/// This is the mix used for batch keys: order-sensitive and fixed-width.
pub fn murmur_hash_words(words: &[u32]) -> u32 {
    murmur_hash32(&super::words_to_le_bytes(words), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_with_zero_seed_is_zero() {
        assert_eq!(murmur_hash32(&[], 0), 0);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(murmur_hash32(b"abc", 0), 0x1357_7c9b);
        assert_eq!(murmur_hash_words(&[0xAABB_CCDD, 0x1122_3344, 2]), 0x0338_dbcc);
    }

    #[test]
    fn test_seed_changes_result() {
        assert_ne!(murmur_hash32(b"mesh", 0), murmur_hash32(b"mesh", 1));
    }

    #[test]
    fn test_word_order_matters() {
        assert_ne!(murmur_hash_words(&[1, 2]), murmur_hash_words(&[2, 1]));
    }
}
