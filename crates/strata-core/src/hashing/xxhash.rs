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

//! 32-bit xxHash (XXH32).

const PRIME1: u32 = 2_654_435_761;
const PRIME2: u32 = 2_246_822_519;
const PRIME3: u32 = 3_266_489_917;
const PRIME4: u32 = 668_265_263;
const PRIME5: u32 = 374_761_393;

#[inline]
fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[inline]
fn round(acc: u32, lane: u32) -> u32 {
    acc.wrapping_add(lane.wrapping_mul(PRIME2))
        .rotate_left(13)
        .wrapping_mul(PRIME1)
}

/// Computes XXH32 of `data` with the given `seed`.
///
/// Chaining calls (feeding one result in as the next seed) is how composite
/// content keys are built from heterogeneous fields.
pub fn xx_hash32(data: &[u8], seed: u32) -> u32 {
    let len = data.len();
    let mut rest = data;

    let mut h = if len >= 16 {
        let mut v1 = seed.wrapping_add(PRIME1).wrapping_add(PRIME2);
        let mut v2 = seed.wrapping_add(PRIME2);
        let mut v3 = seed;
        let mut v4 = seed.wrapping_sub(PRIME1);

        while rest.len() >= 16 {
            v1 = round(v1, read_u32(&rest[0..]));
            v2 = round(v2, read_u32(&rest[4..]));
            v3 = round(v3, read_u32(&rest[8..]));
            v4 = round(v4, read_u32(&rest[12..]));
            rest = &rest[16..];
        }

        v1.rotate_left(1)
            .wrapping_add(v2.rotate_left(7))
            .wrapping_add(v3.rotate_left(12))
            .wrapping_add(v4.rotate_left(18))
    } else {
        seed.wrapping_add(PRIME5)
    };

    h = h.wrapping_add(len as u32);

    while rest.len() >= 4 {
        h = h.wrapping_add(read_u32(rest).wrapping_mul(PRIME3));
        h = h.rotate_left(17).wrapping_mul(PRIME4);
        rest = &rest[4..];
    }

    for &byte in rest {
        h = h.wrapping_add(u32::from(byte).wrapping_mul(PRIME5));
        h = h.rotate_left(11).wrapping_mul(PRIME1);
    }

    h ^= h >> 15;
    h = h.wrapping_mul(PRIME2);
    h ^= h >> 13;
    h = h.wrapping_mul(PRIME3);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(xx_hash32(b"", 0), 0x02CC_5D05);
        assert_eq!(xx_hash32(b"abc", 0), 0x32D1_53FF);
        assert_eq!(
            xx_hash32(b"Nobody inspects the spammish repetition", 0),
            0xE229_3B2F
        );
    }

    #[test]
    fn test_long_input_uses_stripes() {
        assert_eq!(xx_hash32(b"0123456789abcdef0123", 0), 0x6350_964E);
    }

    #[test]
    fn test_chaining_is_order_sensitive() {
        let ab = xx_hash32(b"b", xx_hash32(b"a", 0));
        let ba = xx_hash32(b"a", xx_hash32(b"b", 0));
        assert_ne!(ab, ba);
    }
}
