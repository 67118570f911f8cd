//! Hash functions for the membership filter
//!
//! Bit positions come from one MurmurHash3 x64-128 digest split into two
//! 64-bit halves and combined by double hashing: `g_i = h1 + i * h2`.
//! Shard routing uses SipHash-1-3 under fixed keys so that the shard a key
//! lands in says nothing about its bit positions inside that shard.

use std::hash::Hasher;
use std::io::Cursor;

use siphasher::sip::SipHasher13;

/// Seed for the bit-position digest.
const POSITION_SEED: u32 = 0;

/// Fixed SipHash keys for shard routing.
const ROUTING_KEYS: (u64, u64) = (0x6d65_7472_6963_732d, 0x6d65_7461_2d72_6f75);

/// Hash an element with MurmurHash3 x64-128 and split the digest into
/// `(low, high)` 64-bit halves.
pub fn murmur_hash_pair(element: &[u8], seed: u32) -> (u64, u64) {
    let mut cursor = Cursor::new(element);

    // Reading from an in-memory cursor cannot fail
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    (hash as u64, (hash >> 64) as u64)
}

/// Compute the `k` bit positions for an element in a filter of `m` bits.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize) -> HashPositions {
    let (h1, h2) = murmur_hash_pair(element, POSITION_SEED);
    HashPositions {
        h1,
        // An odd stride never degenerates to a single position
        h2: h2 | 1,
        m: m.max(1) as u64,
        i: 0,
        k,
    }
}

/// Iterator over the double-hashed bit positions of one element.
#[derive(Clone, Debug)]
pub struct HashPositions {
    h1: u64,
    h2: u64,
    m: u64,
    i: usize,
    k: usize,
}

impl Iterator for HashPositions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.i >= self.k {
            return None;
        }
        let hash = self.h1.wrapping_add((self.i as u64).wrapping_mul(self.h2));
        self.i += 1;
        Some((hash % self.m) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.k - self.i;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HashPositions {}

/// Route a key to one of `shard_count` shards.
///
/// Deterministic for a given key and shard count.
pub fn shard_index(key: &[u8], shard_count: usize) -> usize {
    let mut hasher = SipHasher13::new_with_keys(ROUTING_KEYS.0, ROUTING_KEYS.1);
    hasher.write(key);
    (hasher.finish() % shard_count.max(1) as u64) as usize
}
