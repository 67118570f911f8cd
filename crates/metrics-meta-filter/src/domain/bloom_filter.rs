//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - No false negatives: once inserted, `contains()` returns true until `clear()`
//! - Estimated FPR = (1 - e^(-kn/m))^k

use bitvec::prelude::*;

use super::hash_functions::compute_hash_positions;
use super::parameters::{calculate_fpr, calculate_optimal_parameters};

/// Bloom filter for probabilistic membership testing
///
/// A plain bit array plus `k` double-hashed positions per key. Not
/// synchronized; see [`Shard`](super::Shard) for the guarded wrapper.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u64, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
    /// Number of distinct insertions since the last clear (n)
    n: usize,
}

impl BloomFilter {
    /// Create a new Bloom filter with specified parameters
    ///
    /// # Arguments
    /// * `m` - Size in bits
    /// * `k` - Number of hash functions
    pub fn new(m: usize, k: usize) -> Self {
        let m = m.max(1);
        Self {
            bits: bitvec![u64, Lsb0; 0; m],
            k: k.max(1),
            m,
            n: 0,
        }
    }

    /// Create a new Bloom filter sized for `expected_elements` at `target_fpr`
    pub fn with_capacity(expected_elements: usize, target_fpr: f64) -> Self {
        let params = calculate_optimal_parameters(expected_elements, target_fpr);
        Self::new(params.size_bits, params.hash_count)
    }

    /// Insert an element into the filter
    ///
    /// Idempotent: inserting a present element leaves the bit array unchanged.
    pub fn insert(&mut self, element: &[u8]) {
        self.test_and_insert(element);
    }

    /// Test if an element might be in the filter
    ///
    /// Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set
    pub fn contains(&self, element: &[u8]) -> bool {
        compute_hash_positions(element, self.k, self.m).all(|pos| self.bits[pos])
    }

    /// Set all `k` bits for an element, returning whether they were all set
    /// beforehand.
    pub fn test_and_insert(&mut self, element: &[u8]) -> bool {
        let mut present = true;
        for pos in compute_hash_positions(element, self.k, self.m) {
            // Every position is written, even after the first miss
            present &= self.bits.replace(pos, true);
        }
        if !present {
            self.n += 1;
        }
        present
    }

    /// Estimated false positive rate at the current fill
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn estimated_fpr(&self) -> f64 {
        calculate_fpr(self.m, self.n, self.k)
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Get the number of distinct elements inserted since the last clear
    pub fn elements_inserted(&self) -> usize {
        self.n
    }

    /// Clear the filter (reset all bits to 0), returning the number of
    /// elements forgotten
    pub fn clear(&mut self) -> usize {
        self.bits.fill(false);
        std::mem::take(&mut self.n)
    }
}
