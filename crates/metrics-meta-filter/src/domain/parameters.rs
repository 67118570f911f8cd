//! Optimal Bloom filter parameter calculation
//!
//! Formulas:
//! - m = -n*ln(p) / (ln(2)^2)  -- optimal bits
//! - k = (m/n) * ln(2)         -- optimal hash functions
//! - FPR = (1 - e^(-kn/m))^k

use std::f64::consts::LN_2;

/// Upper bound on the number of hash rounds per key.
pub const MAX_HASH_COUNT: usize = 32;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter (m)
    pub size_bits: usize,
    /// Number of hash functions (k)
    pub hash_count: usize,
    /// Expected false positive rate once `n` elements are inserted
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters for given constraints
///
/// # Arguments
/// * `num_elements` - Expected number of elements to insert (n)
/// * `target_fpr` - Target false positive rate (p)
pub fn calculate_optimal_parameters(num_elements: usize, target_fpr: f64) -> BloomFilterParams {
    if num_elements == 0 {
        return BloomFilterParams {
            size_bits: 1,
            hash_count: 1,
            expected_fpr: 1.0,
        };
    }

    let m = optimal_bits(num_elements, target_fpr);
    let k = ((m as f64 / num_elements as f64) * LN_2).round() as usize;
    let k = k.clamp(1, MAX_HASH_COUNT);

    BloomFilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, num_elements, k),
    }
}

/// Probability that a key never inserted tests positive, once `n` keys
/// have been written into `m` bits with `k` rounds each.
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    // Share of bits still zero after n·k writes
    let zero_bits = (-((n * k) as f64) / m as f64).exp();
    (1.0 - zero_bits).powi(k as i32)
}

/// Bits needed to hold `n` keys at rate `p`; never less than one
fn optimal_bits(n: usize, p: f64) -> usize {
    let m = (n as f64 * p.ln().abs() / (LN_2 * LN_2)).ceil();
    (m as usize).max(1)
}
