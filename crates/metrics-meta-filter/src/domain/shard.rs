//! A single membership shard
//!
//! One Bloom filter behind its own lock. Clear and test-and-insert on the
//! same shard never interleave; different shards never contend.

use parking_lot::Mutex;

use super::bloom_filter::BloomFilter;
use super::parameters::BloomFilterParams;

/// Point-in-time view of one shard
#[derive(Clone, Debug, PartialEq)]
pub struct ShardStats {
    /// Position of the shard in its store
    pub index: usize,
    /// Filter size in bits (m)
    pub size_bits: usize,
    /// Number of hash functions (k)
    pub hash_count: usize,
    /// Bits currently set
    pub bits_set: usize,
    /// Distinct insertions since the last flush
    pub elements_inserted: usize,
    /// Number of times this shard has been flushed
    pub flushes: u64,
    /// Estimated false positive rate at the current fill
    pub estimated_fpr: f64,
}

#[derive(Debug)]
struct ShardState {
    filter: BloomFilter,
    flushes: u64,
}

/// One guarded partition of the membership store
#[derive(Debug)]
pub struct Shard {
    index: usize,
    state: Mutex<ShardState>,
}

impl Shard {
    /// Allocate an empty shard with the given filter parameters
    pub fn new(index: usize, params: &BloomFilterParams) -> Self {
        Self {
            index,
            state: Mutex::new(ShardState {
                filter: BloomFilter::new(params.size_bits, params.hash_count),
                flushes: 0,
            }),
        }
    }

    /// Position of the shard in its store
    pub fn index(&self) -> usize {
        self.index
    }

    /// Insert a key
    pub fn insert(&self, key: &[u8]) {
        self.state.lock().filter.insert(key);
    }

    /// Test a key without modifying the shard
    pub fn contains(&self, key: &[u8]) -> bool {
        self.state.lock().filter.contains(key)
    }

    /// Atomically test and insert a key, returning the pre-insertion result
    pub fn contains_or_insert(&self, key: &[u8]) -> bool {
        self.state.lock().filter.test_and_insert(key)
    }

    /// Reset the shard to all-zero, returning the number of elements forgotten
    pub fn clear(&self) -> usize {
        let mut state = self.state.lock();
        state.flushes += 1;
        state.filter.clear()
    }

    /// Snapshot of the shard's parameters and fill
    pub fn stats(&self) -> ShardStats {
        let state = self.state.lock();
        ShardStats {
            index: self.index,
            size_bits: state.filter.size_bits(),
            hash_count: state.filter.hash_count(),
            bits_set: state.filter.bits_set(),
            elements_inserted: state.filter.elements_inserted(),
            flushes: state.flushes,
            estimated_fpr: state.filter.estimated_fpr(),
        }
    }
}
