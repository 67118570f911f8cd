//! Fixed set of shards with deterministic key routing

use super::config::StoreConfig;
use super::hash_functions::shard_index;
use super::shard::{Shard, ShardStats};
use crate::error::FilterError;
use crate::ports::MembershipFilter;

/// Ordered, fixed-length collection of shards
///
/// Each key lives in exactly one shard, chosen by `shard_index(key, S)`.
/// The shard count never changes after construction.
#[derive(Debug)]
pub struct ShardedBloomFilter {
    shards: Vec<Shard>,
}

impl ShardedBloomFilter {
    /// Allocate `S` empty shards sized for `ceil(N / S)` keys each
    pub fn new(config: &StoreConfig) -> Result<Self, FilterError> {
        config.validate()?;

        let params = config.shard_params();
        let shards = (0..config.shard_count)
            .map(|index| Shard::new(index, &params))
            .collect();

        Ok(Self { shards })
    }

    /// Number of shards (S)
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Index of the shard responsible for `key`
    pub fn shard_for(&self, key: &[u8]) -> usize {
        shard_index(key, self.shards.len())
    }

    fn route(&self, key: &[u8]) -> &Shard {
        &self.shards[self.shard_for(key)]
    }

    /// Insert a key into its shard
    pub fn insert(&self, key: &[u8]) {
        self.route(key).insert(key);
    }

    /// Test a key against its shard only
    pub fn contains(&self, key: &[u8]) -> bool {
        self.route(key).contains(key)
    }

    /// Atomic test-and-insert on the key's shard
    pub fn contains_or_update(&self, key: &[u8]) -> bool {
        self.route(key).contains_or_insert(key)
    }

    /// Clear one shard, returning the number of elements forgotten.
    ///
    /// `index` is taken modulo the shard count.
    pub fn flush(&self, index: usize) -> usize {
        self.shards[index % self.shards.len()].clear()
    }

    /// Per-shard snapshot, in shard order
    pub fn stats(&self) -> Vec<ShardStats> {
        self.shards.iter().map(Shard::stats).collect()
    }
}

impl MembershipFilter for ShardedBloomFilter {
    fn update(&self, key: &[u8]) {
        self.insert(key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        ShardedBloomFilter::contains(self, key)
    }

    fn contains_or_update(&self, key: &[u8]) -> bool {
        ShardedBloomFilter::contains_or_update(self, key)
    }
}
