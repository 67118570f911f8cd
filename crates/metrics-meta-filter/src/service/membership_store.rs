//! Membership Store
//!
//! Sharded Bloom filter plus the rotation scheduler that keeps it fresh.
//! This is the object the rest of the process shares.

use std::sync::Arc;

use crate::domain::{ShardStats, ShardedBloomFilter, StoreConfig};
use crate::error::FilterError;
use crate::events::FilterEvent;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::ports::{EventSink, MembershipFilter};
use crate::service::rotation::{RotationHandle, RotationScheduler};

/// Time-rotating sharded membership store
pub struct MembershipStore {
    config: StoreConfig,
    filter: Arc<ShardedBloomFilter>,
    rotation: RotationHandle,
    metrics: Arc<Metrics>,
}

impl MembershipStore {
    /// Validate `config`, allocate the shards and start rotating them.
    ///
    /// Must be called from within a Tokio runtime; the rotation timer
    /// panics otherwise.
    pub fn new(
        config: StoreConfig,
        sink: Arc<dyn EventSink<FilterEvent>>,
    ) -> Result<Self, FilterError> {
        let filter = Arc::new(ShardedBloomFilter::new(&config)?);
        let metrics = Arc::new(Metrics::new());
        let params = config.shard_params();

        sink.emit(FilterEvent::StoreCreated {
            shard_count: config.shard_count,
            target_count: config.target_count,
            per_shard_capacity: config.per_shard_capacity(),
            size_bits: params.size_bits,
            hash_count: params.hash_count,
            false_positive_rate: config.false_positive_rate,
            flush_interval: config.flush_interval,
        });

        let rotation = RotationScheduler::new(
            Arc::clone(&filter),
            config.flush_interval,
            sink,
            Arc::clone(&metrics),
        )
        .start();

        Ok(Self {
            config,
            filter,
            rotation,
            metrics,
        })
    }

    /// Insert a key into its shard
    pub fn add(&self, key: &[u8]) {
        self.metrics.record_insert();
        self.filter.insert(key);
    }

    /// Membership test on the key's shard
    pub fn contains(&self, key: &[u8]) -> bool {
        self.metrics.record_lookup();
        self.filter.contains(key)
    }

    /// Atomic test-and-insert; `true` means hit, `false` means miss
    pub fn contains_or_update(&self, key: &[u8]) -> bool {
        let hit = self.filter.contains_or_update(key);
        self.metrics.record_test_and_insert(hit);
        hit
    }

    /// Halt the rotation scheduler. Idempotent; shards stay queryable.
    pub fn stop(&self) {
        self.rotation.stop();
    }

    /// Halt the rotation scheduler and wait for it to release its timer
    pub async fn shutdown(&mut self) {
        self.rotation.shutdown().await;
    }

    /// Whether the rotation scheduler has been asked to stop
    pub fn is_stopped(&self) -> bool {
        self.rotation.is_stopped()
    }

    /// Configuration the store was built from
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Index of the shard the next rotation tick will flush
    pub fn rotation_cursor(&self) -> usize {
        self.rotation.cursor()
    }

    pub fn shard_stats(&self) -> Vec<ShardStats> {
        self.filter.stats()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Share of `contains_or_update` calls that hit, false positives included
    pub fn hit_rate(&self) -> f64 {
        self.metrics.observed_hit_rate()
    }
}

impl MembershipFilter for MembershipStore {
    fn update(&self, key: &[u8]) {
        self.add(key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        MembershipStore::contains(self, key)
    }

    fn contains_or_update(&self, key: &[u8]) -> bool {
        MembershipStore::contains_or_update(self, key)
    }
}

impl Drop for MembershipStore {
    fn drop(&mut self) {
        self.rotation.stop();
    }
}
