//! Observability events emitted by the membership store

use std::time::Duration;

/// Something the store or its rotation scheduler did
#[derive(Clone, Debug, PartialEq)]
pub enum FilterEvent {
    /// A store was allocated and its scheduler started
    StoreCreated {
        shard_count: usize,
        target_count: usize,
        per_shard_capacity: usize,
        size_bits: usize,
        hash_count: usize,
        false_positive_rate: f64,
        flush_interval: Duration,
    },
    /// One shard was cleared by the rotation scheduler
    ShardFlushed {
        index: usize,
        elements_forgotten: usize,
    },
    /// The rotation scheduler exited and released its timer
    RotationStopped { ticks: u64 },
}
