//! Filter events as `tracing` events

use tracing::info;

use crate::events::FilterEvent;
use crate::ports::EventSink;

/// Emits every [`FilterEvent`] as an `info` event with structured fields
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingFilterSink;

impl EventSink<FilterEvent> for TracingFilterSink {
    fn emit(&self, event: FilterEvent) {
        match event {
            FilterEvent::StoreCreated {
                shard_count,
                target_count,
                per_shard_capacity,
                size_bits,
                hash_count,
                false_positive_rate,
                flush_interval,
            } => info!(
                shard_count,
                total_n = target_count,
                split_n = per_shard_capacity,
                size_bits,
                hash_count,
                p = false_positive_rate,
                flush_interval = ?flush_interval,
                "new sharded bloom filter created"
            ),
            FilterEvent::ShardFlushed {
                index,
                elements_forgotten,
            } => info!(filter_index = index, elements_forgotten, "flushed filter"),
            FilterEvent::RotationStopped { ticks } => info!(ticks, "stopping filter rotation"),
        }
    }
}
