//! # Rolling Forget Window
//!
//! Drives a `MembershipStore` under paused Tokio time and checks that keys
//! are forgotten one shard per flush interval, never all at once.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use metrics_meta_filter::{FilterEvent, MembershipStore, RecordingSink, StoreConfig};
    use proptest::prelude::*;

    const FLUSH: Duration = Duration::from_secs(60);
    const SHARDS: usize = 4;

    fn store() -> (MembershipStore, Arc<RecordingSink<FilterEvent>>) {
        let config = StoreConfig::new(40_000, 0.01, SHARDS, FLUSH).unwrap();
        let sink = Arc::new(RecordingSink::<FilterEvent>::new());
        let store = MembershipStore::new(config, sink.clone()).unwrap();
        (store, sink)
    }

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("servers.host{:04}.disk.used", i)).collect()
    }

    /// Keys held by each shard, by shard index
    fn per_shard(store: &MembershipStore) -> HashMap<usize, usize> {
        store
            .shard_stats()
            .iter()
            .map(|stats| (stats.index, stats.elements_inserted))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_forgetting_is_staggered_across_shards() {
        let (store, sink) = store();
        let keys = keys(2_000);
        for key in &keys {
            store.contains_or_update(key.as_bytes());
        }
        let per_shard = per_shard(&store);
        assert_eq!(per_shard.values().sum::<usize>(), keys.len());

        // Check half-way between flushes
        tokio::time::sleep(FLUSH / 2).await;
        for tick in 1..=SHARDS {
            tokio::time::sleep(FLUSH).await;

            // A cleared shard has no bits set, so its keys are definitely absent
            let remembered = keys.iter().filter(|k| store.contains(k.as_bytes())).count();
            let forgotten: usize = (0..tick).map(|i| per_shard[&i]).sum();
            assert_eq!(remembered, keys.len() - forgotten, "after tick {}", tick);
        }

        let flushed: Vec<usize> = sink
            .events()
            .iter()
            .filter_map(|e| match e {
                FilterEvent::ShardFlushed { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(flushed, vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forgotten_key_misses_again() {
        let (store, _sink) = store();

        assert!(!store.contains_or_update(b"app.errors.count"));
        assert!(store.contains_or_update(b"app.errors.count"));

        tokio::time::sleep(FLUSH * SHARDS as u32 + FLUSH / 2).await;

        assert!(!store.contains_or_update(b"app.errors.count"));
        assert!(store.contains_or_update(b"app.errors.count"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshed_key_outlives_the_window() {
        let (store, _sink) = store();
        let key = b"app.latency.p99";

        store.add(key);
        tokio::time::sleep(FLUSH / 2).await;
        for _ in 0..SHARDS * 2 {
            tokio::time::sleep(FLUSH).await;
            store.add(key);
            assert!(store.contains(key));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_store_never_forgets() {
        let (store, sink) = store();
        for key in keys(100) {
            store.add(key.as_bytes());
        }

        store.stop();
        tokio::time::sleep(FLUSH * 10).await;

        assert!(keys(100).iter().all(|k| store.contains(k.as_bytes())));
        assert!(sink
            .events()
            .iter()
            .all(|e| !matches!(e, FilterEvent::ShardFlushed { .. })));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_inserted_keys_remembered_until_flush(
            keys in prop::collection::hash_set("[a-z]{1,8}(\\.[a-z0-9]{1,8}){0,4}", 1..300)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            runtime.block_on(async {
                let (store, _sink) = store();
                for key in &keys {
                    store.contains_or_update(key.as_bytes());
                }
                for key in &keys {
                    prop_assert!(store.contains(key.as_bytes()));
                }
                Ok(())
            })?;
        }
    }
}
