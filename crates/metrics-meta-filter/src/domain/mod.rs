//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Bloom filter bit array and hash functions
//! - Parameter calculations
//! - Shards and the sharded filter they form
//! - Store configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod parameters;
pub mod shard;
pub mod sharded;

pub use bloom_filter::BloomFilter;
pub use config::{StoreConfig, StoreConfigBuilder};
pub use parameters::{calculate_optimal_parameters, BloomFilterParams};
pub use shard::{Shard, ShardStats};
pub use sharded::ShardedBloomFilter;
