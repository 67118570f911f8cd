//! # metrics-meta filter
//!
//! Approximate, time-bounded membership store for metric keys.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `BloomFilter`: bit array plus double-hashed positions
//!   - `Shard`: one filter behind its own lock
//!   - `ShardedBloomFilter`: fixed set of shards, keys routed by SipHash
//!   - `StoreConfig` / `StoreConfigBuilder`: parameters with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MembershipFilter`: driving port used by the ingestion pipeline
//!   - `EventSink`: driven port for observability events
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `MembershipStore`: implements `MembershipFilter`
//!   - `RotationScheduler`: flushes one shard every `D`, round-robin
//!
//! - **Adapters Layer** (`adapters/`): `TracingFilterSink`, `RecordingSink`, `NoOpSink`
//!
//! ## Invariants
//!
//! - No false negatives while a key's shard has not been flushed since
//!   the key was inserted.
//! - `contains_or_update` is atomic per shard: among concurrent callers
//!   with the same fresh key, exactly one observes a miss.
//! - Every shard is flushed once per `S × D`, so a key is forgotten at
//!   most `S × D` after its last insertion.
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use metrics_meta_filter::{MembershipStore, NoOpSink, StoreConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MembershipStore::new(StoreConfig::default(), Arc::new(NoOpSink))
//!     .expect("default config is valid");
//!
//! assert!(!store.contains_or_update(b"servers.web01.cpu.load"));
//! assert!(store.contains_or_update(b"servers.web01.cpu.load"));
//! store.stop();
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{NoOpSink, RecordingSink, TracingFilterSink};
pub use domain::{BloomFilter, ShardStats, ShardedBloomFilter, StoreConfig, StoreConfigBuilder};
pub use error::FilterError;
pub use events::FilterEvent;
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::{EventSink, MembershipFilter};
pub use service::{MembershipStore, RotationHandle, RotationScheduler};
