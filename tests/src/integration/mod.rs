//! # Integration Tests
//!
//! - `ingestion`: records sent over TCP produce the expected hit/miss events
//! - `rotation`: keys are forgotten shard by shard over `S × D`

pub mod ingestion;
pub mod rotation;
