//! Error types for the membership filter

use std::time::Duration;

use thiserror::Error;

/// Errors raised while constructing a membership store.
///
/// All variants are configuration errors: a store is either built with
/// well-defined filter parameters or not built at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("flush interval must be positive, got {0:?}")]
    InvalidFlushInterval(Duration),

    #[error("shard count must be at least 1")]
    NoShards,

    #[error(
        "per-shard capacity must be greater than 1: ceil({target_count} / {shard_count}) = {per_shard}"
    )]
    CapacityTooSmall {
        target_count: usize,
        shard_count: usize,
        per_shard: usize,
    },

    #[error("Invalid false positive rate: {fpr} (must be strictly between 0 and 1)")]
    InvalidFalsePositiveRate { fpr: f64 },
}
