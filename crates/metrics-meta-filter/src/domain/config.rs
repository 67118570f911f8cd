//! Membership store configuration and validation
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use metrics_meta_filter::domain::StoreConfigBuilder;
//!
//! let config = StoreConfigBuilder::new()
//!     .target_count(100_000)
//!     .false_positive_rate(0.01)
//!     .shard_count(5)
//!     .flush_interval(Duration::from_secs(600))
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.per_shard_capacity(), 20_000);
//! ```

use std::time::Duration;

use super::parameters::{calculate_optimal_parameters, BloomFilterParams};
use crate::error::FilterError;

/// Default target number of distinct keys across all shards
pub const DEFAULT_TARGET_COUNT: usize = 100_000;
/// Default false positive rate per shard
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;
/// Default number of shards
pub const DEFAULT_SHARD_COUNT: usize = 5;
/// Default time between two shard flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Membership store configuration
#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// Target number of distinct keys across the store (N)
    pub target_count: usize,
    /// Target false positive rate (P)
    pub false_positive_rate: f64,
    /// Number of shards (S)
    pub shard_count: usize,
    /// Time between two consecutive shard flushes (D)
    pub flush_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
            shard_count: DEFAULT_SHARD_COUNT,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with validation
    pub fn new(
        target_count: usize,
        false_positive_rate: f64,
        shard_count: usize,
        flush_interval: Duration,
    ) -> Result<Self, FilterError> {
        let config = Self {
            target_count,
            false_positive_rate,
            shard_count,
            flush_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate construction parameters
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.flush_interval.is_zero() {
            return Err(FilterError::InvalidFlushInterval(self.flush_interval));
        }

        if self.shard_count == 0 {
            return Err(FilterError::NoShards);
        }

        let per_shard = self.per_shard_capacity();
        if per_shard <= 1 {
            return Err(FilterError::CapacityTooSmall {
                target_count: self.target_count,
                shard_count: self.shard_count,
                per_shard,
            });
        }

        // NaN fails both comparisons
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(FilterError::InvalidFalsePositiveRate {
                fpr: self.false_positive_rate,
            });
        }

        Ok(())
    }

    /// Capacity each shard is sized for: ceil(N / S)
    pub fn per_shard_capacity(&self) -> usize {
        if self.shard_count == 0 {
            return 0;
        }
        self.target_count.div_ceil(self.shard_count)
    }

    /// Filter parameters shared by every shard
    pub fn shard_params(&self) -> BloomFilterParams {
        calculate_optimal_parameters(self.per_shard_capacity(), self.false_positive_rate)
    }

    /// Span of the rolling window: every shard is flushed once per S × D
    pub fn rotation_period(&self) -> Duration {
        self.flush_interval
            .saturating_mul(u32::try_from(self.shard_count).unwrap_or(u32::MAX))
    }
}

/// Builder for StoreConfig with validation
#[derive(Default)]
pub struct StoreConfigBuilder {
    target_count: Option<usize>,
    false_positive_rate: Option<f64>,
    shard_count: Option<usize>,
    flush_interval: Option<Duration>,
}

impl StoreConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target number of distinct keys (N)
    pub fn target_count(mut self, count: usize) -> Self {
        self.target_count = Some(count);
        self
    }

    /// Set the target false positive rate (P)
    pub fn false_positive_rate(mut self, fpr: f64) -> Self {
        self.false_positive_rate = Some(fpr);
        self
    }

    /// Set the number of shards (S)
    pub fn shard_count(mut self, shards: usize) -> Self {
        self.shard_count = Some(shards);
        self
    }

    /// Set the time between two shard flushes (D)
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = Some(interval);
        self
    }

    /// Build the StoreConfig, validating all parameters
    pub fn build(self) -> Result<StoreConfig, FilterError> {
        let defaults = StoreConfig::default();

        StoreConfig::new(
            self.target_count.unwrap_or(defaults.target_count),
            self.false_positive_rate
                .unwrap_or(defaults.false_positive_rate),
            self.shard_count.unwrap_or(defaults.shard_count),
            self.flush_interval.unwrap_or(defaults.flush_interval),
        )
    }
}
