//! Node configuration: TOML file merged with command-line flags
//!
//! Precedence is flag > file > built-in default. The merged result is
//! validated as a whole before anything is allocated or bound.
//!
//! ```toml
//! [filter]
//! target_count = 100000
//! false_positive_rate = 0.01
//! shard_count = 5
//! flush_interval = "10m"
//!
//! [writer]
//! addr = "0.0.0.0"
//! port = 3343
//! queue_capacity = 10
//! workers = 8
//! max_record_bytes = 65536
//! ```

use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use metrics_meta_filter::{FilterError, StoreConfig};
use metrics_meta_writer::{WriterConfig, WriterError};
use serde::Deserialize;
use thiserror::Error;

use crate::cli::WriterArgs;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid filter configuration: {0}")]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// On-disk configuration; every key is optional
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub filter: FilterSection,
    pub writer: WriterSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSection {
    pub target_count: Option<usize>,
    pub false_positive_rate: Option<f64>,
    pub shard_count: Option<usize>,
    #[serde(with = "humantime_serde")]
    pub flush_interval: Option<Duration>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WriterSection {
    pub addr: Option<IpAddr>,
    pub port: Option<u16>,
    pub queue_capacity: Option<usize>,
    pub workers: Option<usize>,
    pub max_record_bytes: Option<usize>,
}

impl FileConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Validated configuration of a writer node
#[derive(Clone, Debug, PartialEq)]
pub struct NodeConfig {
    pub filter: StoreConfig,
    pub writer: WriterConfig,
}

impl NodeConfig {
    /// Merge flags over file values over defaults, then validate.
    pub fn resolve(file: FileConfig, args: &WriterArgs) -> Result<Self, ConfigError> {
        let filter_defaults = StoreConfig::default();
        let filter = StoreConfig::new(
            args.bloom_n
                .or(file.filter.target_count)
                .unwrap_or(filter_defaults.target_count),
            args.bloom_p
                .or(file.filter.false_positive_rate)
                .unwrap_or(filter_defaults.false_positive_rate),
            args.bloom_shards
                .or(file.filter.shard_count)
                .unwrap_or(filter_defaults.shard_count),
            args.bloom_flush_interval
                .or(file.filter.flush_interval)
                .unwrap_or(filter_defaults.flush_interval),
        )?;

        let writer_defaults = WriterConfig::default();
        let writer = WriterConfig {
            addr: args
                .tcp_addr
                .or(file.writer.addr)
                .unwrap_or(writer_defaults.addr),
            port: args
                .tcp_port
                .or(file.writer.port)
                .unwrap_or(writer_defaults.port),
            queue_capacity: args
                .queue_capacity
                .or(file.writer.queue_capacity)
                .unwrap_or(writer_defaults.queue_capacity),
            workers: args
                .workers
                .or(file.writer.workers)
                .unwrap_or(writer_defaults.workers),
            max_record_bytes: args
                .max_record_bytes
                .or(file.writer.max_record_bytes)
                .unwrap_or(writer_defaults.max_record_bytes),
        };
        writer.validate()?;

        Ok(Self { filter, writer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file_or_flags() {
        let config = NodeConfig::resolve(FileConfig::default(), &WriterArgs::default()).unwrap();

        assert_eq!(config.filter, StoreConfig::default());
        assert_eq!(config.writer.socket_addr(), "0.0.0.0:3343".parse().unwrap());
        assert_eq!(config.writer.queue_capacity, 10);
    }

    #[test]
    fn test_parse_full_file() {
        let file = FileConfig::parse(
            r#"
            [filter]
            target_count = 50000
            false_positive_rate = 0.001
            shard_count = 10
            flush_interval = "1m 30s"

            [writer]
            addr = "127.0.0.1"
            port = 2003
            queue_capacity = 32
            workers = 4
            max_record_bytes = 4096
            "#,
        )
        .unwrap();

        let config = NodeConfig::resolve(file, &WriterArgs::default()).unwrap();
        assert_eq!(config.filter.target_count, 50_000);
        assert_eq!(config.filter.shard_count, 10);
        assert_eq!(config.filter.flush_interval, Duration::from_secs(90));
        assert_eq!(config.writer.socket_addr(), "127.0.0.1:2003".parse().unwrap());
        assert_eq!(config.writer.workers, 4);
        assert_eq!(config.writer.max_record_bytes, 4096);
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig::parse(
            r#"
            [filter]
            shard_count = 10
            [writer]
            port = 2003
            "#,
        )
        .unwrap();
        let args = WriterArgs {
            bloom_shards: Some(3),
            ..Default::default()
        };

        let config = NodeConfig::resolve(file, &args).unwrap();
        assert_eq!(config.filter.shard_count, 3);
        assert_eq!(config.writer.port, 2003);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = FileConfig::parse("[filter]\nshards = 4\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_invalid_filter_parameters() {
        let args = WriterArgs {
            bloom_n: Some(3),
            ..Default::default()
        };
        let result = NodeConfig::resolve(FileConfig::default(), &args);
        assert!(matches!(
            result,
            Err(ConfigError::Filter(FilterError::CapacityTooSmall { .. }))
        ));

        let args = WriterArgs {
            bloom_flush_interval: Some(Duration::ZERO),
            ..Default::default()
        };
        let result = NodeConfig::resolve(FileConfig::default(), &args);
        assert!(matches!(
            result,
            Err(ConfigError::Filter(FilterError::InvalidFlushInterval(_)))
        ));
    }

    #[test]
    fn test_rejects_invalid_writer_parameters() {
        let args = WriterArgs {
            workers: Some(0),
            ..Default::default()
        };
        let result = NodeConfig::resolve(FileConfig::default(), &args);
        assert!(matches!(
            result,
            Err(ConfigError::Writer(WriterError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[writer]\nport = 4000").unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.writer.port, Some(4000));
    }

    #[test]
    fn test_load_missing_file() {
        let result = FileConfig::load("/nonexistent/metrics-meta.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
