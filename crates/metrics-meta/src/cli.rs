//! Command-line interface

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

/// Component of a metric searching system: deduplicates metric keys at ingestion
#[derive(Parser, Debug)]
#[command(name = "metrics-meta", version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// TOML configuration file; command-line flags take precedence
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the carbon listener and report a hit or miss per metric key
    Writer(WriterArgs),
}

/// Flags of the `writer` command. Unset flags fall back to the
/// configuration file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct WriterArgs {
    /// Target number of distinct keys across all filters [default: 100000]
    #[arg(long = "bloom.N", value_name = "N")]
    pub bloom_n: Option<usize>,

    /// Target false positive rate, lower costs more memory [default: 0.01]
    #[arg(long = "bloom.P", value_name = "P")]
    pub bloom_p: Option<f64>,

    /// How many filters to keep [default: 5]
    #[arg(long = "bloom.shards", value_name = "COUNT")]
    pub bloom_shards: Option<usize>,

    /// Time between the clear of one of the filters, e.g. `10m` [default: 10m]
    #[arg(long = "bloom.flush.interval", value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub bloom_flush_interval: Option<Duration>,

    /// Address to bind the carbon listener [default: 0.0.0.0]
    #[arg(long = "tcp.addr", value_name = "IP")]
    pub tcp_addr: Option<IpAddr>,

    /// Port to bind the carbon listener [default: 3343]
    #[arg(long = "tcp.port", value_name = "PORT")]
    pub tcp_port: Option<u16>,

    /// Connections handled in parallel [default: number of CPUs]
    #[arg(long = "writer.workers", value_name = "COUNT")]
    pub workers: Option<usize>,

    /// Accepted connections waiting for a worker [default: 10]
    #[arg(long = "writer.queue", value_name = "COUNT")]
    pub queue_capacity: Option<usize>,

    /// Longest accepted record in bytes [default: 65536]
    #[arg(long = "writer.max-record-bytes", value_name = "BYTES")]
    pub max_record_bytes: Option<usize>,
}
