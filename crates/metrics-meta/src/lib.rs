//! # metrics-meta
//!
//! Process glue for the `metrics-meta` binary: command line, configuration
//! file and the writer runtime that wires the membership store to the
//! carbon listener.

pub mod cli;
pub mod config;
pub mod runtime;

pub use cli::{Cli, Command, WriterArgs};
pub use config::{ConfigError, FileConfig, NodeConfig};
pub use runtime::WriterRuntime;
