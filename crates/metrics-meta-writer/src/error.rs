//! Error types for the ingestion pipeline

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that stop the writer from starting
///
/// Everything that happens after the listener is bound (accept failures,
/// read failures, malformed records) is reported through the event sink
/// instead.
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("failed to bind carbon listener to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid writer configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
