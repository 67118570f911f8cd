//! Writer configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::WriterError;

/// Default carbon listener port
pub const DEFAULT_PORT: u16 = 3343;

/// Default capacity of the accepted-connection queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Default longest accepted record, terminator excluded (64 KiB)
pub const DEFAULT_MAX_RECORD_BYTES: usize = 64 * 1024;

/// Listener and worker pool settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    /// Address to bind the carbon listener
    pub addr: IpAddr,
    /// Port to bind the carbon listener
    pub port: u16,
    /// Accepted connections waiting for a worker; accepting blocks when full
    pub queue_capacity: usize,
    /// Connections handled in parallel
    pub workers: usize,
    /// Longer records are discarded as malformed
    pub max_record_bytes: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: num_cpus::get(),
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }
}

impl WriterConfig {
    /// Socket address to bind to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }

    pub fn validate(&self) -> Result<(), WriterError> {
        if self.queue_capacity == 0 {
            return Err(WriterError::InvalidConfig(
                "queue capacity must be at least 1".into(),
            ));
        }
        if self.workers == 0 {
            return Err(WriterError::InvalidConfig(
                "worker count must be at least 1".into(),
            ));
        }
        if self.max_record_bytes == 0 {
            return Err(WriterError::InvalidConfig(
                "max record size must be at least 1 byte".into(),
            ));
        }
        Ok(())
    }
}
