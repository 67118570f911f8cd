//! Observability events emitted by the ingestion pipeline

use std::fmt;
use std::net::SocketAddr;

use crate::handler::ConnectionSummary;
use crate::protocol::MalformedRecord;

/// Result of testing a record's key against the membership store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Key was already present
    Hit,
    /// Key was absent and has been inserted
    Miss,
}

impl Outcome {
    /// Map a `contains_or_update` result
    pub fn from_hit(hit: bool) -> Self {
        if hit {
            Outcome::Hit
        } else {
            Outcome::Miss
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestEvent {
    /// One record processed; exactly one per well-formed record
    Record { key: Vec<u8>, outcome: Outcome },
    /// A record was skipped; the connection keeps reading
    MalformedRecord {
        peer: SocketAddr,
        reason: MalformedRecord,
        length: usize,
    },
    ConnectionAccepted { peer: SocketAddr },
    ConnectionClosed {
        peer: SocketAddr,
        summary: ConnectionSummary,
    },
    /// Read error; the connection is closed right after
    ConnectionFailed { peer: SocketAddr, error: String },
    /// The listener failed to accept; the acceptor backs off and retries
    AcceptFailed { error: String },
}

impl IngestEvent {
    /// Key and outcome, for `Record` events
    pub fn as_record(&self) -> Option<(&[u8], Outcome)> {
        match self {
            IngestEvent::Record { key, outcome } => Some((key.as_slice(), *outcome)),
            _ => None,
        }
    }
}
