//! Ingestion events as `tracing` events

use tracing::{debug, error, info, warn};

use metrics_meta_filter::EventSink;

use crate::events::{IngestEvent, Outcome};

/// Emits every [`IngestEvent`] through `tracing`
///
/// Keys are logged lossily as UTF-8; they are compared as raw bytes
/// everywhere else.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingIngestSink;

impl EventSink<IngestEvent> for TracingIngestSink {
    fn emit(&self, event: IngestEvent) {
        match event {
            IngestEvent::Record { key, outcome } => {
                let key = String::from_utf8_lossy(&key);
                match outcome {
                    Outcome::Hit => info!(key = %key, outcome = %outcome, "filter hit"),
                    Outcome::Miss => info!(key = %key, outcome = %outcome, "filter miss"),
                }
            }
            IngestEvent::MalformedRecord {
                peer,
                reason,
                length,
            } => warn!(peer = %peer, reason = %reason, length, "skipping malformed record"),
            IngestEvent::ConnectionAccepted { peer } => debug!(addr = %peer, "accepted connection"),
            IngestEvent::ConnectionClosed { peer, summary } => debug!(
                addr = %peer,
                records = summary.records,
                hits = summary.hits,
                misses = summary.misses,
                malformed = summary.malformed,
                state = ?summary.state,
                "connection closed"
            ),
            IngestEvent::ConnectionFailed { peer, error } => {
                warn!(addr = %peer, error = %error, "error reading on conn")
            }
            IngestEvent::AcceptFailed { error } => {
                error!(error = %error, "error while accepting conn")
            }
        }
    }
}
