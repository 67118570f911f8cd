//! Per-connection line protocol handler

use std::future::{self, Future};
use std::net::SocketAddr;
use std::sync::Arc;

use metrics_meta_filter::{EventSink, MembershipFilter};
use tokio::io::{AsyncRead, BufReader};

use crate::events::{IngestEvent, Outcome};
use crate::protocol::{extract_key, read_record, MalformedRecord, ReadRecord};

/// Read buffer per connection
const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Where a connection is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Accepted,
    Reading,
    /// Stream ended normally, or was dropped on shutdown
    Closed,
    /// Stream ended on a read error
    Errored,
}

/// What a connection did, reported when it closes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub records: u64,
    pub hits: u64,
    pub misses: u64,
    pub malformed: u64,
    pub state: ConnectionState,
}

/// Runs the ingestion protocol against one stream at a time
///
/// Nothing is ever written back: the protocol is one-way.
pub struct ConnectionHandler {
    filter: Arc<dyn MembershipFilter>,
    sink: Arc<dyn EventSink<IngestEvent>>,
    max_record_bytes: usize,
}

impl ConnectionHandler {
    pub fn new(
        filter: Arc<dyn MembershipFilter>,
        sink: Arc<dyn EventSink<IngestEvent>>,
        max_record_bytes: usize,
    ) -> Self {
        Self {
            filter,
            sink,
            max_record_bytes,
        }
    }

    /// Consume `stream` until end of stream or a read error.
    ///
    /// The stream is dropped, and so closed, before this returns.
    pub async fn handle<S>(&self, stream: S, peer: SocketAddr) -> ConnectionSummary
    where
        S: AsyncRead + Unpin,
    {
        self.handle_until(stream, peer, future::pending()).await
    }

    /// Like [`handle`](Self::handle), but gives up the stream as soon as
    /// `stop` completes. Records already processed are still summarized.
    pub async fn handle_until<S, F>(&self, stream: S, peer: SocketAddr, stop: F) -> ConnectionSummary
    where
        S: AsyncRead + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(stop);
        let mut summary = ConnectionSummary::default();
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, stream);
        let mut record = Vec::new();

        summary.state = ConnectionState::Reading;
        loop {
            let read = tokio::select! {
                biased;
                _ = &mut stop => {
                    summary.state = ConnectionState::Closed;
                    break;
                }
                read = read_record(&mut reader, &mut record, self.max_record_bytes) => read,
            };
            match read {
                Ok(ReadRecord::Record) => self.process(&record, peer, &mut summary),
                Ok(ReadRecord::TooLong { length }) => {
                    summary.malformed += 1;
                    self.sink.emit(IngestEvent::MalformedRecord {
                        peer,
                        reason: MalformedRecord::TooLong {
                            limit: self.max_record_bytes,
                        },
                        length,
                    });
                }
                Ok(ReadRecord::Eof) => {
                    summary.state = ConnectionState::Closed;
                    break;
                }
                Err(e) => {
                    summary.state = ConnectionState::Errored;
                    self.sink.emit(IngestEvent::ConnectionFailed {
                        peer,
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }
        drop(reader);

        self.sink.emit(IngestEvent::ConnectionClosed {
            peer,
            summary: summary.clone(),
        });
        summary
    }

    fn process(&self, record: &[u8], peer: SocketAddr, summary: &mut ConnectionSummary) {
        let key = match extract_key(record) {
            Ok(key) => key,
            Err(reason) => {
                summary.malformed += 1;
                self.sink.emit(IngestEvent::MalformedRecord {
                    peer,
                    reason,
                    length: record.len(),
                });
                return;
            }
        };

        let outcome = Outcome::from_hit(self.filter.contains_or_update(key));
        summary.records += 1;
        match outcome {
            Outcome::Hit => summary.hits += 1,
            Outcome::Miss => summary.misses += 1,
        }

        self.sink.emit(IngestEvent::Record {
            key: key.to_vec(),
            outcome,
        });
    }
}
