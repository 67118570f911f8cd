//! # metrics-meta writer
//!
//! Carbon line-protocol listener that runs every received metric key
//! through a [`MembershipFilter`](metrics_meta_filter::MembershipFilter)
//! and reports hit or miss per record.
//!
//! ## Pipeline
//!
//! ```text
//! Acceptor -> bounded queue -> Dispatcher (worker pool) -> ConnectionHandler -> filter
//!                                                                  |
//!                                                                  v
//!                                                         EventSink<IngestEvent>
//! ```
//!
//! - `Acceptor`: accepts forever, pushes onto the queue, blocks while it is full
//! - `Dispatcher`: `workers` tasks draining the queue
//! - `ConnectionHandler`: reads records, extracts keys, calls `contains_or_update`
//!
//! Nothing is ever written back to clients. Errors after startup are
//! reported through the sink and only affect the connection they occur on.

pub mod acceptor;
pub mod adapters;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod handler;
pub mod protocol;
pub mod writer;

pub use acceptor::{Acceptor, Connection, ConnectionSource};
pub use adapters::TracingIngestSink;
pub use config::WriterConfig;
pub use dispatcher::{Dispatcher, DispatcherHandle};
pub use error::WriterError;
pub use events::{IngestEvent, Outcome};
pub use handler::{ConnectionHandler, ConnectionState, ConnectionSummary};
pub use protocol::{extract_key, MalformedRecord};
pub use writer::Writer;
