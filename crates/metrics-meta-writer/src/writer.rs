//! Writer: bound listener plus the acceptor and worker pool behind it

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_meta_filter::{EventSink, MembershipFilter};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::acceptor::Acceptor;
use crate::config::WriterConfig;
use crate::dispatcher::Dispatcher;
use crate::error::WriterError;
use crate::events::IngestEvent;
use crate::handler::ConnectionHandler;

/// Carbon line-protocol ingestion service
pub struct Writer {
    config: WriterConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    filter: Arc<dyn MembershipFilter>,
    sink: Arc<dyn EventSink<IngestEvent>>,
}

impl Writer {
    /// Validate the configuration and bind the listener.
    ///
    /// Binding failures are fatal: nothing is accepted without a listener.
    pub async fn bind(
        config: WriterConfig,
        filter: Arc<dyn MembershipFilter>,
        sink: Arc<dyn EventSink<IngestEvent>>,
    ) -> Result<Self, WriterError> {
        config.validate()?;

        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| WriterError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            config,
            listener,
            local_addr,
            filter,
            sink,
        })
    }

    /// Address actually bound, useful when the configured port is 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Serve until `shutdown` turns `true` or its sender is dropped.
    ///
    /// Returns once the acceptor and every worker have stopped.
    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        let (queue_tx, queue_rx) = mpsc::channel(self.config.queue_capacity);

        let handler = Arc::new(ConnectionHandler::new(
            self.filter,
            Arc::clone(&self.sink),
            self.config.max_record_bytes,
        ));
        let workers = Dispatcher::new(queue_rx, handler, self.config.workers).spawn(shutdown.clone());
        debug!(workers = workers.running(), queue = self.config.queue_capacity, "dispatcher started");

        Acceptor::new(self.listener, queue_tx, self.sink)
            .run(shutdown)
            .await;

        workers.join().await;
    }
}
