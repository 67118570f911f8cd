//! Writer node runtime
//!
//! ## Startup Sequence
//!
//! 1. Allocate the membership store and start its rotation
//! 2. Bind the carbon listener
//! 3. Spawn the acceptor and worker pool
//!
//! ## Shutdown Sequence
//!
//! 1. Signal shutdown to the acceptor and workers
//! 2. Wait for them to exit
//! 3. Stop the rotation scheduler and report final counters

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_meta_filter::{
    EventSink, FilterEvent, MembershipStore, MetricsSnapshot, TracingFilterSink,
};
use metrics_meta_writer::{IngestEvent, TracingIngestSink, Writer};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::NodeConfig;

/// A running writer node
pub struct WriterRuntime {
    store: Arc<MembershipStore>,
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    server: JoinHandle<()>,
}

impl WriterRuntime {
    /// Start a node that reports through `tracing`
    pub async fn start(config: NodeConfig) -> Result<Self> {
        Self::start_with_sinks(config, Arc::new(TracingFilterSink), Arc::new(TracingIngestSink)).await
    }

    pub async fn start_with_sinks(
        config: NodeConfig,
        filter_sink: Arc<dyn EventSink<FilterEvent>>,
        ingest_sink: Arc<dyn EventSink<IngestEvent>>,
    ) -> Result<Self> {
        let store = Arc::new(
            MembershipStore::new(config.filter, filter_sink)
                .context("error during filter initialization")?,
        );

        let writer = Writer::bind(config.writer, store.clone(), ingest_sink)
            .await
            .context("error during listener setup")?;
        let local_addr = writer.local_addr();
        info!(
            addr = %local_addr,
            workers = writer.config().workers,
            queue_capacity = writer.config().queue_capacity,
            "listening"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let server = tokio::spawn(writer.run(shutdown_rx));

        Ok(Self {
            store,
            local_addr,
            shutdown_tx,
            server,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> &Arc<MembershipStore> {
        &self.store
    }

    /// Stop accepting, close open connections, stop rotation and return
    /// the final filter counters.
    pub async fn shutdown(self) -> MetricsSnapshot {
        info!("initiating graceful shutdown");
        self.shutdown_tx.send_replace(true);

        if let Err(e) = self.server.await {
            warn!(error = %e, "writer task ended abnormally");
        }

        // Workers are gone, so this is normally the last reference
        let (metrics, hit_rate) = match Arc::try_unwrap(self.store) {
            Ok(mut store) => {
                store.shutdown().await;
                (store.metrics(), store.hit_rate())
            }
            Err(shared) => {
                shared.stop();
                (shared.metrics(), shared.hit_rate())
            }
        };
        info!(
            hits = metrics.hits,
            misses = metrics.misses,
            hit_rate,
            flushes = metrics.flushes,
            elements_forgotten = metrics.elements_forgotten,
            "final filter metrics"
        );
        metrics
    }
}
