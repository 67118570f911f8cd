//! Connection dispatcher
//!
//! A fixed pool of workers drains the shared queue; each worker runs the
//! line protocol on one connection at a time, so up to `workers`
//! connections are handled in parallel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinSet;
use tracing::warn;

use crate::acceptor::Connection;
use crate::handler::ConnectionHandler;

pub struct Dispatcher {
    queue: Arc<Mutex<mpsc::Receiver<Connection>>>,
    handler: Arc<ConnectionHandler>,
    workers: usize,
}

impl Dispatcher {
    pub fn new(
        queue: mpsc::Receiver<Connection>,
        handler: Arc<ConnectionHandler>,
        workers: usize,
    ) -> Self {
        Self {
            queue: Arc::new(Mutex::new(queue)),
            handler,
            workers: workers.max(1),
        }
    }

    /// Spawn the worker pool on the current runtime
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> DispatcherHandle {
        let mut workers = JoinSet::new();
        for id in 0..self.workers {
            workers.spawn(work(
                id,
                Arc::clone(&self.queue),
                Arc::clone(&self.handler),
                shutdown.clone(),
            ));
        }
        DispatcherHandle { workers }
    }
}

/// Running worker pool
pub struct DispatcherHandle {
    workers: JoinSet<()>,
}

impl DispatcherHandle {
    /// Number of workers still running
    pub fn running(&self) -> usize {
        self.workers.len()
    }

    /// Wait for every worker to exit.
    ///
    /// Workers exit once shutdown is signalled or the queue is closed and
    /// drained.
    pub async fn join(mut self) {
        while let Some(result) = self.workers.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "dispatcher worker ended abnormally");
            }
        }
    }
}

async fn work(
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<Connection>>>,
    handler: Arc<ConnectionHandler>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.wait_for(|stop| *stop) => None,
            // The lock is only held while waiting for the next connection
            connection = async { queue.lock().await.recv().await } => connection,
        };
        let Some(Connection { stream, peer }) = next else {
            break;
        };

        // On shutdown the in-flight stream is dropped, which closes it
        let stop = async {
            let _ = shutdown.wait_for(|stop| *stop).await;
        };
        handler.handle_until(stream, peer, stop).await;
    }
    tracing::debug!(worker = id, "dispatcher worker stopped");
}
