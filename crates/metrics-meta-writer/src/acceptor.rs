//! Connection acceptor
//!
//! Accepts connections for as long as the writer runs and pushes them onto
//! the bounded work queue. A full queue blocks accepting, which is what
//! throttles clients when the workers fall behind.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use metrics_meta_filter::EventSink;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};

use crate::events::IngestEvent;

/// Pause after a failed accept, so a persistent error (e.g. fd exhaustion)
/// does not spin the loop
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// An accepted connection waiting for a worker
#[derive(Debug)]
pub struct Connection {
    pub stream: TcpStream,
    pub peer: SocketAddr,
}

/// Where the acceptor takes new connections from
pub trait ConnectionSource: Send {
    fn next_connection(
        &mut self,
    ) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send;
}

impl ConnectionSource for TcpListener {
    fn next_connection(
        &mut self,
    ) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }
}

pub struct Acceptor<L = TcpListener> {
    listener: L,
    queue: mpsc::Sender<Connection>,
    sink: Arc<dyn EventSink<IngestEvent>>,
}

impl<L: ConnectionSource> Acceptor<L> {
    pub fn new(
        listener: L,
        queue: mpsc::Sender<Connection>,
        sink: Arc<dyn EventSink<IngestEvent>>,
    ) -> Self {
        Self {
            listener,
            queue,
            sink,
        }
    }

    /// Accept until shutdown is signalled or every worker is gone.
    ///
    /// Accept errors are reported and retried after a short pause. Dropping
    /// the acceptor on return closes the queue, which lets idle workers exit.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let accepted = tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => break,
                accepted = self.listener.next_connection() => accepted,
            };

            match accepted {
                Ok((stream, peer)) => {
                    self.sink.emit(IngestEvent::ConnectionAccepted { peer });

                    let sent = tokio::select! {
                        biased;
                        _ = shutdown.wait_for(|stop| *stop) => break,
                        sent = self.queue.send(Connection { stream, peer }) => sent,
                    };
                    if sent.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    self.sink.emit(IngestEvent::AcceptFailed {
                        error: e.to_string(),
                    });
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}
