//! # End-to-end Ingestion
//!
//! A real writer node on a loopback port, fed by plain TCP clients.
//!
//! ## Flow Tested
//!
//! ```text
//! TcpStream -> Acceptor -> queue -> worker -> ConnectionHandler -> MembershipStore
//!                                                    |
//!                                                    v
//!                                         RecordingSink<IngestEvent>
//! ```

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::sync::Arc;
    use std::time::Duration;

    use metrics_meta::{NodeConfig, WriterRuntime};
    use metrics_meta_filter::{FilterEvent, RecordingSink, StoreConfig};
    use metrics_meta_writer::{IngestEvent, MalformedRecord, Outcome, WriterConfig};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Node {
        runtime: WriterRuntime,
        events: Arc<RecordingSink<IngestEvent>>,
        filter_events: Arc<RecordingSink<FilterEvent>>,
    }

    fn loopback_config(workers: usize) -> NodeConfig {
        NodeConfig {
            filter: StoreConfig::new(100_000, 0.01, 5, Duration::from_secs(600)).unwrap(),
            writer: WriterConfig {
                addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 0,
                workers,
                ..Default::default()
            },
        }
    }

    async fn start_node(workers: usize) -> Node {
        let events = Arc::new(RecordingSink::<IngestEvent>::new());
        let filter_events = Arc::new(RecordingSink::<FilterEvent>::new());
        let runtime = WriterRuntime::start_with_sinks(
            loopback_config(workers),
            filter_events.clone(),
            events.clone(),
        )
        .await
        .expect("node should start");

        Node {
            runtime,
            events,
            filter_events,
        }
    }

    /// Write `payload` on a fresh connection and close it
    async fn send(addr: SocketAddr, payload: &[u8]) {
        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(payload).await.unwrap();
        client.shutdown().await.unwrap();
    }

    async fn wait_for_closed(events: &RecordingSink<IngestEvent>, connections: usize) {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let closed = events
                    .matching(|e| matches!(e, IngestEvent::ConnectionClosed { .. }))
                    .len();
                if closed >= connections {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("connections were not processed in time");
    }

    fn outcomes(events: &RecordingSink<IngestEvent>) -> Vec<(String, Outcome)> {
        events
            .events()
            .iter()
            .filter_map(|e| e.as_record())
            .map(|(key, outcome)| (String::from_utf8_lossy(key).into_owned(), outcome))
            .collect()
    }

    // =============================================================================
    // TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_same_record_twice_misses_then_hits() {
        let node = start_node(2).await;

        send(
            node.runtime.local_addr(),
            b"server.cpu.load 42 1234567890\nserver.cpu.load 42 1234567890\n",
        )
        .await;
        wait_for_closed(&node.events, 1).await;

        assert_eq!(
            outcomes(&node.events),
            vec![
                ("server.cpu.load".to_string(), Outcome::Miss),
                ("server.cpu.load".to_string(), Outcome::Hit),
            ]
        );
        node.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_distinct_keys_miss_independently() {
        let node = start_node(2).await;

        send(
            node.runtime.local_addr(),
            b"servers.web01.cpu 1 1700000000\nservers.web02.cpu 1 1700000000\n",
        )
        .await;
        wait_for_closed(&node.events, 1).await;

        assert_eq!(
            outcomes(&node.events),
            vec![
                ("servers.web01.cpu".to_string(), Outcome::Miss),
                ("servers.web02.cpu".to_string(), Outcome::Miss),
            ]
        );
        node.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_malformed_record_spares_its_siblings() {
        let node = start_node(1).await;

        send(
            node.runtime.local_addr(),
            b"before.key 1 1\ngarbage-without-separator\r\nafter.key 1 1\n",
        )
        .await;
        wait_for_closed(&node.events, 1).await;

        assert_eq!(
            outcomes(&node.events),
            vec![
                ("before.key".to_string(), Outcome::Miss),
                ("after.key".to_string(), Outcome::Miss),
            ]
        );
        let malformed = node
            .events
            .matching(|e| matches!(e, IngestEvent::MalformedRecord { .. }));
        assert!(matches!(
            malformed.as_slice(),
            [IngestEvent::MalformedRecord {
                reason: MalformedRecord::MissingSeparator,
                length: 25,
                ..
            }]
        ));
        node.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_keys_are_shared_across_connections() {
        let node = start_node(2).await;
        let addr = node.runtime.local_addr();

        send(addr, b"app.requests.count 10 1\n").await;
        wait_for_closed(&node.events, 1).await;
        send(addr, b"app.requests.count 12 2\n").await;
        wait_for_closed(&node.events, 2).await;

        let seen: Vec<Outcome> = outcomes(&node.events).into_iter().map(|(_, o)| o).collect();
        assert_eq!(seen, vec![Outcome::Miss, Outcome::Hit]);
        node.runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clients_single_miss() {
        const CLIENTS: usize = 16;
        let node = start_node(CLIENTS).await;
        let addr = node.runtime.local_addr();

        let clients: Vec<_> = (0..CLIENTS)
            .map(|_| tokio::spawn(send(addr, b"shared.key 1 1\n")))
            .collect();
        for client in clients {
            client.await.unwrap();
        }
        wait_for_closed(&node.events, CLIENTS).await;

        let seen = outcomes(&node.events);
        let misses = seen.iter().filter(|(_, o)| *o == Outcome::Miss).count();
        assert_eq!(seen.len(), CLIENTS);
        assert_eq!(misses, 1);
        node.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_reports_final_counters() {
        let node = start_node(2).await;

        send(node.runtime.local_addr(), b"a.b 1 1\na.b 1 1\nc.d 1 1\n").await;
        wait_for_closed(&node.events, 1).await;

        let metrics = node.runtime.shutdown().await;
        assert_eq!((metrics.misses, metrics.hits), (2, 1));
        assert!(matches!(
            node.filter_events.events().last(),
            Some(FilterEvent::RotationStopped { .. })
        ));
    }

    #[tokio::test]
    async fn test_port_in_use_fails_startup() {
        let node = start_node(1).await;
        let mut config = loopback_config(1);
        config.writer.port = node.runtime.local_addr().port();

        let result = WriterRuntime::start_with_sinks(
            config,
            Arc::new(RecordingSink::<FilterEvent>::new()),
            Arc::new(RecordingSink::<IngestEvent>::new()),
        )
        .await;

        assert!(result.is_err());
        node.runtime.shutdown().await;
    }
}
