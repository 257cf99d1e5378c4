//! Counter Module Tests
//!
//! Validates local application, deduplication, and the propagation protocol
//! against a recording mock transport.

#[cfg(test)]
mod tests {
    use crate::client::testing::MockTransport;
    use crate::cluster::registry::Registry;
    use crate::cluster::types::Peer;
    use crate::counter::service::Counter;
    use crate::counter::types::Increment;
    use std::sync::Arc;
    use std::time::Duration;

    fn inc(id: &str, node_id: &str) -> Increment {
        Increment {
            id: id.to_string(),
            node_id: node_id.to_string(),
        }
    }

    async fn counter_with_peers(
        client: Arc<MockTransport>,
        peers: &[&str],
    ) -> Arc<Counter> {
        let registry = Registry::new("node1:8080", client.clone());
        registry.add_peer(Peer::seen_now("node1:8080")).await;
        for peer in peers {
            registry.add_peer(Peer::seen_now(*peer)).await;
        }
        Counter::new("node1:8080", registry, client)
    }

    // ============================================================
    // APPLY TESTS
    // ============================================================

    #[tokio::test]
    async fn test_single_node_increment() {
        let counter = counter_with_peers(MockTransport::new(), &[]).await;

        counter.local_increment().await;

        assert_eq!(counter.value().await, 1);
    }

    #[tokio::test]
    async fn test_apply_deduplicates_by_id() {
        let counter = counter_with_peers(MockTransport::new(), &[]).await;
        let increment = inc("A", "n1");

        assert!(counter.apply(increment.clone()).await);
        assert_eq!(counter.value().await, 1);

        assert!(!counter.apply(increment).await);
        assert_eq!(
            counter.value().await,
            1,
            "the same id must never count twice"
        );
    }

    #[tokio::test]
    async fn test_same_id_from_different_origins_counts_once() {
        let counter = counter_with_peers(MockTransport::new(), &[]).await;

        assert!(counter.apply(inc("A", "n1")).await);
        assert!(!counter.apply(inc("A", "n2")).await);

        assert_eq!(counter.value().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_applies_with_distinct_ids() {
        let counter = counter_with_peers(MockTransport::new(), &[]).await;

        let mut handles = Vec::new();
        for i in 0..1000 {
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                counter.apply(inc(&format!("inc-{}", i), "node1:8080")).await
            }));
        }
        for handle in handles {
            handle.await.expect("apply task panicked");
        }

        assert_eq!(counter.value().await, 1000);
    }

    #[tokio::test]
    async fn test_value_equals_applied_count() {
        let counter = counter_with_peers(MockTransport::new(), &[]).await;

        let mut applied = 0;
        for id in ["a", "b", "a", "c", "b", "d"] {
            if counter.apply(inc(id, "n1")).await {
                applied += 1;
            }
        }

        assert_eq!(applied, 4);
        assert_eq!(counter.value().await, 4);
    }

    // ============================================================
    // PROPAGATION TESTS
    // ============================================================

    #[tokio::test]
    async fn test_increment_propagates_to_peers() {
        let client = MockTransport::new();
        let mut calls = client.watch();
        let counter = counter_with_peers(client.clone(), &["p:8081"]).await;

        counter.local_increment().await;
        assert_eq!(counter.value().await, 1);

        let (url, body) = tokio::time::timeout(Duration::from_secs(1), calls.recv())
            .await
            .expect("propagation was never sent")
            .expect("channel closed");

        assert_eq!(url, "http://p:8081/counter/propagate");
        assert_eq!(body["node_id"], "node1:8080");
        assert!(
            !body["id"].as_str().unwrap_or_default().is_empty(),
            "propagated increment must carry its id"
        );
    }

    #[tokio::test]
    async fn test_increment_fans_out_to_every_peer() {
        let client = MockTransport::new();
        let mut calls = client.watch();
        let counter = counter_with_peers(client.clone(), &["p1:8081", "p2:8082"]).await;

        counter.local_increment().await;

        let mut targets = Vec::new();
        for _ in 0..2 {
            let (url, _) = tokio::time::timeout(Duration::from_secs(1), calls.recv())
                .await
                .expect("propagation was never sent")
                .expect("channel closed");
            targets.push(url);
        }
        targets.sort();

        assert_eq!(
            targets,
            vec![
                "http://p1:8081/counter/propagate".to_string(),
                "http://p2:8082/counter/propagate".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_propagation_retries_then_gives_up() {
        let client = MockTransport::failing();
        let counter = counter_with_peers(client.clone(), &["down:9999"]).await;

        counter.local_increment().await;
        assert_eq!(counter.value().await, 1, "local apply must not depend on peers");

        // Drive virtual time well past the retry budget.
        tokio::time::sleep(Duration::from_secs(15)).await;
        let attempts = client.call_count();
        assert!(attempts >= 3, "expected repeated attempts, got {}", attempts);

        // The task has given up; nothing further accrues.
        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(client.call_count(), attempts);
        assert_eq!(counter.value().await, 1);
    }

    #[tokio::test]
    async fn test_failed_propagation_does_not_roll_back() {
        let client = MockTransport::failing();
        let counter = counter_with_peers(client.clone(), &["down:9999"]).await;

        counter.local_increment().await;
        counter.local_increment().await;

        assert_eq!(counter.value().await, 2);
    }
}
