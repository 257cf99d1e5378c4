use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use counter_cluster::client::{HttpClient, Transport};
use counter_cluster::cluster::registry::{Registry, RegistryConfig};
use counter_cluster::counter::service::Counter;
use counter_cluster::transport::build_router;

/// A node of the replicated in-memory counter cluster.
#[derive(Parser, Debug)]
#[command(name = "counter-node", version, about = "Replicated counter node with gossip membership")]
struct Args {
    /// Port for the node to listen on. The node id becomes localhost:<port>.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Comma-separated list of initial peers (e.g. localhost:8081,localhost:8082).
    #[arg(long, default_value = "")]
    peers: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let self_id = format!("localhost:{}", args.port);
    let initial_peers = parse_peers(&args.peers);

    tracing::info!("Starting node {}", self_id);
    if initial_peers.is_empty() {
        tracing::info!("No initial peers given, starting as founding node");
    } else {
        tracing::info!("Initial peers: {:?}", initial_peers);
    }

    let mut config = RegistryConfig::default();
    if let Some(ms) = std::env::var("HEARTBEAT_INTERVAL_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
    {
        config.heartbeat_interval = Duration::from_millis(ms);
    }
    if let Some(secs) = std::env::var("PEER_EXPIRY_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
    {
        config.peer_expiry = Duration::from_secs(secs);
    }

    // 1. Wiring: one shared outbound client feeds both services.
    let client: Arc<dyn Transport> = Arc::new(HttpClient::new());
    let registry = Registry::with_config(self_id.clone(), client.clone(), config);
    let counter = Counter::new(self_id.clone(), registry.clone(), client);

    // 2. Membership: announce + periodic heartbeat/expiry tick.
    registry.clone().start(initial_peers).await;

    // 3. HTTP server:
    let app = build_router(registry, counter);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("Node {} listening on {}", self_id, listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server gracefully stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}

fn parse_peers(peer_string: &str) -> Vec<String> {
    peer_string
        .split(',')
        .map(str::trim)
        .filter(|peer| !peer.is_empty())
        .map(str::to_string)
        .collect()
}
