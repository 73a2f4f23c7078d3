// Runner - seeder startup, refresh service, DNS server, shutdown
// Principle: refresh once before serving, then never stop answering

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};

use crate::cli::config::SeederConfig;
use crate::seeder::{FeedError, HttpPeerFeed, PeerDirectory, RefreshService};
use crate::server::{DnsServer, ServerError};

/// Run the seeder with the given configuration.
pub async fn run_seeder(config: SeederConfig) -> Result<(), RunnerError> {
    info!("🚀 Starting DNS seeder for {}", config.seed_name);
    info!("🔗 Peer feed: {}", config.api_url);

    let directory = Arc::new(PeerDirectory::new());
    let feed = Arc::new(HttpPeerFeed::new(config.api_url.clone())?);

    // First refresh completes (or fails harmlessly) before the socket is
    // bound, so the server never starts with a known-empty snapshot when
    // the feed has data
    let refresher = RefreshService::new(directory.clone(), feed, config.refresh_interval);
    refresher.start().await;

    let bind_addr = SocketAddr::new(config.listen_addr, config.port);
    let seed_name = config.seed_name.clone();
    let server_directory = directory.clone();
    let tcp = config.tcp;

    let mut server = tokio::spawn(async move {
        DnsServer::start(bind_addr, seed_name, server_directory, tcp).await
    });

    let result = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("⚠️  Ctrl+C received, shutting down...");
            server.abort();
            Ok(())
        }

        joined = &mut server => {
            match joined {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!("DNS server failed: {}", e);
                    Err(RunnerError::Server(e))
                }
                Err(e) => Err(RunnerError::Task(e.to_string())),
            }
        }
    };

    refresher.stop();
    info!("👋 Seeder stopped cleanly");

    result
}

/// Runner errors
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Task error: {0}")]
    Task(String),
}
