// DNS server - UDP (and optionally TCP) listener for seed queries
// Principle: the wire protocol belongs to hickory; we only map answers

pub mod handler;

pub use handler::{SeedHandler, ANSWER_TTL};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hickory_proto::rr::Name;
use hickory_server::ServerFuture;
use tokio::net::{TcpListener, UdpSocket};
use tracing::info;

use crate::seeder::PeerDirectory;

/// Idle timeout for TCP DNS connections.
const TCP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Proto(#[from] hickory_proto::error::ProtoError),
}

/// The seed DNS server.
pub struct DnsServer;

impl DnsServer {
    /// Bind and serve until the process shuts down.
    ///
    /// Binds UDP on `bind_addr` (bind to `::` for dual stack) and, when
    /// `tcp` is set, a TCP listener on the same address. Each incoming
    /// query is dispatched by hickory on its own task; the handler only
    /// performs a snapshot read, never I/O.
    pub async fn start(
        bind_addr: SocketAddr,
        seed_name: Name,
        directory: Arc<PeerDirectory>,
        tcp: bool,
    ) -> Result<(), ServerError> {
        let handler = SeedHandler::new(seed_name.clone(), directory);
        let mut server = ServerFuture::new(handler);

        let udp = UdpSocket::bind(bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr,
                source,
            })?;
        server.register_socket(udp);

        if tcp {
            let listener = TcpListener::bind(bind_addr)
                .await
                .map_err(|source| ServerError::Bind {
                    addr: bind_addr,
                    source,
                })?;
            server.register_listener(listener, Duration::from_secs(TCP_TIMEOUT_SECS));
        }

        info!(
            "📡 DNS seeder listening on {} (udp{}) for {}",
            bind_addr,
            if tcp { "+tcp" } else { "" },
            seed_name
        );

        server.block_until_done().await?;

        info!("DNS server stopped");
        Ok(())
    }
}
