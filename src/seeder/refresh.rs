// Refresher - periodic peer-set refresh from the upstream feed
// Principle: stale peers beat no peers; every cycle is its own retry

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::directory::PeerDirectory;
use super::feed::{FeedError, PeerFeed};
use super::normalize::normalize;

/// Default refresh interval (5 minutes).
pub const REFRESH_INTERVAL_SECS: u64 = 300;

/// Run one refresh cycle: fetch, normalize, partition, publish.
///
/// Entries that fail normalization are dropped silently; malformed feed
/// entries are expected noise, not faults. A fetch error is returned to the
/// caller and the directory is left untouched, so the previous snapshot
/// stays authoritative.
pub async fn refresh_once(
    directory: &PeerDirectory,
    feed: &dyn PeerFeed,
) -> Result<(), FeedError> {
    let entries = feed.fetch().await?;
    let total = entries.len();

    let mut ipv4 = Vec::new();
    let mut ipv6 = Vec::new();

    for entry in &entries {
        match normalize(&entry.addr) {
            Some(addr) if addr.is_ipv4() => ipv4.push(addr),
            Some(addr) => ipv6.push(addr),
            None => {}
        }
    }

    directory.publish(ipv4, ipv6);

    let snapshot = directory.snapshot();
    info!(
        "🌱 Loaded {} IPv4 and {} IPv6 peers ({} feed entries)",
        snapshot.ipv4().len(),
        snapshot.ipv6().len(),
        total
    );

    Ok(())
}

/// Background service that refreshes the peer directory on a fixed interval.
pub struct RefreshService {
    directory: Arc<PeerDirectory>,
    feed: Arc<dyn PeerFeed>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl RefreshService {
    pub fn new(directory: Arc<PeerDirectory>, feed: Arc<dyn PeerFeed>, interval: Duration) -> Self {
        Self {
            directory,
            feed,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the first refresh inline, then spawn the periodic loop.
    ///
    /// The inline refresh means the caller can bind the DNS socket knowing
    /// the snapshot is as fresh as the feed allows; a failure here is only
    /// logged, since serving an empty snapshot is still correct.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Refresh service already running");
            return;
        }

        if let Err(e) = refresh_once(&self.directory, self.feed.as_ref()).await {
            warn!("Initial peer fetch failed, starting with empty snapshot: {}", e);
        }

        let directory = self.directory.clone();
        let feed = self.feed.clone();
        let running = self.running.clone();
        let period = self.interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; the inline refresh
            // above already covered it.
            interval.tick().await;

            info!("🔄 Refresh loop started (interval: {}s)", period.as_secs());

            while running.load(Ordering::SeqCst) {
                interval.tick().await;

                match refresh_once(&directory, feed.as_ref()).await {
                    Ok(()) => debug!("Peer refresh complete"),
                    Err(e) => warn!("Peer refresh failed, keeping previous snapshot: {}", e),
                }
            }

            info!("🔄 Refresh loop stopped");
        });
    }

    /// Flag the loop to exit after its current iteration.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
