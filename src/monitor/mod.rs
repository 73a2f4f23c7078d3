// Health Monitor - external DNS probes against a running seeder
// Principle: alert on transitions, not on every failed probe

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use chrono::Utc;
use hickory_proto::rr::Name;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;
use tokio::signal;
use tracing::{info, warn};

/// Probe timeout per DNS lookup.
const PROBE_TIMEOUT_SECS: u64 = 5;

/// Embed colors for the three alert kinds.
const COLOR_ONLINE: u32 = 0x2ECC71;
const COLOR_OFFLINE: u32 = 0xE74C3C;
const COLOR_STARTED: u32 = 0x3498DB;

/// Monitor configuration, built from CLI arguments by the config layer.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Address of the seeder under watch.
    pub target: IpAddr,
    /// DNS port of the seeder.
    pub port: u16,
    /// Seed hostname to query.
    pub seed_name: Name,
    /// Discord webhook; when unset, alerts are logged and skipped.
    pub webhook_url: Option<String>,
    /// Time between probes.
    pub interval: Duration,
    /// Consecutive failures tolerated before a down alert.
    pub max_retries: u32,
    /// Display name used in alert titles.
    pub service_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("webhook request failed: {0}")]
    Webhook(#[from] reqwest::Error),
}

/// Up/down tracking across probes.
///
/// Starts "down" so the first successful probe always announces recovery.
/// A down alert fires only on an up-to-down transition, and only once the
/// failure streak exceeds `max_retries`.
#[derive(Debug)]
struct MonitorState {
    is_up: bool,
    retries: u32,
}

#[derive(Debug, PartialEq, Eq)]
enum Transition {
    Online,
    Offline,
}

impl MonitorState {
    fn new() -> Self {
        Self {
            is_up: false,
            retries: 0,
        }
    }

    fn record_success(&mut self) -> Option<Transition> {
        self.retries = 0;
        if self.is_up {
            None
        } else {
            self.is_up = true;
            Some(Transition::Online)
        }
    }

    fn record_failure(&mut self, max_retries: u32) -> Option<Transition> {
        self.retries += 1;
        if self.retries > max_retries && self.is_up {
            self.is_up = false;
            Some(Transition::Offline)
        } else {
            None
        }
    }
}

/// Run the monitor loop until ctrl-c.
pub async fn run_monitor(config: MonitorConfig) -> Result<(), MonitorError> {
    info!(
        "🛡️  Monitoring {} at {}:{} every {}s",
        config.seed_name,
        config.target,
        config.port,
        config.interval.as_secs()
    );

    let resolver = build_resolver(&config);
    let http = reqwest::Client::new();
    let mut state = MonitorState::new();

    deliver(
        &http,
        &config,
        &format!("🛡️ {} Monitor Started", config.service_name),
        &format!(
            "Monitoring started at {}.\nChecks every {} seconds.",
            Utc::now().to_rfc3339(),
            config.interval.as_secs()
        ),
        COLOR_STARTED,
    )
    .await;

    // Immediate probe at startup, then the fixed interval
    let mut interval = tokio::time::interval(config.interval);

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Ctrl+C received, monitor stopping");
                return Ok(());
            }
            _ = interval.tick() => {
                probe_and_alert(&resolver, &http, &config, &mut state).await;
            }
        }
    }
}

fn build_resolver(config: &MonitorConfig) -> TokioAsyncResolver {
    let mut resolver_config = ResolverConfig::new();
    resolver_config.add_name_server(NameServerConfig::new(
        SocketAddr::new(config.target, config.port),
        Protocol::Udp,
    ));

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(PROBE_TIMEOUT_SECS);
    opts.attempts = 1;

    TokioAsyncResolver::tokio(resolver_config, opts)
}

/// One probe: A lookup of the seed hostname against the target.
///
/// An empty answer is healthy; a seeder with no peers yet still responds.
async fn probe(
    resolver: &TokioAsyncResolver,
    seed_name: &Name,
) -> Result<Vec<Ipv4Addr>, ResolveError> {
    match resolver.ipv4_lookup(seed_name.clone()).await {
        Ok(lookup) => Ok(lookup.iter().map(|a| a.0).collect()),
        Err(e) => match e.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
            _ => Err(e),
        },
    }
}

async fn probe_and_alert(
    resolver: &TokioAsyncResolver,
    http: &reqwest::Client,
    config: &MonitorConfig,
    state: &mut MonitorState,
) {
    match probe(resolver, &config.seed_name).await {
        Ok(peers) => {
            info!("[OK] {} peers returned", peers.len());

            if state.record_success() == Some(Transition::Online) {
                let peer_list = if peers.is_empty() {
                    "_No peers returned_".to_string()
                } else {
                    peers
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                };

                deliver(
                    http,
                    config,
                    &format!("✅ {} Online", config.service_name),
                    &format!(
                        "{} is now responding.\n\n**Returned Peers:**\n{}",
                        config.service_name, peer_list
                    ),
                    COLOR_ONLINE,
                )
                .await;
            }
        }
        Err(e) => {
            warn!("[FAIL] probe failed: {}", e);

            if state.record_failure(config.max_retries) == Some(Transition::Offline) {
                deliver(
                    http,
                    config,
                    &format!("🚨 {} Down", config.service_name),
                    &format!(
                        "{} is unresponsive.\n\nError:\n`{}`",
                        config.service_name, e
                    ),
                    COLOR_OFFLINE,
                )
                .await;
            }
        }
    }
}

/// Post one Discord embed, logging delivery failures.
///
/// Alerts are never fatal: the monitor must keep probing even when the
/// webhook is unreachable or unconfigured.
async fn deliver(
    http: &reqwest::Client,
    config: &MonitorConfig,
    title: &str,
    description: &str,
    color: u32,
) {
    if let Err(e) = send_alert(http, config, title, description, color).await {
        warn!("Failed to deliver alert: {}", e);
    }
}

async fn send_alert(
    http: &reqwest::Client,
    config: &MonitorConfig,
    title: &str,
    description: &str,
    color: u32,
) -> Result<(), MonitorError> {
    let Some(url) = &config.webhook_url else {
        warn!("Webhook URL not set, skipping alert: {}", title);
        return Ok(());
    };

    let payload = serde_json::json!({
        "embeds": [{
            "title": title,
            "description": description,
            "color": color,
            "footer": { "text": "Seednode Health Monitor" },
            "timestamp": Utc::now().to_rfc3339(),
        }]
    });

    let response = http.post(url).json(&payload).send().await?;
    if !response.status().is_success() {
        warn!("Webhook returned status {}", response.status());
    }

    Ok(())
}
