// CLI Configuration - Convert CLI args to validated runtime configuration
// Principle: fail at startup, never mid-flight

use std::net::IpAddr;
use std::time::Duration;

use hickory_proto::rr::Name;

use crate::cli::{MonitorCmd, RunCmd};
use crate::monitor::MonitorConfig;

/// Complete seeder configuration derived from CLI arguments.
/// Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct SeederConfig {
    /// Peer feed URL
    pub api_url: String,
    /// DNS listen address
    pub listen_addr: IpAddr,
    /// DNS listen port
    pub port: u16,
    /// Seed hostname answered for (FQDN)
    pub seed_name: Name,
    /// Time between peer refreshes
    pub refresh_interval: Duration,
    /// Whether to also listen on TCP
    pub tcp: bool,
}

impl SeederConfig {
    /// Create configuration from the CLI run command.
    pub fn from_run_cmd(cmd: &RunCmd) -> Result<Self, ConfigError> {
        // Validate the feed URL up front; the refresher would otherwise
        // fail every cycle with a confusing transport error
        reqwest::Url::parse(&cmd.api_url)
            .map_err(|_| ConfigError::InvalidApiUrl(cmd.api_url.clone()))?;

        let listen_addr: IpAddr = cmd
            .listen
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(cmd.listen.clone()))?;

        let seed_name = parse_hostname(&cmd.hostname)?;

        if cmd.interval == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(Self {
            api_url: cmd.api_url.clone(),
            listen_addr,
            port: cmd.port,
            seed_name,
            refresh_interval: Duration::from_secs(cmd.interval),
            tcp: cmd.tcp,
        })
    }
}

/// Create monitor configuration from the CLI monitor command.
pub fn monitor_from_cmd(cmd: &MonitorCmd) -> Result<MonitorConfig, ConfigError> {
    let target: IpAddr = cmd
        .target
        .parse()
        .map_err(|_| ConfigError::InvalidTargetAddr(cmd.target.clone()))?;

    let seed_name = parse_hostname(&cmd.hostname)?;

    if cmd.interval == 0 {
        return Err(ConfigError::InvalidInterval);
    }

    Ok(MonitorConfig {
        target,
        port: cmd.port,
        seed_name,
        webhook_url: cmd.webhook_url.clone(),
        interval: Duration::from_secs(cmd.interval),
        max_retries: cmd.max_retries,
        service_name: cmd.name.clone(),
    })
}

/// Parse a hostname into a fully-qualified DNS name.
fn parse_hostname(hostname: &str) -> Result<Name, ConfigError> {
    let mut name = Name::from_utf8(hostname)
        .map_err(|_| ConfigError::InvalidHostname(hostname.to_string()))?;

    if name.is_root() || name.num_labels() == 0 {
        return Err(ConfigError::InvalidHostname(hostname.to_string()));
    }

    // Query names arrive fully qualified; match them that way
    name.set_fqdn(true);
    Ok(name)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid feed URL: {0}")]
    InvalidApiUrl(String),

    #[error("Invalid listen address: {0}")]
    InvalidListenAddr(String),

    #[error("Invalid target address: {0}")]
    InvalidTargetAddr(String),

    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    #[error("Interval must be greater than zero")]
    InvalidInterval,
}
