// CLI - Command Line Interface for the peerseed daemon
// Principle: everything configurable at startup, immutable afterwards

pub mod config;
pub mod runner;

use clap::{Parser, Subcommand};

/// peerseed - DNS seed node for peer-to-peer network bootstrap
#[derive(Parser, Debug)]
#[command(name = "peerseed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve a rotating peer set as DNS A/AAAA records")]
#[command(long_about = r#"
peerseed answers DNS address queries for one seed hostname with the current
set of live peers, pulled periodically from an external HTTP API. P2P
clients resolve the seed hostname at startup to discover peers without a
hardcoded bootstrap list.

Run a seeder:
  peerseed run --api-url https://api.example.org/peers --hostname seed.example.org

Watch a running seeder and post Discord alerts on up/down transitions:
  peerseed monitor --hostname seed.example.org --webhook-url https://discord.com/api/webhooks/...
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "PEERSEED_LOG")]
    pub log_level: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the DNS seeder
    Run(RunCmd),

    /// Run the health monitor against a seeder
    Monitor(MonitorCmd),
}

/// Run the DNS seeder
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Peer feed URL (GET, JSON body with a "result" list)
    #[arg(long, env = "PEERSEED_API_URL")]
    pub api_url: String,

    /// Seed hostname to answer for
    #[arg(long, env = "PEERSEED_HOSTNAME")]
    pub hostname: String,

    /// DNS listen address (use :: for dual-stack IPv4 + IPv6)
    #[arg(long, default_value = "::", env = "PEERSEED_LISTEN")]
    pub listen: String,

    /// DNS listen port
    #[arg(long, default_value = "4408", env = "PEERSEED_PORT")]
    pub port: u16,

    /// Peer refresh interval in seconds
    #[arg(long, default_value = "300", env = "PEERSEED_INTERVAL")]
    pub interval: u64,

    /// Also listen for DNS over TCP
    #[arg(long)]
    pub tcp: bool,
}

/// Run the health monitor
#[derive(Parser, Debug)]
pub struct MonitorCmd {
    /// Seed hostname to query
    #[arg(long, env = "PEERSEED_HOSTNAME")]
    pub hostname: String,

    /// Address of the seeder to probe
    #[arg(long, default_value = "127.0.0.1")]
    pub target: String,

    /// DNS port of the seeder
    #[arg(long, default_value = "4408", env = "PEERSEED_PORT")]
    pub port: u16,

    /// Discord webhook URL for alerts (alerts are skipped when unset)
    #[arg(long, env = "DISCORD_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Probe interval in seconds
    #[arg(long, default_value = "300")]
    pub interval: u64,

    /// Consecutive failures tolerated before a down alert
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    /// Display name used in alert titles
    #[arg(long, default_value = "Seeder")]
    pub name: String,
}
