// peerseed - DNS seed node for peer-to-peer network bootstrap
// Principle: keep answering, possibly stale, no matter what the feed does

mod cli;
mod monitor;
mod seeder;
mod server;

#[cfg(test)]
mod tests;

use clap::Parser;
use cli::config::{monitor_from_cmd, SeederConfig};
use cli::runner::run_seeder;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_filter = if cli.verbose {
        "debug"
    } else {
        &cli.log_level
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter)),
        )
        .init();

    print_banner();

    match cli.command {
        Commands::Run(cmd) => {
            let config = SeederConfig::from_run_cmd(&cmd).map_err(|e| {
                error!("Configuration error: {}", e);
                anyhow::anyhow!("Configuration error: {}", e)
            })?;

            if let Err(e) = run_seeder(config).await {
                error!("Seeder error: {}", e);
                return Err(anyhow::anyhow!("Seeder error: {}", e));
            }
        }

        Commands::Monitor(cmd) => {
            let config = monitor_from_cmd(&cmd).map_err(|e| {
                error!("Configuration error: {}", e);
                anyhow::anyhow!("Configuration error: {}", e)
            })?;

            if let Err(e) = monitor::run_monitor(config).await {
                error!("Monitor error: {}", e);
                return Err(anyhow::anyhow!("Monitor error: {}", e));
            }
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!("    peerseed {} - DNS seed node", env!("CARGO_PKG_VERSION"));
    println!("    one hostname, the whole live peer set");
    println!();
}
