//! poolscaled — the backlog-driven pool scaler daemon.
//!
//! Wires the agent-metrics client, the pool-manager client, and the
//! scaler loop into one process:
//!
//! ```text
//! POOLSCALE_AGENT_TOKEN=... poolscaled run \
//!     --queue default --pool build --agents-per-instance 4 \
//!     --metrics-endpoint http://metrics.internal/v3 \
//!     --pool-endpoint http://pool-manager.internal:9000 \
//!     --interval 10
//! ```

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use poolscale_core::{PoolController, QueueMetrics, ScalerConfig};
use poolscale_pool::{DryRunPool, PoolApiClient};
use poolscale_queue::AgentMetricsClient;
use poolscale_scaler::Scaler;

/// Environment variable holding the agent metrics token.
const TOKEN_ENV: &str = "POOLSCALE_AGENT_TOKEN";

#[derive(Parser)]
#[command(name = "poolscaled", about = "Backlog-driven worker pool scaler", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scaling loop against a queue and a worker pool.
    Run {
        /// Queue whose scheduled-job backlog drives scaling.
        #[arg(long)]
        queue: String,

        /// Name of the worker pool to resize.
        #[arg(long)]
        pool: String,

        /// Jobs one worker instance services concurrently.
        #[arg(long, default_value = "1")]
        agents_per_instance: i64,

        /// Seconds between scaling iterations.
        #[arg(long, default_value = "10")]
        interval: u64,

        /// Stop after this many seconds (runs until shutdown if unset).
        #[arg(long)]
        deadline: Option<u64>,

        /// Agent metrics endpoint, e.g. http://metrics.internal/v3.
        #[arg(long)]
        metrics_endpoint: String,

        /// Pool manager endpoint, e.g. http://pool-manager.internal:9000.
        #[arg(long)]
        pool_endpoint: String,

        /// Evaluate and log decisions without resizing the pool.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,poolscaled=debug,poolscale=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            queue,
            pool,
            agents_per_instance,
            interval,
            deadline,
            metrics_endpoint,
            pool_endpoint,
            dry_run,
        } => {
            info!(version = env!("CARGO_PKG_VERSION"), "poolscaled starting");

            let token = std::env::var(TOKEN_ENV)
                .ok()
                .filter(|t| !t.is_empty())
                .with_context(|| format!("{TOKEN_ENV} must be set"))?;

            let config = ScalerConfig::new(queue, agents_per_instance)?;
            let metrics = AgentMetricsClient::new(&metrics_endpoint, token)?;
            let pool_client = PoolApiClient::new(&pool_endpoint, pool)?;

            let interval = Duration::from_secs(interval);
            let deadline = deadline.map(Duration::from_secs);

            if dry_run {
                info!("dry run: the pool will not be resized");
                run_scaler(config, metrics, DryRunPool::new(pool_client), interval, deadline)
                    .await
            } else {
                run_scaler(config, metrics, pool_client, interval, deadline).await
            }
        }
    }
}

/// Run the scaler loop until deadline or Ctrl-C.
async fn run_scaler<M, P>(
    config: ScalerConfig,
    queue: M,
    pool: P,
    interval: Duration,
    deadline: Option<Duration>,
) -> anyhow::Result<()>
where
    M: QueueMetrics + Send + Sync,
    P: PoolController + Send + Sync,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let mut scaler = Scaler::new(config, queue, pool);
    scaler.run(interval, deadline, shutdown_rx).await;

    info!("poolscaled stopped");
    Ok(())
}
