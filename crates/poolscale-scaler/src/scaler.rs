//! The control loop around the scaling policy.
//!
//! One iteration fetches the backlog and pool state, evaluates the
//! policy, and issues at most one resize call. The enclosing loop
//! re-runs iterations on a fixed interval until an optional deadline
//! or a shutdown signal; iterations never overlap.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use poolscale_core::{
    ConfigError, PoolController, QueueMetrics, ScaleDirection, ScalerConfig,
};

use crate::history::ScalingHistory;
use crate::policy;

/// Drives the evaluate-and-apply cycle against a queue metrics source
/// and a pool controller.
///
/// Owns the process-lifetime [`ScalingHistory`]; the policy itself is
/// stateless and holds nothing between calls.
pub struct Scaler<M, P> {
    config: ScalerConfig,
    queue: M,
    pool: P,
    history: ScalingHistory,
}

impl<M, P> Scaler<M, P>
where
    M: QueueMetrics + Send + Sync,
    P: PoolController + Send + Sync,
{
    pub fn new(config: ScalerConfig, queue: M, pool: P) -> Self {
        Self {
            config,
            queue,
            pool,
            history: ScalingHistory::new(),
        }
    }

    /// The scaling history so far.
    pub fn history(&self) -> &ScalingHistory {
        &self.history
    }

    /// Run one evaluate-and-apply iteration.
    ///
    /// Any collaborator failure aborts the iteration with the error
    /// surfaced verbatim and the history untouched, so the next tick
    /// re-evaluates from accurate prior state. A pool reporting
    /// `min > max` is a rejected configuration, not a clamp-order
    /// guess.
    pub async fn run_once(&mut self) -> anyhow::Result<()> {
        let backlog = self.queue.scheduled_count(&self.config.queue).await?;
        let pool = self.pool.describe().await?;

        if pool.min > pool.max {
            return Err(ConfigError::InvalidBounds {
                min: pool.min,
                max: pool.max,
            }
            .into());
        }

        let decision = policy::evaluate(backlog, self.config.agents_per_instance, &pool);

        if decision.capped {
            warn!(
                backlog,
                max = pool.max,
                "desired count exceeds pool max, capping"
            );
        }

        let now = epoch_secs();
        match decision.direction {
            ScaleDirection::NoChange => {
                info!(
                    desired = pool.desired,
                    backlog, "no scaling required"
                );
            }
            ScaleDirection::Out => {
                info!(
                    from = pool.desired,
                    to = decision.target,
                    backlog,
                    "scaling out"
                );
                if let Some(ago) = self.history.since_scale_out(now) {
                    debug!(seconds_ago = ago, "last scale out");
                }
                self.pool.set_desired_capacity(decision.target).await?;
                self.history.record_scale_out(decision.target, now);
            }
            ScaleDirection::In => {
                info!(
                    from = pool.desired,
                    to = decision.target,
                    backlog,
                    "scaling in"
                );
                if let Some(ago) = self.history.since_scale_in(now) {
                    debug!(seconds_ago = ago, "last scale in");
                }
                self.pool.set_desired_capacity(decision.target).await?;
                self.history.record_scale_in(decision.target, now);
            }
        }

        Ok(())
    }

    /// Run iterations on `interval` until `deadline` elapses or the
    /// shutdown signal fires.
    ///
    /// The first iteration runs immediately. A failed iteration is
    /// logged at warn and the loop continues — the next tick is the
    /// only retry. Cancellation is cooperative between ticks; an
    /// in-flight iteration always finishes.
    pub async fn run(
        &mut self,
        interval: Duration,
        deadline: Option<Duration>,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) {
        info!(
            interval_secs = interval.as_secs(),
            queue = %self.config.queue,
            "scaler started"
        );

        let deadline_at = deadline.map(|d| tokio::time::Instant::now() + d);

        loop {
            if let Some(at) = deadline_at
                && tokio::time::Instant::now() >= at
            {
                info!("deadline reached, scaler exiting");
                break;
            }

            if let Err(e) = self.run_once().await {
                warn!(error = %e, "scaling iteration failed");
            }

            debug!(interval_secs = interval.as_secs(), "waiting for next tick");
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = wait_until(deadline_at) => {
                    info!("deadline reached, scaler exiting");
                    break;
                }
                _ = shutdown.changed() => {
                    info!("scaler shutting down");
                    break;
                }
            }
        }
    }
}

/// Sleep until `at`, or forever when no deadline is set.
async fn wait_until(at: Option<tokio::time::Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
