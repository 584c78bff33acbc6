//! Dry-run wrapper: observe the pool for real, never resize it.

use tracing::info;

use poolscale_core::{PoolController, PoolError, PoolState};

/// Wraps a [`PoolController`] so that `describe` passes through but
/// `set_desired_capacity` only logs the change it would have made.
pub struct DryRunPool<P> {
    inner: P,
}

impl<P> DryRunPool<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P> PoolController for DryRunPool<P>
where
    P: PoolController + Sync,
{
    async fn describe(&self) -> Result<PoolState, PoolError> {
        self.inner.describe().await
    }

    async fn set_desired_capacity(&self, count: i64) -> Result<(), PoolError> {
        info!(desired = count, "dry run, skipping desired-capacity change");
        Ok(())
    }
}
