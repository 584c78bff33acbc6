//! Collaborator traits for the control loop.
//!
//! Both collaborators are narrow, capability-style abstractions (two
//! operations between them) so the scaler can be exercised with
//! in-memory fakes instead of real network calls.

use std::future::Future;

use crate::error::{PoolError, QueueError};
use crate::types::PoolState;

/// Source of backlog counts for named job queues.
pub trait QueueMetrics {
    /// Number of jobs scheduled but not yet claimed by any worker
    /// for `queue`.
    ///
    /// A queue absent from the underlying response is backlog zero,
    /// not an error.
    fn scheduled_count(
        &self,
        queue: &str,
    ) -> impl Future<Output = Result<i64, QueueError>> + Send;
}

/// The managed worker pool.
pub trait PoolController {
    /// Current desired count and min/max bounds.
    fn describe(&self) -> impl Future<Output = Result<PoolState, PoolError>> + Send;

    /// Set a new desired count. Callers guarantee `count` already
    /// lies within the pool's `[min, max]` bounds.
    fn set_desired_capacity(
        &self,
        count: i64,
    ) -> impl Future<Output = Result<(), PoolError>> + Send;
}
