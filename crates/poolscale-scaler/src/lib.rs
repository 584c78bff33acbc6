//! poolscale-scaler — backlog-driven pool sizing.
//!
//! Polls the scheduled-job count for one queue, derives a target pool
//! size from a fixed per-instance job capacity, and resizes the pool
//! when the clamped target differs from its current desired count.
//!
//! # Scaling Algorithm
//!
//! ```text
//! backlog = scheduled jobs for the configured queue
//!
//! raw     = 0                                  if backlog == 0
//!         = ceil(backlog / agents_per_instance) otherwise
//!
//! target  = clamp(raw, pool.min, pool.max)
//!
//! target > pool.desired  → scale out to target
//! target < pool.desired  → scale in to target
//! target == pool.desired → no resize call
//! ```
//!
//! There is no retry inside an iteration; a failed iteration leaves
//! the pool and the scaling history exactly as they were, and the
//! next tick of the loop is the only retry mechanism.

pub mod history;
pub mod policy;
pub mod scaler;

pub use history::ScalingHistory;
pub use scaler::Scaler;
