//! Domain types for scaling decisions.

use serde::{Deserialize, Serialize};

/// Snapshot of a worker pool at decision time.
///
/// Fetched fresh from the pool controller at the start of every loop
/// iteration and never cached across iterations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolState {
    /// The pool's currently configured target size.
    pub desired: i64,
    /// Lower bound for any target the policy may produce.
    pub min: i64,
    /// Upper bound for any target the policy may produce.
    pub max: i64,
}

/// Which way a decision moves the pool, relative to its current
/// desired count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    /// Target is above the current desired count.
    Out,
    /// Target is below the current desired count.
    In,
    /// Target equals the current desired count; no resize call.
    NoChange,
}

/// A scaling decision, produced and consumed within one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingDecision {
    /// The clamped target size, guaranteed within `[min, max]`.
    pub target: i64,
    pub direction: ScaleDirection,
    /// The raw target exceeded the pool's max bound and was capped.
    pub capped: bool,
}
